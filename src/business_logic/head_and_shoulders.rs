use crate::business_logic::config::PatternConfig;
use crate::business_logic::extrema::Extrema;

const MIN_POINTS: usize = 5;

/// Head-and-shoulders top detector.
///
/// Confirms only a completed breakdown: three most recent peaks where the
/// middle one towers over two similar shoulders, troughs on both sides of the
/// head, and a last price below the lowest of those troughs (the neckline).
#[derive(Debug, Clone)]
pub struct HeadAndShouldersDetector {
    shoulder_tolerance: f64,
}

impl HeadAndShouldersDetector {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            shoulder_tolerance: config.shoulder_tolerance,
        }
    }

    pub fn detect(&self, series: &[f64]) -> bool {
        self.neckline(series)
            .map(|neckline| breaks_below(series, neckline))
            .unwrap_or(false)
    }

    /// Neckline level and right shoulder index when the shape is valid
    fn neckline(&self, series: &[f64]) -> Option<(f64, usize)> {
        if series.len() < MIN_POINTS {
            return None;
        }

        let extrema = Extrema::extract(series);
        if extrema.peaks.len() < 3 || extrema.troughs.len() < 2 {
            return None;
        }

        let [a, b, c] = extrema.last_peaks::<3>()?;
        let (pa, pb, pc) = (series[a], series[b], series[c]);

        // Head above both shoulders
        if !(pb > pa && pb > pc) {
            return None;
        }

        if (pa - pc).abs() > self.shoulder_tolerance * pb {
            return None;
        }

        let left = extrema.troughs_between(a, b).map(|t| series[t]).reduce(f64::min)?;
        let right = extrema.troughs_between(b, c).map(|t| series[t]).reduce(f64::min)?;

        Some((left.min(right), c))
    }
}

impl Default for HeadAndShouldersDetector {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

fn breaks_below(series: &[f64], (neckline, right_shoulder): (f64, usize)) -> bool {
    match series.last() {
        Some(&last) => right_shoulder < series.len() - 1 && last < neckline,
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // peaks 10, 15, 10.2 with troughs 7 and 6 between them
    fn shape_with_last(last: f64) -> Vec<f64> {
        vec![5.0, 10.0, 7.0, 15.0, 6.0, 10.2, last]
    }

    #[test]
    fn confirms_breakdown_below_neckline() {
        let detector = HeadAndShouldersDetector::default();
        assert!(detector.detect(&shape_with_last(5.0)));
    }

    #[test]
    fn rejects_price_above_neckline() {
        let detector = HeadAndShouldersDetector::default();
        assert!(!detector.detect(&shape_with_last(6.5)));
    }

    #[test]
    fn rejects_lopsided_shoulders() {
        let detector = HeadAndShouldersDetector::default();
        // |10 - 6.5| = 3.5 > 0.15 * 15
        let series = vec![5.0, 10.0, 7.0, 15.0, 6.0, 6.5, 5.0];
        assert!(!detector.detect(&series));
    }

    #[test]
    fn rejects_head_not_highest() {
        let detector = HeadAndShouldersDetector::default();
        let series = vec![5.0, 10.0, 7.0, 9.0, 6.0, 10.2, 5.0];
        assert!(!detector.detect(&series));
    }

    #[test]
    fn uses_lowest_trough_as_neckline() {
        let detector = HeadAndShouldersDetector::default();
        // neckline is 6 (right side); 6.5 is below the left trough but not the neckline
        assert!(!detector.detect(&shape_with_last(6.5)));
        assert!(detector.detect(&shape_with_last(5.99)));
    }

    #[test]
    fn only_the_three_latest_peaks_count() {
        let detector = HeadAndShouldersDetector::default();
        let mut series = vec![1.0, 30.0, 2.0];
        series.extend(shape_with_last(5.0));
        assert!(detector.detect(&series));
    }

    #[test]
    fn short_or_flat_series_is_absent() {
        let detector = HeadAndShouldersDetector::default();
        assert!(!detector.detect(&[]));
        assert!(!detector.detect(&[1.0, 2.0, 1.0, 2.0]));
        assert!(!detector.detect(&[3.0; 20]));
    }

    #[test]
    fn tolerance_is_configurable() {
        let config = PatternConfig {
            shoulder_tolerance: 0.01,
            ..PatternConfig::default()
        };
        let detector = HeadAndShouldersDetector::new(&config);
        // |10 - 10.2| = 0.2 > 0.01 * 15
        assert!(!detector.detect(&shape_with_last(5.0)));
    }
}
