use crate::business_logic::config::PatternConfig;
use crate::business_logic::extrema::Extrema;
use crate::models::alert::Direction;

const MIN_POINTS: usize = 4;

/// Converging (symmetrical) triangle breakout detector
#[derive(Debug, Clone)]
pub struct TriangleDetector {
    min_move: f64,
}

impl TriangleDetector {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            min_move: config.triangle_min_move,
        }
    }

    /// Breakout direction of the last price, or `None` while still inside
    /// the triangle (or when no triangle exists)
    pub fn detect(&self, series: &[f64]) -> Option<Direction> {
        if series.len() < MIN_POINTS {
            return None;
        }

        let extrema = Extrema::extract(series);
        let [p1, p2] = extrema.last_peaks::<2>()?;
        let [t1, t2] = extrema.last_troughs::<2>()?;

        let alternating = (p1 < t1 && t1 < p2 && p2 < t2) || (t1 < p1 && p1 < t2 && t2 < p2);
        if !alternating {
            return None;
        }

        let (p1_val, p2_val) = (series[p1], series[p2]);
        let (t1_val, t2_val) = (series[t1], series[t2]);

        // Lower highs and higher lows
        if p2_val >= p1_val || t2_val <= t1_val {
            return None;
        }

        if (p1_val - p2_val) / p1_val < self.min_move || (t2_val - t1_val) / t1_val < self.min_move
        {
            return None;
        }

        let current = *series.last()?;
        if current > p2_val {
            Some(Direction::Bullish)
        } else if current < t2_val {
            Some(Direction::Bearish)
        } else {
            None
        }
    }
}

impl Default for TriangleDetector {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakout_above_second_peak_is_bullish() {
        let detector = TriangleDetector::default();
        // peaks 20, 18 and troughs 10, 12, peak first
        let series = vec![15.0, 20.0, 10.0, 18.0, 12.0, 19.0];
        assert_eq!(detector.detect(&series), Some(Direction::Bullish));
    }

    #[test]
    fn breakdown_below_second_trough_is_bearish() {
        let detector = TriangleDetector::default();
        // trough first: 10, 20, 12, 18
        let series = vec![15.0, 10.0, 20.0, 12.0, 18.0, 11.0];
        assert_eq!(detector.detect(&series), Some(Direction::Bearish));
    }

    #[test]
    fn price_inside_triangle_is_none() {
        let detector = TriangleDetector::default();
        let series = vec![15.0, 20.0, 10.0, 18.0, 12.0, 15.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn diverging_boundaries_are_rejected() {
        let detector = TriangleDetector::default();
        // higher high: 20 then 22
        let series = vec![15.0, 20.0, 10.0, 22.0, 12.0, 23.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn noise_sized_moves_are_rejected() {
        let detector = TriangleDetector::default();
        // 20 -> 19.95 is 0.25%, under the 0.5% floor
        let series = vec![15.0, 20.0, 10.0, 19.95, 12.0, 21.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn requires_interleaved_extrema() {
        let detector = TriangleDetector::default();
        // plateau between the peaks leaves no trough there
        let series = vec![10.0, 5.0, 20.0, 15.0, 15.0, 18.0, 12.0, 19.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn short_series_is_none() {
        let detector = TriangleDetector::default();
        assert_eq!(detector.detect(&[1.0, 2.0, 1.0]), None);
    }
}
