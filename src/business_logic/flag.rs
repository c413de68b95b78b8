use crate::business_logic::config::PatternConfig;
use crate::models::alert::Direction;

const MIN_POINTS: usize = 6;

/// Flag / pennant continuation detector.
///
/// The prevailing trend comes from the window endpoints. The pole is the
/// extreme price reached early in the window, the flag is a shallow
/// counter-move after it, and the pattern confirms once the last price
/// breaks past the pole extreme in the trend direction.
#[derive(Debug, Clone)]
pub struct FlagDetector {
    pole_divisor: usize,
    min_pole_move: f64,
    max_retrace: f64,
}

impl FlagDetector {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            pole_divisor: config.flag_pole_divisor.max(1),
            min_pole_move: config.flag_min_pole_move,
            max_retrace: config.flag_max_retrace,
        }
    }

    pub fn detect(&self, series: &[f64]) -> Option<Direction> {
        let n = series.len();
        if n < MIN_POINTS {
            return None;
        }

        let (start, end) = (series[0], series[n - 1]);
        let segment = (n / self.pole_divisor).max(1);
        let pole = &series[..=segment.min(n - 1)];

        if end > start {
            self.bull_flag(series, pole)
        } else if end < start {
            self.bear_flag(series, pole)
        } else {
            None
        }
    }

    fn bull_flag(&self, series: &[f64], pole: &[f64]) -> Option<Direction> {
        let (start, end) = (series[0], series[series.len() - 1]);

        let (peak_idx, peak_val) = first_max(pole)?;
        if peak_idx >= series.len() - 1 {
            return None;
        }

        let (low_idx, low_after) = first_min(&series[peak_idx..])?;
        let low_idx = low_idx + peak_idx;

        let gain = peak_val - start;
        if start == 0.0 || gain / start < self.min_pole_move {
            return None;
        }

        let retrace = peak_val - low_after;
        if retrace / gain > self.max_retrace {
            return None;
        }

        (end > peak_val && low_idx > peak_idx).then_some(Direction::Bullish)
    }

    fn bear_flag(&self, series: &[f64], pole: &[f64]) -> Option<Direction> {
        let (start, end) = (series[0], series[series.len() - 1]);

        let (trough_idx, trough_val) = first_min(pole)?;
        if trough_idx >= series.len() - 1 {
            return None;
        }

        let (high_idx, high_after) = first_max(&series[trough_idx..])?;
        let high_idx = high_idx + trough_idx;

        let drop = start - trough_val;
        if start == 0.0 || drop / start < self.min_pole_move {
            return None;
        }

        let retrace = high_after - trough_val;
        if retrace / drop > self.max_retrace {
            return None;
        }

        (end < trough_val && high_idx > trough_idx).then_some(Direction::Bearish)
    }
}

impl Default for FlagDetector {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}

/// Index and value of the first occurrence of the maximum
fn first_max(values: &[f64]) -> Option<(usize, f64)> {
    first_by(values, |candidate, best| candidate > best)
}

/// Index and value of the first occurrence of the minimum
fn first_min(values: &[f64]) -> Option<(usize, f64)> {
    first_by(values, |candidate, best| candidate < best)
}

fn first_by(values: &[f64], better: impl Fn(f64, f64) -> bool) -> Option<(usize, f64)> {
    let (&first, rest) = values.split_first()?;
    let best = rest
        .iter()
        .enumerate()
        .fold((0, first), |(best_idx, best), (i, &v)| {
            if better(v, best) {
                (i + 1, v)
            } else {
                (best_idx, best)
            }
        });
    Some(best)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bull_flag_breakout() {
        let detector = FlagDetector::default();
        // pole 100 -> 115, pullback to 112, breakout at 118
        let series = vec![100.0, 108.0, 115.0, 113.0, 112.0, 113.0, 114.0, 116.0, 118.0];
        assert_eq!(detector.detect(&series), Some(Direction::Bullish));
    }

    #[test]
    fn deep_retrace_is_not_a_flag() {
        let detector = FlagDetector::default();
        // pullback to 101 gives back 14 of the 15 point pole
        let series = vec![100.0, 108.0, 115.0, 110.0, 101.0, 105.0, 110.0, 114.0, 118.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn bear_flag_breakdown() {
        let detector = FlagDetector::default();
        let series = vec![100.0, 92.0, 85.0, 87.0, 88.0, 87.0, 86.0, 84.0, 82.0];
        assert_eq!(detector.detect(&series), Some(Direction::Bearish));
    }

    #[test]
    fn no_breakout_past_pole() {
        let detector = FlagDetector::default();
        let series = vec![100.0, 108.0, 115.0, 113.0, 112.0, 113.0, 114.0, 114.0, 114.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn small_pole_is_rejected() {
        let detector = FlagDetector::default();
        let series = vec![100.0, 100.2, 100.5, 100.3, 100.2, 100.4, 100.6];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn steady_rise_without_pullback_is_not_a_flag() {
        let detector = FlagDetector::default();
        let series = vec![100.0, 108.0, 115.0, 116.0, 117.0, 118.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn equal_endpoints_or_short_series() {
        let detector = FlagDetector::default();
        assert_eq!(detector.detect(&[100.0, 110.0, 100.0, 105.0, 100.0, 100.0]), None);
        assert_eq!(detector.detect(&[100.0, 110.0, 105.0, 108.0, 120.0]), None);
    }

    #[test]
    fn thresholds_are_configurable() {
        let config = PatternConfig {
            flag_max_retrace: 0.1,
            ..PatternConfig::default()
        };
        let detector = FlagDetector::new(&config);
        // 20% retrace now exceeds the limit
        let series = vec![100.0, 108.0, 115.0, 113.0, 112.0, 113.0, 114.0, 116.0, 118.0];
        assert_eq!(detector.detect(&series), None);
    }

    #[test]
    fn first_extremum_wins_ties() {
        assert_eq!(first_max(&[1.0, 3.0, 2.0, 3.0]), Some((1, 3.0)));
        assert_eq!(first_min(&[2.0, 1.0, 1.0]), Some((1, 1.0)));
        assert_eq!(first_max(&[]), None);
    }
}
