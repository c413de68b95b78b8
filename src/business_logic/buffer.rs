use std::collections::VecDeque;

use crate::models::sample::Sample;

/// Bounded FIFO history of price samples
#[derive(Debug, Clone)]
pub struct SampleBuffer {
    samples: VecDeque<Sample>,
    max_points: usize,
}

impl SampleBuffer {
    pub fn new(max_points: usize) -> Self {
        let max_points = max_points.max(1);
        Self {
            samples: VecDeque::with_capacity(max_points + 1),
            max_points,
        }
    }

    /// Push a sample, evicting the oldest entries once over capacity
    pub fn append(&mut self, sample: Sample) {
        self.samples.push_back(sample);
        while self.samples.len() > self.max_points {
            self.samples.pop_front();
        }
    }

    /// Most recent `min(n, len)` samples, oldest first
    pub fn window(&self, n: usize) -> impl ExactSizeIterator<Item = &Sample> {
        let skip = self.samples.len().saturating_sub(n);
        self.samples.range(skip..)
    }

    /// Prices of the most recent `n` samples, oldest first
    pub fn window_prices(&self, n: usize) -> Vec<f64> {
        self.window(n).map(|sample| sample.price).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Sample> {
        self.samples.iter()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.samples.back()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn sample(i: i64) -> Sample {
        Sample::new(Utc.timestamp_opt(1_700_000_000 + i, 0).unwrap(), i as f64)
    }

    #[test]
    fn append_evicts_oldest_first() {
        let mut buffer = SampleBuffer::new(3);
        for i in 0..5 {
            buffer.append(sample(i));
        }

        let prices: Vec<f64> = buffer.iter().map(|s| s.price).collect();
        assert_eq!(prices, vec![2.0, 3.0, 4.0]);
        assert_eq!(buffer.latest().map(|s| s.price), Some(4.0));
    }

    #[test]
    fn window_is_clamped_to_length() {
        let mut buffer = SampleBuffer::new(10);
        for i in 0..4 {
            buffer.append(sample(i));
        }

        assert_eq!(buffer.window(100).len(), 4);
        assert_eq!(buffer.window_prices(2), vec![2.0, 3.0]);
        assert!(buffer.window(0).next().is_none());
        // read-only
        assert_eq!(buffer.len(), 4);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut buffer = SampleBuffer::new(0);
        buffer.append(sample(1));
        buffer.append(sample(2));
        assert_eq!(buffer.len(), 1);
        assert_eq!(buffer.window_prices(5), vec![2.0]);
    }

    proptest! {
        #[test]
        fn retains_exactly_the_most_recent(capacity in 1usize..50, count in 0i64..200) {
            let mut buffer = SampleBuffer::new(capacity);
            for i in 0..count {
                buffer.append(sample(i));
                prop_assert!(buffer.len() <= capacity);
            }

            let expected: Vec<f64> = (0..count)
                .skip((count as usize).saturating_sub(capacity))
                .map(|i| i as f64)
                .collect();
            let actual: Vec<f64> = buffer.iter().map(|s| s.price).collect();
            prop_assert_eq!(actual, expected);
        }
    }
}
