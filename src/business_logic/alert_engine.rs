use chrono::{DateTime, Utc};

use crate::business_logic::buffer::SampleBuffer;
use crate::business_logic::config::PatternConfig;
use crate::business_logic::flag::FlagDetector;
use crate::business_logic::head_and_shoulders::HeadAndShouldersDetector;
use crate::business_logic::triangle::TriangleDetector;
use crate::models::alert::{Alert, AlertKind};
use crate::models::sample::{format_time_label, Sample};

/// Pattern engine for a single instrument.
///
/// Owns the rolling sample buffer and runs every detector over the most
/// recent window on each tick.
#[derive(Debug)]
pub struct AlertEngine {
    buffer: SampleBuffer,
    window: usize,
    head_and_shoulders: HeadAndShouldersDetector,
    triangle: TriangleDetector,
    flag: FlagDetector,
}

impl AlertEngine {
    pub fn new(config: &PatternConfig) -> Self {
        Self {
            buffer: SampleBuffer::new(config.max_points),
            window: config.window.max(1),
            head_and_shoulders: HeadAndShouldersDetector::new(config),
            triangle: TriangleDetector::new(config),
            flag: FlagDetector::new(config),
        }
    }

    /// Load historical samples without raising alerts
    pub fn seed<I>(&mut self, samples: I)
    where
        I: IntoIterator<Item = Sample>,
    {
        for sample in samples {
            self.buffer.append(sample);
        }
    }

    /// Append one sample and return the alerts completed on this tick.
    ///
    /// Alerts come out in a fixed order: head-and-shoulders, triangle, flag.
    pub fn on_new_sample(&mut self, timestamp: DateTime<Utc>, price: f64) -> Vec<Alert> {
        self.buffer.append(Sample::new(timestamp, price));
        let series = self.buffer.window_prices(self.window);

        let alerts: Vec<Alert> = self
            .evaluate(&series)
            .into_iter()
            .map(|kind| Alert::new(timestamp, kind))
            .collect();

        for alert in &alerts {
            tracing::info!(
                "{} at {} (price {:.2})",
                alert.message,
                format_time_label(&alert.time),
                price
            );
        }

        alerts
    }

    /// Run every detector over a price series
    pub fn evaluate(&self, series: &[f64]) -> Vec<AlertKind> {
        let mut kinds = Vec::with_capacity(3);

        if self.head_and_shoulders.detect(series) {
            kinds.push(AlertKind::HeadAndShoulders);
        }
        if let Some(direction) = self.triangle.detect(series) {
            kinds.push(AlertKind::Triangle(direction));
        }
        if let Some(direction) = self.flag.detect(series) {
            kinds.push(AlertKind::Flag(direction));
        }

        kinds
    }

    /// Snapshot of the whole buffer for charting
    pub fn current_window(&self) -> Vec<Sample> {
        self.buffer.iter().copied().collect()
    }

    pub fn latest(&self) -> Option<&Sample> {
        self.buffer.latest()
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for AlertEngine {
    fn default() -> Self {
        Self::new(&PatternConfig::default())
    }
}
