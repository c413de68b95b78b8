use chrono::{DateTime, Local, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Single price observation
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Sample {
    /// Observation time (UTC)
    pub timestamp: DateTime<Utc>,
    /// Last traded price
    pub price: f64,
}

impl Sample {
    pub fn new(timestamp: DateTime<Utc>, price: f64) -> Self {
        Self { timestamp, price }
    }

    /// Clock label used on chart axes
    pub fn time_label(&self) -> String {
        format_time_label(&self.timestamp)
    }
}

/// `HH:MM:SS` on the host's local clock
pub fn format_time_label(timestamp: &DateTime<Utc>) -> String {
    timestamp.with_timezone(&Local).format("%H:%M:%S").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn time_label_uses_local_clock() {
        let local = Local.with_ymd_and_hms(2024, 1, 1, 9, 30, 5).unwrap();
        let sample = Sample::new(local.with_timezone(&Utc), 1.0);
        assert_eq!(sample.time_label(), "09:30:05");
    }
}
