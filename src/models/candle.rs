use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::sample::Sample;

/// Coinbase Exchange candle row: `[time, low, high, open, close, volume]`
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Candle(
    /// Bucket start time (epoch seconds)
    pub i64,
    /// Low price
    pub f64,
    /// High price
    pub f64,
    /// Open price
    pub f64,
    /// Close price
    pub f64,
    /// Volume
    pub f64,
);

impl Candle {
    pub fn open_time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }

    pub fn close(&self) -> f64 {
        self.4
    }

    /// Close price as a sample, if the row is usable
    pub fn to_sample(&self) -> Option<Sample> {
        let timestamp = self.open_time()?;
        self.close()
            .is_finite()
            .then(|| Sample::new(timestamp, self.close()))
    }
}

/// Coinbase Exchange ticker payload (only the fields we use)
#[derive(Debug, Clone, Deserialize)]
pub struct Ticker {
    #[serde(deserialize_with = "deserialize_string_to_f64")]
    pub price: f64,
}

fn deserialize_string_to_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: String = Deserialize::deserialize(deserializer)?;
    s.parse::<f64>().map_err(serde::de::Error::custom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_candle_rows() {
        let rows: Vec<Candle> =
            serde_json::from_str("[[1700000060, 99.5, 101.0, 100.0, 100.5, 12.3]]").unwrap();
        let sample = rows[0].to_sample().unwrap();

        assert_eq!(sample.timestamp.timestamp(), 1_700_000_060);
        assert_eq!(sample.price, 100.5);
    }

    #[test]
    fn parses_ticker_price_string() {
        let ticker: Ticker =
            serde_json::from_str(r#"{"trade_id": 1, "price": "43123.45", "size": "0.1"}"#).unwrap();
        assert_eq!(ticker.price, 43123.45);
    }

    #[test]
    fn rejects_non_numeric_ticker() {
        assert!(serde_json::from_str::<Ticker>(r#"{"price": "n/a"}"#).is_err());
    }
}
