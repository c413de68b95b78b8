use std::time::Duration;

use anyhow::{ensure, Context};
use chrono::{DateTime, SecondsFormat, Utc};

use crate::models::candle::{Candle, Ticker};

const COINBASE_API_URL: &str = "https://api.exchange.coinbase.com";

#[derive(Clone)]
pub struct CoinbaseClient {
    client: reqwest::Client,
    base_url: String,
}

impl CoinbaseClient {
    pub fn new(request_timeout: Duration) -> anyhow::Result<Self> {
        Self::with_base_url(COINBASE_API_URL, request_timeout)
    }

    /// Every request, connect included, is abandoned after `request_timeout`
    pub fn with_base_url(base_url: &str, request_timeout: Duration) -> anyhow::Result<Self> {
        // Coinbase rejects requests without a user agent
        let client = reqwest::Client::builder()
            .user_agent(concat!("patternwatch/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(request_timeout)
            .timeout(request_timeout)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Fetch the last traded price for a product
    pub async fn fetch_ticker(&self, product: &str) -> anyhow::Result<f64> {
        let ticker = self
            .client
            .get(format!("{}/products/{}/ticker", self.base_url, product))
            .send()
            .await
            .context("ticker request failed")?
            .error_for_status()
            .context("ticker request rejected")?
            .json::<Ticker>()
            .await
            .context("invalid ticker payload")?;

        ensure!(ticker.price.is_finite(), "non-finite ticker price for {product}");
        Ok(ticker.price)
    }

    /// Fetch candles for a product within a time range, oldest first
    pub async fn fetch_candles(
        &self,
        product: &str,
        granularity_secs: u32,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> anyhow::Result<Vec<Candle>> {
        let mut candles = self
            .client
            .get(format!("{}/products/{}/candles", self.base_url, product))
            .query(&candle_params(granularity_secs, start, end))
            .send()
            .await
            .context("candle request failed")?
            .error_for_status()
            .context("candle request rejected")?
            .json::<Vec<Candle>>()
            .await
            .context("invalid candle payload")?;

        // Coinbase returns newest first
        sort_oldest_first(&mut candles);
        Ok(candles)
    }

    /// Fetch the last `minutes` of history for the initial chart
    pub async fn fetch_backfill(
        &self,
        product: &str,
        minutes: i64,
        granularity_secs: u32,
    ) -> anyhow::Result<Vec<Candle>> {
        let end = Utc::now();
        let start = end - chrono::Duration::minutes(minutes);
        self.fetch_candles(product, granularity_secs, start, end).await
    }
}

fn candle_params(
    granularity_secs: u32,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> [(&'static str, String); 3] {
    [
        ("granularity", granularity_secs.to_string()),
        ("start", start.to_rfc3339_opts(SecondsFormat::Secs, true)),
        ("end", end.to_rfc3339_opts(SecondsFormat::Secs, true)),
    ]
}

fn sort_oldest_first(candles: &mut [Candle]) {
    candles.sort_by_key(|candle| candle.0);
}
