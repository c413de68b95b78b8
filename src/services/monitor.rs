use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use tokio::time::{interval, MissedTickBehavior};

use crate::business_logic::alert_engine::AlertEngine;
use crate::business_logic::config::{MonitorConfig, PatternConfig};
use crate::models::alert::Alert;
use crate::models::analysis::AnalysisSnapshot;
use crate::services::analysis_state::SharedAnalysisState;
use crate::services::coinbase::CoinbaseClient;
use crate::services::notifier::{notification_for, NotificationSink};

/// Polls the price feed and drives pattern detection for one product
pub struct MonitorService {
    client: CoinbaseClient,
    engine: AlertEngine,
    config: MonitorConfig,
    notifier: Box<dyn NotificationSink>,
    alert_log: VecDeque<Alert>,
    shared_state: SharedAnalysisState,
}

impl MonitorService {
    pub fn new(
        config: MonitorConfig,
        pattern_config: &PatternConfig,
        client: CoinbaseClient,
        notifier: Box<dyn NotificationSink>,
        shared_state: SharedAnalysisState,
    ) -> Self {
        Self {
            client,
            engine: AlertEngine::new(pattern_config),
            alert_log: VecDeque::with_capacity(config.alert_log_capacity),
            config,
            notifier,
            shared_state,
        }
    }

    /// Load recent history so the chart and detectors start with context
    pub async fn warmup(&mut self) -> anyhow::Result<()> {
        let product = self.config.product.clone();
        tracing::info!("Warming up {} with {} minutes of history", product, self.config.backfill_minutes);

        match self
            .client
            .fetch_backfill(&product, self.config.backfill_minutes, self.config.granularity_secs)
            .await
        {
            Ok(candles) => {
                let before = self.engine.len();
                self.engine
                    .seed(candles.iter().filter_map(|candle| candle.to_sample()));
                tracing::info!(
                    "Warmed up {} with {} samples ({} candles received)",
                    product,
                    self.engine.len() - before,
                    candles.len()
                );
            }
            Err(e) => {
                tracing::error!("Failed to warm up {}: {:#}", product, e);
            }
        }

        if self.engine.is_empty() {
            tracing::warn!("No history for {}, detection starts from live ticks", product);
        }

        self.publish(Vec::new()).await;
        Ok(())
    }

    /// Start the polling loop
    pub async fn run(&mut self) {
        let mut ticker = interval(self.config.poll_interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;
            self.tick().await;
        }
    }

    /// Fetch the current price and evaluate patterns once
    pub async fn tick(&mut self) -> Vec<Alert> {
        let price = match self.client.fetch_ticker(&self.config.product).await {
            Ok(price) => price,
            Err(e) => {
                tracing::error!("Error fetching {} price: {:#}", self.config.product, e);
                match self.engine.latest() {
                    // keep the cadence with the last known price
                    Some(sample) => sample.price,
                    None => return Vec::new(),
                }
            }
        };

        self.process_price(Utc::now(), price).await
    }

    /// Feed one price into the engine, deliver alerts and publish state
    pub async fn process_price(&mut self, timestamp: DateTime<Utc>, price: f64) -> Vec<Alert> {
        let alerts = self.engine.on_new_sample(timestamp, price);

        for alert in &alerts {
            let (title, body) = notification_for(alert);
            if let Err(e) = self.notifier.notify(&title, &body) {
                tracing::error!("Failed to deliver notification: {:#}", e);
            }
            self.record(alert.clone());
        }

        tracing::debug!(
            "[{}] tick price {:.2}, {} samples, {} alerts",
            self.config.product,
            price,
            self.engine.len(),
            alerts.len()
        );

        self.publish(alerts.clone()).await;
        alerts
    }

    fn record(&mut self, alert: Alert) {
        if self.config.alert_log_capacity == 0 {
            return;
        }
        while self.alert_log.len() >= self.config.alert_log_capacity {
            self.alert_log.pop_front();
        }
        self.alert_log.push_back(alert);
    }

    async fn publish(&self, alerts: Vec<Alert>) {
        let window = self.engine.current_window();
        let snapshot = AnalysisSnapshot::from_samples(
            Utc::now().timestamp_millis() as u64,
            &self.config.product,
            &window,
            alerts,
        );

        self.shared_state
            .publish(snapshot, window, self.alert_log.iter().cloned().collect())
            .await;
    }
}
