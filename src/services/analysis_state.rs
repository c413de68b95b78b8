use std::sync::Arc;

use tokio::sync::{broadcast, RwLock};

use crate::models::alert::Alert;
use crate::models::analysis::AnalysisSnapshot;
use crate::models::sample::Sample;

#[derive(Debug)]
pub struct AnalysisStateInner {
    pub product: String,
    pub snapshot: RwLock<AnalysisSnapshot>,
    pub window: RwLock<Vec<Sample>>,
    pub alert_log: RwLock<Vec<Alert>>,
    pub broadcaster: broadcast::Sender<AnalysisSnapshot>,
}

pub type SharedAnalysisState = Arc<AnalysisStateInner>;

impl AnalysisStateInner {
    pub fn new(product: &str) -> SharedAnalysisState {
        let (broadcaster, _receiver) = broadcast::channel(16);
        Arc::new(Self {
            product: product.to_string(),
            snapshot: RwLock::new(AnalysisSnapshot {
                product: product.to_string(),
                ..AnalysisSnapshot::default()
            }),
            window: RwLock::new(Vec::new()),
            alert_log: RwLock::new(Vec::new()),
            broadcaster,
        })
    }

    /// Replace the published state and notify stream subscribers
    pub async fn publish(&self, snapshot: AnalysisSnapshot, window: Vec<Sample>, alert_log: Vec<Alert>) {
        *self.window.write().await = window;
        *self.alert_log.write().await = alert_log;
        *self.snapshot.write().await = snapshot.clone();
        // no subscribers is fine
        let _ = self.broadcaster.send(snapshot);
    }
}
