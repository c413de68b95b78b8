use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::models::alert::Alert;
use crate::models::sample::Sample;

/// Series and alerts handed to chart renderers
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
pub struct AnalysisSnapshot {
    pub as_of_ms: u64,
    pub product: String,
    /// Sample clock labels (HH:MM:SS), oldest first
    pub times: Vec<String>,
    pub prices: Vec<f64>,
    pub latest_price: Option<f64>,
    /// Alerts raised on the most recent tick
    pub alerts: Vec<Alert>,
}

impl AnalysisSnapshot {
    pub fn from_samples(as_of_ms: u64, product: &str, samples: &[Sample], alerts: Vec<Alert>) -> Self {
        Self {
            as_of_ms,
            product: product.to_string(),
            times: samples.iter().map(Sample::time_label).collect(),
            prices: samples.iter().map(|sample| sample.price).collect(),
            latest_price: samples.last().map(|sample| sample.price),
            alerts,
        }
    }
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct WindowResponse {
    pub product: String,
    pub samples: Vec<Sample>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct AlertLogResponse {
    pub product: String,
    /// Alerts raised this session, oldest first
    pub alerts: Vec<Alert>,
}

#[derive(Debug, Clone, Deserialize, Validate, ToSchema, IntoParams)]
pub struct WindowQuery {
    /// Number of most recent samples to return
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 1000))]
    #[param(example = 100, default = 100)]
    pub limit: usize,
}

fn default_limit() -> usize {
    100
}
