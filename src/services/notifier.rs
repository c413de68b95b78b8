use crate::models::alert::{Alert, Direction};
use crate::models::sample::format_time_label;

/// Destination for alert notifications.
///
/// Implementations own any permission handshake with the delivery channel.
pub trait NotificationSink: Send + Sync {
    fn notify(&self, title: &str, body: &str) -> anyhow::Result<()>;
}

/// Writes notifications to the log
#[derive(Debug, Default, Clone)]
pub struct TracingNotifier;

impl NotificationSink for TracingNotifier {
    fn notify(&self, title: &str, body: &str) -> anyhow::Result<()> {
        tracing::warn!("🔔 {}: {}", title, body);
        Ok(())
    }
}

/// Notification title and body for an alert
pub fn notification_for(alert: &Alert) -> (String, String) {
    let marker = match alert.direction {
        Direction::Bullish => "▲",
        Direction::Bearish => "▼",
    };
    (
        format!("New alert at {}", format_time_label(&alert.time)),
        format!("{} {}", marker, alert.message),
    )
}
