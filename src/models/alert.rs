use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Breakout direction of a directional pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Bullish,
    Bearish,
}

/// Pattern that produced an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "pattern", content = "direction", rename_all = "snake_case")]
pub enum AlertKind {
    HeadAndShoulders,
    Triangle(Direction),
    Flag(Direction),
}

impl AlertKind {
    pub fn message(&self) -> &'static str {
        match self {
            AlertKind::HeadAndShoulders => "Head and shoulders confirmed (bearish reversal)",
            AlertKind::Triangle(Direction::Bullish) => "Triangle breakout upward (bullish signal)",
            AlertKind::Triangle(Direction::Bearish) => "Triangle breakout downward (bearish signal)",
            AlertKind::Flag(Direction::Bullish) => "Bull flag confirmed (bullish continuation)",
            AlertKind::Flag(Direction::Bearish) => "Bear flag confirmed (bearish continuation)",
        }
    }

    /// Market bias implied by the pattern
    pub fn direction(&self) -> Direction {
        match self {
            AlertKind::HeadAndShoulders => Direction::Bearish,
            AlertKind::Triangle(direction) | AlertKind::Flag(direction) => *direction,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Alert {
    /// Timestamp of the tick that completed the pattern
    pub time: DateTime<Utc>,
    pub kind: AlertKind,
    pub message: String,
    pub direction: Direction,
}

impl Alert {
    pub fn new(time: DateTime<Utc>, kind: AlertKind) -> Self {
        Self {
            time,
            kind,
            message: kind.message().to_string(),
            direction: kind.direction(),
        }
    }
}
