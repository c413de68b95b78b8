use std::str::FromStr;
use std::time::Duration;

/// Configuration parameters for pattern detection
#[derive(Debug, Clone)]
pub struct PatternConfig {
    /// Samples retained in the rolling buffer
    pub max_points: usize,
    /// Most recent samples handed to the detectors on each tick
    pub window: usize,
    /// Max shoulder height difference as a fraction of the head
    pub shoulder_tolerance: f64,
    /// Min relative move of each triangle boundary
    pub triangle_min_move: f64,
    /// Pole region is the first `n / flag_pole_divisor` samples (plus one)
    pub flag_pole_divisor: usize,
    /// Min pole move as a fraction of the starting price
    pub flag_min_pole_move: f64,
    /// Max pullback as a fraction of the pole move
    pub flag_max_retrace: f64,
}

impl Default for PatternConfig {
    fn default() -> Self {
        Self {
            max_points: 100,
            window: 100,
            shoulder_tolerance: 0.15,
            triangle_min_move: 0.005,
            flag_pole_divisor: 3,
            flag_min_pole_move: 0.01,
            flag_max_retrace: 0.8,
        }
    }
}

impl PatternConfig {
    /// Defaults overridden by `PATTERNWATCH_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_points: env_or("PATTERNWATCH_MAX_POINTS", defaults.max_points),
            window: env_or("PATTERNWATCH_WINDOW", defaults.window),
            shoulder_tolerance: env_or(
                "PATTERNWATCH_SHOULDER_TOLERANCE",
                defaults.shoulder_tolerance,
            ),
            triangle_min_move: env_or("PATTERNWATCH_TRIANGLE_MIN_MOVE", defaults.triangle_min_move),
            flag_pole_divisor: env_or("PATTERNWATCH_FLAG_POLE_DIVISOR", defaults.flag_pole_divisor)
                .max(1),
            flag_min_pole_move: env_or(
                "PATTERNWATCH_FLAG_MIN_POLE_MOVE",
                defaults.flag_min_pole_move,
            ),
            flag_max_retrace: env_or("PATTERNWATCH_FLAG_MAX_RETRACE", defaults.flag_max_retrace),
        }
    }
}

/// Configuration for the price feed, polling loop and server
#[derive(Debug, Clone)]
pub struct MonitorConfig {
    /// Exchange product id
    pub product: String,
    /// Time between ticker polls
    pub poll_interval: Duration,
    /// Upper bound on each feed request, kept below `poll_interval`
    pub request_timeout: Duration,
    /// Minutes of history fetched on startup
    pub backfill_minutes: i64,
    /// Candle granularity in seconds for the backfill
    pub granularity_secs: u32,
    /// Alerts kept in the in-memory session log
    pub alert_log_capacity: usize,
    /// HTTP listen address
    pub bind_addr: String,
    /// Directory for rolling log files
    pub log_dir: String,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            product: "BTC-USD".to_string(),
            poll_interval: Duration::from_secs(10),
            request_timeout: Duration::from_secs(5),
            backfill_minutes: 60,
            granularity_secs: 60,
            alert_log_capacity: 50,
            bind_addr: "0.0.0.0:3000".to_string(),
            log_dir: "logs".to_string(),
        }
    }
}

impl MonitorConfig {
    /// Defaults overridden by `PATTERNWATCH_*` environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let poll_interval = Duration::from_secs(
            env_or("PATTERNWATCH_POLL_SECS", defaults.poll_interval.as_secs()).max(1),
        );
        let request_timeout = Duration::from_millis(env_or(
            "PATTERNWATCH_REQUEST_TIMEOUT_MS",
            defaults.request_timeout.as_millis() as u64,
        ));
        Self {
            product: env_or("PATTERNWATCH_PRODUCT", defaults.product),
            poll_interval,
            request_timeout: clamp_request_timeout(request_timeout, poll_interval),
            backfill_minutes: env_or("PATTERNWATCH_BACKFILL_MINUTES", defaults.backfill_minutes),
            granularity_secs: env_or("PATTERNWATCH_GRANULARITY_SECS", defaults.granularity_secs),
            alert_log_capacity: env_or(
                "PATTERNWATCH_ALERT_LOG_CAPACITY",
                defaults.alert_log_capacity,
            ),
            bind_addr: env_or("PATTERNWATCH_BIND_ADDR", defaults.bind_addr),
            log_dir: env_or("PATTERNWATCH_LOG_DIR", defaults.log_dir),
        }
    }
}

/// A request may not outlive the tick that issued it
fn clamp_request_timeout(request_timeout: Duration, poll_interval: Duration) -> Duration {
    let ceiling = poll_interval.mul_f64(0.8);
    request_timeout.clamp(Duration::from_millis(100).min(ceiling), ceiling)
}

fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match std::env::var(key) {
        Ok(raw) => parse_or(key, &raw, default),
        Err(_) => default,
    }
}

fn parse_or<T: FromStr>(key: &str, raw: &str, default: T) -> T {
    match raw.trim().parse::<T>() {
        Ok(value) => value,
        Err(_) => {
            tracing::warn!("ignoring unparsable {}={:?}, using default", key, raw);
            default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pattern_defaults_match_reference_thresholds() {
        let config = PatternConfig::default();
        assert_eq!(config.max_points, 100);
        assert_eq!(config.window, 100);
        assert_eq!(config.flag_pole_divisor, 3);
        assert!((config.shoulder_tolerance - 0.15).abs() < f64::EPSILON);
        assert!((config.triangle_min_move - 0.005).abs() < f64::EPSILON);
        assert!((config.flag_min_pole_move - 0.01).abs() < f64::EPSILON);
        assert!((config.flag_max_retrace - 0.8).abs() < f64::EPSILON);
    }

    #[test]
    fn request_timeout_stays_below_poll_interval() {
        let config = MonitorConfig::default();
        assert!(config.request_timeout < config.poll_interval);

        let poll = Duration::from_secs(10);
        assert_eq!(clamp_request_timeout(Duration::from_secs(30), poll), Duration::from_secs(8));
        assert_eq!(clamp_request_timeout(Duration::from_secs(2), poll), Duration::from_secs(2));
        assert_eq!(clamp_request_timeout(Duration::ZERO, poll), Duration::from_millis(100));
    }

    #[test]
    fn parse_or_falls_back_on_garbage() {
        assert_eq!(parse_or("KEY", "42", 7usize), 42);
        assert_eq!(parse_or("KEY", " 42 ", 7usize), 42);
        assert_eq!(parse_or("KEY", "forty-two", 7usize), 7);
        assert!((parse_or("KEY", "0.2", 0.15f64) - 0.2).abs() < f64::EPSILON);
    }
}
