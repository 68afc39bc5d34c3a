//! Settings for the periodic [`Refresher`](crate::refresher::Refresher).

use std::time::Duration;

use serde::{Deserialize, Serialize};
use sindex_common::{Result, error::Error, verify_arg};

/// Refresh cadence and per-cycle budget.
///
/// Deserializes from JSON such as `{"interval_ms": 500, "timeout_ms": 2000}`;
/// omitted fields take their defaults. A `null` timeout disables the budget,
/// leaving timeouts entirely to the metadata source.
///
/// Durations have millisecond granularity; the builders round up, so any
/// non-zero duration stays non-zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RefreshConfig {
    pub interval_ms: u64,
    pub timeout_ms: Option<u64>,
    /// Refresh immediately when the refresher starts instead of after the
    /// first interval.
    pub refresh_on_start: bool,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        RefreshConfig {
            interval_ms: 1000,
            timeout_ms: Some(5000),
            refresh_on_start: true,
        }
    }
}

impl RefreshConfig {
    pub fn from_json(json: &str) -> Result<RefreshConfig> {
        let config: RefreshConfig = serde_json::from_str(json)
            .map_err(|e| Error::invalid_arg("refresh config", e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        verify_arg!(interval_ms, self.interval_ms > 0);
        verify_arg!(timeout_ms, self.timeout_ms != Some(0));
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    pub fn with_interval(mut self, interval: Duration) -> Self {
        self.interval_ms = millis_rounded_up(interval);
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = timeout.map(millis_rounded_up);
        self
    }

    pub fn with_refresh_on_start(mut self, refresh_on_start: bool) -> Self {
        self.refresh_on_start = refresh_on_start;
        self
    }
}

fn millis_rounded_up(duration: Duration) -> u64 {
    let millis = duration.as_millis() + u128::from(duration.subsec_nanos() % 1_000_000 != 0);
    u64::try_from(millis).unwrap_or(u64::MAX)
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use sindex_common::error::ErrorKind;

    use super::RefreshConfig;

    #[test]
    fn test_defaults() {
        let config = RefreshConfig::from_json("{}").unwrap();
        assert_eq!(config, RefreshConfig::default());
        assert_eq!(config.interval(), Duration::from_secs(1));
        assert_eq!(config.timeout(), Some(Duration::from_secs(5)));
        assert!(config.refresh_on_start);
    }

    #[test]
    fn test_from_json() {
        let config = RefreshConfig::from_json(
            r#"{"interval_ms": 250, "timeout_ms": null, "refresh_on_start": false}"#,
        )
        .unwrap();
        assert_eq!(config.interval(), Duration::from_millis(250));
        assert_eq!(config.timeout(), None);
        assert!(!config.refresh_on_start);
    }

    #[test]
    fn test_validation() {
        let err = RefreshConfig::from_json(r#"{"interval_ms": 0}"#).unwrap_err();
        assert!(matches!(
            err.kind(),
            ErrorKind::InvalidArgument { name, .. } if name == "interval_ms"
        ));
        assert!(RefreshConfig::from_json(r#"{"timeout_ms": 0}"#).is_err());
        assert!(RefreshConfig::from_json(r#"{"interval_ms": "fast"}"#).is_err());
    }

    #[test]
    fn test_builders() {
        let config = RefreshConfig::default()
            .with_interval(Duration::from_millis(20))
            .with_timeout(None)
            .with_refresh_on_start(false);
        assert_eq!(config.interval_ms, 20);
        assert_eq!(config.timeout_ms, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sub_millisecond_durations_round_up() {
        let config = RefreshConfig::default()
            .with_interval(Duration::from_micros(500))
            .with_timeout(Some(Duration::from_micros(1500)));
        assert_eq!(config.interval_ms, 1);
        assert_eq!(config.timeout_ms, Some(2));
        assert!(config.validate().is_ok());

        let config = RefreshConfig::default().with_interval(Duration::ZERO);
        assert_eq!(config.interval_ms, 0);
        assert!(config.validate().is_err());

        let config = RefreshConfig::default().with_interval(Duration::MAX);
        assert_eq!(config.interval_ms, u64::MAX);
    }
}
