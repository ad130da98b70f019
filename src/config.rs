//! Configuration management for Quotagate.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Configuration for a rate limiter instance.
///
/// All fields have defaults, so an empty YAML document (or
/// `RateLimitConfig::default()`) yields a working configuration:
/// 100 requests per 15-minute window, swept every 5 minutes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Maximum admitted requests per window
    #[serde(default = "default_limit")]
    pub limit: u64,

    /// Window length in seconds
    #[serde(default = "default_window_secs")]
    pub window_secs: u64,

    /// Interval between background sweeps of expired entries, in seconds.
    /// Independent of the window length.
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            limit: default_limit(),
            window_secs: default_window_secs(),
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

fn default_limit() -> u64 {
    100
}

fn default_window_secs() -> u64 {
    15 * 60
}

fn default_sweep_interval_secs() -> u64 {
    5 * 60
}

impl RateLimitConfig {
    /// The window length as a [`Duration`].
    pub fn window(&self) -> Duration {
        Duration::from_secs(self.window_secs)
    }

    /// The sweep interval as a [`Duration`].
    pub fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Load configuration from a YAML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> crate::error::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml(&contents)
    }

    /// Load configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> crate::error::Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| {
            crate::error::QuotagateError::Config(format!("Failed to parse rate limit config: {}", e))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RateLimitConfig::default();
        assert_eq!(config.limit, 100);
        assert_eq!(config.window(), Duration::from_secs(900));
        assert_eq!(config.sweep_interval(), Duration::from_secs(300));
    }

    #[test]
    fn test_parse_yaml() {
        let yaml = r#"
limit: 5
window_secs: 60
"#;
        let config = RateLimitConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.limit, 5);
        assert_eq!(config.window_secs, 60);
        // Unspecified fields fall back to defaults
        assert_eq!(config.sweep_interval_secs, 300);
    }

    #[test]
    fn test_parse_invalid_yaml() {
        let err = RateLimitConfig::from_yaml("limit: [not a number]").unwrap_err();
        assert!(matches!(err, crate::error::QuotagateError::Config(_)));
    }
}
