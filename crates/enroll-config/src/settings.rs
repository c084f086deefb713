//! Validated settings structures

use crate::schema::{RawConfig, RawLmsConfig, RawServiceConfig};
use std::path::PathBuf;
use std::time::Duration;

/// Validated settings ready for use by the daemon
#[derive(Debug, Clone)]
pub struct Settings {
    /// Service configuration
    pub service: ServiceConfig,

    /// LMS connection, if configured
    pub lms: Option<LmsConfig>,
}

impl Settings {
    /// Convert from raw config (after validation)
    pub fn from_raw(raw: RawConfig) -> Self {
        Self {
            service: ServiceConfig::from_raw(raw.service),
            lms: raw.lms.map(LmsConfig::from_raw),
        }
    }
}

/// Service configuration
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub data_dir: PathBuf,
    pub sweep_interval: Duration,
    pub default_duration_days: i64,
}

impl ServiceConfig {
    fn from_raw(raw: RawServiceConfig) -> Self {
        Self {
            data_dir: raw
                .data_dir
                .unwrap_or_else(|| PathBuf::from("/var/lib/enrolld")),
            sweep_interval: Duration::from_secs(raw.sweep_interval_seconds.unwrap_or(3600)),
            default_duration_days: raw.default_duration_days.unwrap_or(1),
        }
    }
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("/var/lib/enrolld"),
            sweep_interval: Duration::from_secs(3600),
            default_duration_days: 1,
        }
    }
}

/// LMS connection settings
#[derive(Debug, Clone)]
pub struct LmsConfig {
    pub base_url: String,
    pub api_token: String,
    pub timeout: Duration,
}

impl LmsConfig {
    fn from_raw(raw: RawLmsConfig) -> Self {
        Self {
            // A trailing slash would double up when joining endpoint paths
            base_url: raw.base_url.trim_end_matches('/').to_string(),
            api_token: raw.api_token,
            timeout: Duration::from_secs(raw.timeout_seconds.unwrap_or(10)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_for_missing_fields() {
        let raw: RawConfig = toml::from_str("config_version = 1").unwrap();
        let settings = Settings::from_raw(raw);

        assert_eq!(settings.service.data_dir, PathBuf::from("/var/lib/enrolld"));
        assert_eq!(settings.service.sweep_interval, Duration::from_secs(3600));
        assert_eq!(settings.service.default_duration_days, 1);
        assert!(settings.lms.is_none());
    }

    #[test]
    fn lms_base_url_is_normalized() {
        let raw: RawConfig = toml::from_str(
            r#"
            config_version = 1
            [lms]
            base_url = "https://lms.example.org/api/"
            api_token = "secret"
        "#,
        )
        .unwrap();

        let lms = Settings::from_raw(raw).lms.unwrap();
        assert_eq!(lms.base_url, "https://lms.example.org/api");
        assert_eq!(lms.timeout, Duration::from_secs(10));
    }
}
