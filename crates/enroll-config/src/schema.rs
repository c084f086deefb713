//! Raw configuration schema (as parsed from TOML)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw configuration as parsed from TOML
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawConfig {
    /// Config schema version
    pub config_version: u32,

    /// Service-level settings
    #[serde(default)]
    pub service: RawServiceConfig,

    /// LMS connection settings. Absent means no gateway is configured and
    /// enrollment operations will refuse to run.
    pub lms: Option<RawLmsConfig>,
}

/// Service-level settings
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct RawServiceConfig {
    /// Data directory for the enrollment store (default: /var/lib/enrolld)
    pub data_dir: Option<PathBuf>,

    /// Seconds between expiration sweeps (default: 3600)
    pub sweep_interval_seconds: Option<u64>,

    /// Duration applied when an enrollment request gives none (default: 1)
    pub default_duration_days: Option<i64>,
}

/// LMS connection settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RawLmsConfig {
    /// Base URL of the LMS REST API, e.g. "https://lms.example.org/api/v1"
    pub base_url: String,

    /// Bearer token for API requests
    pub api_token: String,

    /// Per-request timeout in seconds (default: 10)
    pub timeout_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
            config_version = 1

            [service]
            data_dir = "/srv/enrolld"
            sweep_interval_seconds = 600
            default_duration_days = 7

            [lms]
            base_url = "https://lms.example.org/api/v1"
            api_token = "secret"
            timeout_seconds = 5
        "#;

        let config: RawConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.service.sweep_interval_seconds, Some(600));
        assert_eq!(config.service.default_duration_days, Some(7));
        assert_eq!(
            config.lms.as_ref().unwrap().base_url,
            "https://lms.example.org/api/v1"
        );
    }

    #[test]
    fn service_and_lms_sections_are_optional() {
        let config: RawConfig = toml::from_str("config_version = 1").unwrap();
        assert!(config.service.data_dir.is_none());
        assert!(config.lms.is_none());
    }
}
