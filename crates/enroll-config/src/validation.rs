//! Configuration validation

use crate::schema::RawConfig;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Service config error: {0}")]
    ServiceError(String),

    #[error("LMS config error: {0}")]
    LmsError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(interval) = config.service.sweep_interval_seconds
        && interval == 0
    {
        errors.push(ValidationError::ServiceError(
            "sweep_interval_seconds must be at least 1".into(),
        ));
    }

    if let Some(days) = config.service.default_duration_days
        && !(1..=365).contains(&days)
    {
        errors.push(ValidationError::ServiceError(format!(
            "default_duration_days must be between 1 and 365, got {}",
            days
        )));
    }

    if let Some(lms) = &config.lms {
        if !lms.base_url.starts_with("http://") && !lms.base_url.starts_with("https://") {
            errors.push(ValidationError::LmsError(format!(
                "base_url must start with http:// or https://, got '{}'",
                lms.base_url
            )));
        }

        if lms.api_token.is_empty() {
            errors.push(ValidationError::LmsError("api_token cannot be empty".into()));
        }

        if let Some(timeout) = lms.timeout_seconds
            && timeout == 0
        {
            errors.push(ValidationError::LmsError(
                "timeout_seconds must be at least 1".into(),
            ));
        }
    }

    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(content: &str) -> RawConfig {
        toml::from_str(content).unwrap()
    }

    #[test]
    fn minimal_config_is_valid() {
        let errors = validate_config(&raw("config_version = 1"));
        assert!(errors.is_empty());
    }

    #[test]
    fn reject_zero_sweep_interval() {
        let config = raw(r#"
            config_version = 1
            [service]
            sweep_interval_seconds = 0
        "#);
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], ValidationError::ServiceError(_)));
    }

    #[test]
    fn reject_out_of_range_duration() {
        for days in [0, -1, 366] {
            let config = raw(&format!(
                "config_version = 1\n[service]\ndefault_duration_days = {}",
                days
            ));
            assert_eq!(validate_config(&config).len(), 1, "days = {}", days);
        }
    }

    #[test]
    fn reject_bad_lms_settings() {
        let config = raw(r#"
            config_version = 1
            [lms]
            base_url = "ftp://lms.example.org"
            api_token = ""
        "#);
        let errors = validate_config(&config);
        assert_eq!(errors.len(), 2);
    }
}
