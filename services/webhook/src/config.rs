use axum::http::StatusCode;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing environment variable: {0}")]
    MissingVar(String),
    #[error("Invalid value for environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: SocketAddr,
    pub log_level: Level,
    /// Project id requests must be signed for. Verification is disabled
    /// when unset.
    pub verification_project: Option<String>,
    /// Status answered on verification failure; defaults to 403.
    pub verification_status: Option<StatusCode>,
    /// Fixed error message answered on verification failure.
    pub verification_error: Option<String>,
    /// Client id used to decode authorization headers as signed identity
    /// tokens. Without it, headers are treated as bearer tokens.
    pub client_id: Option<String>,
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }

        let bind_address_str =
            std::env::var("BIND_ADDRESS").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
        let bind_address = bind_address_str
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string()))?;

        let log_level_str = std::env::var("RUST_LOG").unwrap_or_else(|_| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        let verification_project = std::env::var("VERIFICATION_PROJECT").ok();
        let verification_status = match std::env::var("VERIFICATION_STATUS") {
            Ok(raw) => {
                let status = raw
                    .parse::<u16>()
                    .ok()
                    .and_then(|code| StatusCode::from_u16(code).ok())
                    .ok_or_else(|| {
                        ConfigError::InvalidValue(
                            "VERIFICATION_STATUS".to_string(),
                            format!("'{}' is not a valid HTTP status code", raw),
                        )
                    })?;
                Some(status)
            }
            Err(_) => None,
        };
        let verification_error = std::env::var("VERIFICATION_ERROR").ok();

        if verification_project.is_none()
            && (verification_status.is_some() || verification_error.is_some())
        {
            return Err(ConfigError::MissingVar(
                "VERIFICATION_PROJECT must be set when VERIFICATION_STATUS or \
                 VERIFICATION_ERROR is set"
                    .to_string(),
            ));
        }

        let client_id = std::env::var("CLIENT_ID").ok();

        Ok(Self {
            bind_address,
            log_level,
            verification_project,
            verification_status,
            verification_error,
            client_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env_vars() {
        unsafe {
            env::remove_var("BIND_ADDRESS");
            env::remove_var("RUST_LOG");
            env::remove_var("VERIFICATION_PROJECT");
            env::remove_var("VERIFICATION_STATUS");
            env::remove_var("VERIFICATION_ERROR");
            env::remove_var("CLIENT_ID");
        }
    }

    #[test]
    fn test_config_error_display() {
        let missing_var = ConfigError::MissingVar("TEST_VAR".to_string());
        assert_eq!(
            format!("{}", missing_var),
            "Missing environment variable: TEST_VAR"
        );

        let invalid_value =
            ConfigError::InvalidValue("TEST_VAR".to_string(), "bad_value".to_string());
        assert_eq!(
            format!("{}", invalid_value),
            "Invalid value for environment variable TEST_VAR: bad_value"
        );
    }

    #[test]
    #[serial]
    fn test_config_defaults() {
        clear_env_vars();

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "0.0.0.0:3000");
        assert_eq!(config.log_level, Level::INFO);
        assert_eq!(config.verification_project, None);
        assert_eq!(config.verification_status, None);
        assert_eq!(config.verification_error, None);
        assert_eq!(config.client_id, None);
    }

    #[test]
    #[serial]
    fn test_config_custom_values() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "127.0.0.1:8080");
            env::set_var("RUST_LOG", "debug");
            env::set_var("VERIFICATION_PROJECT", "my-cloud-project");
            env::set_var("VERIFICATION_STATUS", "401");
            env::set_var("VERIFICATION_ERROR", "not today");
            env::set_var("CLIENT_ID", "client-1");
        }

        let config = Config::from_env().expect("Config should load successfully");

        assert_eq!(config.bind_address.to_string(), "127.0.0.1:8080");
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(
            config.verification_project,
            Some("my-cloud-project".to_string())
        );
        assert_eq!(config.verification_status, Some(StatusCode::UNAUTHORIZED));
        assert_eq!(config.verification_error, Some("not today".to_string()));
        assert_eq!(config.client_id, Some("client-1".to_string()));
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_bind_address() {
        clear_env_vars();
        unsafe {
            env::set_var("BIND_ADDRESS", "not-a-valid-address");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "BIND_ADDRESS"),
            _ => panic!("Expected InvalidValue for BIND_ADDRESS"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_invalid_verification_status() {
        clear_env_vars();
        unsafe {
            env::set_var("VERIFICATION_PROJECT", "my-cloud-project");
            env::set_var("VERIFICATION_STATUS", "not-a-status");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::InvalidValue(var, _) => assert_eq!(var, "VERIFICATION_STATUS"),
            _ => panic!("Expected InvalidValue for VERIFICATION_STATUS"),
        }
        clear_env_vars();
    }

    #[test]
    #[serial]
    fn test_config_verification_status_requires_project() {
        clear_env_vars();
        unsafe {
            env::set_var("VERIFICATION_STATUS", "403");
        }

        let err = Config::from_env().unwrap_err();
        match err {
            ConfigError::MissingVar(msg) => assert!(msg.contains("VERIFICATION_PROJECT")),
            _ => panic!("Expected MissingVar for VERIFICATION_PROJECT"),
        }
        clear_env_vars();
    }
}
