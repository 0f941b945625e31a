// ABOUTME: Server configuration loaded from environment variables
// ABOUTME: Validates bind address, port, CORS origin and session cookie settings

use std::env;
use std::num::ParseIntError;

use axum::http::HeaderValue;
use thiserror::Error;

use intake_auth::DEFAULT_COOKIE_NAME;
use intake_config::constants::{
    CORS_ORIGIN, INTAKE_HOST, INTAKE_PORT, PORT, SESSION_COOKIE_NAME, SESSION_COOKIE_SECURE,
    SESSION_IDLE_MINUTES,
};

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_CORS_ORIGIN: &str = "http://localhost:3000";
const DEFAULT_SESSION_IDLE_MINUTES: u64 = 60;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid port number: {0}")]
    InvalidPort(#[from] ParseIntError),
    #[error("Port {0} is out of valid range (1-65535)")]
    PortOutOfRange(u16),
    #[error("Invalid value for {name}: expected true or false, got {value:?}")]
    InvalidFlag { name: &'static str, value: String },
    #[error("{0} must not be empty")]
    Empty(&'static str),
    #[error("Invalid CORS origin {0:?}: expected a single origin such as http://localhost:3000")]
    InvalidCorsOrigin(String),
    #[error("Invalid value for {name}: expected minutes between 1 and 1440, got {value:?}")]
    InvalidIdleMinutes { name: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub cors_origin: String,
    pub cookie_name: String,
    pub cookie_secure: bool,
    /// Conversations untouched for this long are dropped
    pub session_idle_minutes: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Build from any variable source. `INTAKE_PORT` wins over `PORT`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup(INTAKE_HOST).unwrap_or_else(|| DEFAULT_HOST.to_string());
        if host.trim().is_empty() {
            return Err(ConfigError::Empty(INTAKE_HOST));
        }

        let port = match lookup(INTAKE_PORT).or_else(|| lookup(PORT)) {
            Some(value) => value.trim().parse::<u16>()?,
            None => DEFAULT_PORT,
        };
        if port == 0 {
            return Err(ConfigError::PortOutOfRange(port));
        }

        let cors_origin = lookup(CORS_ORIGIN).unwrap_or_else(|| DEFAULT_CORS_ORIGIN.to_string());
        parse_cors_origin(&cors_origin)?;

        let cookie_name =
            lookup(SESSION_COOKIE_NAME).unwrap_or_else(|| DEFAULT_COOKIE_NAME.to_string());
        if cookie_name.trim().is_empty() {
            return Err(ConfigError::Empty(SESSION_COOKIE_NAME));
        }

        let cookie_secure = match lookup(SESSION_COOKIE_SECURE) {
            Some(value) => parse_flag(SESSION_COOKIE_SECURE, &value)?,
            None => false,
        };

        let session_idle_minutes = match lookup(SESSION_IDLE_MINUTES) {
            Some(value) => parse_idle_minutes(&value)?,
            None => DEFAULT_SESSION_IDLE_MINUTES,
        };

        Ok(Config {
            host,
            port,
            cors_origin,
            cookie_name,
            cookie_secure,
            session_idle_minutes,
        })
    }

    /// Apply command-line flags on top of the environment
    pub fn with_overrides(
        mut self,
        host: Option<String>,
        port: Option<u16>,
    ) -> Result<Self, ConfigError> {
        if let Some(host) = host {
            self.host = host;
        }
        if let Some(port) = port {
            if port == 0 {
                return Err(ConfigError::PortOutOfRange(port));
            }
            self.port = port;
        }
        Ok(self)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// The session cookie needs credentialed CORS, which rules out the `*` wildcard
pub fn parse_cors_origin(origin: &str) -> Result<HeaderValue, ConfigError> {
    let trimmed = origin.trim();
    if trimmed.is_empty() || trimmed == "*" {
        return Err(ConfigError::InvalidCorsOrigin(origin.to_string()));
    }
    trimmed
        .parse::<HeaderValue>()
        .map_err(|_| ConfigError::InvalidCorsOrigin(origin.to_string()))
}

fn parse_idle_minutes(value: &str) -> Result<u64, ConfigError> {
    value
        .trim()
        .parse::<u64>()
        .ok()
        .filter(|minutes| (1..=1440).contains(minutes))
        .ok_or_else(|| ConfigError::InvalidIdleMinutes {
            name: SESSION_IDLE_MINUTES,
            value: value.to_string(),
        })
}

fn parse_flag(name: &'static str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(ConfigError::InvalidFlag {
            name,
            value: value.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_config_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(
            config,
            Config {
                host: "127.0.0.1".to_string(),
                port: 3000,
                cors_origin: "http://localhost:3000".to_string(),
                cookie_name: "sb-access-token".to_string(),
                cookie_secure: false,
                session_idle_minutes: 60,
            }
        );
    }

    #[test]
    fn test_intake_port_wins_over_port() {
        let config = config_from(&[("PORT", "8080"), ("INTAKE_PORT", "9090")]).unwrap();
        assert_eq!(config.port, 9090);

        let config = config_from(&[("PORT", "8080")]).unwrap();
        assert_eq!(config.port, 8080);
    }

    #[rstest]
    #[case("not-a-number")]
    #[case("70000")]
    #[case("-1")]
    fn test_invalid_port(#[case] value: &str) {
        let result = config_from(&[("PORT", value)]);
        assert!(matches!(result, Err(ConfigError::InvalidPort(_))));
    }

    #[test]
    fn test_port_zero_rejected() {
        let result = config_from(&[("PORT", "0")]);
        assert!(matches!(result, Err(ConfigError::PortOutOfRange(0))));
    }

    #[rstest]
    #[case("true", true)]
    #[case("1", true)]
    #[case("FALSE", false)]
    #[case("no", false)]
    fn test_cookie_secure_flag(#[case] value: &str, #[case] expected: bool) {
        let config = config_from(&[("SESSION_COOKIE_SECURE", value)]).unwrap();
        assert_eq!(config.cookie_secure, expected);
    }

    #[test]
    fn test_cookie_secure_invalid() {
        let result = config_from(&[("SESSION_COOKIE_SECURE", "maybe")]);
        assert!(matches!(result, Err(ConfigError::InvalidFlag { .. })));
    }

    #[rstest]
    #[case("*")]
    #[case(" * ")]
    #[case("")]
    #[case("http://localhost:5173\nX-Injected: 1")]
    fn test_unusable_cors_origin_rejected(#[case] value: &str) {
        let result = config_from(&[("CORS_ORIGIN", value)]);
        assert!(matches!(result, Err(ConfigError::InvalidCorsOrigin(_))));
    }

    #[test]
    fn test_explicit_cors_origin_accepted() {
        let config = config_from(&[("CORS_ORIGIN", "https://intake.example.com")]).unwrap();
        assert_eq!(config.cors_origin, "https://intake.example.com");
    }

    #[rstest]
    #[case("30", Some(30))]
    #[case("1440", Some(1440))]
    #[case("0", None)]
    #[case("1441", None)]
    #[case("soon", None)]
    fn test_session_idle_minutes(#[case] value: &str, #[case] expected: Option<u64>) {
        let result = config_from(&[("SESSION_IDLE_MINUTES", value)]);
        match expected {
            Some(minutes) => assert_eq!(result.unwrap().session_idle_minutes, minutes),
            None => assert!(matches!(
                result,
                Err(ConfigError::InvalidIdleMinutes { .. })
            )),
        }
    }

    #[test]
    fn test_empty_cookie_name_rejected() {
        let result = config_from(&[("SESSION_COOKIE_NAME", " ")]);
        assert!(matches!(result, Err(ConfigError::Empty(_))));
    }

    #[test]
    fn test_cli_overrides() {
        let config = config_from(&[])
            .unwrap()
            .with_overrides(Some("0.0.0.0".to_string()), Some(4000))
            .unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:4000");

        let result = config_from(&[]).unwrap().with_overrides(None, Some(0));
        assert!(result.is_err());
    }
}
