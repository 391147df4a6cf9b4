//! Process configuration, read once from the environment at startup.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use loangate_observability::LogFormat;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {var}: {reason}")]
    Invalid { var: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// HS256 secret used to verify bearer tokens; unset means the dev default.
    pub jwt_secret: Option<String>,
    /// Optional JSON seed for the provider's user directory.
    pub users_file: Option<PathBuf>,
    /// Deadline applied to every identity-provider call.
    pub provider_timeout: Option<Duration>,
    pub log_format: LogFormat,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => raw.trim().parse::<IpAddr>().map_err(|e| invalid("BIND_ADDR", e))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let port = match get("PORT") {
            Some(raw) => raw.trim().parse::<u16>().map_err(|e| invalid("PORT", e))?,
            None => DEFAULT_PORT,
        };

        let provider_timeout = match get("PROVIDER_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw.trim().parse().map_err(|e| invalid("PROVIDER_TIMEOUT_MS", e))?;
                if ms == 0 {
                    return Err(invalid("PROVIDER_TIMEOUT_MS", "must be greater than zero"));
                }
                Some(Duration::from_millis(ms))
            }
            None => None,
        };

        let log_format = match get("LOG_FORMAT") {
            Some(raw) => raw.parse::<LogFormat>().map_err(|e| invalid("LOG_FORMAT", e))?,
            None => LogFormat::default(),
        };

        Ok(Self {
            bind_addr,
            port,
            jwt_secret: get("JWT_SECRET"),
            users_file: get("USERS_FILE").map(PathBuf::from),
            provider_timeout,
            log_format,
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }

    /// The configured secret, or the insecure dev default (with a warning).
    pub fn jwt_secret_or_dev_default(&self) -> &str {
        match &self.jwt_secret {
            Some(secret) => secret,
            None => {
                tracing::warn!("JWT_SECRET not set; using insecure dev default");
                DEV_JWT_SECRET
            }
        }
    }
}

fn invalid(var: &'static str, reason: impl ToString) -> ConfigError {
    ConfigError::Invalid {
        var,
        reason: reason.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(pairs: &[(&str, &str)]) -> Result<ApiConfig, ConfigError> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ApiConfig::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let cfg = config(&[]).unwrap();
        assert_eq!(cfg.socket_addr(), "0.0.0.0:3000".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.jwt_secret, None);
        assert_eq!(cfg.jwt_secret_or_dev_default(), DEV_JWT_SECRET);
        assert_eq!(cfg.users_file, None);
        assert_eq!(cfg.provider_timeout, None);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = config(&[
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", "8080"),
            ("JWT_SECRET", "s3cret"),
            ("USERS_FILE", "/etc/loangate/users.json"),
            ("PROVIDER_TIMEOUT_MS", "1500"),
            ("LOG_FORMAT", "pretty"),
        ])
        .unwrap();

        assert_eq!(cfg.socket_addr(), "127.0.0.1:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.jwt_secret_or_dev_default(), "s3cret");
        assert_eq!(cfg.users_file, Some(PathBuf::from("/etc/loangate/users.json")));
        assert_eq!(cfg.provider_timeout, Some(Duration::from_millis(1500)));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn blank_values_count_as_unset() {
        let cfg = config(&[("PORT", "  "), ("JWT_SECRET", "")]).unwrap();
        assert_eq!(cfg.port, DEFAULT_PORT);
        assert_eq!(cfg.jwt_secret, None);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(config(&[("PORT", "http")]), Err(ConfigError::Invalid { var: "PORT", .. })));
        assert!(matches!(
            config(&[("PROVIDER_TIMEOUT_MS", "0")]),
            Err(ConfigError::Invalid { var: "PROVIDER_TIMEOUT_MS", .. })
        ));
        assert!(matches!(
            config(&[("LOG_FORMAT", "xml")]),
            Err(ConfigError::Invalid { var: "LOG_FORMAT", .. })
        ));
        assert!(matches!(config(&[("BIND_ADDR", "localhost")]), Err(ConfigError::Invalid { .. })));
    }
}
