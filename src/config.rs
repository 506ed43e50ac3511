//! Configuration for the coupon service process.
//!
//! Defaults are overridden by environment variables:
//!
//! - `COUPON_API_HOST` / `COUPON_API_PORT`: listen address
//! - `COUPON_SHUTDOWN_GRACE_SECS`: delay before draining on shutdown
//! - `COUPON_BATCH_CONCURRENCY`: cap on concurrent lookups per batch
//!   (unset = one thread per code for batches up to `MAX_FAN_OUT`)
//! - `COUPON_LOOKUP_STACK_BYTES`: stack size of batch lookup threads

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

pub const HOST_ENV: &str = "COUPON_API_HOST";
pub const PORT_ENV: &str = "COUPON_API_PORT";
pub const SHUTDOWN_GRACE_ENV: &str = "COUPON_SHUTDOWN_GRACE_SECS";
pub const BATCH_CONCURRENCY_ENV: &str = "COUPON_BATCH_CONCURRENCY";
pub const LOOKUP_STACK_ENV: &str = "COUPON_LOOKUP_STACK_BYTES";

/// Errors raised while loading configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    Invalid { key: &'static str, value: String },
}

/// Process configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    pub api: ApiConfig,
    pub service: ServiceConfig,
}

/// HTTP listener configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    /// Seconds to wait after a shutdown signal before draining connections.
    pub shutdown_grace_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_grace_secs: 5,
        }
    }
}

impl ApiConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn shutdown_grace(&self) -> Duration {
        Duration::from_secs(self.shutdown_grace_secs)
    }
}

/// Service-layer tuning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServiceConfig {
    /// Upper bound on concurrent lookups in one batch; `None` uses the default fan-out.
    pub max_concurrency: Option<usize>,
    /// Stack size in bytes of lookup threads; `None` uses the platform default.
    pub lookup_stack_size: Option<usize>,
}

impl Config {
    /// Load defaults, then apply overrides from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_vars(std::env::vars().collect())
    }

    /// Load defaults, then apply overrides from `vars`.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        if let Some(host) = vars.get(HOST_ENV) {
            config.api.host = host.clone();
        }
        if let Some(port) = parse_var(&vars, PORT_ENV)? {
            config.api.port = port;
        }
        if let Some(secs) = parse_var(&vars, SHUTDOWN_GRACE_ENV)? {
            config.api.shutdown_grace_secs = secs;
        }
        if let Some(limit) = parse_var::<usize>(&vars, BATCH_CONCURRENCY_ENV)? {
            if limit == 0 {
                return Err(ConfigError::Invalid {
                    key: BATCH_CONCURRENCY_ENV,
                    value: "0".to_string(),
                });
            }
            config.service.max_concurrency = Some(limit);
        }
        if let Some(bytes) = parse_var(&vars, LOOKUP_STACK_ENV)? {
            config.service.lookup_stack_size = Some(bytes);
        }

        Ok(config)
    }
}

impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api.addr())?;
        if let Some(limit) = self.service.max_concurrency {
            write!(f, " (batch concurrency {})", limit)?;
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    vars: &HashMap<String, String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    match vars.get(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::Invalid {
                key,
                value: raw.clone(),
            }),
    }
}
