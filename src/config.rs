// ============================================================================
// Gateway Configuration
// ============================================================================
//
// Environment-driven configuration for the aggregation gateway.
// Sub-configurations live in config/ and load themselves from the
// environment; the provider table is loaded once at startup and is
// immutable for the lifetime of the process.
//
// ============================================================================

mod cache;
mod logging;
mod providers;
mod upstream;

pub use cache::{CacheBackend, CacheConfig};
pub use logging::{LogFormat, LoggingConfig};
pub use providers::{ProviderConfig, ProviderConfigError, ProviderTable};
pub use upstream::UpstreamConfig;

use anyhow::Result;

const DEFAULT_PORT: u16 = 8787;
const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_address: String,
    pub port: u16,
    pub rust_log: String,
    pub logging: LoggingConfig,
    /// Shared secret for the admin surface. When unset every admin
    /// request is rejected with 401.
    pub admin_password: Option<String>,
    pub cache: CacheConfig,
    pub upstream: UpstreamConfig,
    pub providers: ProviderTable,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            bind_address: std::env::var("BIND_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_BIND_ADDRESS.to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(DEFAULT_PORT),
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
            logging: LoggingConfig::from_env()?,
            admin_password: std::env::var("ADMIN_PASSWORD")
                .ok()
                .filter(|secret| !secret.is_empty()),
            cache: CacheConfig::from_env()?,
            upstream: UpstreamConfig::from_env(),
            providers: ProviderTable::from_env()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    const VARS: &[&str] = &[
        "BIND_ADDRESS",
        "PORT",
        "ADMIN_PASSWORD",
        "CACHE_BACKEND",
        "REDIS_URL",
        "PROVIDERS_FILE",
        "UPSTREAM_TIMEOUT_SECS",
        "UPSTREAM_USER_AGENT",
        "LOG_FORMAT",
    ];

    fn clear_env() {
        for var in VARS {
            std::env::remove_var(var);
        }
    }

    #[test]
    #[serial]
    fn defaults_without_environment() {
        clear_env();

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.bind_address, DEFAULT_BIND_ADDRESS);
        assert_eq!(config.admin_password, None);
        assert_eq!(config.cache.backend, CacheBackend::Memory);
        assert_eq!(config.logging.format, LogFormat::Text);
        assert_eq!(config.providers.len(), 4);
    }

    #[test]
    #[serial]
    fn reads_overrides_from_environment() {
        clear_env();
        std::env::set_var("PORT", "9000");
        std::env::set_var("ADMIN_PASSWORD", "hunter2");
        std::env::set_var("CACHE_BACKEND", "none");
        std::env::set_var("UPSTREAM_TIMEOUT_SECS", "5");

        let config = Config::from_env().unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.admin_password.as_deref(), Some("hunter2"));
        assert_eq!(config.cache.backend, CacheBackend::Disabled);
        assert_eq!(config.upstream.timeout_secs, 5);

        clear_env();
    }

    #[test]
    #[serial]
    fn empty_admin_password_is_treated_as_unset() {
        clear_env();
        std::env::set_var("ADMIN_PASSWORD", "");

        let config = Config::from_env().unwrap();
        assert_eq!(config.admin_password, None);

        clear_env();
    }

    #[test]
    #[serial]
    fn redis_backend_requires_url() {
        clear_env();
        std::env::set_var("CACHE_BACKEND", "redis");

        assert!(Config::from_env().is_err());

        clear_env();
    }
}
