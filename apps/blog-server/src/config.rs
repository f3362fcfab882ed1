//! Application configuration loaded from environment variables.

use std::env;
use std::time::Duration;

use blogicum_infra::{DatabaseConfig, JwtConfig};

#[cfg(feature = "webhook")]
use blogicum_infra::WebhookConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the server on the in-memory store.
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    /// `None` logs notifications instead of delivering them.
    #[cfg(feature = "webhook")]
    pub webhook: Option<WebhookConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let database = env::var("DATABASE_URL").ok().map(|url| {
            let mut config = DatabaseConfig::new(url);
            if let Some(max) = parse_var("DB_MAX_CONNECTIONS") {
                config.max_connections = max;
            }
            if let Some(min) = parse_var("DB_MIN_CONNECTIONS") {
                config.min_connections = min;
            }
            if let Some(secs) = parse_var("DB_CONNECT_TIMEOUT_SECS") {
                config.connect_timeout = Duration::from_secs(secs);
            }
            config
        });

        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_var("PORT").unwrap_or(8080),
            database,
            jwt: JwtConfig::from_env(),
            #[cfg(feature = "webhook")]
            webhook: WebhookConfig::from_env(),
        }
    }
}

fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|v| v.parse().ok())
}
