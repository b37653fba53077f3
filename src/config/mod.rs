use serde::{Deserialize, Serialize};
use std::env;
use thiserror::Error;
use url::Url;

/// Errors raised while assembling configuration at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing configuration: {0}")]
    Missing(&'static str),

    #[error("Invalid configuration for {key}: {value}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Development,
    Staging,
    Production,
}

impl Environment {
    /// Parse an APP_ENV value; anything unrecognized falls back to Development
    fn parse(value: Option<&str>) -> Self {
        match value {
            Some("production") | Some("prod") => Environment::Production,
            Some("staging") | Some("stage") => Environment::Staging,
            _ => Environment::Development,
        }
    }
}

/// Application configuration, built once at startup and passed by injection.
/// Business logic never reaches into the environment directly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database_url: String,
    /// Shared secret for the legacy self-contained token path. The primary
    /// session-table validation never reads it.
    pub auth_secret: String,
    /// Browser origin allowed by CORS
    pub frontend_url: String,
    pub port: u16,
    pub log_level: String,
    /// Upper bound on the database connection pool; excess requests block on
    /// pool acquisition
    pub max_connections: u32,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let environment = Environment::parse(env::var("APP_ENV").ok().as_deref());

        let database_url =
            env::var("DATABASE_URL").map_err(|_| ConfigError::Missing("DATABASE_URL"))?;
        // Fail fast on a malformed URL rather than at first pool acquisition
        Url::parse(&database_url).map_err(|_| ConfigError::Invalid {
            key: "DATABASE_URL",
            value: "<redacted>".to_string(),
        })?;

        let auth_secret =
            env::var("AUTH_SECRET").map_err(|_| ConfigError::Missing("AUTH_SECRET"))?;

        let frontend_url =
            env::var("FRONTEND_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());

        let port = match env::var("API_PORT") {
            Ok(raw) => raw.parse::<u16>().map_err(|_| ConfigError::Invalid {
                key: "API_PORT",
                value: raw.clone(),
            })?,
            Err(_) => 8000,
        };

        let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let max_connections = match env::var("DATABASE_MAX_CONNECTIONS") {
            Ok(raw) => raw.parse::<u32>().map_err(|_| ConfigError::Invalid {
                key: "DATABASE_MAX_CONNECTIONS",
                value: raw.clone(),
            })?,
            Err(_) => 5,
        };

        Ok(Self {
            environment,
            database_url,
            auth_secret,
            frontend_url,
            port,
            log_level,
            max_connections,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}
