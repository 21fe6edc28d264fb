//! Process configuration read from the environment.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://database/database.sqlite";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("PORT must be a TCP port number, got '{0}'")]
    InvalidPort(String),

    #[error("BIND_ADDR must be an IP address, got '{0}'")]
    InvalidBindAddr(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub bind_addr: IpAddr,
    pub port: u16,
    /// `false` selects the in-memory product store.
    pub use_persistent_stores: bool,
    pub database_url: String,
    /// Origin allowed by CORS.
    pub cors_origin: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup (the environment in production).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let port = match lookup("PORT") {
            Some(raw) => raw
                .trim()
                .parse::<u16>()
                .map_err(|_| ConfigError::InvalidPort(raw))?,
            None => DEFAULT_PORT,
        };

        let bind_addr = match lookup("BIND_ADDR") {
            Some(raw) => raw
                .trim()
                .parse::<IpAddr>()
                .map_err(|_| ConfigError::InvalidBindAddr(raw))?,
            None => IpAddr::V4(Ipv4Addr::UNSPECIFIED),
        };

        let use_persistent_stores = match lookup("USE_PERSISTENT_STORES") {
            Some(raw) => parse_flag(&raw).unwrap_or_else(|| {
                tracing::warn!(value = %raw, "USE_PERSISTENT_STORES is not a boolean; using persistent stores");
                true
            }),
            None => true,
        };

        let database_url = lookup("DATABASE_URL").unwrap_or_else(|| {
            if use_persistent_stores {
                tracing::warn!("DATABASE_URL not set; using {DEFAULT_DATABASE_URL}");
            }
            DEFAULT_DATABASE_URL.to_string()
        });

        let cors_origin = lookup("CORS_ORIGIN").unwrap_or_else(|| format!("http://localhost:{port}"));

        Ok(Self {
            bind_addr,
            port,
            use_persistent_stores,
            database_url,
            cors_origin,
        })
    }

    /// Loopback, ephemeral port, in-memory store. Used by tests and local tooling.
    pub fn in_memory() -> Self {
        Self {
            bind_addr: IpAddr::V4(Ipv4Addr::LOCALHOST),
            port: 0,
            use_persistent_stores: false,
            database_url: DEFAULT_DATABASE_URL.to_string(),
            cors_origin: format!("http://localhost:{DEFAULT_PORT}"),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_addr, self.port)
    }
}

fn parse_flag(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
