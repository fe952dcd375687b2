// src/config.rs
use std::env;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{name} must be a valid {expected}, got `{value}`")]
    Invalid {
        name: &'static str,
        expected: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    /// When absent the service keeps polls in memory.
    pub database_url: Option<String>,
    pub max_connections: u32,
    pub cors_allow_any: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 3030,
            database_url: None,
            max_connections: 5,
            cors_allow_any: false,
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenvy::dotenv()` first to pick
    /// up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        Ok(Self {
            host: parse_or(&lookup, "HOST", "IP address", defaults.host)?,
            port: parse_or(&lookup, "PORT", "port number", defaults.port)?,
            database_url: lookup("DATABASE_URL").filter(|url| !url.trim().is_empty()),
            max_connections: parse_or(
                &lookup,
                "DATABASE_MAX_CONNECTIONS",
                "number",
                defaults.max_connections,
            )?,
            cors_allow_any: parse_or(&lookup, "CORS_ALLOW_ANY", "boolean", defaults.cors_allow_any)?,
        })
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<F, T>(
    lookup: &F,
    name: &'static str,
    expected: &'static str,
    default: T,
) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
            name,
            expected,
            value,
        }),
    }
}
