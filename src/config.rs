use std::env;

use derive_more::{Display, Error};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_backend: StoreBackend,
    /// Empty when the memory backend is selected.
    pub database_url: String,
    pub db_max_connections: u32,
    pub bind_addr: String,
    pub port: u16,
    pub jwt_secret: String,
    /// Origin guests open share links against, without a trailing slash.
    pub public_base_url: String,
}

#[derive(Debug, Display, Error, PartialEq, Eq)]
#[display(fmt = "configuration error in {}: {}", name, reason)]
pub struct ConfigError {
    pub name: String,
    pub reason: String,
}

impl ConfigError {
    fn new(name: &str, reason: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            reason: reason.into(),
        }
    }
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up
    /// a local `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let store_backend = match lookup("STORE_BACKEND").as_deref() {
            None | Some("postgres") => StoreBackend::Postgres,
            Some("memory") => StoreBackend::Memory,
            Some(other) => {
                return Err(ConfigError::new(
                    "STORE_BACKEND",
                    format!("expected 'postgres' or 'memory', got '{other}'"),
                ))
            }
        };

        let database_url = match (store_backend, lookup("DATABASE_URL")) {
            (StoreBackend::Postgres, None) => {
                return Err(ConfigError::new("DATABASE_URL", "must be set"))
            }
            (_, url) => url.unwrap_or_default(),
        };

        let db_max_connections = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;
        let port = parse_or(&lookup, "PORT", 8080)?;
        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| "127.0.0.1".to_string());

        let jwt_secret = lookup("JWT_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ConfigError::new("JWT_SECRET", "must be set"))?;

        let public_base_url = lookup("PUBLIC_BASE_URL")
            .unwrap_or_else(|| format!("http://{bind_addr}:{port}"))
            .trim_end_matches('/')
            .to_string();

        Ok(Config {
            store_backend,
            database_url,
            db_max_connections,
            bind_addr,
            port,
            jwt_secret,
            public_base_url,
        })
    }
}

fn parse_or<F, T>(lookup: &F, name: &str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw
            .parse()
            .map_err(|_| ConfigError::new(name, format!("cannot parse '{raw}'"))),
    }
}
