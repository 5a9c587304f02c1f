//! Runtime settings read from the environment.

use std::env;

use thiserror::Error;

/// Default listen address.
pub const DEFAULT_ADDR: &str = "127.0.0.1:7878";
/// Default SQLite database path.
pub const DEFAULT_DATABASE_URL: &str = "products.db";
/// Default maximum number of pooled connections.
pub const DEFAULT_POOL_SIZE: u32 = 10;

/// A setting that was present but unusable.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// `DATABASE_POOL_SIZE` was not a positive integer.
    #[error("DATABASE_POOL_SIZE must be a positive integer, got {0:?}")]
    InvalidPoolSize(String),
}

/// Where to listen and which database to serve.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Socket address the server binds, from `PRODUCTS_ADDR`.
    pub addr: String,
    /// SQLite database path, from `DATABASE_URL`.
    pub database_url: String,
    /// Maximum pooled connections, from `DATABASE_POOL_SIZE`.
    pub pool_size: u32,
}

impl Settings {
    /// Reads the settings from the process environment, after loading a `.env` file if one is
    /// present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Ok(path) = dotenv::dotenv() {
            log::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pool_size = match lookup("DATABASE_POOL_SIZE") {
            None => DEFAULT_POOL_SIZE,
            Some(raw) => match raw.trim().parse::<u32>() {
                Ok(n) if n > 0 => n,
                _ => return Err(ConfigError::InvalidPoolSize(raw)),
            },
        };

        Ok(Settings {
            addr: lookup("PRODUCTS_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_owned()),
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_owned()),
            pool_size,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(vars: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_unset() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.addr, DEFAULT_ADDR);
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.pool_size, DEFAULT_POOL_SIZE);
    }

    #[test]
    fn reads_every_variable() {
        let s = settings(&[
            ("PRODUCTS_ADDR", "0.0.0.0:8080"),
            ("DATABASE_URL", "/var/lib/products.db"),
            ("DATABASE_POOL_SIZE", "4"),
        ])
        .unwrap();
        assert_eq!(
            s,
            Settings {
                addr: "0.0.0.0:8080".to_owned(),
                database_url: "/var/lib/products.db".to_owned(),
                pool_size: 4,
            }
        );
    }

    #[test]
    fn rejects_bad_pool_size() {
        assert!(matches!(
            settings(&[("DATABASE_POOL_SIZE", "many")]),
            Err(ConfigError::InvalidPoolSize(_))
        ));
        assert!(matches!(
            settings(&[("DATABASE_POOL_SIZE", "0")]),
            Err(ConfigError::InvalidPoolSize(_))
        ));
    }
}
