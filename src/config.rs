// config.rs

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::time::Duration;

use dotenv::dotenv;
use thiserror::Error;
use tokio_postgres::Config as PgConfig;

const DEFAULT_PORT: u16 = 3002;
const DEFAULT_DB_PORT: u16 = 5432;
const DEFAULT_GAME_URL: &str = "http://localhost:3001";
const DEFAULT_POOL_MAX_SIZE: usize = 10;
const DEFAULT_VIEW_LOG_PATH: &str = "views.log";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Configuration errors detected before the server accepts traffic
#[derive(Error, Debug, PartialEq)]
pub enum ConfigError {
    /// A required variable is absent or empty
    #[error("Environment variable not found: {0}")]
    Missing(&'static str),

    /// A variable is present but cannot be parsed
    #[error("Invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Connection settings for the message table's postgres database
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub dbname: String,
}

/// Everything the service needs to start, read once at boot
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub storage: StorageConfig,
    pub port: u16,
    /// Base URL of the game that reveals a message; share links point here
    pub game_url: String,
    pub pool_max_size: usize,
    /// `None` when view logging is switched off with `VIEW_LOG_PATH=off`
    pub view_log_path: Option<PathBuf>,
    pub request_timeout: Duration,
}

impl AppConfig {
    /// Loads `.env` (if any) and reads the process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from a key lookup, then validates it
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let storage = match get("DATABASE_URL") {
            Some(url) => parse_database_url(&url)?,
            None => StorageConfig {
                host: get("DB_HOST").ok_or(ConfigError::Missing("DB_HOST"))?,
                port: parse_or("DB_PORT", get("DB_PORT"), DEFAULT_DB_PORT)?,
                user: get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                password: get("DB_PASSWORD"),
                dbname: get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
            },
        };

        let config = AppConfig {
            storage,
            port: parse_or("PORT", get("PORT"), DEFAULT_PORT)?,
            game_url: get("GAME_URL").unwrap_or_else(|| DEFAULT_GAME_URL.to_string()),
            pool_max_size: parse_or("DB_POOL_MAX_SIZE", get("DB_POOL_MAX_SIZE"), DEFAULT_POOL_MAX_SIZE)?,
            view_log_path: match get("VIEW_LOG_PATH") {
                Some(path) if path.eq_ignore_ascii_case("off") => None,
                Some(path) => Some(PathBuf::from(path)),
                None => Some(PathBuf::from(DEFAULT_VIEW_LOG_PATH)),
            },
            request_timeout: Duration::from_secs(parse_or(
                "REQUEST_TIMEOUT_SECS",
                get("REQUEST_TIMEOUT_SECS"),
                DEFAULT_REQUEST_TIMEOUT_SECS,
            )?),
        };

        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the server cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(invalid("PORT", "must be greater than zero"));
        }
        if self.pool_max_size == 0 {
            return Err(invalid("DB_POOL_MAX_SIZE", "must be greater than zero"));
        }
        if self.request_timeout.is_zero() {
            return Err(invalid("REQUEST_TIMEOUT_SECS", "must be greater than zero"));
        }

        let rest = self
            .game_url
            .strip_prefix("https://")
            .or_else(|| self.game_url.strip_prefix("http://"));
        match rest {
            Some(host) if !host.is_empty() => Ok(()),
            _ => Err(invalid("GAME_URL", "must be an absolute http(s) URL")),
        }
    }

    /// Convenience for tests and tooling that already hold a map of variables
    pub fn from_map(vars: &HashMap<String, String>) -> Result<Self, ConfigError> {
        Self::from_lookup(|key| vars.get(key).cloned())
    }
}

/// Parses a postgres connection string into storage settings
fn parse_database_url(database_url: &str) -> Result<StorageConfig, ConfigError> {
    let pg_config = database_url
        .parse::<PgConfig>()
        .map_err(|e| invalid("DATABASE_URL", e.to_string()))?;

    let host = pg_config
        .get_hosts()
        .first()
        .and_then(|host| match host {
            tokio_postgres::config::Host::Tcp(host) => Some(host.to_string()),
            #[allow(unreachable_patterns)]
            _ => None,
        })
        .ok_or_else(|| invalid("DATABASE_URL", "no TCP host"))?;

    let password = pg_config
        .get_password()
        .map(|s| String::from_utf8(s.to_vec()))
        .transpose()
        .map_err(|e| invalid("DATABASE_URL", e.to_string()))?;

    Ok(StorageConfig {
        host,
        port: pg_config.get_ports().first().copied().unwrap_or(DEFAULT_DB_PORT),
        user: pg_config
            .get_user()
            .map(ToString::to_string)
            .ok_or_else(|| invalid("DATABASE_URL", "no user"))?,
        password,
        dbname: pg_config
            .get_dbname()
            .map(ToString::to_string)
            .ok_or_else(|| invalid("DATABASE_URL", "no database name"))?,
    })
}

fn parse_or<T>(name: &'static str, raw: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match raw {
        Some(value) => value.trim().parse().map_err(|e: T::Err| invalid(name, e.to_string())),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        name,
        reason: reason.into(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn discrete() -> HashMap<String, String> {
        vars(&[
            ("DB_HOST", "db.internal"),
            ("DB_USER", "app"),
            ("DB_PASSWORD", "secret"),
            ("DB_NAME", "messages"),
        ])
    }

    #[test]
    fn discrete_variables_with_defaults() {
        let config = AppConfig::from_map(&discrete()).unwrap();

        assert_eq!(config.storage.host, "db.internal");
        assert_eq!(config.storage.port, 5432);
        assert_eq!(config.storage.password.as_deref(), Some("secret"));
        assert_eq!(config.port, 3002);
        assert_eq!(config.game_url, "http://localhost:3001");
        assert_eq!(config.pool_max_size, 10);
        assert_eq!(config.request_timeout, Duration::from_secs(30));
        assert_eq!(config.view_log_path, Some(PathBuf::from("views.log")));
    }

    #[test]
    fn view_log_can_be_switched_off() {
        let mut map = discrete();
        map.insert("VIEW_LOG_PATH".into(), "OFF".into());

        assert_eq!(AppConfig::from_map(&map).unwrap().view_log_path, None);
    }

    #[test]
    fn database_url_takes_precedence() {
        let mut map = discrete();
        map.insert(
            "DATABASE_URL".into(),
            "postgres://alice:pw@pg.example:6543/notes".into(),
        );

        let config = AppConfig::from_map(&map).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig {
                host: "pg.example".into(),
                port: 6543,
                user: "alice".into(),
                password: Some("pw".into()),
                dbname: "notes".into(),
            }
        );
    }

    #[test]
    fn missing_host_is_reported() {
        let mut map = discrete();
        map.remove("DB_HOST");

        assert_eq!(
            AppConfig::from_map(&map).unwrap_err(),
            ConfigError::Missing("DB_HOST")
        );
    }

    #[test]
    fn rejects_bad_numbers_and_urls() {
        let mut map = discrete();
        map.insert("PORT".into(), "eighty".into());
        assert!(matches!(
            AppConfig::from_map(&map),
            Err(ConfigError::Invalid { name: "PORT", .. })
        ));

        let mut map = discrete();
        map.insert("DB_POOL_MAX_SIZE".into(), "0".into());
        assert!(matches!(
            AppConfig::from_map(&map),
            Err(ConfigError::Invalid { name: "DB_POOL_MAX_SIZE", .. })
        ));

        let mut map = discrete();
        map.insert("GAME_URL".into(), "localhost:3001".into());
        assert!(matches!(
            AppConfig::from_map(&map),
            Err(ConfigError::Invalid { name: "GAME_URL", .. })
        ));
    }
}
