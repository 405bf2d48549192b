// Application configuration loaded from the environment

use sqlx::mysql::MySqlConnectOptions;
use std::fmt;
use std::time::Duration;

/// Secrets shorter than this are accepted but logged as weak at startup
pub const RECOMMENDED_SECRET_LEN: usize = 32;

/// Configuration errors raised while reading the environment
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },

    #[error("invalid DATABASE_URL: {0}")]
    DatabaseUrl(#[from] sqlx::Error),
}

/// Database connection settings
///
/// Either a full `DATABASE_URL` or the individual host/user/password/name parts.
#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub name: String,
    pub max_connections: u32,
    pub connect_timeout: Duration,
}

impl DatabaseConfig {
    /// Build sqlx connect options from the configured settings
    pub fn connect_options(&self) -> Result<MySqlConnectOptions, ConfigError> {
        if let Some(url) = &self.url {
            return Ok(url.parse::<MySqlConnectOptions>()?);
        }

        Ok(MySqlConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name))
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url.as_ref().map(|_| "<redacted>"))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("max_connections", &self.max_connections)
            .field("connect_timeout", &self.connect_timeout)
            .finish()
    }
}

/// Top-level application configuration
#[derive(Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("jwt_secret", &"<redacted>")
            .finish()
    }
}

impl AppConfig {
    /// Read configuration from process environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary key lookup
    ///
    /// Empty values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let host = get("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_or(get("PORT"), "PORT", 8080)?;

        // No fallback: a missing secret would let anyone mint tokens
        let jwt_secret = get("JWT_SECRET").ok_or(ConfigError::Missing("JWT_SECRET"))?;

        let url = get("DATABASE_URL");
        let (user, name) = if url.is_some() {
            (get("DB_USER").unwrap_or_default(), get("DB_NAME").unwrap_or_default())
        } else {
            (
                get("DB_USER").ok_or(ConfigError::Missing("DB_USER"))?,
                get("DB_NAME").ok_or(ConfigError::Missing("DB_NAME"))?,
            )
        };

        let database = DatabaseConfig {
            url,
            host: get("DB_HOST").unwrap_or_else(|| "localhost".to_string()),
            port: parse_or(get("DB_PORT"), "DB_PORT", 3306)?,
            user,
            password: lookup("DB_PASSWORD").unwrap_or_default(),
            name,
            max_connections: parse_or(get("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            connect_timeout: Duration::from_secs(parse_or(
                get("DB_CONNECT_TIMEOUT_SECS"),
                "DB_CONNECT_TIMEOUT_SECS",
                10,
            )?),
        };

        Ok(Self {
            host,
            port,
            database,
            jwt_secret,
        })
    }

    /// Socket address string the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn has_weak_secret(&self) -> bool {
        self.jwt_secret.len() < RECOMMENDED_SECRET_LEN
    }
}

fn parse_or<T: std::str::FromStr>(
    value: Option<String>,
    name: &'static str,
    default: T,
) -> Result<T, ConfigError> {
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value: raw }),
        None => Ok(default),
    }
}
