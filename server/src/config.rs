use std::{net::SocketAddr, path::PathBuf};

use scored_common::{DEFAULT_TOP_SCORES, MAX_TOP_SCORES};

const DEFAULT_DATABASE_URL: &str = "sqlite://scores.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_HASH_TIME_COST: u32 = 3;
const DEFAULT_HASH_MEMORY_KIB: u32 = 19456;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    Invalid { key: &'static str, value: String },

    #[error("{0} is set but {1} is missing")]
    IncompleteTls(&'static str, &'static str),
}

#[derive(Debug, Clone)]
pub struct TlsPaths {
    pub cert: PathBuf,
    pub key: PathBuf,
}

/// Server settings, read once at startup and shared read-only afterwards.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub host: String,
    pub port: u16,
    pub tls: Option<TlsPaths>,
    pub cors_allowed_origins: Vec<String>,
    pub hash_time_cost: u32,
    pub hash_memory_kib: u32,
    pub top_scores_limit: i64,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            tls: None,
            cors_allowed_origins: Vec::new(),
            hash_time_cost: DEFAULT_HASH_TIME_COST,
            hash_memory_kib: DEFAULT_HASH_MEMORY_KIB,
            top_scores_limit: DEFAULT_TOP_SCORES,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let value = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let tls = match (value("SSL_CERT_PATH"), value("SSL_KEY_PATH")) {
            (Some(cert), Some(key)) => Some(TlsPaths { cert: cert.into(), key: key.into() }),
            (None, None) => None,
            (Some(_), None) => return Err(ConfigError::IncompleteTls("SSL_CERT_PATH", "SSL_KEY_PATH")),
            (None, Some(_)) => return Err(ConfigError::IncompleteTls("SSL_KEY_PATH", "SSL_CERT_PATH")),
        };

        let cors_allowed_origins = value("CORS_ALLOWED_ORIGINS")
            .map(|origins| {
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        let hash_time_cost = parse(value("HASH_TIME_COST"), "HASH_TIME_COST", defaults.hash_time_cost)?;
        if hash_time_cost < 1 {
            return Err(invalid("HASH_TIME_COST", hash_time_cost));
        }

        // argon2 needs at least 8 KiB per lane
        let hash_memory_kib = parse(value("HASH_MEMORY_KIB"), "HASH_MEMORY_KIB", defaults.hash_memory_kib)?;
        if hash_memory_kib < 8 {
            return Err(invalid("HASH_MEMORY_KIB", hash_memory_kib));
        }

        let top_scores_limit = parse(value("TOP_SCORES_LIMIT"), "TOP_SCORES_LIMIT", defaults.top_scores_limit)?;
        if !(1..=MAX_TOP_SCORES).contains(&top_scores_limit) {
            return Err(invalid("TOP_SCORES_LIMIT", top_scores_limit));
        }

        Ok(Config {
            database_url: value("DATABASE_URL").unwrap_or(defaults.database_url),
            host: value("HOST").unwrap_or(defaults.host),
            port: parse(value("PORT"), "PORT", defaults.port)?,
            tls,
            cors_allowed_origins,
            hash_time_cost,
            hash_memory_kib,
            top_scores_limit,
        })
    }

    pub fn bind_addr(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|_| invalid("HOST", &self.host))
    }
}

fn parse<T: std::str::FromStr>(raw: Option<String>, key: &'static str, default: T) -> Result<T, ConfigError> {
    match raw {
        Some(raw) => raw.parse().map_err(|_| ConfigError::Invalid { key, value: raw }),
        None => Ok(default),
    }
}

fn invalid(key: &'static str, value: impl ToString) -> ConfigError {
    ConfigError::Invalid { key, value: value.to_string() }
}
