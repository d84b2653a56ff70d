use std::{env, fmt::Display, path::PathBuf, str::FromStr};

use anyhow::{Result, anyhow};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewBackend {
    Redis,
    Memory,
}

impl FromStr for ReviewBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "redis" => Ok(ReviewBackend::Redis),
            "memory" => Ok(ReviewBackend::Memory),
            other => Err(format!("unknown review store '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub books_db_path: PathBuf,
    pub redis_url: String,
    pub reviews_key: String,
    pub review_backend: ReviewBackend,
    pub static_dir: PathBuf,
    pub db_logging: bool,
}

impl Config {
    pub fn load() -> Result<Self> {
        Ok(Self {
            port: try_load("PORT", "5000")?,
            books_db_path: try_load("BOOKS_DB_PATH", "db/books.db")?,
            redis_url: try_load("REDIS_URL", "redis://127.0.0.1:6379/")?,
            reviews_key: try_load("REVIEWS_KEY", "reviews")?,
            review_backend: try_load("REVIEW_STORE", "redis")?,
            static_dir: try_load("STATIC_DIR", "static")?,
            db_logging: var("DISABLE_DB_LOGGING").map_or(true, |flag| flag.trim() != "1"),
        })
    }

    /// In-memory everything, for tests and quick local runs.
    pub fn ephemeral() -> Self {
        Self {
            port: 0,
            books_db_path: PathBuf::from(":memory:"),
            redis_url: String::new(),
            reviews_key: "reviews".to_string(),
            review_backend: ReviewBackend::Memory,
            static_dir: PathBuf::from("static"),
            db_logging: true,
        }
    }
}

fn var(key: &str) -> Result<String, ()> {
    env::var(key).map_err(|_| {
        warn!("Environment variable {key} not found, using default");
    })
}

fn try_load<T: FromStr>(key: &str, default: &str) -> Result<T>
where
    T::Err: Display,
{
    var(key)
        .unwrap_or_else(|_| {
            info!("{key} not set, using default: {default}");
            default.to_string()
        })
        .parse()
        .map_err(|e| anyhow!("Invalid {key} value: {e}"))
}
