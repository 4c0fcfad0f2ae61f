use std::time::Duration;

use anyhow::{Context, Result};
use storage::services::recency::{DEFAULT_WINDOW_BUFFER, DEFAULT_WINDOW_SIZE};

#[derive(Debug, Clone)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    pub auth_url: String,
    pub auth_anon_key: String,
    pub moderator_ids: String,
    pub catalog_base_url: String,
    pub catalog_cache_ttl: Duration,
    pub recents_size: usize,
    pub recents_buffer: usize,
    pub recents_refresh: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            host: std::env::var("HOST").context("Cannot load HOST env variable")?,
            port: std::env::var("PORT")
                .context("PORT must be a number")?
                .parse()?,
            database_url: std::env::var("DATABASE_URL")
                .context("Cannot load DATABASE_URL env variable")?,
            auth_url: std::env::var("AUTH_URL").context("Cannot load AUTH_URL env variable")?,
            auth_anon_key: std::env::var("AUTH_ANON_KEY")
                .context("Cannot load AUTH_ANON_KEY env variable")?,
            moderator_ids: std::env::var("MODERATOR_IDS").unwrap_or_default(),
            catalog_base_url: std::env::var("CATALOG_BASE_URL")
                .unwrap_or_else(|_| catalog::client::DEFAULT_BASE_URL.to_string()),
            catalog_cache_ttl: Duration::from_secs(parse_or(
                "CATALOG_CACHE_TTL_SECS",
                catalog::client::DEFAULT_CACHE_TTL.as_secs(),
            )?),
            recents_size: parse_or("RECENTS_SIZE", DEFAULT_WINDOW_SIZE)?,
            recents_buffer: parse_or("RECENTS_BUFFER", DEFAULT_WINDOW_BUFFER)?,
            recents_refresh: Duration::from_secs(parse_or("RECENTS_REFRESH_SECS", 300)?),
        })
    }
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match std::env::var(key) {
        Ok(value) => value
            .parse()
            .with_context(|| format!("{} must be a number", key)),
        Err(_) => Ok(default),
    }
}
