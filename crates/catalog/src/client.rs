use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

use reqwest::header::CACHE_CONTROL;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::models::{CatalogCourse, Department, Program, SemesterInfo};
use crate::error::{CatalogError, Result};

pub const DEFAULT_BASE_URL: &str = "https://raw.githubusercontent.com/omshub/data/main/static";
pub const DEFAULT_CACHE_TTL: Duration = Duration::from_secs(24 * 60 * 60);

struct CachedDocument {
    fetched_at: Instant,
    body: serde_json::Value,
}

/// Client for the static reference-data repository.
///
/// Documents are cached in memory for `cache_ttl`. A failed fetch is retried
/// once with `Cache-Control: no-cache` before the error is returned.
pub struct CatalogClient {
    base_url: String,
    cache_ttl: Duration,
    client: reqwest::Client,
    cache: RwLock<HashMap<String, CachedDocument>>,
}

impl CatalogClient {
    pub fn new(base_url: impl Into<String>, cache_ttl: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("omshub-catalog/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            cache_ttl,
            client,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub async fn departments(&self) -> Result<BTreeMap<String, Department>> {
        self.fetch("departments.json").await
    }

    pub async fn programs(&self) -> Result<BTreeMap<String, Program>> {
        self.fetch("programs.json").await
    }

    pub async fn semesters(&self) -> Result<BTreeMap<String, SemesterInfo>> {
        self.fetch("semesters.json").await
    }

    pub async fn courses(&self) -> Result<BTreeMap<String, CatalogCourse>> {
        self.fetch("courses.json").await
    }

    async fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<T> {
        if let Some(body) = self.cached(resource).await {
            tracing::debug!("Serving {} from cache", resource);
            return Ok(serde_json::from_value(body)?);
        }

        let body = match self.request(resource, false).await {
            Ok(body) => body,
            Err(e) => {
                tracing::warn!("Fetching {} failed ({}), retrying without cache", resource, e);
                self.request(resource, true).await?
            }
        };

        let parsed = serde_json::from_value(body.clone())?;

        self.cache.write().await.insert(
            resource.to_string(),
            CachedDocument {
                fetched_at: Instant::now(),
                body,
            },
        );

        Ok(parsed)
    }

    async fn cached(&self, resource: &str) -> Option<serde_json::Value> {
        let cache = self.cache.read().await;
        cache
            .get(resource)
            .filter(|doc| doc.fetched_at.elapsed() < self.cache_ttl)
            .map(|doc| doc.body.clone())
    }

    async fn request(&self, resource: &str, bypass_cache: bool) -> Result<serde_json::Value> {
        let url = format!("{}/{}", self.base_url, resource);

        let mut request = self.client.get(&url);
        if bypass_cache {
            request = request.header(CACHE_CONTROL, "no-cache");
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status { url, status });
        }

        Ok(response.json::<serde_json::Value>().await?)
    }
}
