//! Access-token verification against the hosted auth provider.

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;
use uuid::Uuid;

/// The caller behind a verified session
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AuthUser {
    #[serde(rename = "id")]
    pub user_id: Uuid,
    pub email: Option<String>,
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("invalid or expired session")]
    InvalidToken,

    #[error("auth provider error: {0}")]
    Provider(String),
}

#[async_trait]
pub trait SessionVerifier: Send + Sync {
    async fn verify(&self, access_token: &str) -> Result<AuthUser, SessionError>;
}

/// Verifies tokens by asking the provider's `/auth/v1/user` endpoint who they belong to
pub struct ProviderSessions {
    auth_url: String,
    anon_key: String,
    client: reqwest::Client,
}

impl ProviderSessions {
    pub fn new(auth_url: impl Into<String>, anon_key: impl Into<String>) -> reqwest::Result<Self> {
        Ok(Self {
            auth_url: auth_url.into().trim_end_matches('/').to_string(),
            anon_key: anon_key.into(),
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(10))
                .build()?,
        })
    }
}

#[async_trait]
impl SessionVerifier for ProviderSessions {
    async fn verify(&self, access_token: &str) -> Result<AuthUser, SessionError> {
        let response = self
            .client
            .get(format!("{}/auth/v1/user", self.auth_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await
            .map_err(|e| SessionError::Provider(e.to_string()))?;

        let status = response.status();
        if status == reqwest::StatusCode::UNAUTHORIZED || status == reqwest::StatusCode::FORBIDDEN {
            return Err(SessionError::InvalidToken);
        }
        if !status.is_success() {
            return Err(SessionError::Provider(format!("user lookup returned {}", status)));
        }

        response
            .json::<AuthUser>()
            .await
            .map_err(|e| SessionError::Provider(format!("parse user: {}", e)))
    }
}
