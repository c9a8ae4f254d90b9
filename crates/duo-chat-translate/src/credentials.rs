//! Credentials and access token caching.

use std::time::{Duration, Instant};

use duo_chat_core::TranslateError;
use serde::Deserialize;
use tokio::sync::Mutex;

/// Token endpoint of the GCE metadata server.
pub const METADATA_TOKEN_URL: &str =
    "http://metadata.google.internal/computeMetadata/v1/instance/service-accounts/default/token";

/// Tokens usually live an hour; refresh well before that.
const TOKEN_LIFETIME: Duration = Duration::from_secs(50 * 60);

/// How requests to the translation API are authorized.
#[derive(Clone)]
pub enum Credentials {
    /// API key, sent as the `key` query parameter.
    ApiKey(String),
    /// Pre-issued OAuth access token.
    AccessToken(String),
    /// Fetch tokens from a metadata server at this URL.
    MetadataServer(String),
}

impl Credentials {
    /// Use the default GCE metadata server.
    #[must_use]
    pub fn metadata_server() -> Self {
        Self::MetadataServer(METADATA_TOKEN_URL.to_string())
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ApiKey(_) => f.write_str("ApiKey(<redacted>)"),
            Self::AccessToken(_) => f.write_str("AccessToken(<redacted>)"),
            Self::MetadataServer(url) => f.debug_tuple("MetadataServer").field(url).finish(),
        }
    }
}

/// Authorization to attach to one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RequestAuth {
    Key(String),
    Bearer(String),
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: Option<u64>,
}

struct CachedToken {
    token: String,
    expires_at: Instant,
}

/// Credentials plus a cached access token for the metadata flow.
pub struct TokenCache {
    credentials: Credentials,
    cached: Mutex<Option<CachedToken>>,
}

impl TokenCache {
    #[must_use]
    pub fn new(credentials: Credentials) -> Self {
        Self {
            credentials,
            cached: Mutex::new(None),
        }
    }

    /// Authorization for the next request, refreshing the token if needed.
    ///
    /// # Errors
    /// Returns error if the metadata server cannot issue a token.
    pub async fn authorize(&self, http: &reqwest::Client) -> Result<RequestAuth, TranslateError> {
        match &self.credentials {
            Credentials::ApiKey(key) => Ok(RequestAuth::Key(key.clone())),
            Credentials::AccessToken(token) => Ok(RequestAuth::Bearer(token.clone())),
            Credentials::MetadataServer(url) => {
                let mut cached = self.cached.lock().await;
                if let Some(c) = cached.as_ref().filter(|c| Instant::now() < c.expires_at) {
                    return Ok(RequestAuth::Bearer(c.token.clone()));
                }

                let fresh = fetch_token(http, url).await?;
                let token = fresh.token.clone();
                *cached = Some(fresh);
                tracing::info!("Access token refreshed");
                Ok(RequestAuth::Bearer(token))
            }
        }
    }

    /// Drop the cached token so the next call fetches a new one.
    pub async fn invalidate(&self) {
        *self.cached.lock().await = None;
    }
}

async fn fetch_token(http: &reqwest::Client, url: &str) -> Result<CachedToken, TranslateError> {
    let response = http
        .get(url)
        .header("Metadata-Flavor", "Google")
        .send()
        .await
        .map_err(|e| TranslateError::Network(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::error!("Failed to get access token: {status}");
        return Err(TranslateError::Unauthorized(format!(
            "token request failed with {status}: {}",
            body.trim()
        )));
    }

    let parsed: TokenResponse = response
        .json()
        .await
        .map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;

    if parsed.access_token.is_empty() {
        return Err(TranslateError::Unauthorized("empty access token".to_string()));
    }

    let lifetime = parsed
        .expires_in
        .map_or(TOKEN_LIFETIME, |secs| Duration::from_secs(secs).min(TOKEN_LIFETIME));

    Ok(CachedToken {
        token: parsed.access_token,
        expires_at: Instant::now() + lifetime,
    })
}
