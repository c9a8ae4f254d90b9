//! Google Cloud Translation v2 client.

use std::time::Duration;

use async_trait::async_trait;
use duo_chat_core::{LanguageInfo, TranslateError, Translation, Translator};
use reqwest::{RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;

use crate::{
    Credentials, TokenCache,
    credentials::RequestAuth,
    protocol::{DetectionsData, Envelope, LanguagesData, TranslationsData, error_message},
};

pub const DEFAULT_BASE_URL: &str = "https://translation.googleapis.com/language/translate/v2";

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Builder for [`GoogleTranslator`].
#[derive(Debug)]
pub struct GoogleTranslatorBuilder {
    credentials: Credentials,
    base_url: String,
    timeout: Duration,
}

impl GoogleTranslatorBuilder {
    /// Override the API base URL (proxies, tests).
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Per-request timeout.
    #[must_use]
    pub const fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the translator.
    ///
    /// # Errors
    /// Returns error if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<GoogleTranslator, reqwest::Error> {
        let http = reqwest::Client::builder().timeout(self.timeout).build()?;
        tracing::info!(
            "Google Cloud Translation client initialized ({})",
            self.base_url
        );
        Ok(GoogleTranslator {
            http,
            base_url: self.base_url,
            tokens: TokenCache::new(self.credentials),
        })
    }
}

/// Translator backed by the Google Cloud Translation v2 REST API.
pub struct GoogleTranslator {
    http: reqwest::Client,
    base_url: String,
    tokens: TokenCache,
}

impl GoogleTranslator {
    #[must_use]
    pub fn builder(credentials: Credentials) -> GoogleTranslatorBuilder {
        GoogleTranslatorBuilder {
            credentials,
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Attach credentials, send, and decode the `data` envelope.
    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, TranslateError> {
        let request = match self.tokens.authorize(&self.http).await? {
            RequestAuth::Key(key) => request.query(&[("key", key)]),
            RequestAuth::Bearer(token) => request.bearer_auth(token),
        };

        let response = request.send().await.map_err(map_transport_error)?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = error_message(&body);
            if status == StatusCode::UNAUTHORIZED {
                // token might be expired
                self.tokens.invalidate().await;
            }
            return Err(map_status(status, message));
        }

        let envelope: Envelope<T> = response
            .json()
            .await
            .map_err(|e| TranslateError::InvalidResponse(e.to_string()))?;
        Ok(envelope.data)
    }
}

fn map_transport_error(e: reqwest::Error) -> TranslateError {
    if e.is_timeout() {
        TranslateError::Network(format!("request timed out: {e}"))
    } else if e.is_connect() {
        TranslateError::Network(e.to_string())
    } else {
        TranslateError::Api {
            status: e.status().map_or(0, |s| s.as_u16()),
            message: e.to_string(),
        }
    }
}

fn map_status(status: StatusCode, message: String) -> TranslateError {
    match status {
        StatusCode::UNAUTHORIZED => TranslateError::Unauthorized(message),
        StatusCode::FORBIDDEN => TranslateError::Forbidden(message),
        StatusCode::BAD_REQUEST => TranslateError::BadRequest(message),
        _ => TranslateError::Api {
            status: status.as_u16(),
            message,
        },
    }
}

#[async_trait]
impl Translator for GoogleTranslator {
    async fn detect_language(&self, text: &str) -> Result<String, TranslateError> {
        let request = self
            .http
            .post(format!("{}/detect", self.base_url))
            .query(&[("q", text)]);

        let data: DetectionsData = self.call(request).await.inspect_err(|e| {
            tracing::error!("Language detection failed: {e}");
        })?;
        data.into_first()
    }

    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<Translation, TranslateError> {
        if text.trim().is_empty() {
            return Err(TranslateError::EmptyText);
        }
        tracing::debug!("Translating {} chars to {target}", text.chars().count());

        let mut request = self
            .http
            .post(&self.base_url)
            .query(&[("q", text), ("target", target), ("format", "text")]);
        if let Some(source) = source.filter(|s| *s != "auto") {
            request = request.query(&[("source", source)]);
        }

        let data: TranslationsData = self.call(request).await.inspect_err(|e| {
            tracing::error!("Translation failed: {e}");
        })?;
        data.into_first()
    }

    async fn supported_languages(&self) -> Result<Vec<LanguageInfo>, TranslateError> {
        let request = self
            .http
            .get(format!("{}/languages", self.base_url))
            .query(&[("target", "en")]);

        let data: LanguagesData = self.call(request).await?;
        Ok(data.languages)
    }
}
