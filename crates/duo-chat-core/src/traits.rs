//! Core trait for translation providers.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Translation error.
#[derive(Debug, Error)]
pub enum TranslateError {
    #[error("Text to translate cannot be empty")]
    EmptyText,
    #[error("Translation is not configured")]
    Unavailable,
    #[error("Translation provider rejected credentials: {0}")]
    Unauthorized(String),
    #[error("Translation access denied. Check permissions and billing: {0}")]
    Forbidden(String),
    #[error("Invalid translation request. Check language codes: {0}")]
    BadRequest(String),
    #[error("Network error: cannot reach translation provider: {0}")]
    Network(String),
    #[error("Invalid response from translation provider: {0}")]
    InvalidResponse(String),
    #[error("Translation provider returned {status}: {message}")]
    Api { status: u16, message: String },
}

/// Result of a single translation call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub translated_text: String,
    /// Source language the provider detected, when it reports one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detected_language: Option<String>,
}

/// A language the provider can translate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LanguageInfo {
    pub language: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// Trait for machine translation backends.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Detect the language of `text`, returning a language code.
    async fn detect_language(&self, text: &str) -> Result<String, TranslateError>;

    /// Translate `text` into `target`. `source = None` lets the provider detect it.
    async fn translate(
        &self,
        text: &str,
        target: &str,
        source: Option<&str>,
    ) -> Result<Translation, TranslateError>;

    /// Languages the provider supports.
    async fn supported_languages(&self) -> Result<Vec<LanguageInfo>, TranslateError>;
}

/// Translator used when no provider is configured. Every call fails.
#[derive(Debug, Default, Clone)]
pub struct DisabledTranslator;

#[async_trait]
impl Translator for DisabledTranslator {
    async fn detect_language(&self, _text: &str) -> Result<String, TranslateError> {
        Err(TranslateError::Unavailable)
    }

    async fn translate(
        &self,
        _text: &str,
        _target: &str,
        _source: Option<&str>,
    ) -> Result<Translation, TranslateError> {
        Err(TranslateError::Unavailable)
    }

    async fn supported_languages(&self) -> Result<Vec<LanguageInfo>, TranslateError> {
        Err(TranslateError::Unavailable)
    }
}
