//! Translation API v2 response bodies.

use duo_chat_core::{LanguageInfo, TranslateError, Translation};
use serde::Deserialize;

/// Every v2 response wraps its payload in `data`.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    pub data: T,
}

#[derive(Debug, Deserialize)]
pub struct TranslationsData {
    #[serde(default)]
    pub translations: Vec<TranslationEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationEntry {
    pub translated_text: String,
    #[serde(default)]
    pub detected_source_language: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DetectionsData {
    /// One list of candidates per query string.
    #[serde(default)]
    pub detections: Vec<Vec<Detection>>,
}

#[derive(Debug, Deserialize)]
pub struct Detection {
    pub language: String,
    #[serde(default)]
    pub confidence: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct LanguagesData {
    #[serde(default)]
    pub languages: Vec<LanguageInfo>,
}

/// Error body, e.g. `{"error": {"code": 403, "message": "..."}}`.
#[derive(Debug, Deserialize)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
pub struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

impl TranslationsData {
    /// First translation of the (single) query.
    pub fn into_first(self) -> Result<Translation, TranslateError> {
        let entry = self
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| TranslateError::InvalidResponse("no translations".to_string()))?;
        Ok(Translation {
            translated_text: entry.translated_text,
            detected_language: entry.detected_source_language,
        })
    }
}

impl DetectionsData {
    /// Top candidate language of the (single) query.
    pub fn into_first(self) -> Result<String, TranslateError> {
        self.detections
            .into_iter()
            .next()
            .and_then(|candidates| candidates.into_iter().next())
            .map(|d| d.language)
            .ok_or_else(|| TranslateError::InvalidResponse("no detections".to_string()))
    }
}

/// Pull the human-readable message out of an error body, falling back to the raw text.
#[must_use]
pub fn error_message(body: &str) -> String {
    serde_json::from_str::<ErrorBody>(body)
        .map(|b| b.error.message)
        .ok()
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| body.trim().to_string())
}
