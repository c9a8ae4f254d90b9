//! Chinese/English auto-translation.

use crate::{TranslateError, TranslatedMessage, Translator};

/// Target language for text detected as `detected`.
///
/// Any Chinese variant goes to English, English goes to Simplified Chinese,
/// everything else goes to English.
#[must_use]
pub fn target_language_for(detected: &str) -> &'static str {
    if detected.starts_with("zh") {
        "en"
    } else if detected == "en" {
        "zh-CN"
    } else {
        "en"
    }
}

/// Detect the language of `text`, then translate it to the other language.
///
/// # Errors
/// Returns error if `text` is blank or either provider call fails.
pub async fn auto_translate(
    translator: &dyn Translator,
    text: &str,
) -> Result<TranslatedMessage, TranslateError> {
    if text.trim().is_empty() {
        return Err(TranslateError::EmptyText);
    }

    let detected = translator.detect_language(text).await?;
    let target = target_language_for(&detected);
    tracing::debug!("Detected language {detected}, translating to {target}");

    let translation = translator.translate(text, target, None).await?;

    Ok(TranslatedMessage {
        original_text: text.to_string(),
        translated_text: translation.translated_text,
        source_language: detected,
        target_language: target.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use tokio_test::{assert_err, assert_ok};

    use super::*;
    use crate::{DisabledTranslator, LanguageInfo, Translation};

    /// Records calls and answers with canned values.
    struct FakeTranslator {
        detected: Result<&'static str, ()>,
        translate_fails: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTranslator {
        fn detecting(lang: &'static str) -> Self {
            Self {
                detected: Ok(lang),
                translate_fails: false,
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Translator for FakeTranslator {
        async fn detect_language(&self, text: &str) -> Result<String, TranslateError> {
            self.calls.lock().unwrap().push(format!("detect:{text}"));
            self.detected
                .map(str::to_string)
                .map_err(|()| TranslateError::Network("down".into()))
        }

        async fn translate(
            &self,
            text: &str,
            target: &str,
            source: Option<&str>,
        ) -> Result<Translation, TranslateError> {
            self.calls
                .lock()
                .unwrap()
                .push(format!("translate:{text}:{target}:{source:?}"));
            if self.translate_fails {
                return Err(TranslateError::Forbidden("billing".into()));
            }
            Ok(Translation {
                translated_text: format!("[{target}] {text}"),
                detected_language: None,
            })
        }

        async fn supported_languages(&self) -> Result<Vec<LanguageInfo>, TranslateError> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_target_selection() {
        assert_eq!(target_language_for("zh"), "en");
        assert_eq!(target_language_for("zh-CN"), "en");
        assert_eq!(target_language_for("zh-TW"), "en");
        assert_eq!(target_language_for("en"), "zh-CN");
        assert_eq!(target_language_for("ja"), "en");
        assert_eq!(target_language_for("und"), "en");
    }

    #[tokio::test]
    async fn test_english_goes_to_chinese() {
        let fake = FakeTranslator::detecting("en");
        let result = assert_ok!(auto_translate(&fake, "hello").await);

        assert_eq!(
            result,
            TranslatedMessage {
                original_text: "hello".into(),
                translated_text: "[zh-CN] hello".into(),
                source_language: "en".into(),
                target_language: "zh-CN".into(),
            }
        );
        assert_eq!(
            *fake.calls.lock().unwrap(),
            vec!["detect:hello".to_string(), "translate:hello:zh-CN:None".to_string()]
        );
    }

    #[tokio::test]
    async fn test_other_language_goes_to_english() {
        let fake = FakeTranslator::detecting("fr");
        let result = assert_ok!(auto_translate(&fake, "bonjour").await);
        assert_eq!(result.source_language, "fr");
        assert_eq!(result.target_language, "en");
    }

    #[tokio::test]
    async fn test_blank_text_skips_provider() {
        let fake = FakeTranslator::detecting("en");
        let err = assert_err!(auto_translate(&fake, "   ").await);
        assert!(matches!(err, TranslateError::EmptyText));
        assert!(fake.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_detection_failure_stops_before_translate() {
        let fake = FakeTranslator {
            detected: Err(()),
            translate_fails: false,
            calls: Mutex::new(Vec::new()),
        };
        let err = assert_err!(auto_translate(&fake, "hi").await);
        assert!(matches!(err, TranslateError::Network(_)));
        assert_eq!(fake.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_translate_failure_propagates() {
        let fake = FakeTranslator {
            translate_fails: true,
            ..FakeTranslator::detecting("zh-CN")
        };
        let err = assert_err!(auto_translate(&fake, "你好").await);
        assert!(matches!(err, TranslateError::Forbidden(_)));
    }

    #[tokio::test]
    async fn test_disabled_translator() {
        let err = assert_err!(auto_translate(&DisabledTranslator, "hi").await);
        assert!(matches!(err, TranslateError::Unavailable));
    }
}
