//! Language options offered by the chat client.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
    pub flag: &'static str,
}

const fn lang(code: &'static str, name: &'static str, flag: &'static str) -> LanguageOption {
    LanguageOption { code, name, flag }
}

pub const SUPPORTED_LANGUAGES: [LanguageOption; 15] = [
    lang("en", "English", "🇺🇸"),
    lang("zh-CN", "中文 (简体)", "🇨🇳"),
    lang("zh-TW", "中文 (繁體)", "🇹🇼"),
    lang("es", "Español", "🇪🇸"),
    lang("fr", "Français", "🇫🇷"),
    lang("de", "Deutsch", "🇩🇪"),
    lang("ja", "日本語", "🇯🇵"),
    lang("ko", "한국어", "🇰🇷"),
    lang("ar", "العربية", "🇸🇦"),
    lang("ru", "Русский", "🇷🇺"),
    lang("pt", "Português", "🇵🇹"),
    lang("it", "Italiano", "🇮🇹"),
    lang("hi", "हिन्दी", "🇮🇳"),
    lang("th", "ไทย", "🇹🇭"),
    lang("vi", "Tiếng Việt", "🇻🇳"),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes_unique_and_include_chat_pair() {
        let mut codes: Vec<_> = SUPPORTED_LANGUAGES.iter().map(|l| l.code).collect();
        assert!(codes.contains(&"en"));
        assert!(codes.contains(&"zh-CN"));
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), SUPPORTED_LANGUAGES.len());
    }
}
