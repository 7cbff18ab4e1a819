/// Language code to name mapping.
pub const LANGUAGES: &[(&str, &str)] = &[
    ("en", "English"),
    ("ja", "Japanese"),
    ("zh-CN", "Chinese (Simplified)"),
    ("zh-TW", "Chinese (Traditional)"),
    ("ko", "Korean"),
    ("es", "Spanish"),
    ("fr", "French"),
    ("de", "German"),
    ("it", "Italian"),
    ("pt", "Portuguese"),
    ("ru", "Russian"),
    ("ar", "Arabic"),
    ("hi", "Hindi"),
    ("th", "Thai"),
    ("vi", "Vietnamese"),
    ("id", "Indonesian"),
    ("ms", "Malay"),
    ("tl", "Filipino"),
    ("nl", "Dutch"),
    ("pl", "Polish"),
    ("tr", "Turkish"),
    ("uk", "Ukrainian"),
    ("sv", "Swedish"),
    ("da", "Danish"),
    ("no", "Norwegian"),
    ("fi", "Finnish"),
];

pub fn language_name(code: &str) -> Option<&'static str> {
    LANGUAGES
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, name)| *name)
}

/// All built-in language names, in catalog order.
pub fn language_names() -> Vec<&'static str> {
    LANGUAGES.iter().map(|(_, name)| *name).collect()
}

/// Map a locale identifier (e.g. "ja-JP", "ja_JP.UTF-8", "en") to a
/// language name from the catalog. Falls back to English.
pub fn language_from_locale(locale: &str) -> &'static str {
    // Normalize POSIX-style locales ("ja_JP.UTF-8" -> "ja-JP")
    let locale = locale.split('.').next().unwrap_or(locale).replace('_', "-");

    if let Some(name) = language_name(&locale) {
        return name;
    }

    let lang_code = locale.split('-').next().unwrap_or(&locale);
    if let Some(name) = language_name(lang_code) {
        return name;
    }

    // Traditional script for Taiwan / Hong Kong locales, simplified otherwise
    if lang_code == "zh" {
        return if locale.contains("TW") || locale.contains("HK") {
            "Chinese (Traditional)"
        } else {
            "Chinese (Simplified)"
        };
    }

    "English"
}
