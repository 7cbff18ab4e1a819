use serde::{Deserialize, Serialize};

use crate::languages;
use crate::system_locale;

fn default_primary_language() -> String {
    languages::language_from_locale(&system_locale()).to_string()
}

fn default_secondary_language() -> String {
    secondary_for(&default_primary_language())
}

fn default_enable_streaming() -> bool {
    false
}

/// Default counterpart for a primary language: English, unless the primary
/// already is English, in which case Japanese.
pub fn secondary_for(primary: &str) -> String {
    if primary == "English" {
        "Japanese".to_string()
    } else {
        "English".to_string()
    }
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct TranslatorConfig {
    #[serde(default = "default_primary_language")]
    pub primary_language: String,
    #[serde(default = "default_secondary_language")]
    pub secondary_language: String,
    /// Free-text instructions appended to the system prompt.
    #[serde(default)]
    pub custom_prompt: String,
    /// User-added language names, merged into the built-in vocabulary.
    #[serde(default)]
    pub custom_languages: Vec<String>,
    #[serde(default = "default_enable_streaming")]
    pub enable_streaming: bool,
}

impl TranslatorConfig {
    /// Built-in language names plus user-added custom languages.
    pub fn known_languages(&self) -> Vec<String> {
        let mut names: Vec<String> = languages::language_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        for custom in &self.custom_languages {
            if !names.iter().any(|name| name == custom) {
                names.push(custom.clone());
            }
        }
        names
    }
}

impl Default for TranslatorConfig {
    fn default() -> Self {
        Self {
            primary_language: default_primary_language(),
            secondary_language: default_secondary_language(),
            custom_prompt: String::new(),
            custom_languages: Vec::new(),
            enable_streaming: default_enable_streaming(),
        }
    }
}
