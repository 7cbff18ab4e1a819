use std::env;

use serde::{Deserialize, Serialize};

pub mod languages;
pub mod model;
pub mod translator;
pub mod ui;

pub use model::ModelConfig;
pub use translator::TranslatorConfig;
pub use ui::{DisplayMode, UiConfig};

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub translator: TranslatorConfig,
    pub model: ModelConfig,
    pub ui: UiConfig,

    /// When paused, gesture triggers are ignored (logged no-ops).
    pub is_paused: bool,
    /// Upper bound on a single translation run; 0 disables the timeout.
    pub timeout_seconds: u64,
}

impl Config {
    pub fn new() -> Self {
        let timeout_seconds = env::var("TIMEOUT_SECONDS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(30); // 30 seconds default

        Config {
            translator: TranslatorConfig::default(),
            model: ModelConfig::default(),
            ui: UiConfig::default(),

            is_paused: false,
            timeout_seconds,
        }
    }

    /// Repair inconsistent language settings: a primary/secondary pair that
    /// collapsed to the same language gets its secondary re-derived.
    pub fn validate(&mut self) {
        if self.translator.primary_language == self.translator.secondary_language {
            let repaired = translator::secondary_for(&self.translator.primary_language);
            tracing::warn!(
                "primary and secondary language are both {:?}, resetting secondary to {:?}",
                self.translator.primary_language,
                repaired,
            );
            self.translator.secondary_language = repaired;
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

/// Current system locale, from the POSIX locale environment. Empty when unset.
pub fn system_locale() -> String {
    env::var("LC_ALL")
        .or_else(|_| env::var("LANG"))
        .unwrap_or_default()
}
