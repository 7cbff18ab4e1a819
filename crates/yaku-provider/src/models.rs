use std::fmt;

use serde::{Deserialize, Serialize};
use yaku_config::ModelConfig;

/// Sentinel model id routing selection to the user-defined custom model.
pub const CUSTOM_MODEL_ID: &str = "custom-model";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Anthropic,
    OpenAi,
    Google,
    /// OpenAI-compatible endpoint at a user-supplied base URL.
    Custom,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Anthropic => "anthropic",
            Self::OpenAi => "openai",
            Self::Google => "google",
            Self::Custom => "custom",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "anthropic" => Some(Self::Anthropic),
            "openai" => Some(Self::OpenAi),
            "google" => Some(Self::Google),
            "custom" => Some(Self::Custom),
            _ => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the built-in model catalog.
#[derive(Debug, Clone)]
pub struct ModelInfo {
    /// Human-readable name, used in notifications and menus.
    pub name: &'static str,
    pub provider: ProviderKind,
    /// Wire model identifier sent to the provider.
    pub model: &'static str,
}

static BUILTIN_MODELS: &[(&str, ModelInfo)] = &[
    (
        "claude-3.5-haiku",
        ModelInfo {
            name: "Claude 3.5 Haiku",
            provider: ProviderKind::Anthropic,
            model: "claude-3-5-haiku-20241022",
        },
    ),
    (
        "claude-3.7-sonnet",
        ModelInfo {
            name: "Claude 3.7 Sonnet",
            provider: ProviderKind::Anthropic,
            model: "claude-3-7-sonnet-20250219",
        },
    ),
    (
        "claude-3.5-sonnet",
        ModelInfo {
            name: "Claude 3.5 Sonnet",
            provider: ProviderKind::Anthropic,
            model: "claude-3-5-sonnet-20241022",
        },
    ),
    (
        "gpt-4.1",
        ModelInfo {
            name: "GPT-4.1",
            provider: ProviderKind::OpenAi,
            model: "gpt-4.1",
        },
    ),
    (
        "gpt-4.1-mini",
        ModelInfo {
            name: "GPT-4.1 Mini",
            provider: ProviderKind::OpenAi,
            model: "gpt-4.1-mini",
        },
    ),
    (
        "gpt-4.1-nano",
        ModelInfo {
            name: "GPT-4.1 Nano",
            provider: ProviderKind::OpenAi,
            model: "gpt-4.1-nano",
        },
    ),
    (
        "gpt-4o",
        ModelInfo {
            name: "GPT-4o",
            provider: ProviderKind::OpenAi,
            model: "gpt-4o",
        },
    ),
    (
        "gpt-4o-mini",
        ModelInfo {
            name: "GPT-4o Mini",
            provider: ProviderKind::OpenAi,
            model: "gpt-4o-mini",
        },
    ),
    (
        "o1",
        ModelInfo {
            name: "o1",
            provider: ProviderKind::OpenAi,
            model: "o1",
        },
    ),
    (
        "o1-mini",
        ModelInfo {
            name: "o1 Mini",
            provider: ProviderKind::OpenAi,
            model: "o1-mini",
        },
    ),
    (
        "gemini-2.0-flash-exp",
        ModelInfo {
            name: "Gemini 2.0 Flash (Experimental)",
            provider: ProviderKind::Google,
            model: "gemini-2.0-flash-exp",
        },
    ),
    (
        "gemini-1.5-flash",
        ModelInfo {
            name: "Gemini 1.5 Flash",
            provider: ProviderKind::Google,
            model: "gemini-1.5-flash",
        },
    ),
    (
        "gemini-1.5-pro",
        ModelInfo {
            name: "Gemini 1.5 Pro",
            provider: ProviderKind::Google,
            model: "gemini-1.5-pro",
        },
    ),
];

pub fn builtin_models() -> &'static [(&'static str, ModelInfo)] {
    BUILTIN_MODELS
}

pub fn lookup(id: &str) -> Option<&'static ModelInfo> {
    BUILTIN_MODELS
        .iter()
        .find(|(model_id, _)| *model_id == id)
        .map(|(_, info)| info)
}

/// Reset an unknown model id to the default. Custom selection is left alone;
/// its completeness is checked at resolve time.
pub fn validate_model(config: &mut ModelConfig) {
    if config.ai_model != CUSTOM_MODEL_ID && lookup(&config.ai_model).is_none() {
        tracing::warn!(
            "unknown model id {:?}, resetting to default",
            config.ai_model
        );
        config.ai_model = ModelConfig::default_model_id();
    }
}

/// Which model a run should use. Resolved to a callable handle by the
/// resolver; never cached across requests with different credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSelector {
    Builtin {
        id: String,
    },
    Custom {
        provider: String,
        model: String,
        base_url: Option<String>,
    },
}

impl ModelSelector {
    pub fn from_config(config: &ModelConfig) -> Self {
        if config.ai_model == CUSTOM_MODEL_ID {
            Self::Custom {
                provider: config.custom_provider.clone(),
                model: config.custom_model.clone(),
                base_url: (!config.custom_base_url.is_empty())
                    .then(|| config.custom_base_url.clone()),
            }
        } else {
            Self::Builtin {
                id: config.ai_model.clone(),
            }
        }
    }

    /// Name used when telling the user which model is misconfigured.
    pub fn display_name(&self) -> String {
        match self {
            Self::Builtin { id } => lookup(id)
                .map(|info| info.name.to_string())
                .unwrap_or_else(|| id.clone()),
            Self::Custom { model, .. } => {
                if model.is_empty() {
                    "custom model".to_string()
                } else {
                    model.clone()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_model_is_in_the_catalog() {
        assert!(lookup(&ModelConfig::default_model_id()).is_some());
    }

    #[test]
    fn lookup_unknown_id() {
        assert!(lookup("claude-42").is_none());
    }

    #[test]
    fn provider_kind_roundtrip() {
        for kind in [
            ProviderKind::Anthropic,
            ProviderKind::OpenAi,
            ProviderKind::Google,
            ProviderKind::Custom,
        ] {
            assert_eq!(ProviderKind::parse(kind.as_str()), Some(kind));
        }
        assert_eq!(ProviderKind::parse("deepl"), None);
    }

    #[test]
    fn validate_model_resets_unknown_id() {
        let mut config = ModelConfig {
            ai_model: "does-not-exist".to_string(),
            ..ModelConfig::default()
        };
        validate_model(&mut config);
        assert_eq!(config.ai_model, ModelConfig::default_model_id());
    }

    #[test]
    fn validate_model_keeps_custom_sentinel() {
        let mut config = ModelConfig {
            ai_model: CUSTOM_MODEL_ID.to_string(),
            ..ModelConfig::default()
        };
        validate_model(&mut config);
        assert_eq!(config.ai_model, CUSTOM_MODEL_ID);
    }

    #[test]
    fn selector_from_builtin_config() {
        let config = ModelConfig::default();
        assert_eq!(
            ModelSelector::from_config(&config),
            ModelSelector::Builtin {
                id: ModelConfig::default_model_id(),
            }
        );
    }

    #[test]
    fn selector_from_custom_config() {
        let config = ModelConfig {
            ai_model: CUSTOM_MODEL_ID.to_string(),
            custom_provider: "openai".to_string(),
            custom_model: "my-model".to_string(),
            custom_base_url: String::new(),
        };
        assert_eq!(
            ModelSelector::from_config(&config),
            ModelSelector::Custom {
                provider: "openai".to_string(),
                model: "my-model".to_string(),
                base_url: None,
            }
        );
    }
}
