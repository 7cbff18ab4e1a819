use serde::{Deserialize, Serialize};

fn default_ai_model() -> String {
    "claude-3.5-haiku".to_string()
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ModelConfig {
    /// Built-in model id, or "custom-model" to use the custom fields below.
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
    /// Provider of the custom model ("anthropic", "openai", "google", "custom").
    #[serde(default)]
    pub custom_provider: String,
    /// Wire model name of the custom model.
    #[serde(default)]
    pub custom_model: String,
    /// Endpoint override; required for OpenAI-compatible "custom" providers.
    #[serde(default)]
    pub custom_base_url: String,
}

impl ModelConfig {
    pub fn default_model_id() -> String {
        default_ai_model()
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            ai_model: default_ai_model(),
            custom_provider: String::new(),
            custom_model: String::new(),
            custom_base_url: String::new(),
        }
    }
}
