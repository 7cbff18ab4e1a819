use std::env;

use crate::models::ProviderKind;

/// API keys by provider. Loaded once at startup from the environment; an
/// empty string means no credential is stored.
#[derive(Debug, Clone, Default)]
pub struct ApiKeys {
    pub anthropic: String,
    pub openai: String,
    pub google: String,
    pub custom: String,
}

impl ApiKeys {
    pub fn from_env() -> Self {
        Self {
            anthropic: env::var("ANTHROPIC_API_KEY").unwrap_or_default(),
            openai: env::var("OPENAI_API_KEY").unwrap_or_default(),
            google: env::var("GOOGLE_API_KEY").unwrap_or_default(),
            custom: env::var("CUSTOM_API_KEY").unwrap_or_default(),
        }
    }

    pub fn get(&self, provider: ProviderKind) -> Option<&str> {
        let key = match provider {
            ProviderKind::Anthropic => &self.anthropic,
            ProviderKind::OpenAi => &self.openai,
            ProviderKind::Google => &self.google,
            ProviderKind::Custom => &self.custom,
        };
        if key.is_empty() { None } else { Some(key) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_key_reads_as_absent() {
        let keys = ApiKeys::default();
        assert_eq!(keys.get(ProviderKind::Anthropic), None);
    }

    #[test]
    fn stored_key_is_returned() {
        let keys = ApiKeys {
            openai: "sk-test".to_string(),
            ..ApiKeys::default()
        };
        assert_eq!(keys.get(ProviderKind::OpenAi), Some("sk-test"));
        assert_eq!(keys.get(ProviderKind::Google), None);
    }
}
