use std::sync::Arc;

use crate::client::{ChatModel, HttpChatModel};
use crate::credentials::ApiKeys;
use crate::error::TranslateError;
use crate::models::{ModelSelector, ProviderKind, lookup};

/// Resolves a model selector to a callable handle. The single dispatch point
/// for provider polymorphism; swapped for a fake in pipeline tests.
pub trait ModelFactory: Send + Sync {
    fn resolve(
        &self,
        selector: &ModelSelector,
        keys: &ApiKeys,
    ) -> Result<Arc<dyn ChatModel>, TranslateError>;
}

pub struct HttpModelFactory;

impl ModelFactory for HttpModelFactory {
    fn resolve(
        &self,
        selector: &ModelSelector,
        keys: &ApiKeys,
    ) -> Result<Arc<dyn ChatModel>, TranslateError> {
        Ok(Arc::new(resolve(selector, keys)?))
    }
}

/// Validate a selector and credentials and build the HTTP handle. Performs
/// no network call; the network cost occurs on the first generation call.
pub fn resolve(selector: &ModelSelector, keys: &ApiKeys) -> Result<HttpChatModel, TranslateError> {
    match selector {
        ModelSelector::Builtin { id } => {
            let info = lookup(id)
                .ok_or_else(|| TranslateError::Configuration(format!("Unknown model: {id}")))?;
            let api_key = require_key(keys, info.provider)?;
            let endpoint = default_endpoint(info.provider)
                .ok_or_else(|| {
                    TranslateError::Configuration(format!(
                        "No endpoint for provider {}",
                        info.provider
                    ))
                })?
                .to_string();
            Ok(HttpChatModel::new(
                info.provider,
                info.model.to_string(),
                api_key,
                endpoint,
            ))
        }
        ModelSelector::Custom {
            provider,
            model,
            base_url,
        } => {
            if provider.trim().is_empty() {
                return Err(TranslateError::Configuration(
                    "Custom model is missing a provider".to_string(),
                ));
            }
            if model.trim().is_empty() {
                return Err(TranslateError::Configuration(
                    "Custom model is missing a model name".to_string(),
                ));
            }
            let kind = ProviderKind::parse(provider).ok_or_else(|| {
                TranslateError::Configuration(format!("Unknown provider: {provider}"))
            })?;
            let api_key = require_key(keys, kind)?;
            let endpoint = match base_url {
                Some(url) => url.clone(),
                None => default_endpoint(kind)
                    .ok_or_else(|| {
                        TranslateError::Configuration(
                            "Custom model is missing a base URL".to_string(),
                        )
                    })?
                    .to_string(),
            };
            Ok(HttpChatModel::new(kind, model.clone(), api_key, endpoint))
        }
    }
}

fn require_key(keys: &ApiKeys, provider: ProviderKind) -> Result<String, TranslateError> {
    keys.get(provider).map(str::to_string).ok_or_else(|| {
        TranslateError::Configuration(format!("No API key configured for {provider}"))
    })
}

fn default_endpoint(provider: ProviderKind) -> Option<&'static str> {
    match provider {
        ProviderKind::Anthropic => Some("https://api.anthropic.com"),
        ProviderKind::OpenAi => Some("https://api.openai.com/v1"),
        ProviderKind::Google => Some("https://generativelanguage.googleapis.com/v1beta"),
        ProviderKind::Custom => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_with_all() -> ApiKeys {
        ApiKeys {
            anthropic: "ant-key".to_string(),
            openai: "oai-key".to_string(),
            google: "goo-key".to_string(),
            custom: "cus-key".to_string(),
        }
    }

    fn builtin(id: &str) -> ModelSelector {
        ModelSelector::Builtin { id: id.to_string() }
    }

    #[test]
    fn unknown_builtin_id_is_a_configuration_error() {
        let err = resolve(&builtin("claude-42"), &keys_with_all()).unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(msg) if msg.contains("Unknown model")));
    }

    #[test]
    fn missing_credential_names_the_provider() {
        let keys = ApiKeys::default();
        let err = resolve(&builtin("claude-3.5-haiku"), &keys).unwrap_err();
        assert!(
            matches!(err, TranslateError::Configuration(msg) if msg.contains("anthropic")),
        );
    }

    #[test]
    fn builtin_resolves_with_credential() {
        assert!(resolve(&builtin("gpt-4o"), &keys_with_all()).is_ok());
    }

    #[test]
    fn custom_without_model_name_fails() {
        let selector = ModelSelector::Custom {
            provider: "openai".to_string(),
            model: String::new(),
            base_url: None,
        };
        let err = resolve(&selector, &keys_with_all()).unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(msg) if msg.contains("model name")));
    }

    #[test]
    fn custom_without_provider_fails() {
        let selector = ModelSelector::Custom {
            provider: String::new(),
            model: "my-model".to_string(),
            base_url: None,
        };
        let err = resolve(&selector, &keys_with_all()).unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(msg) if msg.contains("provider")));
    }

    #[test]
    fn custom_provider_requires_base_url() {
        let selector = ModelSelector::Custom {
            provider: "custom".to_string(),
            model: "llama3".to_string(),
            base_url: None,
        };
        let err = resolve(&selector, &keys_with_all()).unwrap_err();
        assert!(matches!(err, TranslateError::Configuration(msg) if msg.contains("base URL")));

        let selector = ModelSelector::Custom {
            provider: "custom".to_string(),
            model: "llama3".to_string(),
            base_url: Some("http://localhost:11434/v1".to_string()),
        };
        assert!(resolve(&selector, &keys_with_all()).is_ok());
    }

    #[test]
    fn custom_named_provider_uses_its_default_endpoint() {
        let selector = ModelSelector::Custom {
            provider: "anthropic".to_string(),
            model: "claude-haiku-latest".to_string(),
            base_url: None,
        };
        assert!(resolve(&selector, &keys_with_all()).is_ok());
    }
}
