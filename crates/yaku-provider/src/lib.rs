mod client;
mod credentials;
mod error;
mod models;
mod resolver;

pub use client::{ChatModel, ChatPrompt, HttpChatModel, TextStream};
pub use credentials::ApiKeys;
pub use error::TranslateError;
pub use models::{
    CUSTOM_MODEL_ID, ModelInfo, ModelSelector, ProviderKind, builtin_models, lookup,
    validate_model,
};
pub use resolver::{HttpModelFactory, ModelFactory, resolve};
