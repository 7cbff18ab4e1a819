/// Failures from model resolution and generation calls.
#[derive(Debug, thiserror::Error)]
pub enum TranslateError {
    /// Missing or invalid model/credential configuration. Always surfaced to
    /// the user via a notification naming the provider or model.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// The owning request was cancelled; never shown to the user.
    #[error("translation cancelled")]
    Cancelled,

    /// Network, auth or malformed-response failure from the provider call.
    #[error("{0}")]
    Provider(String),
}

impl From<reqwest::Error> for TranslateError {
    fn from(err: reqwest::Error) -> Self {
        Self::Provider(err.to_string())
    }
}
