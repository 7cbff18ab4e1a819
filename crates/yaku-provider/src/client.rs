use std::fmt;
use std::pin::Pin;

use async_trait::async_trait;
use futures_util::{Stream, StreamExt};
use reqwest::StatusCode;
use serde_json::{Value, json};

use crate::error::TranslateError;
use crate::models::ProviderKind;

/// System instruction + user message handed to a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatPrompt {
    pub system: String,
    pub user: String,
}

/// Text deltas as the provider produces them.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, TranslateError>> + Send>>;

/// A callable text-generation handle, as returned by the resolver.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Whole-response generation call.
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, TranslateError>;

    /// Incremental generation. Dropping the stream aborts the underlying
    /// network call.
    async fn open_stream(&self, prompt: &ChatPrompt) -> Result<TextStream, TranslateError>;
}

pub struct HttpChatModel {
    kind: ProviderKind,
    model: String,
    api_key: String,
    endpoint: String,
    client: reqwest::Client,
}

impl HttpChatModel {
    pub fn new(kind: ProviderKind, model: String, api_key: String, endpoint: String) -> Self {
        Self {
            kind,
            model,
            api_key,
            endpoint,
            client: reqwest::Client::new(),
        }
    }

    fn request_url(&self, stream: bool) -> String {
        let base = self.endpoint.trim_end_matches('/');
        match self.kind {
            ProviderKind::Anthropic => format!("{base}/v1/messages"),
            ProviderKind::OpenAi | ProviderKind::Custom => format!("{base}/chat/completions"),
            ProviderKind::Google => {
                let action = if stream {
                    "streamGenerateContent?alt=sse"
                } else {
                    "generateContent"
                };
                format!("{base}/models/{}:{action}", self.model)
            }
        }
    }

    fn apply_auth(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.kind {
            ProviderKind::Anthropic => request
                .header("x-api-key", &self.api_key)
                .header("anthropic-version", "2023-06-01"),
            ProviderKind::OpenAi | ProviderKind::Custom => request.bearer_auth(&self.api_key),
            ProviderKind::Google => request.query(&[("key", self.api_key.as_str())]),
        }
    }

    fn request_body(&self, prompt: &ChatPrompt, stream: bool) -> Value {
        match self.kind {
            ProviderKind::Anthropic => json!({
                "model": self.model,
                "max_tokens": 8192,
                "system": prompt.system,
                "messages": [{ "role": "user", "content": prompt.user }],
                "stream": stream,
            }),
            ProviderKind::OpenAi | ProviderKind::Custom => json!({
                "model": self.model,
                "messages": [
                    { "role": "system", "content": prompt.system },
                    { "role": "user", "content": prompt.user },
                ],
                "stream": stream,
            }),
            ProviderKind::Google => json!({
                "system_instruction": { "parts": [{ "text": prompt.system }] },
                "contents": [{ "role": "user", "parts": [{ "text": prompt.user }] }],
            }),
        }
    }

    fn status_error(&self, status: StatusCode, body: &str) -> TranslateError {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => TranslateError::Provider(format!(
                "authentication failed for {} ({status})",
                self.kind
            )),
            StatusCode::TOO_MANY_REQUESTS => {
                TranslateError::Provider(format!("rate limit exceeded for {}", self.kind))
            }
            _ => TranslateError::Provider(format!(
                "{} request failed with status {status}: {body}",
                self.kind
            )),
        }
    }
}

// Manual impl so the API key never lands in logs.
impl fmt::Debug for HttpChatModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpChatModel")
            .field("kind", &self.kind)
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl ChatModel for HttpChatModel {
    async fn generate(&self, prompt: &ChatPrompt) -> Result<String, TranslateError> {
        let url = self.request_url(false);
        tracing::debug!("sending generation request to {}", url);

        let response = self
            .apply_auth(self.client.post(&url))
            .json(&self.request_body(prompt, false))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &body));
        }

        let body: Value = response.json().await.map_err(|e| {
            TranslateError::Provider(format!("failed to parse {} response: {e}", self.kind))
        })?;
        extract_text(self.kind, &body).ok_or_else(|| {
            TranslateError::Provider(format!("no text in {} response", self.kind))
        })
    }

    async fn open_stream(&self, prompt: &ChatPrompt) -> Result<TextStream, TranslateError> {
        let url = self.request_url(true);
        tracing::debug!("opening generation stream to {}", url);

        let response = self
            .apply_auth(self.client.post(&url))
            .json(&self.request_body(prompt, true))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(self.status_error(status, &body));
        }

        let kind = self.kind;
        let mut bytes = response.bytes_stream();

        let stream = async_stream::stream! {
            let mut buffer = String::new();

            while let Some(chunk) = bytes.next().await {
                let chunk = match chunk {
                    Ok(c) => c,
                    Err(e) => {
                        yield Err(TranslateError::Provider(format!("stream error: {e}")));
                        return;
                    }
                };

                buffer.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(line_end) = buffer.find('\n') {
                    let line: String = buffer.drain(..=line_end).collect();
                    let line = line.trim();

                    if line.is_empty() {
                        continue;
                    }
                    if line == "data: [DONE]" {
                        return;
                    }

                    if let Some(delta) = parse_sse_line(kind, line) {
                        yield Ok(delta);
                    }
                }
            }
        };

        Ok(Box::pin(stream))
    }
}

/// Pull the generated text out of a whole-response body.
fn extract_text(kind: ProviderKind, body: &Value) -> Option<String> {
    match kind {
        ProviderKind::Anthropic => body["content"][0]["text"].as_str().map(str::to_string),
        ProviderKind::OpenAi | ProviderKind::Custom => body["choices"][0]["message"]["content"]
            .as_str()
            .map(str::to_string),
        ProviderKind::Google => collect_google_parts(&body["candidates"][0]["content"]["parts"]),
    }
}

/// Pull the text delta out of one SSE `data:` line, if it carries any.
fn parse_sse_line(kind: ProviderKind, line: &str) -> Option<String> {
    let payload = line.strip_prefix("data: ")?;
    let value = serde_json::from_str::<Value>(payload).ok()?;

    let delta = match kind {
        ProviderKind::Anthropic => {
            if value["type"] != "content_block_delta" {
                return None;
            }
            value["delta"]["text"].as_str().map(str::to_string)
        }
        ProviderKind::OpenAi | ProviderKind::Custom => value["choices"][0]["delta"]["content"]
            .as_str()
            .map(str::to_string),
        ProviderKind::Google => collect_google_parts(&value["candidates"][0]["content"]["parts"]),
    }?;

    if delta.is_empty() { None } else { Some(delta) }
}

fn collect_google_parts(parts: &Value) -> Option<String> {
    let parts = parts.as_array()?;
    let text: String = parts
        .iter()
        .filter_map(|part| part["text"].as_str())
        .collect();
    if text.is_empty() { None } else { Some(text) }
}
