use std::time::Duration;

use async_trait::async_trait;
use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use yaku_config::Config;
use yaku_provider::{ChatModel, ChatPrompt, ModelSelector, TranslateError};

use crate::prompt;

/// One translation unit of work. Owned by exactly one executor run; settles
/// by success, error or cancellation.
pub struct TranslationRequest {
    pub source_text: String,
    pub primary_language: String,
    pub secondary_language: String,
    pub selector: ModelSelector,
    pub custom_instructions: String,
    pub known_languages: Vec<String>,
    pub streaming: bool,
    pub timeout: Option<Duration>,
    pub cancel: CancellationToken,
}

impl TranslationRequest {
    /// Snapshot the configuration for this run. Config changes made after
    /// this point do not affect the request.
    pub fn from_config(source_text: String, config: &Config, cancel: CancellationToken) -> Self {
        Self {
            source_text,
            primary_language: config.translator.primary_language.clone(),
            secondary_language: config.translator.secondary_language.clone(),
            selector: ModelSelector::from_config(&config.model),
            custom_instructions: config.translator.custom_prompt.clone(),
            known_languages: config.translator.known_languages(),
            streaming: config.translator.enable_streaming,
            timeout: (config.timeout_seconds > 0)
                .then(|| Duration::from_secs(config.timeout_seconds)),
            cancel,
        }
    }
}

/// Receives the full accumulated text after each streamed increment (the
/// whole prefix is resent each time, not a delta).
#[async_trait]
pub trait StreamSink: Send + Sync {
    async fn partial(&self, text: &str);
}

/// Drive one generation call to completion. The request's token is honored
/// at every await point; cancelling aborts the underlying network call, not
/// just the local bookkeeping.
pub async fn run(
    model: &dyn ChatModel,
    request: &TranslationRequest,
    sink: Option<&dyn StreamSink>,
) -> Result<String, TranslateError> {
    let prompt = prompt::build_prompt(request);
    tracing::debug!(
        "translating {} chars, streaming: {}",
        request.source_text.len(),
        request.streaming,
    );

    let work = async {
        if request.streaming {
            run_streaming(model, &prompt, &request.cancel, sink).await
        } else {
            run_whole(model, &prompt, &request.cancel).await
        }
    };

    let result = match request.timeout {
        Some(limit) => tokio::time::timeout(limit, work).await.unwrap_or_else(|_| {
            Err(TranslateError::Provider(format!(
                "translation timed out after {}s",
                limit.as_secs()
            )))
        }),
        None => work.await,
    };

    // The "output only the translation" instruction is a soft contract;
    // trimming is the only defensive cleanup applied here.
    result.map(|text| text.trim().to_string())
}

async fn run_whole(
    model: &dyn ChatModel,
    prompt: &ChatPrompt,
    cancel: &CancellationToken,
) -> Result<String, TranslateError> {
    tokio::select! {
        _ = cancel.cancelled() => Err(TranslateError::Cancelled),
        result = model.generate(prompt) => result,
    }
}

async fn run_streaming(
    model: &dyn ChatModel,
    prompt: &ChatPrompt,
    cancel: &CancellationToken,
    sink: Option<&dyn StreamSink>,
) -> Result<String, TranslateError> {
    let mut stream = tokio::select! {
        _ = cancel.cancelled() => return Err(TranslateError::Cancelled),
        opened = model.open_stream(prompt) => opened?,
    };

    let mut text = String::new();
    loop {
        tokio::select! {
            _ = cancel.cancelled() => return Err(TranslateError::Cancelled),
            chunk = stream.next() => match chunk {
                None => break,
                Some(Ok(delta)) => {
                    text.push_str(&delta);
                    if let Some(sink) = sink {
                        sink.partial(&text).await;
                    }
                }
                Some(Err(err)) => return Err(err),
            },
        }
    }

    Ok(text)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use yaku_provider::TextStream;

    use super::*;

    struct FakeModel {
        reply: String,
        chunks: Vec<String>,
        delay: Option<Duration>,
        prompts: Mutex<Vec<ChatPrompt>>,
    }

    impl FakeModel {
        fn replying(reply: &str) -> Self {
            Self {
                reply: reply.to_string(),
                chunks: Vec::new(),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn streaming(chunks: &[&str]) -> Self {
            Self {
                reply: String::new(),
                chunks: chunks.iter().map(|c| c.to_string()).collect(),
                delay: None,
                prompts: Mutex::new(Vec::new()),
            }
        }

        fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }
    }

    #[async_trait]
    impl ChatModel for FakeModel {
        async fn generate(&self, prompt: &ChatPrompt) -> Result<String, TranslateError> {
            self.prompts.lock().expect("lock").push(prompt.clone());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            Ok(self.reply.clone())
        }

        async fn open_stream(&self, prompt: &ChatPrompt) -> Result<TextStream, TranslateError> {
            self.prompts.lock().expect("lock").push(prompt.clone());
            let chunks = self.chunks.clone();
            let delay = self.delay;
            let stream = async_stream::stream! {
                for chunk in chunks {
                    if let Some(delay) = delay {
                        tokio::time::sleep(delay).await;
                    }
                    yield Ok(chunk);
                }
            };
            Ok(Box::pin(stream))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl StreamSink for RecordingSink {
        async fn partial(&self, text: &str) {
            self.seen.lock().expect("lock").push(text.to_string());
        }
    }

    fn request(streaming: bool, cancel: CancellationToken) -> TranslationRequest {
        TranslationRequest {
            source_text: "Bonjour".to_string(),
            primary_language: "English".to_string(),
            secondary_language: "Japanese".to_string(),
            selector: ModelSelector::Builtin {
                id: "claude-3.5-haiku".to_string(),
            },
            custom_instructions: String::new(),
            known_languages: vec!["English".to_string(), "Japanese".to_string()],
            streaming,
            timeout: None,
            cancel,
        }
    }

    #[tokio::test]
    async fn whole_response_is_trimmed() {
        let model = FakeModel::replying("  Hello \n");
        let result = run(&model, &request(false, CancellationToken::new()), None).await;
        assert_eq!(result.expect("translation"), "Hello");
    }

    #[tokio::test]
    async fn streaming_delivers_cumulative_prefixes() {
        let model = FakeModel::streaming(&["Hel", "lo", " world"]);
        let sink = RecordingSink::default();

        let result = run(&model, &request(true, CancellationToken::new()), Some(&sink)).await;

        assert_eq!(result.expect("translation"), "Hello world");
        assert_eq!(
            *sink.seen.lock().expect("lock"),
            vec!["Hel".to_string(), "Hello".to_string(), "Hello world".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn cancellation_settles_with_the_distinguished_error() {
        let cancel = CancellationToken::new();
        let request = request(false, cancel.clone());

        let handle = tokio::spawn(async move {
            let model = FakeModel::replying("late").with_delay(Duration::from_secs(3600));
            run(&model, &request, None).await
        });

        cancel.cancel();
        let result = handle.await.expect("join");
        assert!(matches!(result, Err(TranslateError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn streaming_cancellation_stops_mid_stream() {
        let cancel = CancellationToken::new();
        let request = request(true, cancel.clone());

        let handle = tokio::spawn(async move {
            let model =
                FakeModel::streaming(&["Hel", "lo"]).with_delay(Duration::from_secs(3600));
            run(&model, &request, None).await
        });

        cancel.cancel();
        let result = handle.await.expect("join");
        assert!(matches!(result, Err(TranslateError::Cancelled)));
    }

    #[tokio::test(start_paused = true)]
    async fn timeout_maps_into_the_provider_vocabulary() {
        let mut req = request(false, CancellationToken::new());
        req.timeout = Some(Duration::from_secs(1));

        let model = FakeModel::replying("late").with_delay(Duration::from_secs(3600));
        let result = run(&model, &req, None).await;

        assert!(matches!(result, Err(TranslateError::Provider(msg)) if msg.contains("timed out")));
    }

    #[tokio::test]
    async fn prompt_carries_the_request_languages() {
        let model = FakeModel::replying("Hello");
        run(&model, &request(false, CancellationToken::new()), None)
            .await
            .expect("translation");

        let prompts = model.prompts.lock().expect("lock");
        assert_eq!(prompts.len(), 1);
        assert!(prompts[0].system.contains("Primary language: English"));
        assert!(prompts[0].system.contains("Secondary language: Japanese"));
        assert_eq!(prompts[0].user, "Bonjour");
    }
}
