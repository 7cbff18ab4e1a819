use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use yaku_config::DisplayMode;
use yaku_io::clipboard::ClipboardAccess;
use yaku_provider::{ModelFactory, TranslateError};
use yaku_translate::{StreamSink, TranslationRequest, executor};
use yaku_types::AppEvent;

use crate::presenter::{NotificationPresenter, PopupPresenter, Presenter};
use crate::state::AppState;
use crate::system::{BusyIndicator, Notifier};

/// Delay between the second copy keypress and the clipboard read, giving the
/// OS copy operation time to finish writing.
pub const CLIPBOARD_SETTLE_DELAY: Duration = Duration::from_millis(60);

/// Collaborators the pipeline drives; swapped for fakes in tests.
pub struct PipelineDeps {
    pub state: Arc<AppState>,
    pub clipboard: Arc<dyn ClipboardAccess>,
    pub notifier: Arc<dyn Notifier>,
    pub busy: Arc<dyn BusyIndicator>,
    pub models: Arc<dyn ModelFactory>,
}

enum RunEvent {
    /// Clipboard was non-empty; the run entered execution.
    Started { seq: u64 },
    Settled { seq: u64, outcome: RunOutcome },
}

enum RunOutcome {
    Done(String),
    /// Non-cancellation failure, surfaced as a translated-looking string.
    Failed(String),
    /// Missing/invalid model or credential; message names the culprit.
    ConfigError(String),
    Cancelled,
    EmptyClipboard,
}

struct ActiveRun {
    seq: u64,
    token: CancellationToken,
    presenter: Arc<dyn Presenter>,
    /// Whether the run got past the clipboard check; the busy indicator is
    /// only ever lit (and thus only needs clearing) after that point.
    started: bool,
}

/// The state machine binding gesture -> clipboard -> translation -> result
/// dispatch. At most one run is "current" at any instant; a trigger while a
/// run is active cancels it and starts the replacement immediately.
pub struct Pipeline {
    deps: PipelineDeps,
    ui_tx: AsyncSender<AppEvent>,
    run_tx: AsyncSender<RunEvent>,
    run_rx: AsyncReceiver<RunEvent>,
    current: Option<ActiveRun>,
    next_seq: u64,
}

impl Pipeline {
    pub fn new(deps: PipelineDeps, ui_tx: AsyncSender<AppEvent>) -> Self {
        let (run_tx, run_rx) = kanal::bounded_async(64);
        Self {
            deps,
            ui_tx,
            run_tx,
            run_rx,
            current: None,
            next_seq: 0,
        }
    }

    /// Event loop; run state only ever mutates here, so the single-flight
    /// guard needs no locking.
    pub async fn run(
        mut self,
        events_rx: AsyncReceiver<AppEvent>,
        shutdown: CancellationToken,
    ) -> anyhow::Result<()> {
        let run_rx = self.run_rx.clone();

        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    if let Some(active) = self.current.take() {
                        active.token.cancel();
                    }
                    tracing::info!("pipeline stopping");
                    return Ok(());
                }
                event = events_rx.recv() => match event? {
                    AppEvent::GestureTrigger => self.on_trigger().await,
                    AppEvent::PopupClosed => self.on_popup_closed().await,
                    // ui-bound events, nothing to do here
                    _ => {}
                },
                event = run_rx.recv() => match event? {
                    RunEvent::Started { seq } => self.on_run_started(seq),
                    RunEvent::Settled { seq, outcome } => self.on_run_settled(seq, outcome).await,
                },
            }
        }
    }

    async fn on_trigger(&mut self) {
        let paused = { self.deps.state.config.read().await.is_paused };
        if paused {
            tracing::info!("translation is paused, ignoring trigger");
            return;
        }

        // Cancel-and-restart: the superseded run is cancelled and its popup
        // closed, but its teardown is not awaited before the new run starts.
        if let Some(active) = self.current.take() {
            tracing::debug!("superseding run #{}", active.seq);
            active.token.cancel();
            active.presenter.cancel().await;
            if active.started {
                self.deps.busy.set_busy(false);
            }
        }

        self.next_seq += 1;
        let seq = self.next_seq;
        let token = CancellationToken::new();
        let presenter = self.make_presenter().await;

        self.current = Some(ActiveRun {
            seq,
            token: token.clone(),
            presenter: presenter.clone(),
            started: false,
        });

        tracing::debug!("starting run #{}", seq);
        tokio::spawn(run_translation(RunContext {
            seq,
            token,
            presenter,
            state: self.deps.state.clone(),
            clipboard: self.deps.clipboard.clone(),
            models: self.deps.models.clone(),
            run_tx: self.run_tx.clone(),
        }));
    }

    /// Window close cancels the owning request; the presenter is told
    /// separately so the two paths stay independent.
    async fn on_popup_closed(&mut self) {
        if let Some(active) = &self.current {
            tracing::debug!("popup closed, cancelling run #{}", active.seq);
            active.token.cancel();
            active.presenter.cancel().await;
        }
    }

    fn on_run_started(&mut self, seq: u64) {
        if let Some(run) = self.current.as_mut()
            && run.seq == seq
        {
            run.started = true;
            self.deps.busy.set_busy(true);
        }
    }

    async fn on_run_settled(&mut self, seq: u64, outcome: RunOutcome) {
        // A superseded run racing to completion must not touch presenter or
        // busy state.
        let Some(active) = self.current.take_if(|run| run.seq == seq) else {
            tracing::debug!("ignoring settlement of superseded run #{}", seq);
            return;
        };

        match outcome {
            RunOutcome::EmptyClipboard => {
                // Silent abort: no busy change, no presenter call.
            }
            RunOutcome::Cancelled => {
                // Cancelled while still current (popup closed mid-run).
                if active.started {
                    self.deps.busy.set_busy(false);
                }
            }
            RunOutcome::Done(text) => {
                self.deps.busy.set_busy(false);
                active.presenter.finish(&text).await;
            }
            RunOutcome::Failed(message) => {
                // The user always sees something in the result slot.
                self.deps.busy.set_busy(false);
                active.presenter.finish(&message).await;
            }
            RunOutcome::ConfigError(message) => {
                self.deps.busy.set_busy(false);
                self.deps.notifier.show("Configuration Error", &message);
                active.presenter.finish(&message).await;
            }
        }
    }

    async fn make_presenter(&self) -> Arc<dyn Presenter> {
        let mode = { self.deps.state.config.read().await.ui.display_mode };
        match mode {
            DisplayMode::Notification => Arc::new(NotificationPresenter::new(
                self.deps.clipboard.clone(),
                self.deps.notifier.clone(),
            )),
            DisplayMode::Popup => Arc::new(PopupPresenter::new(self.ui_tx.clone())),
        }
    }
}

struct RunContext {
    seq: u64,
    token: CancellationToken,
    presenter: Arc<dyn Presenter>,
    state: Arc<AppState>,
    clipboard: Arc<dyn ClipboardAccess>,
    models: Arc<dyn ModelFactory>,
    run_tx: AsyncSender<RunEvent>,
}

/// One run, from clipboard settle to settlement. Reports back to the
/// pipeline loop instead of mutating shared state.
async fn run_translation(ctx: RunContext) {
    tokio::time::sleep(CLIPBOARD_SETTLE_DELAY).await;

    if ctx.token.is_cancelled() {
        settle(&ctx, RunOutcome::Cancelled).await;
        return;
    }

    let text = ctx.clipboard.get_text().unwrap_or_else(|e| {
        tracing::warn!("clipboard read failed: {}", e);
        String::new()
    });
    if text.is_empty() {
        tracing::debug!("clipboard empty, nothing to translate");
        settle(&ctx, RunOutcome::EmptyClipboard).await;
        return;
    }

    // Late-bound snapshot: config changes made from here on do not affect
    // this run.
    let request = {
        let config = ctx.state.config.read().await;
        TranslationRequest::from_config(text, &config, ctx.token.clone())
    };

    let _ = ctx.run_tx.send(RunEvent::Started { seq: ctx.seq }).await;
    ctx.presenter.begin().await;

    let outcome = match ctx.models.resolve(&request.selector, &ctx.state.keys) {
        Err(TranslateError::Configuration(message)) => RunOutcome::ConfigError(message),
        Err(err) => RunOutcome::Failed(format!("Translation failed: {err}")),
        Ok(model) => {
            let sink = PresenterSink {
                presenter: ctx.presenter.clone(),
            };
            let sink_ref: Option<&dyn StreamSink> =
                if request.streaming { Some(&sink) } else { None };

            match executor::run(model.as_ref(), &request, sink_ref).await {
                Ok(text) => RunOutcome::Done(text),
                Err(TranslateError::Cancelled) => RunOutcome::Cancelled,
                Err(TranslateError::Configuration(message)) => RunOutcome::ConfigError(message),
                Err(err) => RunOutcome::Failed(format!("Translation failed: {err}")),
            }
        }
    };

    settle(&ctx, outcome).await;
}

async fn settle(ctx: &RunContext, outcome: RunOutcome) {
    if let Err(e) = ctx
        .run_tx
        .send(RunEvent::Settled {
            seq: ctx.seq,
            outcome,
        })
        .await
    {
        tracing::warn!("pipeline gone before run #{} settled: {}", ctx.seq, e);
    }
}

/// Forwards streamed prefixes to the run's presenter.
struct PresenterSink {
    presenter: Arc<dyn Presenter>,
}

#[async_trait]
impl StreamSink for PresenterSink {
    async fn partial(&self, text: &str) {
        self.presenter.stream(text).await;
    }
}
