use std::sync::Arc;

use async_trait::async_trait;
use kanal::AsyncSender;
use tokio::sync::Mutex;
use yaku_io::clipboard::ClipboardAccess;
use yaku_types::{AppEvent, PresenterState};

use crate::system::Notifier;

/// Notification bodies longer than this are cut with an ellipsis.
pub const NOTIFICATION_PREVIEW_CHARS: usize = 100;

/// Consumer of one run's translation output. Created per run; `Done` and
/// `Cancelled` are terminal, later calls are dropped.
#[async_trait]
pub trait Presenter: Send + Sync {
    /// The owning run started (clipboard was non-empty).
    async fn begin(&self);
    /// Cumulative translation prefix while streaming.
    async fn stream(&self, partial: &str);
    /// Final text for this run, translation or surfaced error string.
    async fn finish(&self, text: &str);
    /// The owning run was cancelled.
    async fn cancel(&self);
}

/// One-shot variant: the final text replaces the clipboard contents and is
/// shown as a (truncated) system notification. Streaming is ignored.
pub struct NotificationPresenter {
    clipboard: Arc<dyn ClipboardAccess>,
    notifier: Arc<dyn Notifier>,
    state: Mutex<PresenterState>,
}

impl NotificationPresenter {
    pub fn new(clipboard: Arc<dyn ClipboardAccess>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            clipboard,
            notifier,
            state: Mutex::new(PresenterState::Idle),
        }
    }

    pub async fn state(&self) -> PresenterState {
        self.state.lock().await.clone()
    }
}

#[async_trait]
impl Presenter for NotificationPresenter {
    async fn begin(&self) {
        let mut state = self.state.lock().await;
        if !state.is_terminal() {
            *state = PresenterState::Loading;
        }
    }

    async fn stream(&self, _partial: &str) {}

    async fn finish(&self, text: &str) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            return;
        }

        if let Err(e) = self.clipboard.set_text(text) {
            tracing::warn!("failed to write translation to clipboard: {}", e);
        }
        self.notifier.show("Translation Result", &truncate_body(text));
        *state = PresenterState::Done(text.to_string());
    }

    async fn cancel(&self) {
        let mut state = self.state.lock().await;
        if !state.is_terminal() {
            *state = PresenterState::Cancelled;
        }
    }
}

/// Floating-window variant: drives the popup surface through the app->ui
/// channel. A new presenter reuses the open window, so repeated triggers
/// update content in place.
pub struct PopupPresenter {
    ui_tx: AsyncSender<AppEvent>,
    state: Mutex<PresenterState>,
}

impl PopupPresenter {
    pub fn new(ui_tx: AsyncSender<AppEvent>) -> Self {
        Self {
            ui_tx,
            state: Mutex::new(PresenterState::Idle),
        }
    }

    pub async fn state(&self) -> PresenterState {
        self.state.lock().await.clone()
    }

    async fn send(&self, event: AppEvent) {
        if let Err(e) = self.ui_tx.send(event).await {
            tracing::warn!("popup surface unavailable: {}", e);
        }
    }
}

#[async_trait]
impl Presenter for PopupPresenter {
    async fn begin(&self) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            return;
        }
        *state = PresenterState::Loading;
        self.send(AppEvent::PopupLoading).await;
    }

    async fn stream(&self, partial: &str) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            return;
        }
        *state = PresenterState::Streaming(partial.to_string());
        self.send(AppEvent::PopupStream(partial.to_string())).await;
    }

    async fn finish(&self, text: &str) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            return;
        }
        *state = PresenterState::Done(text.to_string());
        self.send(AppEvent::PopupFinal(text.to_string())).await;
    }

    async fn cancel(&self) {
        let mut state = self.state.lock().await;
        if state.is_terminal() {
            return;
        }
        *state = PresenterState::Cancelled;
        self.send(AppEvent::PopupClose).await;
    }
}

fn truncate_body(text: &str) -> String {
    if text.chars().count() > NOTIFICATION_PREVIEW_CHARS {
        let preview: String = text.chars().take(NOTIFICATION_PREVIEW_CHARS).collect();
        format!("{preview}...")
    } else {
        text.to_string()
    }
}
