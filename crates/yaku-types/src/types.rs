use serde::{Deserialize, Serialize};

/// Zero-payload signal meaning "the double-copy gesture just completed".
/// Emitted at most once per qualifying pair of key-downs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriggerSignal;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    /// Double-copy gesture completed (key listener -> pipeline).
    GestureTrigger,
    /// A run started on behalf of a popup presenter (pipeline -> popup surface).
    PopupLoading,
    /// Cumulative translation prefix for live display (pipeline -> popup surface).
    PopupStream(String),
    /// Final translation text (pipeline -> popup surface).
    PopupFinal(String),
    /// Close the popup window (pipeline -> popup surface).
    PopupClose,
    /// The popup window was closed by the user (popup surface -> pipeline).
    PopupClosed,
}

/// Lifecycle of a single presenter instance. `Done` and `Cancelled` are
/// terminal; updates arriving after a terminal state are dropped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresenterState {
    Idle,
    Loading,
    Streaming(String),
    Done(String),
    Cancelled,
}

impl PresenterState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done(_) | Self::Cancelled)
    }
}
