use serde::{Deserialize, Serialize};

/// How translation results are surfaced to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// One-shot system notification; final text replaces the clipboard.
    Notification,
    /// Floating window near the pointer with live streaming updates.
    Popup,
}

fn default_display_mode() -> DisplayMode {
    DisplayMode::Notification
}

#[derive(Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct UiConfig {
    #[serde(default = "default_display_mode")]
    pub display_mode: DisplayMode,
}

impl Default for UiConfig {
    fn default() -> Self {
        Self {
            display_mode: default_display_mode(),
        }
    }
}
