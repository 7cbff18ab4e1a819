use std::sync::Mutex;

use anyhow::{Context, Result};
use arboard::Clipboard;

/// Clipboard boundary: read at run start, write when a notification-style
/// result replaces the copied text.
pub trait ClipboardAccess: Send + Sync {
    fn get_text(&self) -> Result<String>;
    fn set_text(&self, text: &str) -> Result<()>;
}

pub struct SystemClipboard {
    inner: Mutex<Clipboard>,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let clipboard = Clipboard::new().context("Failed to open system clipboard")?;
        Ok(Self {
            inner: Mutex::new(clipboard),
        })
    }
}

impl ClipboardAccess for SystemClipboard {
    fn get_text(&self) -> Result<String> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("clipboard lock poisoned"))?;
        // An empty clipboard reads as an error on some platforms; treat it
        // as empty text so the caller can abort silently.
        Ok(clipboard.get_text().unwrap_or_default())
    }

    fn set_text(&self, text: &str) -> Result<()> {
        let mut clipboard = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("clipboard lock poisoned"))?;
        clipboard
            .set_text(text.to_string())
            .context("Failed to write to system clipboard")
    }
}
