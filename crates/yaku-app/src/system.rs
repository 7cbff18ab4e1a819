/// One-shot system notification sink; fire-and-forget.
pub trait Notifier: Send + Sync {
    fn show(&self, title: &str, body: &str);
}

/// Boolean-level busy flag, rendered by the tray layer.
pub trait BusyIndicator: Send + Sync {
    fn set_busy(&self, busy: bool);
}

/// Logs notifications until a desktop notification backend is attached.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn show(&self, title: &str, body: &str) {
        tracing::info!("[NOTIFY] {}: {}", title, body);
    }
}

/// Logs busy transitions until a tray icon backend is attached.
pub struct LogBusyIndicator;

impl BusyIndicator for LogBusyIndicator {
    fn set_busy(&self, busy: bool) {
        tracing::debug!("[TRAY] busy = {}", busy);
    }
}
