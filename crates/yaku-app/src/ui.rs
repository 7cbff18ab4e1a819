use kanal::{AsyncReceiver, AsyncSender};
use tokio_util::sync::CancellationToken;
use yaku_types::AppEvent;

/// Placeholder popup surface. Renders popup events into the log; a window
/// toolkit attaches here, and reports window-close interactions back through
/// `app_tx` as [`AppEvent::PopupClosed`].
pub async fn ui_loop(
    ui_rx: AsyncReceiver<AppEvent>,
    _app_tx: AsyncSender<AppEvent>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => {
                tracing::info!("popup surface stopping");
                return Ok(());
            }
            event = ui_rx.recv() => match event? {
                AppEvent::PopupLoading => tracing::info!("[POPUP] loading"),
                AppEvent::PopupStream(partial) => {
                    tracing::debug!("[POPUP] streaming, {} chars", partial.len());
                }
                AppEvent::PopupFinal(text) => tracing::info!("[POPUP] {}", preview(&text)),
                AppEvent::PopupClose => tracing::info!("[POPUP] closed"),
                // pipeline-bound events, nothing to do here
                _ => {}
            },
        }
    }
}

fn preview(text: &str) -> String {
    if text.chars().count() > 50 {
        let head: String = text.chars().take(50).collect();
        format!("{head}...")
    } else {
        text.to_string()
    }
}
