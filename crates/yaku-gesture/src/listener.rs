use std::time::{SystemTime, UNIX_EPOCH};

use kanal::AsyncSender;
use tokio_util::sync::CancellationToken;
use yaku_types::AppEvent;

use crate::detector::{GestureDetector, KeyCode, KeyEvent};

/// Run the OS key listener, feeding key-downs through a [`GestureDetector`]
/// and emitting [`AppEvent::GestureTrigger`] on each completed gesture.
///
/// Blocks a dedicated thread for the lifetime of the process; `cancel` only
/// suppresses trigger delivery during shutdown.
pub async fn listen_keys(
    event_tx: AsyncSender<AppEvent>,
    cancel: CancellationToken,
) -> anyhow::Result<()> {
    let result = tokio::task::spawn_blocking(move || {
        let mut detector = GestureDetector::new();
        let mut modifier_down = false;

        tracing::info!("key listener started");

        rdev::listen(move |event| {
            match event.event_type {
                rdev::EventType::KeyPress(key) => {
                    if is_platform_modifier(key) {
                        modifier_down = true;
                        return;
                    }

                    let key_event = KeyEvent {
                        key: map_key(key),
                        modifier_pressed: modifier_down,
                        timestamp_ms: unix_millis(event.time),
                    };

                    if detector.on_key_down(&key_event).is_some() {
                        if cancel.is_cancelled() {
                            return;
                        }
                        tracing::debug!("double copy detected");

                        let tx = event_tx.clone();
                        tokio::spawn(async move {
                            if let Err(e) = tx.send(AppEvent::GestureTrigger).await {
                                tracing::error!("failed to send gesture trigger: {}", e);
                            }
                        });
                    }
                }
                rdev::EventType::KeyRelease(key) => {
                    if is_platform_modifier(key) {
                        modifier_down = false;
                    }
                }
                _ => {}
            }
        })
    })
    .await;

    match result {
        Ok(Ok(())) => Ok(()),
        Ok(Err(err)) => anyhow::bail!("key listener failed: {:?}", err),
        Err(err) => anyhow::bail!("key listener thread panicked: {}", err),
    }
}

fn map_key(key: rdev::Key) -> KeyCode {
    if key == rdev::Key::KeyC {
        KeyCode::C
    } else {
        KeyCode::Other
    }
}

#[cfg(target_os = "macos")]
fn is_platform_modifier(key: rdev::Key) -> bool {
    matches!(key, rdev::Key::MetaLeft | rdev::Key::MetaRight)
}

#[cfg(not(target_os = "macos"))]
fn is_platform_modifier(key: rdev::Key) -> bool {
    matches!(key, rdev::Key::ControlLeft | rdev::Key::ControlRight)
}

fn unix_millis(time: SystemTime) -> u64 {
    time.duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
