use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use yaku_types::AppEvent;

use crate::pipeline::{Pipeline, PipelineDeps};
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    /// Gesture listener and popup surface -> pipeline.
    pub app: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
    /// Pipeline -> popup surface.
    pub ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            app: kanal::bounded_async(64),  // gesture + window interactions
            ui: kanal::bounded_async(256),  // streaming burst capacity
        }
    }
}

/// Application controller for task spawning and lifecycle
pub struct AppController {
    channels: ChannelSet,
    cancel_token: CancellationToken,
}

impl AppController {
    pub fn new() -> Self {
        Self {
            channels: ChannelSet::new(),
            cancel_token: CancellationToken::new(),
        }
    }

    pub fn spawn_tasks(&self, deps: PipelineDeps) -> JoinSet<anyhow::Result<()>> {
        let mut tasks = JoinSet::new();

        // Pipeline loop
        let pipeline = Pipeline::new(deps, self.channels.ui.0.clone());
        tasks.spawn(pipeline.run(
            self.channels.app.1.clone(),
            self.cancel_token.child_token(),
        ));

        // Popup surface
        tasks.spawn(ui_loop(
            self.channels.ui.1.clone(),
            self.channels.app.0.clone(),
            self.cancel_token.child_token(),
        ));

        // OS key listener
        tasks.spawn(yaku_gesture::listen_keys(
            self.channels.app.0.clone(),
            self.cancel_token.child_token(),
        ));

        tasks
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }
}

impl Default for AppController {
    fn default() -> Self {
        Self::new()
    }
}
