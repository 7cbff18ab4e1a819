use std::sync::Arc;

use tokio::signal;
use tracing_subscriber::EnvFilter;
use yaku_config::Config;
use yaku_io::clipboard::SystemClipboard;
use yaku_provider::{ApiKeys, HttpModelFactory};

mod controller;
mod pipeline;
mod presenter;
mod state;
mod system;
mod ui;

#[cfg(test)]
mod tests;

use self::controller::AppController;
use self::pipeline::PipelineDeps;
use self::state::AppState;
use self::system::{LogBusyIndicator, LogNotifier};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let mut config = Config::new();
    config.validate();
    yaku_provider::validate_model(&mut config.model);

    let keys = ApiKeys::from_env();
    tracing::info!(
        "primary language: {}, secondary language: {}, model: {}",
        config.translator.primary_language,
        config.translator.secondary_language,
        config.model.ai_model,
    );

    let state = Arc::new(AppState::new(config, keys));
    let clipboard = Arc::new(SystemClipboard::new()?);

    let controller = AppController::new();
    let deps = PipelineDeps {
        state,
        clipboard,
        notifier: Arc::new(LogNotifier),
        busy: Arc::new(LogBusyIndicator),
        models: Arc::new(HttpModelFactory),
    };
    let mut tasks = controller.spawn_tasks(deps);

    tokio::select! {
        _ = signal::ctrl_c() => {
            tracing::info!("shutdown requested");
            controller.shutdown();
        }
        result = tasks.join_next() => match result {
            Some(Ok(Ok(()))) => tracing::warn!("task exited"),
            Some(Ok(Err(e))) => tracing::error!("task failed: {e}"),
            Some(Err(e)) => tracing::error!("task panicked: {e}"),
            None => {}
        }
    }

    Ok(())
}
