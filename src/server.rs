//! Process bootstrap: load the model, wire the router, serve until ctrl-c,
//! then release the model reference.

use anyhow::Context;
use std::sync::Arc;

use crate::{app_state::AppState, config::LabConfig, prediction::ModelState, routes::build_router};

/// Build the shared state and attempt the one-time model load. A failed load
/// is logged and leaves prediction unavailable; it never aborts startup.
pub fn bootstrap(config: &LabConfig) -> Arc<AppState> {
    let state = Arc::new(AppState::from_config(config));

    match state.predictor.load_model(&config.model_path) {
        ModelState::Loaded => tracing::info!(path = %config.model_path, "prediction enabled"),
        ModelState::Unloaded => {
            tracing::warn!(path = %config.model_path, "prediction disabled: no model loaded")
        }
    }

    state
}

pub async fn run(config: LabConfig) -> anyhow::Result<()> {
    let state = bootstrap(&config);
    let app = build_router(Arc::clone(&state));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("HTTP server listening on http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    state.predictor.unload()?;
    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
    }
    tracing::info!("Shutdown requested");
}
