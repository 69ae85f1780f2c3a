//! HTTP server for Parley (axum).
//!
//! Serves the completion gateway at `POST /api/chat` and a liveness probe at `GET /health`,
//! by default on http://127.0.0.1:3000.
//!
//! **Public API**: [`run_serve`], [`run_serve_on_listener`], [`AppState`], [`ServeConfig`],
//! [`gateway_from_env`].

mod app;
mod chat;

use std::sync::Arc;

use parley::{AzureChatClient, AzureSettings, CompletionGateway, Gateway, SettingsError};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tracing::info;

pub use app::{router, AppState, ServeConfig, DEFAULT_ADDR};

/// Builds the production gateway: Azure settings from the environment, one client for the
/// process. Fails when any `AZURE_OPENAI_*` variable is missing.
pub fn gateway_from_env() -> Result<Arc<dyn Gateway>, SettingsError> {
    let settings = AzureSettings::from_env()?;
    info!(
        endpoint = %settings.endpoint,
        deployment = %settings.deployment,
        "azure openai client configured"
    );
    let client = AzureChatClient::new(&settings);
    Ok(Arc::new(CompletionGateway::new(Arc::new(client))))
}

/// Runs the server on an existing listener. Used by tests (bind to 127.0.0.1:0 then pass listener).
/// When `once` is true, the first completed `/api/chat` request shuts the server down.
pub async fn run_serve_on_listener(
    listener: TcpListener,
    gateway: Arc<dyn Gateway>,
    once: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = listener.local_addr()?;
    info!("chat server listening on http://{}", addr);

    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let state = if once {
        info!("will exit after first chat request (once mode, used by tests)");
        AppState::new(gateway).with_shutdown(shutdown_tx)
    } else {
        AppState::new(gateway)
    };
    let app = router(Arc::new(state));

    if once {
        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                let _ = shutdown_rx.await;
            })
            .await?;
        info!("request done, exiting (once mode)");
    } else {
        axum::serve(listener, app).await?;
    }
    Ok(())
}

/// Binds `addr` (default [`DEFAULT_ADDR`]) and runs the server.
pub async fn run_serve(
    addr: Option<&str>,
    gateway: Arc<dyn Gateway>,
    once: bool,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let addr = addr.unwrap_or(DEFAULT_ADDR);
    let listener = TcpListener::bind(addr).await?;
    run_serve_on_listener(listener, gateway, once).await
}
