//! Axum app: shared state, router and server configuration.
//!
//! Routes: `POST /api/chat` ([`crate::chat::chat_handler`]) and `GET /health`.

use axum::{
    routing::{get, post},
    Router,
};
use parley::protocol::CHAT_ROUTE;
use parley::Gateway;
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

use super::chat::chat_handler;

pub const DEFAULT_ADDR: &str = "127.0.0.1:3000";

/// Server configuration from the environment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ServeConfig {
    pub addr: String,
}

impl Default for ServeConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
        }
    }
}

impl ServeConfig {
    /// `PARLEY_SERVE_ADDR`, falling back to [`DEFAULT_ADDR`] when unset or blank.
    pub fn from_env() -> Self {
        Self::from_lookup(|k| std::env::var(k).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup("PARLEY_SERVE_ADDR") {
            Some(addr) if !addr.trim().is_empty() => Self {
                addr: addr.trim().to_string(),
            },
            _ => Self::default(),
        }
    }
}

/// Shared state for the chat route: the one injected gateway.
///
/// Handlers never mutate it; requests are independent.
#[derive(Clone)]
pub struct AppState {
    pub(crate) gateway: Arc<dyn Gateway>,
    /// When set, the first completed chat request sends on this to stop the server (once mode).
    pub(crate) shutdown_tx: Arc<Mutex<Option<oneshot::Sender<()>>>>,
}

impl AppState {
    pub fn new(gateway: Arc<dyn Gateway>) -> Self {
        Self {
            gateway,
            shutdown_tx: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_shutdown(self, tx: oneshot::Sender<()>) -> Self {
        Self {
            shutdown_tx: Arc::new(Mutex::new(Some(tx))),
            ..self
        }
    }

    /// Fires the once-mode shutdown signal, if any. Later calls do nothing.
    pub(crate) fn signal_done(&self) {
        if let Some(tx) = self.shutdown_tx.lock().ok().and_then(|mut g| g.take()) {
            let _ = tx.send(());
        }
    }
}

/// Builds the Axum router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(CHAT_ROUTE, post(chat_handler))
        .route("/health", get(|| async { "ok" }))
        .with_state(state)
}
