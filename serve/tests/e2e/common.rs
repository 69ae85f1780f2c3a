//! Shared helpers for e2e tests. Received bodies are logged with `[e2e] received: ...`.
//! Run tests with `--nocapture` to see them.

use std::sync::Arc;

use parley::{CompletionGateway, Gateway, MockCompletion};
use tokio::net::TcpListener;

pub type ServerHandle =
    tokio::task::JoinHandle<Result<(), Box<dyn std::error::Error + Send + Sync>>>;

/// Loads .env from the current directory so a developer's `RUST_LOG` etc. apply.
pub fn load_dotenv() {
    let _ = dotenv::dotenv();
}

pub fn mock_gateway(mock: MockCompletion) -> Arc<dyn Gateway> {
    Arc::new(CompletionGateway::new(Arc::new(mock)))
}

/// Binds a random port and spawns the server. Returns (base_url, server_handle).
pub async fn spawn_server(gateway: Arc<dyn Gateway>, once: bool) -> (String, ServerHandle) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let base_url = format!("http://{}", addr);
    let server_handle = tokio::spawn(serve::run_serve_on_listener(listener, gateway, once));
    (base_url, server_handle)
}

/// Posts a raw body to `/api/chat`; returns status and parsed JSON body.
pub async fn post_chat(base_url: &str, body: &str) -> (u16, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{}/api/chat", base_url))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .unwrap();
    let status = response.status().as_u16();
    let text = response.text().await.unwrap();
    eprintln!("[e2e] received: {}", text);
    (status, serde_json::from_str(&text).unwrap())
}
