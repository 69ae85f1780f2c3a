//! Chat server with a canned reply, for front-end and CLI work without Azure credentials.
//!
//! ```bash
//! cargo run -p serve --features test-server --bin test-server -- 127.0.0.1:3000 "Hi there"
//! ```

use std::sync::Arc;

use parley::{CompletionGateway, MockCompletion};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| serve::ServeConfig::from_env().addr);
    let reply = args.next().unwrap_or_else(|| "Hi there".to_string());

    let gateway = CompletionGateway::new(Arc::new(MockCompletion::replying(reply)));
    serve::run_serve(Some(&addr), Arc::new(gateway), false).await
}
