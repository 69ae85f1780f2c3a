use std::time::Duration;

use parley::MockCompletion;
use tokio::time::timeout;

use super::common;

const HELLO: &str = r#"{"messages":[{"role":"user","content":"Hello"}]}"#;

#[tokio::test]
async fn e2e_chat_success() {
    common::load_dotenv();
    let (url, server_handle) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("Hi there")), true)
            .await;

    let (status, body) = common::post_chat(&url, HELLO).await;
    assert_eq!(status, 200);
    assert_eq!(body, serde_json::json!({"content": "Hi there"}));

    let done = timeout(Duration::from_secs(5), server_handle).await;
    assert!(done.is_ok(), "once-mode server should exit after one request");
}

#[tokio::test]
async fn e2e_chat_upstream_failure() {
    let (url, _server) = common::spawn_server(
        common::mock_gateway(MockCompletion::failing("DeploymentNotFound")),
        false,
    )
    .await;

    let (status, body) = common::post_chat(&url, HELLO).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to process request");
    assert!(body["details"]
        .as_str()
        .unwrap()
        .contains("DeploymentNotFound"));
}

#[tokio::test]
async fn e2e_chat_empty_messages() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("x")), false).await;

    let (status, body) = common::post_chat(&url, r#"{"messages":[]}"#).await;
    assert_eq!(status, 500);
    assert_eq!(body["error"], "Failed to process request");
    assert_eq!(body["details"], "messages must not be empty");
}

#[tokio::test]
async fn e2e_chat_malformed_bodies() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("x")), false).await;

    for raw in [
        "not valid json",
        r#"{"nope":1}"#,
        r#"{"messages":[{"role":"system","content":"x"}]}"#,
    ] {
        let (status, body) = common::post_chat(&url, raw).await;
        assert_eq!(status, 500, "body: {}", raw);
        assert_eq!(body["error"], "Failed to process request");
        assert!(body["details"].is_string());
    }
}

#[tokio::test]
async fn e2e_chat_forwards_messages_unmodified() {
    let mock = std::sync::Arc::new(MockCompletion::replying("ok"));
    let gateway: std::sync::Arc<dyn parley::Gateway> =
        std::sync::Arc::new(parley::CompletionGateway::new(mock.clone()));
    let (url, _server) = common::spawn_server(gateway, false).await;

    let body = r#"{"messages":[{"role":"user","content":"a"},{"role":"assistant","content":"b"},{"role":"user","content":"c"}]}"#;
    let (status, _) = common::post_chat(&url, body).await;
    assert_eq!(status, 200);
    assert_eq!(
        mock.calls(),
        vec![vec![
            parley::ChatMessage::user("a"),
            parley::ChatMessage::assistant("b"),
            parley::ChatMessage::user("c"),
        ]]
    );
}
