//! The session's HTTP gateway against the real route.

use std::sync::Arc;

use parley::{
    ChatSession, Gateway, GatewayError, HttpGateway, MockCompletion, Role, FALLBACK_TEXT,
};

use super::common;

#[tokio::test]
async fn e2e_http_gateway_round_trip() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("Hi there")), false)
            .await;
    let gateway = HttpGateway::new(&url);
    let reply = gateway
        .complete(&[parley::ChatMessage::user("Hello")])
        .await
        .unwrap();
    assert_eq!(reply, "Hi there");
}

#[tokio::test]
async fn e2e_http_gateway_surfaces_500_details() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::failing("quota")), false).await;
    let err = HttpGateway::new(&url)
        .complete(&[parley::ChatMessage::user("Hello")])
        .await
        .unwrap_err();
    match err {
        GatewayError::Status { status, details } => {
            assert_eq!(status, 500);
            assert!(details.contains("quota"));
        }
        other => panic!("expected Status, got {:?}", other),
    }
}

#[tokio::test]
async fn e2e_session_over_http() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("Hi there")), false)
            .await;
    let mut session = ChatSession::new(Arc::new(HttpGateway::new(&url)));
    session.mount().await;
    session.send("Hello").await;
    let last = session.messages().last().unwrap();
    assert_eq!((last.role, last.content.as_str()), (Role::Assistant, "Hi there"));
}

#[tokio::test]
async fn e2e_session_over_http_falls_back() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::failing("down")), false).await;
    let mut session = ChatSession::new(Arc::new(HttpGateway::new(&url)));
    session.mount().await;
    session.send("Hello").await;
    assert_eq!(session.messages().len(), 3);
    assert_eq!(session.messages()[2].content, FALLBACK_TEXT);
}
