use parley::MockCompletion;

use super::common;

#[tokio::test]
async fn e2e_health() {
    let (url, _server) =
        common::spawn_server(common::mock_gateway(MockCompletion::replying("x")), false).await;
    let response = reqwest::get(format!("{}/health", url)).await.unwrap();
    assert_eq!(response.status().as_u16(), 200);
    assert_eq!(response.text().await.unwrap(), "ok");
}
