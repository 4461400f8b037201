/// Integration tests for the upstream HTTP client
///
/// Verifies response handling against a mock HTTP server:
/// - Successful array payloads
/// - Non-success status codes
/// - Non-array and malformed JSON bodies
/// - Connection failures
use mockito::Server;
use serde_json::json;

use vps_data::{GamesSource, HttpGamesSource, UpstreamError};

const DB_PATH: &str = "/vps-db/db/vpsdb.json";

#[tokio::test]
async fn test_fetch_success_with_mock() {
    let mut server = Server::new_async().await;
    let body = json!([
        {"name": "Medieval Madness", "tableFiles": [{"id": "mm-vpx"}]},
        {"name": "Twilight Zone"}
    ]);
    let mock = server
        .mock("GET", DB_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(1)
        .create_async()
        .await;

    let client = HttpGamesSource::new(format!("{}{DB_PATH}", server.url())).expect("Failed to create client");
    let games = client.fetch().await.expect("fetch succeeds");

    assert_eq!(games.len(), 2);
    assert_eq!(games[0]["name"], "Medieval Madness");
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_non_success_status() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", DB_PATH)
        .with_status(502)
        .with_body("bad gateway")
        .expect(1)
        .create_async()
        .await;

    let client = HttpGamesSource::new(format!("{}{DB_PATH}", server.url())).unwrap();
    let err = client.fetch().await.unwrap_err();

    match err {
        UpstreamError::Status(status) => assert_eq!(status.as_u16(), 502),
        other => panic!("Expected Status error, got {other:?}"),
    }
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_object_is_not_a_sequence() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", DB_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"games": []}"#)
        .create_async()
        .await;

    let client = HttpGamesSource::new(format!("{}{DB_PATH}", server.url())).unwrap();
    assert!(matches!(client.fetch().await, Err(UpstreamError::NotASequence)));
}

#[tokio::test]
async fn test_fetch_malformed_json() {
    let mut server = Server::new_async().await;
    server
        .mock("GET", DB_PATH)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body("[{\"name\": ")
        .create_async()
        .await;

    let client = HttpGamesSource::new(format!("{}{DB_PATH}", server.url())).unwrap();
    assert!(matches!(client.fetch().await, Err(UpstreamError::Decode(_))));
}

#[tokio::test]
async fn test_fetch_does_not_retry() {
    let mut server = Server::new_async().await;
    let mock = server
        .mock("GET", DB_PATH)
        .with_status(503)
        .expect(1)
        .create_async()
        .await;

    let client = HttpGamesSource::new(format!("{}{DB_PATH}", server.url())).unwrap();
    assert!(client.fetch().await.is_err());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_fetch_connection_refused() {
    // Port 1 is reserved and not listening
    let client = HttpGamesSource::new("http://127.0.0.1:1/vpsdb.json").unwrap();
    assert!(matches!(client.fetch().await, Err(UpstreamError::Network(_))));
}
