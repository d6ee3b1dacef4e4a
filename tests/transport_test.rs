use httpmock::prelude::*;
use httpsql::{ClientConfig, ClientError, ErrorKind, Payload, Transport};
use reqwest::Method;
use serde_json::json;
use std::time::Duration;

fn transport(server: &MockServer) -> Transport {
    Transport::new(&ClientConfig::new(server.base_url())).unwrap()
}

#[tokio::test]
async fn test_error_statuses_map_to_kinds() {
    let server = MockServer::start_async().await;
    let cases = [
        (400, "bad shape", ErrorKind::Malformed),
        (401, "who are you", ErrorKind::Unauthorized),
        (404, "nothing here", ErrorKind::NotFound),
        (500, "boom", ErrorKind::Internal),
        (502, "bad gateway", ErrorKind::Internal),
    ];
    for (status, body, _) in cases {
        server
            .mock_async(|when, then| {
                when.method(GET).path(format!("/status/{}", status));
                then.status(status).body(body);
            })
            .await;
    }

    let t = transport(&server);
    for (status, body, kind) in cases {
        let err = t
            .send(Method::GET, &format!("status/{}", status), None)
            .await
            .unwrap_err();
        assert_eq!(err.kind(), kind, "status {}", status);
        assert_eq!(err.body(), Some(body));
    }
}

#[tokio::test]
async fn test_json_and_text_bodies() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/json");
            then.status(200).json_body(json!({"ok": true}));
        })
        .await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/text");
            then.status(200).body("<html>not json</html>");
        })
        .await;

    let t = transport(&server);
    let json = t.send(Method::GET, "json", None).await.unwrap();
    assert_eq!(json, Payload::Json(json!({"ok": true})));
    let text = t.send(Method::GET, "/text", None).await.unwrap();
    assert_eq!(text, Payload::Text("<html>not json</html>".into()));
}

#[tokio::test]
async fn test_absent_body_is_sent_as_empty_json_string() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(DELETE).path("/collection/users/7").body("\"\"");
            then.status(200).body("");
        })
        .await;

    let ack = transport(&server)
        .send(Method::DELETE, "collection/users/7", None)
        .await
        .unwrap();

    assert_eq!(ack, Payload::Text(String::new()));
    mock.assert_async().await;
}

#[tokio::test]
async fn test_falsy_body_is_sent_as_empty_json_string() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/collection/users/7/").body("\"\"");
            then.status(200).json_body(json!({"updated": 0}));
        })
        .await;

    transport(&server)
        .send(Method::POST, "collection/users/7/", Some(&json!({})))
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_basic_auth_when_both_credentials_set() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/function/")
                .header("Authorization", "Basic YWRtaW46c2VjcmV0");
            then.status(200).json_body(json!({}));
        })
        .await;

    let config = ClientConfig::new(server.base_url()).with_credentials("admin", "secret");
    Transport::new(&config)
        .unwrap()
        .send(Method::GET, "function/", None)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_no_auth_with_partial_credentials() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(GET).path("/function/").header_missing("Authorization");
            then.status(200).json_body(json!({}));
        })
        .await;

    let config = ClientConfig::new(server.base_url()).with_credentials("admin", "");
    Transport::new(&config)
        .unwrap()
        .send(Method::GET, "function/", None)
        .await
        .unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_server_is_a_transport_error() {
    let t = Transport::new(&ClientConfig::new("http://127.0.0.1:1")).unwrap();

    let err = t.send(Method::GET, "collection/", None).await.unwrap_err();

    assert!(matches!(err, ClientError::Transport(_)));
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.body(), None);
}

#[tokio::test]
async fn test_timeout_is_a_transport_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/slow");
            then.status(200).delay(Duration::from_millis(500)).body("late");
        })
        .await;

    let config =
        ClientConfig::new(server.base_url()).with_timeout(Some(Duration::from_millis(50)));
    let err = Transport::new(&config)
        .unwrap()
        .send(Method::GET, "slow", None)
        .await
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Transport);
}
