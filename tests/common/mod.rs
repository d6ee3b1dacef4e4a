#![allow(dead_code)]

use httpmock::prelude::*;
use httpmock::Mock;
use httpsql::{Client, ClientConfig};
use serde_json::Value;

pub fn client(server: &MockServer) -> Client {
    Client::new(&ClientConfig::new(server.base_url())).unwrap()
}

/// Serve `definition` from `GET /collection/`.
pub async fn mock_collections<'a>(server: &'a MockServer, definition: Value) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/collection/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(definition.clone());
        })
        .await
}

/// Serve `definition` from `GET /function/`.
pub async fn mock_functions<'a>(server: &'a MockServer, definition: Value) -> Mock<'a> {
    server
        .mock_async(|when, then| {
            when.method(GET).path("/function/");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(definition.clone());
        })
        .await
}
