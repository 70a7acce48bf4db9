use std::sync::Arc;

use httpmock::Method::POST;
use httpmock::MockServer;
use serde_json::{Map, Value};

use client::{BoundClient, ClientError, Message, OllamaClient, Prompter};
use registry::{RoleEntry, RoleRegistry, RoleTable};

fn client_for(server: &MockServer) -> OllamaClient {
    let table = RoleTable::from_entries(vec![RoleEntry::new("alpha", u32::from(server.port()), "m1")]).unwrap();
    OllamaClient::new(RoleRegistry::new(server.host(), table))
}

#[tokio::test]
async fn generate_returns_response_text() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body_partial(r#"{"model": "m1", "prompt": "hi", "stream": false}"#);
        then.status(200)
            .json_body(serde_json::json!({"response": "hello there", "done": true}));
    });

    let client = client_for(&server);
    let out = client.generate("alpha", "hi", Map::new()).await;
    mock.assert();
    assert_eq!(out.as_deref(), Some("hello there"));
}

#[tokio::test]
async fn generate_merges_extra_options_into_body() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/generate")
            .json_body_partial(r#"{"temperature": 0.0, "system": "be terse"}"#);
        then.status(200).json_body(serde_json::json!({"response": "ok"}));
    });

    let mut options = Map::new();
    options.insert("temperature".into(), Value::from(0.0));
    options.insert("system".into(), Value::from("be terse"));

    let client = client_for(&server);
    let out = client.generate("alpha", "hi", options).await;
    mock.assert();
    assert_eq!(out.as_deref(), Some("ok"));
}

#[tokio::test]
async fn generate_none_on_server_error() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(500);
    });

    let client = client_for(&server);
    assert_eq!(client.generate("alpha", "hi", Map::new()).await, None);
    assert!(matches!(
        client.try_generate("alpha", "hi", Map::new()).await,
        Err(ClientError::BadStatus(500))
    ));
}

#[tokio::test]
async fn generate_unknown_role_makes_no_request() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200).json_body(serde_json::json!({"response": "ok"}));
    });

    let client = client_for(&server);
    assert_eq!(client.generate("gamma", "hi", Map::new()).await, None);
    assert!(matches!(
        client.try_generate("gamma", "hi", Map::new()).await,
        Err(ClientError::UnknownRole(_))
    ));
    assert_eq!(mock.hits(), 0);
}

#[tokio::test]
async fn chat_extracts_nested_message_content() {
    let server = MockServer::start_async().await;
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path("/api/chat")
            .json_body_partial(r#"{"model": "m1", "stream": false}"#);
        then.status(200).json_body(serde_json::json!({
            "model": "m1",
            "message": {"role": "assistant", "content": "sure"},
            "done": true
        }));
    });

    let client = client_for(&server);
    let out = client
        .chat("alpha", vec![Message::user("help me out")])
        .await;
    mock.assert();
    assert_eq!(out.as_deref(), Some("sure"));
}

#[tokio::test]
async fn chat_none_on_malformed_body() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/chat");
        then.status(200).body("not json");
    });

    let client = client_for(&server);
    assert_eq!(client.chat("alpha", vec![Message::user("hi")]).await, None);
}

#[tokio::test]
async fn bound_client_invokes_with_empty_fallback() {
    let server = MockServer::start_async().await;
    server.mock(|when, then| {
        when.method(POST).path("/api/generate");
        then.status(200)
            .json_body(serde_json::json!({"response": "bound"}));
    });

    let client = Arc::new(client_for(&server));
    let bound = BoundClient::new(client.clone(), "alpha");
    assert_eq!(bound.invoke("hi").await, "bound");
    assert_eq!(bound.model().as_deref(), Some("m1"));

    let missing = BoundClient::new(client, "gamma");
    assert_eq!(missing.invoke("hi").await, "");
    assert_eq!(missing.model(), None);
}
