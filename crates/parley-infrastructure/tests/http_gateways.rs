//! Integration tests for the REST gateways against a mock backend.

use parley_core::auth::{AuthGateway, CredentialProvider};
use parley_core::error::ParleyError;
use parley_core::session::{ChatGateway, Message, Session};
use parley_infrastructure::{ApiClient, HttpAuthGateway, HttpChatGateway, SessionStorage};
use serde_json::json;
use std::sync::Arc;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn can_bind_localhost() -> bool {
    std::net::TcpListener::bind("127.0.0.1:0").is_ok()
}

async fn chat_gateway(server: &MockServer, token: Option<&str>) -> HttpChatGateway {
    let storage = SessionStorage::new();
    if let Some(token) = token {
        storage.save_credential(token.to_string()).await.unwrap();
    }
    HttpChatGateway::new(ApiClient::new(server.uri()), Arc::new(storage))
}

#[tokio::test]
async fn test_list_sessions_sends_bearer_and_reads_bare_array() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .and(header("authorization", "Bearer tok-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"_id": "a1", "title": "First"},
            {"_id": "b2", "title": "Second"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok-1")).await;
    let sessions = gateway.list_sessions().await.unwrap();

    assert_eq!(
        sessions,
        vec![Session::new("a1", "First"), Session::new("b2", "Second")]
    );
}

#[tokio::test]
async fn test_list_sessions_reads_wrapped_listing() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"chats": [{"_id": "a1", "title": "Only"}]})),
        )
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;

    assert_eq!(
        gateway.list_sessions().await.unwrap(),
        vec![Session::new("a1", "Only")]
    );
}

#[tokio::test]
async fn test_missing_token_fails_without_request() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(0)
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, None).await;
    let err = gateway.list_sessions().await.unwrap_err();

    assert_eq!(err, ParleyError::Unauthenticated);
}

#[tokio::test]
async fn test_unauthorized_status_maps_to_unauthenticated() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"message": "expired"})))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("stale")).await;

    assert!(gateway.list_sessions().await.unwrap_err().is_unauthenticated());
}

#[tokio::test]
async fn test_get_session_maps_bot_role() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats/a1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "_id": "a1",
            "title": "First",
            "messages": [
                {"role": "user", "text": "hi"},
                {"role": "bot", "text": "hello"}
            ]
        })))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let detail = gateway.get_session("a1").await.unwrap();

    assert_eq!(detail.id, "a1");
    assert_eq!(
        detail.messages,
        vec![Message::user("hi"), Message::assistant("hello")]
    );
}

#[tokio::test]
async fn test_missing_session_is_not_found() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/api/chats/gone"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({"message": "Chat not found"})))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let err = gateway.delete_session("gone").await.unwrap_err();

    assert_eq!(err, ParleyError::not_found("session", "gone"));
}

#[tokio::test]
async fn test_create_and_rename_send_title_body() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chats"))
        .and(body_json(json!({"title": "New Chat"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"_id": "c3", "title": "New Chat"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/chats/c3"))
        .and(body_json(json!({"title": "Plans for the weekend"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"_id": "c3"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let created = gateway.create_session("New Chat").await.unwrap();
    gateway
        .update_session_title(&created.id, "Plans for the weekend")
        .await
        .unwrap();

    assert_eq!(created, Session::new("c3", "New Chat"));
}

#[tokio::test]
async fn test_send_chat_message_posts_chat_id() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"message": "hello", "chatId": "a1"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"reply": "Hi there"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let reply = gateway.send_chat_message("a1", "hello").await.unwrap();

    assert_eq!(reply.reply, "Hi there");
}

#[tokio::test]
async fn test_missing_reply_field_is_empty() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;

    assert_eq!(gateway.send_chat_message("a1", "hello").await.unwrap().reply, "");
}

#[tokio::test]
async fn test_server_error_carries_backend_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({"message": "model offline"})))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let err = gateway.send_chat_message("a1", "hello").await.unwrap_err();

    assert_eq!(err, ParleyError::server(500, "model offline"));
    assert!(err.is_gateway_failure());
}

#[tokio::test]
async fn test_undecodable_body_is_serialization_error() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/chats"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
        .mount(&server)
        .await;

    let gateway = chat_gateway(&server, Some("tok")).await;
    let err = gateway.list_sessions().await.unwrap_err();

    assert!(matches!(err, ParleyError::Serialization { .. }));
}

#[tokio::test]
async fn test_login_returns_token() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .and(body_json(json!({"userId": "alice", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "jwt-123"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAuthGateway::new(ApiClient::new(server.uri()));

    assert_eq!(gateway.login("alice", "secret").await.unwrap(), "jwt-123");
}

#[tokio::test]
async fn test_rejected_login_surfaces_backend_message() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/login"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"message": "Invalid credentials"})),
        )
        .mount(&server)
        .await;

    let gateway = HttpAuthGateway::new(ApiClient::new(server.uri()));
    let err = gateway.login("alice", "wrong").await.unwrap_err();

    assert_eq!(err.user_message(), "Invalid credentials");
    assert!(!err.is_unauthenticated());
}

#[tokio::test]
async fn test_register_posts_credentials() {
    if !can_bind_localhost() {
        eprintln!("Skipping: cannot bind localhost TCP port in this environment.");
        return;
    }
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/users/register"))
        .and(body_json(json!({"userId": "bob", "password": "pw"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({"message": "ok"})))
        .expect(1)
        .mount(&server)
        .await;

    let gateway = HttpAuthGateway::new(ApiClient::new(server.uri()));

    gateway.register("bob", "pw").await.unwrap();
}
