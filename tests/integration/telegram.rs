//! Integration tests for the Telegram client and chat commands
//!
//! The Bot API is replaced by a wiremock server; market data comes from
//! the shared in-process fakes.

#[path = "test_utils.rs"]
mod test_utils;

use std::sync::Arc;

use confluence_signals::services::notifier::{Notifier, NotifyError};
use confluence_signals::services::subscribers::SubscriberStore;
use confluence_signals::services::telegram::{
    Command, CommandHandler, CommandPoller, TelegramClient,
};
use serde_json::{json, Value};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use test_utils::{sample_market, RecordingNotifier, TestScanner};

const TOKEN: &str = "123456:TEST";

fn client_for(server: &MockServer) -> TelegramClient {
    TelegramClient::with_client(server.uri(), TOKEN, reqwest::Client::new())
}

fn ok_message() -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "ok": true,
        "result": { "message_id": 1, "chat": { "id": 42 }, "text": "hi" }
    }))
}

fn handler_for(app: &TestScanner) -> CommandHandler {
    CommandHandler::new(app.store.clone(), app.scanner.clone())
}

#[tokio::test]
async fn send_message_posts_markdown() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .and(body_partial_json(json!({
            "chat_id": 42,
            "text": "*hello*",
            "parse_mode": "Markdown"
        })))
        .respond_with(ok_message())
        .expect(1)
        .mount(&server)
        .await;

    client_for(&server).send(42, "*hello*").await.unwrap();
}

#[tokio::test]
async fn rejected_message_surfaces_description() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ResponseTemplate::new(403).set_body_json(json!({
            "ok": false,
            "error_code": 403,
            "description": "Forbidden: bot was blocked by the user"
        })))
        .mount(&server)
        .await;

    let err = client_for(&server).send_message(42, "hi").await.unwrap_err();
    match err {
        NotifyError::Rejected { code, description } => {
            assert_eq!(code, 403);
            assert!(description.contains("blocked"));
        }
        other => panic!("expected rejection, got {:?}", other),
    }
}

#[tokio::test]
async fn get_updates_decodes_messages() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/getUpdates", TOKEN)))
        .and(body_partial_json(json!({ "offset": 5, "timeout": 0 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                { "update_id": 5, "message": { "message_id": 9, "chat": { "id": 42 }, "text": "/status" } },
                { "update_id": 6 }
            ]
        })))
        .mount(&server)
        .await;

    let updates = client_for(&server).get_updates(5, 0).await.unwrap();
    assert_eq!(updates.len(), 2);
    let message = updates[0].message.as_ref().unwrap();
    assert_eq!(message.chat.id, 42);
    assert_eq!(message.text.as_deref(), Some("/status"));
    assert!(updates[1].message.is_none());
}

#[tokio::test]
async fn handler_manages_subscriptions() {
    let app = TestScanner::new(&["BTC/USDT"], sample_market(), RecordingNotifier::new());
    let handler = handler_for(&app);

    let reply = handler.handle(42, Command::Start).await;
    assert!(reply.contains("subscribed to trading signals"));
    let reply = handler.handle(42, Command::Start).await;
    assert!(reply.contains("already subscribed"));
    assert_eq!(app.metrics.subscribers.get(), 1);

    let reply = handler.handle(7, Command::Status).await;
    assert!(reply.contains("Current subscribers: 1"));

    let reply = handler.handle(42, Command::Stop).await;
    assert!(reply.contains("unsubscribed"));
    assert!(app.store.list().await.unwrap().is_empty());
    assert_eq!(app.metrics.subscribers.get(), 0);
}

#[tokio::test]
async fn handler_answers_check_and_help() {
    let app = TestScanner::new(&["BTC/USDT"], sample_market(), RecordingNotifier::new());
    let handler = handler_for(&app);

    let reply = handler.handle(1, Command::Check(None)).await;
    assert_eq!(reply, "Usage: /check BTC/USDT");

    let reply = handler
        .handle(1, Command::Check(Some("BTC/USDT".to_string())))
        .await;
    assert!(reply.contains("🔍 *BTC/USDT*"));

    let reply = handler
        .handle(1, Command::Check(Some("XYZ/USDT".to_string())))
        .await;
    assert!(reply.starts_with("⚠️ Could not load data for XYZ/USDT"));

    let reply = handler.handle(1, Command::Help).await;
    assert!(reply.contains("/check"));
}

#[tokio::test]
async fn poller_replies_to_commands_and_advances_offset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/getUpdates", TOKEN)))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "result": [
                { "update_id": 10, "message": { "message_id": 1, "chat": { "id": 42 }, "text": "/start" } },
                { "update_id": 11, "message": { "message_id": 2, "chat": { "id": 42 }, "text": "hello there" } },
                { "update_id": 12, "message": { "message_id": 3, "chat": { "id": 42 }, "text": "/status" } },
                { "update_id": 13 }
            ]
        })))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/sendMessage", TOKEN)))
        .respond_with(ok_message())
        .expect(2)
        .mount(&server)
        .await;

    let app = TestScanner::new(&["BTC/USDT"], sample_market(), RecordingNotifier::new());
    let poller = CommandPoller::new(Arc::new(client_for(&server)), handler_for(&app))
        .with_timing(0, std::time::Duration::ZERO);

    let next = poller.poll_once(0).await.unwrap();
    assert_eq!(next, 14);
    assert_eq!(app.store.list().await.unwrap(), vec![42]);

    let replies: Vec<String> = server
        .received_requests()
        .await
        .unwrap()
        .iter()
        .filter(|req| req.url.path().ends_with("/sendMessage"))
        .map(|req| {
            let body: Value = serde_json::from_slice(&req.body).unwrap();
            body["text"].as_str().unwrap_or_default().to_string()
        })
        .collect();
    assert_eq!(replies.len(), 2);
    assert!(replies[0].contains("subscribed"));
    assert!(replies[1].contains("Current subscribers: 1"));
}

#[tokio::test]
async fn poller_propagates_api_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/bot{}/getUpdates", TOKEN)))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "ok": false,
            "error_code": 401,
            "description": "Unauthorized"
        })))
        .mount(&server)
        .await;

    let app = TestScanner::new(&["BTC/USDT"], sample_market(), RecordingNotifier::new());
    let poller = CommandPoller::new(Arc::new(client_for(&server)), handler_for(&app));

    let err = poller.poll_once(3).await.unwrap_err();
    assert!(matches!(err, NotifyError::Rejected { code: 401, .. }));
}

#[tokio::test]
async fn check_failure_reply_escapes_markdown() {
    let app = TestScanner::new(&["BTC/USDT"], sample_market(), RecordingNotifier::new());
    let handler = handler_for(&app);

    let command = Command::parse("/check foo_bar").unwrap();
    let reply = handler.handle(1, command).await;

    assert!(reply.starts_with("⚠️ Could not load data for FOO\\_BAR: "));
    assert!(reply.contains("symbol FOO\\_BAR not found"));
    assert!(!reply.contains("FOO_BAR"));
}
