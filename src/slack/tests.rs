use super::*;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> SlackClient {
    SlackClient::with_base_url("xoxb-test".to_string(), server.uri())
}

#[tokio::test]
async fn test_post_message_returns_ts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(body_string_contains("token=xoxb-test"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "ts": "1700.42"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let ts = test_client(&server)
        .post_message("C1", "hello")
        .await
        .unwrap();
    assert_eq!(ts, "1700.42");
}

#[tokio::test]
async fn test_post_in_thread_sends_thread_ts() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .and(body_string_contains("thread_ts=1699.1"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": true, "ts": "1700.43"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .post_in_thread("C1", "1699.1", "reply")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_api_error_is_surfaced() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat.postMessage"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"ok": false, "error": "channel_not_found"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .post_message("C1", "hello")
        .await
        .unwrap_err();
    assert!(err.to_string().contains("channel_not_found"));
}

#[tokio::test]
async fn test_fetch_message_parses_text_and_thread() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations.replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true,
            "messages": [{"text": "breaking news", "ts": "1.0", "thread_ts": "0.9"}]
        })))
        .mount(&server)
        .await;

    let msg = test_client(&server)
        .fetch_message("C1", "1.0")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(msg.text, "breaking news");
    assert_eq!(msg.thread_ts.as_deref(), Some("0.9"));
}

#[tokio::test]
async fn test_fetch_message_none_when_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations.replies"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true, "messages": []})))
        .mount(&server)
        .await;

    let msg = test_client(&server).fetch_message("C1", "1.0").await.unwrap();
    assert!(msg.is_none());
}

#[tokio::test]
async fn test_fetch_message_error_includes_invite_hint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/conversations.replies"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"ok": false, "error": "not_in_channel"})),
        )
        .mount(&server)
        .await;

    let err = test_client(&server)
        .fetch_message("C1", "1.0")
        .await
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("not_in_channel"), "error: {}", msg);
    assert!(msg.contains("invite"), "error: {}", msg);
}

#[tokio::test]
async fn test_open_view_serializes_view() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/views.open"))
        .and(body_string_contains("trigger_id=tr-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"ok": true})))
        .expect(1)
        .mount(&server)
        .await;

    test_client(&server)
        .open_view("tr-1", &json!({"type": "modal"}))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_auth_test_returns_identity() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth.test"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ok": true, "user": "otterbot", "user_id": "UBOT"
        })))
        .mount(&server)
        .await;

    let (user, user_id) = test_client(&server).auth_test().await.unwrap();
    assert_eq!(user, "otterbot");
    assert_eq!(user_id, "UBOT");
}

#[test]
fn test_format_for_slack_bold() {
    assert_eq!(SlackClient::format_for_slack("**bold**"), "*bold*");
}

#[test]
fn test_format_for_slack_strike() {
    assert_eq!(SlackClient::format_for_slack("~~gone~~"), "~gone~");
}

#[test]
fn test_format_for_slack_link() {
    assert_eq!(
        SlackClient::format_for_slack("[Example](http://example.com)"),
        "<http://example.com|Example>"
    );
}

#[test]
fn test_format_for_slack_empty() {
    assert_eq!(SlackClient::format_for_slack(""), "");
}
