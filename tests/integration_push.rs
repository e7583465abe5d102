#![allow(clippy::unwrap_used, clippy::panic, clippy::missing_panics_doc, clippy::must_use_candidate, unreachable_pub)]
use axum::http::StatusCode;
use pwa_push_server::adapters::push::PushError;
use pwa_push_server::config::{Environment, VapidConfig};
use pwa_push_server::domain::payload::DEFAULT_BODY;
use pwa_push_server::domain::subscription::{StoredSubscription, SubscriptionKeys};
use serde_json::json;
mod common;

use common::{TestApp, valid_subscription};

fn expected_subscription() -> StoredSubscription {
    StoredSubscription {
        endpoint: "https://push.example/abc".into(),
        expiration_time: None,
        keys: SubscriptionKeys { p256dh: "p1".into(), auth: "a1".into() },
    }
}

#[tokio::test]
async fn test_subscribe_then_send() {
    let app = TestApp::spawn().await;

    let resp = app.subscribe(valid_subscription()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("pwa-subscription="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("SameSite=Lax"));
    assert!(set_cookie.contains("Path=/"));
    assert!(set_cookie.contains("Max-Age=2592000"));
    assert!(!set_cookie.contains("Secure"));

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    let resp = app.send_notification("Hello from the test").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], true);

    let sent = app.provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subscription, expected_subscription());
    assert_eq!(sent[0].subject, "mailto:tests@example.com");
    assert_eq!(
        sent[0].payload,
        json!({
            "title": "PWA Push Starter",
            "body": "Hello from the test",
            "icon": "/icon-192x192.png",
            "badge": "/badge-72x72.png",
            "url": "/"
        })
    );
}

#[tokio::test]
async fn test_subscribe_drops_extra_fields_and_keeps_expiration() {
    let app = TestApp::spawn().await;

    let resp = app
        .subscribe(json!({
            "endpoint": "https://push.example/abc",
            "expirationTime": 1_700_000_000_000_u64,
            "keys": { "p256dh": "p1", "auth": "a1", "extra": "ignored" },
            "unrelated": true
        }))
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    app.send_notification("hi").await;

    let sent = app.provider.sent();
    assert_eq!(sent[0].subscription.expiration_time, Some(1_700_000_000_000.0));
    assert_eq!(sent[0].subscription.keys, SubscriptionKeys { p256dh: "p1".into(), auth: "a1".into() });
}

#[tokio::test]
async fn test_subscribe_rejects_incomplete_payloads() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({ "endpoint": "https://push.example/abc" }),
        json!({ "endpoint": "", "keys": { "p256dh": "p1", "auth": "a1" } }),
        json!({ "endpoint": "https://push.example/abc", "keys": { "p256dh": "p1" } }),
        json!({ "endpoint": "https://push.example/abc", "keys": { "p256dh": "", "auth": "a1" } }),
    ];

    for case in cases {
        let resp = app.subscribe(case).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
        assert!(resp.headers().get("set-cookie").is_none());

        let body: serde_json::Value = resp.json().await.unwrap();
        assert_eq!(body, json!({ "success": false, "error": "Invalid push subscription payload." }));
    }

    let resp = app
        .client
        .post(format!("{}/api/push/subscription", app.server_url))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    // Nothing was stored along the way.
    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_resubscribe_overwrites_previous_subscription() {
    let app = TestApp::spawn().await;

    app.subscribe(valid_subscription()).await;
    app.subscribe(json!({
        "endpoint": "https://push.example/second",
        "keys": { "p256dh": "p2", "auth": "a2" }
    }))
    .await;

    app.send_notification("hi").await;

    let sent = app.provider.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].subscription.endpoint, "https://push.example/second");
}

#[tokio::test]
async fn test_unsubscribe_is_idempotent() {
    let app = TestApp::spawn().await;

    let resp = app.unsubscribe().await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": true }));

    app.subscribe(valid_subscription()).await;
    assert_eq!(app.unsubscribe().await.status(), StatusCode::OK);
    assert_eq!(app.unsubscribe().await.status(), StatusCode::OK);

    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(app.provider.sent().is_empty());
}

#[tokio::test]
async fn test_send_without_subscription() {
    let app = TestApp::spawn().await;

    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body, json!({ "success": false, "error": "No push subscription found. Subscribe first." }));
}

#[tokio::test]
async fn test_send_without_vapid_is_a_setup_error() {
    let mut config = common::get_test_config();
    config.vapid = VapidConfig::default();
    let app = TestApp::spawn_with_config(config).await;

    app.subscribe(valid_subscription()).await;
    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(
        body["error"],
        "Missing VAPID env vars. Add VAPID_PUBLIC_KEY, VAPID_PRIVATE_KEY, and VAPID_SUBJECT."
    );
    assert!(app.provider.sent().is_empty());
}

#[tokio::test]
async fn test_missing_subscription_is_reported_before_setup() {
    let mut config = common::get_test_config();
    config.vapid = VapidConfig::default();
    let app = TestApp::spawn_with_config(config).await;

    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_blank_message_uses_default_body() {
    let app = TestApp::spawn().await;
    app.subscribe(valid_subscription()).await;

    app.send_notification("   ").await;
    let resp = app
        .client
        .post(format!("{}/api/push/notifications", app.server_url))
        .json(&json!({}))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let sent = app.provider.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|push| push.payload["body"] == DEFAULT_BODY));
}

#[tokio::test]
async fn test_rejected_delivery_keeps_subscription() {
    let app = TestApp::spawn().await;
    app.subscribe(valid_subscription()).await;

    app.provider.fail_next(PushError::Rejected { status: 403, body: "bad jwt".into() });
    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(
        body,
        json!({
            "success": false,
            "error": "Failed to send notification. Verify your VAPID keys and browser permissions."
        })
    );

    let resp = app.send_notification("again").await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_gone_subscription_is_forgotten() {
    let app = TestApp::spawn().await;
    app.subscribe(valid_subscription()).await;

    app.provider.fail_next(PushError::Gone(410));
    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);

    let set_cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap().to_string();
    assert!(set_cookie.starts_with("pwa-subscription="));
    assert!(set_cookie.contains("Max-Age=0"));

    let resp = app.send_notification("hi").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.provider.sent().len(), 1);
}

#[tokio::test]
async fn test_production_cookie_is_secure() {
    let mut config = common::get_test_config();
    config.server.environment = Environment::Production;
    let app = TestApp::spawn_with_config(config).await;

    let resp = app.subscribe(valid_subscription()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let set_cookie = resp.headers().get("set-cookie").unwrap().to_str().unwrap();
    assert!(set_cookie.contains("Secure"));
}

#[tokio::test]
async fn test_push_config_exposes_public_key() {
    let app = TestApp::spawn().await;

    let resp = app.client.get(format!("{}/api/push/config", app.server_url)).send().await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["publicKey"], app.config.vapid.public_key.clone().unwrap());

    let mut config = common::get_test_config();
    config.vapid = VapidConfig::default();
    let app = TestApp::spawn_with_config(config).await;

    let resp = app.client.get(format!("{}/api/push/config", app.server_url)).send().await.unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["publicKey"], serde_json::Value::Null);
}

#[tokio::test]
async fn test_api_responses_carry_request_id() {
    let app = TestApp::spawn().await;

    let resp = app.unsubscribe().await;
    assert!(resp.headers().get("x-request-id").is_some());

    let resp = app
        .client
        .delete(format!("{}/api/push/subscription", app.server_url))
        .header("x-request-id", "caller-supplied")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.headers().get("x-request-id").unwrap(), "caller-supplied");
}
