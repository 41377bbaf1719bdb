//! Unit tests for the JSON-RPC method handler.
//!
//! Drives the full client surface through `handle_method` against a
//! wiremock backend: session flow, form editing and submission, history
//! retrieval, settings, and page rendering.

use std::sync::Mutex;

use reposcout::app::App;
use reposcout::rpc_handler::handle_method;
use serde_json::json;
use tempfile::TempDir;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn setup(server_uri: &str) -> (TempDir, Mutex<App>) {
    let dir = TempDir::new().unwrap();
    let settings_path = dir.path().join("settings.json");
    std::fs::write(
        &settings_path,
        json!({
            "backend": {"api_base_url": server_uri, "request_timeout_secs": 5},
            "display": {"max_topics_per_card": 7}
        })
        .to_string(),
    )
    .unwrap();

    let app = App::with_settings_path(
        ":memory:",
        Some(settings_path.to_string_lossy().to_string()),
    )
    .unwrap();
    (dir, Mutex::new(app))
}

fn offline() -> (TempDir, Mutex<App>) {
    setup("http://127.0.0.1:1")
}

#[tokio::test]
async fn test_ping() {
    let (_dir, app) = offline();
    let result = handle_method(&app, "ping", &json!({})).await.unwrap();
    assert_eq!(result, json!({"pong": true}));
}

#[tokio::test]
async fn test_unknown_method() {
    let (_dir, app) = offline();
    let err = handle_method(&app, "no.such.method", &json!({}))
        .await
        .unwrap_err();
    assert!(err.contains("unknown method"));
}

#[tokio::test]
async fn test_session_status_initially_unauthenticated() {
    let (_dir, app) = offline();
    let result = handle_method(&app, "session.status", &json!({})).await.unwrap();
    assert_eq!(result["state"], "unauthenticated");
}

#[tokio::test]
async fn test_session_login_url_uses_configured_backend() {
    let (_dir, app) = offline();
    let result = handle_method(&app, "session.login_url", &json!({}))
        .await
        .unwrap();
    let url = Url::parse(result["url"].as_str().unwrap()).unwrap();
    assert_eq!(url.path(), "/github-login");
}

#[tokio::test]
async fn test_session_callback_accepted_authenticates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": "octocat"})),
        )
        .mount(&server)
        .await;

    let (_dir, app) = setup(&server.uri());
    let result = handle_method(
        &app,
        "session.callback",
        &json!({"query": "authenticated=true&jwt=abc123"}),
    )
    .await
    .unwrap();

    assert_eq!(result["accepted"], true);
    assert_eq!(result["session"]["state"], "authenticated");
    assert_eq!(result["session"]["profile"]["username"], "octocat");

    let stored = handle_method(&app, "debug.has_token", &json!({})).await.unwrap();
    assert_eq!(stored["has_token"], true);
}

#[tokio::test]
async fn test_session_callback_rejected() {
    let (_dir, app) = offline();
    let result = handle_method(
        &app,
        "session.callback",
        &json!({"query": "authenticated=false"}),
    )
    .await
    .unwrap();

    assert_eq!(result["accepted"], false);
    assert_eq!(result["session"]["state"], "unauthenticated");

    let stored = handle_method(&app, "debug.has_token", &json!({})).await.unwrap();
    assert_eq!(stored["has_token"], false);
}

#[tokio::test]
async fn test_session_route_guard() {
    let (_dir, app) = offline();
    let result = handle_method(&app, "session.route", &json!({"path": "/recommender"}))
        .await
        .unwrap();
    assert_eq!(result["path"], "/login");
}

#[tokio::test]
async fn test_form_editing_round() {
    let (_dir, app) = offline();

    handle_method(&app, "form.set_username", &json!({"value": "octocat"}))
        .await
        .unwrap();

    let result = handle_method(
        &app,
        "form.set_language_input",
        &json!({"value": "rust,go"}),
    )
    .await
    .unwrap();
    assert_eq!(result["languages"], json!(["rust", "go"]));
    assert_eq!(result["input"], "");

    handle_method(&app, "form.set_topic_input", &json!({"value": "cli"}))
        .await
        .unwrap();
    let result = handle_method(&app, "form.commit_topic", &json!({})).await.unwrap();
    assert_eq!(result["topics"], json!(["cli"]));

    let result = handle_method(&app, "form.remove_language", &json!({"value": "go"}))
        .await
        .unwrap();
    assert_eq!(result["languages"], json!(["rust"]));

    let state = handle_method(&app, "form.state", &json!({})).await.unwrap();
    assert_eq!(state["username"], "octocat");
    assert_eq!(state["submitting"], false);
}

#[tokio::test]
async fn test_form_submit_requires_authentication() {
    let (_dir, app) = offline();
    handle_method(&app, "form.set_username", &json!({"value": "octocat"}))
        .await
        .unwrap();

    let err = handle_method(&app, "form.submit", &json!({})).await.unwrap_err();
    assert!(err.contains("Sign in with GitHub"));
}

#[tokio::test]
async fn test_anonymous_submit_returns_recommendations() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations_without_github/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "recommendations": [
                {"full_name": "rust-lang/rust", "stargazers_count": 89500},
                {"full_name": "tokio-rs/tokio", "stargazers_count": 25000}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, app) = setup(&server.uri());
    handle_method(&app, "form.set_username", &json!({"value": "octocat"}))
        .await
        .unwrap();

    let result = handle_method(&app, "form.submit_anonymous", &json!({}))
        .await
        .unwrap();
    assert_eq!(result["outcome"], "recommendations");
    assert_eq!(result["recommendations"].as_array().unwrap().len(), 2);

    // Render the returned set: exactly two cards.
    let page = handle_method(
        &app,
        "page.recommendations",
        &json!({"recommendations": result["recommendations"]}),
    )
    .await
    .unwrap();
    let html = page["html"].as_str().unwrap();
    assert_eq!(html.matches("repo-card").count(), 2);
}

#[tokio::test]
async fn test_anonymous_submit_daily_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations_without_github/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Reached your daily limit"
        })))
        .mount(&server)
        .await;

    let (_dir, app) = setup(&server.uri());
    handle_method(&app, "form.set_username", &json!({"value": "octocat"}))
        .await
        .unwrap();

    let result = handle_method(&app, "form.submit_anonymous", &json!({}))
        .await
        .unwrap();
    assert_eq!(result["outcome"], "daily_limit");
    assert_eq!(
        result["message"],
        "You have reached your daily limit. Please try again tomorrow."
    );
}

#[tokio::test]
async fn test_history_requires_authentication() {
    let (_dir, app) = offline();
    let err = handle_method(&app, "history.ids", &json!({})).await.unwrap_err();
    assert!(err.contains("not authenticated"));
}

#[tokio::test]
async fn test_authenticated_history_flow() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": "octocat"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user-recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"recommendation_id": "rec-1"}
        ])))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommendation/rec-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recommendations": [
                {"full_name": "older/repo"},
                {"full_name": "newer/repo"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let (_dir, app) = setup(&server.uri());
    handle_method(
        &app,
        "session.callback",
        &json!({"query": "authenticated=true&jwt=abc123"}),
    )
    .await
    .unwrap();

    let ids = handle_method(&app, "history.ids", &json!({})).await.unwrap();
    assert_eq!(ids["ids"], json!(["rec-1"]));

    let selected = handle_method(&app, "history.select", &json!({"id": "rec-1"}))
        .await
        .unwrap();
    assert_eq!(selected["id"], "rec-1");
    // Newest first.
    assert_eq!(selected["recommendations"][0]["full_name"], "newer/repo");

    // A second select is served from the cache; expect(1) above verifies
    // no further request reaches the server.
    let again = handle_method(&app, "history.select", &json!({"id": "rec-1"}))
        .await
        .unwrap();
    assert_eq!(again, selected);
}

#[tokio::test]
async fn test_empty_history_renders_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify-token"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"username": "octocat"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/user-recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let (_dir, app) = setup(&server.uri());
    handle_method(
        &app,
        "session.callback",
        &json!({"query": "authenticated=true&jwt=abc123"}),
    )
    .await
    .unwrap();

    let ids = handle_method(&app, "history.ids", &json!({})).await.unwrap();
    assert_eq!(ids["ids"], json!([]));

    let page = handle_method(&app, "page.history", &json!({})).await.unwrap();
    let html = page["html"].as_str().unwrap();
    assert!(html.contains("No recommendations yet"));
    assert!(!html.contains("Error"));
}

#[tokio::test]
async fn test_settings_get_and_set() {
    let (_dir, app) = offline();

    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["display"]["max_topics_per_card"], 7);

    handle_method(
        &app,
        "settings.set",
        &json!({"key": "display.max_topics_per_card", "value": 4}),
    )
    .await
    .unwrap();

    let settings = handle_method(&app, "settings.get", &json!({})).await.unwrap();
    assert_eq!(settings["display"]["max_topics_per_card"], 4);
}

#[tokio::test]
async fn test_page_login_renders() {
    let (_dir, app) = offline();
    let page = handle_method(&app, "page.login", &json!({})).await.unwrap();
    assert!(page["html"].as_str().unwrap().contains("Connect Your GitHub"));
}

#[tokio::test]
async fn test_page_recommendations_empty_set() {
    let (_dir, app) = offline();
    let page = handle_method(&app, "page.recommendations", &json!({"recommendations": []}))
        .await
        .unwrap();
    assert!(page["html"]
        .as_str()
        .unwrap()
        .contains("No recommendations available"));
}
