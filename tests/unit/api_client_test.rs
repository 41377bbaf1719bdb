//! Unit tests for the API gateway client.
//!
//! Exercises each endpoint against a wiremock backend: success parsing,
//! the daily-limit body, auth failures, endpoint selection, and the
//! no-network-call validation guard.

use std::time::Duration;

use reposcout::services::api_client::ApiGatewayClient;
use reposcout::types::errors::ApiError;
use reposcout::types::recommendation::RecommendationRequest;
use url::Url;
use wiremock::matchers::{bearer_token, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client(server: &MockServer) -> ApiGatewayClient {
    ApiGatewayClient::new(Url::parse(&server.uri()).unwrap(), Duration::from_secs(5)).unwrap()
}

fn request(username: &str) -> RecommendationRequest {
    RecommendationRequest {
        username: username.to_string(),
        languages: vec!["rust".to_string()],
        extra_topics: vec![],
    }
}

#[test]
fn test_login_url_points_at_identity_entry() {
    let api = ApiGatewayClient::new(
        Url::parse("http://127.0.0.1:8000").unwrap(),
        Duration::from_secs(5),
    )
    .unwrap();
    assert_eq!(api.login_url().path(), "/github-login");
}

#[tokio::test]
async fn test_verify_session_returns_profile() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify-token"))
        .and(bearer_token("jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "username": "octocat",
            "email": "octocat@github.com",
            "avatar_url": "https://avatars.githubusercontent.com/u/583231"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let profile = client(&server).verify_session("jwt-abc").await.unwrap();
    assert_eq!(profile.username, "octocat");
    assert_eq!(profile.email.as_deref(), Some("octocat@github.com"));
}

#[tokio::test]
async fn test_verify_session_401_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/verify-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client(&server).verify_session("expired").await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}

#[tokio::test]
async fn test_fetch_recommendations_authenticated_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations/"))
        .and(bearer_token("jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": true,
            "recommendations": [
                {"full_name": "rust-lang/rust", "stargazers_count": 89500},
                {"full_name": "tokio-rs/tokio", "stargazers_count": 25000}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_recommendations(&request("octocat"), Some("jwt-abc"))
        .await
        .unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].full_name, "rust-lang/rust");
    assert_eq!(items[1].full_name, "tokio-rs/tokio");
}

#[tokio::test]
async fn test_fetch_recommendations_anonymous_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations_without_github/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": [{"full_name": "serde-rs/serde"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_recommendations(&request("octocat"), None)
        .await
        .unwrap();
    assert_eq!(items.len(), 1);
}

#[tokio::test]
async fn test_empty_username_fails_before_network() {
    let server = MockServer::start().await;
    // Any request reaching the server fails the test.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_recommendations(&request("   "), None)
        .await;
    assert!(matches!(result, Err(ApiError::Validation(_))));
}

#[tokio::test]
async fn test_daily_limit_body_is_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "success": false,
            "message": "Reached your daily limit"
        })))
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_recommendations(&request("octocat"), Some("jwt-abc"))
        .await;
    assert!(matches!(result, Err(ApiError::RateLimited(_))));
}

#[tokio::test]
async fn test_other_unsuccessful_200_body_is_empty_result() {
    let server = MockServer::start().await;
    // A 200 without the daily-limit message and without recommendations
    // is an empty set, not an error.
    Mock::given(method("POST"))
        .and(path("/api/recommendations_without_github/"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"success": true})),
        )
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_recommendations(&request("octocat"), None)
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_server_error_surfaces_detail() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/recommendations_without_github/"))
        .respond_with(
            ResponseTemplate::new(500)
                .set_body_json(serde_json::json!({"detail": "model unavailable"})),
        )
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_recommendations(&request("octocat"), None)
        .await;
    match result {
        Err(ApiError::ServerError(msg)) => assert_eq!(msg, "model unavailable"),
        other => panic!("expected server error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_connect_failure_is_network_error() {
    // A port nothing listens on.
    let api = ApiGatewayClient::new(
        Url::parse("http://127.0.0.1:1").unwrap(),
        Duration::from_secs(2),
    )
    .unwrap();

    let result = api.fetch_recommendations(&request("octocat"), None).await;
    assert!(matches!(result, Err(ApiError::NetworkError(_))));
}

#[tokio::test]
async fn test_list_recommendation_ids() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user-recommendations"))
        .and(query_param("username", "octocat"))
        .and(bearer_token("jwt-abc"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"recommendation_id": "rec-1"},
            {"recommendation_id": "rec-2"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let ids = client(&server)
        .list_recommendation_ids("octocat", "jwt-abc")
        .await
        .unwrap();
    assert_eq!(ids, ["rec-1", "rec-2"]);
}

#[tokio::test]
async fn test_list_recommendation_ids_empty_is_ok() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/user-recommendations"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let ids = client(&server)
        .list_recommendation_ids("octocat", "jwt-abc")
        .await
        .unwrap();
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_fetch_detail_parses_items() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommendation/rec-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": [
                {"full_name": "older/repo"},
                {"full_name": "newer/repo"}
            ]
        })))
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_recommendation_detail("rec-1", "jwt-abc")
        .await
        .unwrap();
    // The client returns the wire order; reversal is the history
    // manager's concern.
    assert_eq!(items[0].full_name, "older/repo");
}

#[tokio::test]
async fn test_fetch_detail_encodes_separators_in_id() {
    let server = MockServer::start().await;
    // A separator inside the id must stay inside one path segment, not
    // address a nested route.
    Mock::given(method("GET"))
        .and(path("/api/recommendation/a/b"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": []
        })))
        .expect(0)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/recommendation/a%2Fb"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "recommendations": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let items = client(&server)
        .fetch_recommendation_detail("a/b", "jwt-abc")
        .await
        .unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_fetch_detail_404_is_not_found() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/recommendation/missing"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let result = client(&server)
        .fetch_recommendation_detail("missing", "jwt-abc")
        .await;
    match result {
        Err(ApiError::NotFound(id)) => assert_eq!(id, "missing"),
        other => panic!("expected not found, got {:?}", other),
    }
}

#[tokio::test]
async fn test_refresh_token_returns_new_jwt() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .and(bearer_token("old-jwt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({"jwt": "new-jwt"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let new_token = client(&server).refresh_token("old-jwt").await.unwrap();
    assert_eq!(new_token, "new-jwt");
}

#[tokio::test]
async fn test_refresh_token_401_is_unauthorized() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/refresh-token"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let result = client(&server).refresh_token("stale").await;
    assert!(matches!(result, Err(ApiError::Unauthorized)));
}
