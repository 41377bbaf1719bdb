//! API gateway client for the recommendation backend.
//!
//! Issues authenticated HTTP requests via `reqwest`: token verify/refresh,
//! recommendation fetch (authenticated and anonymous), and
//! previous-recommendation list/detail. All operations are single-shot —
//! retry policy, if any, is the caller's responsibility. The bearer token
//! is attached as `Authorization: Bearer <token>` when present.

use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};
use url::Url;
use uuid::Uuid;

use crate::types::errors::ApiError;
use crate::types::recommendation::{RecommendationRequest, RepositorySummary};
use crate::types::session::UserProfile;

/// Message the backend uses to signal the daily quota condition in an
/// otherwise-successful response body.
const DAILY_LIMIT_MESSAGE: &str = "Reached your daily limit";

/// Body shape shared by both recommendation endpoints.
#[derive(Debug, Deserialize)]
struct RecommendationsResponse {
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    recommendations: Option<Vec<RepositorySummary>>,
}

/// One entry of the previous-recommendations listing.
#[derive(Debug, Deserialize)]
struct RecommendationIdEntry {
    recommendation_id: String,
}

/// Body of a successful `/refresh-token` response.
#[derive(Debug, Deserialize)]
struct RefreshResponse {
    jwt: String,
}

/// Structured error body returned by the backend on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// HTTP client for the recommendation backend.
///
/// Cheap to clone; clones share the underlying `reqwest` connection pool,
/// which lets the UI shell move calls onto a runtime without locking.
#[derive(Debug, Clone)]
pub struct ApiGatewayClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiGatewayClient {
    /// Creates a client against the given backend base URL.
    pub fn new(base_url: Url, timeout: std::time::Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::NetworkError(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self { http, base_url })
    }

    /// The browser-redirect entry point for the external identity provider.
    pub fn login_url(&self) -> Url {
        self.endpoint("/github-login")
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Url {
        // The base URL is validated at construction; joining a static path
        // cannot fail.
        self.base_url
            .join(path)
            .unwrap_or_else(|_| self.base_url.clone())
    }

    /// Verifies a stored credential against the backend.
    ///
    /// Returns the user profile on success, `Unauthorized` when the token
    /// is invalid or expired.
    pub async fn verify_session(&self, token: &str) -> Result<UserProfile, ApiError> {
        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, "GET /verify-token");

        let response = self
            .http
            .get(self.endpoint("/verify-token"))
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => response
                .json::<UserProfile>()
                .await
                .map_err(|e| ApiError::ServerError(format!("Malformed profile response: {}", e))),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(%correlation_id, "token verification rejected");
                Err(ApiError::Unauthorized)
            }
            status => Err(ApiError::ServerError(error_detail(response, status).await)),
        }
    }

    /// Fetches a fresh recommendation set for the given request.
    ///
    /// With a token the authenticated endpoint is used; without one, the
    /// anonymous endpoint. A 200 body carrying the daily-limit message is
    /// surfaced as the distinct `RateLimited` outcome, never as a
    /// successful empty result. An empty username fails `Validation`
    /// before any network call.
    pub async fn fetch_recommendations(
        &self,
        request: &RecommendationRequest,
        token: Option<&str>,
    ) -> Result<Vec<RepositorySummary>, ApiError> {
        if request.username.trim().is_empty() {
            return Err(ApiError::Validation("Username is required".to_string()));
        }

        let path = if token.is_some() {
            "/api/recommendations/"
        } else {
            "/api/recommendations_without_github/"
        };

        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, path, username = %request.username, "POST recommendations");

        let mut builder = self.http.post(self.endpoint(path)).json(request);
        if let Some(token) = token {
            builder = builder.bearer_auth(token);
        }

        let response = builder.send().await.map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => {
                let body: RecommendationsResponse = response.json().await.map_err(|e| {
                    ApiError::ServerError(format!("Malformed recommendations response: {}", e))
                })?;

                if body.success == Some(false)
                    && body.message.as_deref() == Some(DAILY_LIMIT_MESSAGE)
                {
                    debug!(%correlation_id, "daily limit reached");
                    return Err(ApiError::RateLimited(DAILY_LIMIT_MESSAGE.to_string()));
                }

                Ok(body.recommendations.unwrap_or_default())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerError(error_detail(response, status).await)),
        }
    }

    /// Lists the identifiers of previously generated recommendation sets.
    ///
    /// An empty vector is a valid result, distinct from failure.
    pub async fn list_recommendation_ids(
        &self,
        username: &str,
        token: &str,
    ) -> Result<Vec<String>, ApiError> {
        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, username, "GET /api/user-recommendations");

        let mut url = self.endpoint("/api/user-recommendations");
        url.query_pairs_mut().append_pair("username", username);

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => {
                let entries: Vec<RecommendationIdEntry> = response.json().await.map_err(|e| {
                    ApiError::ServerError(format!("Malformed id listing: {}", e))
                })?;
                Ok(entries.into_iter().map(|e| e.recommendation_id).collect())
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerError(error_detail(response, status).await)),
        }
    }

    /// Fetches the detail of one previously generated recommendation set.
    pub async fn fetch_recommendation_detail(
        &self,
        id: &str,
        token: &str,
    ) -> Result<Vec<RepositorySummary>, ApiError> {
        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, id, "GET /api/recommendation/{{id}}");

        // The id goes in as a single path segment so separators inside it
        // are percent-encoded rather than rerouting the request.
        let mut url = self.endpoint("/api/recommendation");
        url.path_segments_mut()
            .map_err(|_| ApiError::Validation("Base URL cannot carry path segments".to_string()))?
            .push(id);

        let response = self
            .http
            .get(url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => {
                let body: RecommendationsResponse = response.json().await.map_err(|e| {
                    ApiError::ServerError(format!("Malformed detail response: {}", e))
                })?;
                Ok(body.recommendations.unwrap_or_default())
            }
            StatusCode::NOT_FOUND => Err(ApiError::NotFound(id.to_string())),
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerError(error_detail(response, status).await)),
        }
    }

    /// Exchanges the current token for a fresh one.
    ///
    /// On `Unauthorized` the caller must clear the session and force
    /// re-authentication.
    pub async fn refresh_token(&self, old_token: &str) -> Result<String, ApiError> {
        let correlation_id = Uuid::new_v4();
        debug!(%correlation_id, "POST /refresh-token");

        let response = self
            .http
            .post(self.endpoint("/refresh-token"))
            .bearer_auth(old_token)
            .send()
            .await
            .map_err(map_transport_error)?;

        match response.status() {
            StatusCode::OK => {
                let body: RefreshResponse = response.json().await.map_err(|e| {
                    ApiError::ServerError(format!("Malformed refresh response: {}", e))
                })?;
                Ok(body.jwt)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiError::Unauthorized),
            status => Err(ApiError::ServerError(error_detail(response, status).await)),
        }
    }
}

/// Maps a `reqwest` transport error into the client taxonomy. Anything
/// where no response reached the server is `NetworkError`.
fn map_transport_error(err: reqwest::Error) -> ApiError {
    if err.is_timeout() || err.is_connect() || err.is_request() {
        ApiError::NetworkError(err.to_string())
    } else {
        ApiError::ServerError(err.to_string())
    }
}

/// Extracts the backend's `detail` field from an error response, falling
/// back to the status code text.
async fn error_detail(response: reqwest::Response, status: StatusCode) -> String {
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            detail: Some(detail),
        }) => detail,
        _ => format!("Backend returned status {}", status),
    }
}
