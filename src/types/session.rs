use serde::{Deserialize, Serialize};

/// Identifying data returned by token verification.
///
/// Owned by the session manager for the duration of an authenticated
/// session and discarded on logout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub username: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// Authentication state of the application.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthState {
    /// No credential is stored; the login view is shown.
    Unauthenticated,
    /// A stored credential exists and is being verified against the backend.
    Verifying,
    /// The credential verified; the profile is held until logout.
    Authenticated(UserProfile),
}

/// Application routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Recommender,
    History,
    AuthCallback,
}

impl Route {
    /// Parses an internal page path into a route. Unknown paths fall back
    /// to the login page rather than an error page.
    pub fn from_path(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "/recommender" => Route::Recommender,
            "/history" => Route::History,
            "/auth-callback" => Route::AuthCallback,
            _ => Route::Login,
        }
    }

    pub fn as_path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Recommender => "/recommender",
            Route::History => "/history",
            Route::AuthCallback => "/auth-callback",
        }
    }

    /// Whether the route requires an authenticated session.
    pub fn is_protected(&self) -> bool {
        matches!(self, Route::Recommender | Route::History)
    }
}

/// A token sealed for at-rest storage. The plaintext never touches disk:
/// rows hold exactly these three buffers.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SealedToken {
    pub ciphertext: Vec<u8>,
    pub iv: Vec<u8>,
    pub auth_tag: Vec<u8>,
}
