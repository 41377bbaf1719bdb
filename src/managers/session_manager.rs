//! Session Manager for RepoScout.
//!
//! Owns the authentication state machine: `Unauthenticated`, `Verifying`,
//! `Authenticated(profile)`. The initial state is `Verifying` when a
//! stored credential exists, else `Unauthenticated`. The user profile is
//! held for the lifetime of the authenticated session and discarded on
//! logout.

use std::sync::Arc;

use tracing::{info, warn};
use url::form_urlencoded;

use crate::managers::token_store::{TokenStore, TokenStoreTrait};
use crate::services::api_client::ApiGatewayClient;
use crate::types::errors::ApiError;
use crate::types::session::{AuthState, Route, UserProfile};

/// Route/session orchestration over the token store and API client.
pub struct SessionManager {
    store: Arc<TokenStore>,
    state: AuthState,
}

impl SessionManager {
    /// Creates a new SessionManager. Starts in `Verifying` if a stored
    /// credential exists.
    pub fn new(store: Arc<TokenStore>) -> Self {
        let state = if store.has_token() {
            AuthState::Verifying
        } else {
            AuthState::Unauthenticated
        };
        Self { store, state }
    }

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn is_authenticated(&self) -> bool {
        matches!(self.state, AuthState::Authenticated(_))
    }

    /// The profile of the authenticated user, if any.
    pub fn profile(&self) -> Option<&UserProfile> {
        match &self.state {
            AuthState::Authenticated(profile) => Some(profile),
            _ => None,
        }
    }

    /// The stored credential, if any. Unseal failures read as absent.
    pub fn token(&self) -> Option<String> {
        self.store.get_token().ok().flatten()
    }

    /// Runs the startup verification when a stored credential exists.
    ///
    /// `Verifying → Authenticated` on success; `Verifying →
    /// Unauthenticated` on failure or error, clearing the stored
    /// credential so the next launch goes straight to login.
    pub async fn startup(&mut self, api: &ApiGatewayClient) -> &AuthState {
        if self.state != AuthState::Verifying {
            return &self.state;
        }

        let token = match self.store.get_token() {
            Ok(Some(token)) => token,
            _ => {
                self.state = AuthState::Unauthenticated;
                return &self.state;
            }
        };

        let result = api.verify_session(&token).await;
        self.finish_verification(result)
    }

    /// Applies the result of a credential verification.
    ///
    /// Split from [`SessionManager::startup`] so the UI event loop can run
    /// the network call elsewhere and apply the transition synchronously.
    /// A no-op unless the state is `Verifying`.
    pub fn finish_verification(
        &mut self,
        result: Result<UserProfile, ApiError>,
    ) -> &AuthState {
        if self.state != AuthState::Verifying {
            return &self.state;
        }
        match result {
            Ok(profile) => {
                info!(username = %profile.username, "session verified");
                self.state = AuthState::Authenticated(profile);
            }
            Err(e) => {
                warn!("session verification failed, clearing credential: {}", e);
                let _ = self.store.clear_token();
                self.state = AuthState::Unauthenticated;
            }
        }
        &self.state
    }

    /// External-callback entry point.
    ///
    /// Parses the callback redirect's query string — an `authenticated`
    /// flag plus the token under `jwt` (or the legacy `access_token`
    /// parameter). On success stores the token and enters `Verifying`
    /// toward the authenticated view; otherwise the state is
    /// `Unauthenticated` and the login view is shown.
    pub fn complete_login(&mut self, query: &str) -> bool {
        let mut authenticated = false;
        let mut token: Option<String> = None;

        for (key, value) in form_urlencoded::parse(query.trim_start_matches('?').as_bytes()) {
            match key.as_ref() {
                "authenticated" => authenticated = value == "true",
                "jwt" | "access_token" => {
                    if !value.is_empty() {
                        token = Some(value.into_owned());
                    }
                }
                _ => {}
            }
        }

        match (authenticated, token) {
            (true, Some(token)) => {
                if let Err(e) = self.store.set_token(&token) {
                    warn!("failed to persist credential from callback: {}", e);
                    self.state = AuthState::Unauthenticated;
                    return false;
                }
                info!("login callback accepted");
                self.state = AuthState::Verifying;
                true
            }
            _ => {
                warn!("login callback rejected");
                self.state = AuthState::Unauthenticated;
                false
            }
        }
    }

    /// Explicit logout: clears credential and profile, returns to login.
    pub fn logout(&mut self) {
        let _ = self.store.clear_token();
        self.state = AuthState::Unauthenticated;
        info!("logged out");
    }

    /// Exchanges the stored token for a fresh one.
    ///
    /// Success overwrites the stored credential. `Unauthorized` (or a
    /// missing credential) clears the session and forces
    /// re-authentication; the caller routes to login.
    pub async fn refresh(&mut self, api: &ApiGatewayClient) -> Result<(), String> {
        let token = match self.store.get_token() {
            Ok(Some(token)) => token,
            _ => {
                self.state = AuthState::Unauthenticated;
                return Err("No stored credential".to_string());
            }
        };

        match api.refresh_token(&token).await {
            Ok(new_token) => {
                self.store
                    .set_token(&new_token)
                    .map_err(|e| e.to_string())?;
                Ok(())
            }
            Err(e) => {
                warn!("token refresh failed, forcing re-authentication: {}", e);
                let _ = self.store.clear_token();
                self.state = AuthState::Unauthenticated;
                Err(e.to_string())
            }
        }
    }

    /// Route guard: any protected route maps to the login view while not
    /// authenticated. Never an error page, never a blank screen.
    pub fn route_for(&self, requested: Route) -> Route {
        if requested.is_protected() && !self.is_authenticated() {
            Route::Login
        } else {
            requested
        }
    }
}
