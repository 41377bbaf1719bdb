//! History Manager for RepoScout.
//!
//! Fetches and caches previously generated recommendation sets. The id
//! listing is fetch-once, guarded by an explicit [`FetchState`] rather
//! than an "already fetched" boolean; details are cached by id for the
//! lifetime of the process, stored in reverse-chronological order within
//! each set. A cached id is never refetched; failure leaves prior state
//! unchanged.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::services::api_client::ApiGatewayClient;
use crate::types::errors::{ApiError, HistoryError};
use crate::types::recommendation::{FetchState, RecommendationSelected, RepositorySummary};

/// Previous-recommendation retrieval and cache.
pub struct HistoryManager {
    ids: FetchState<Vec<String>>,
    details: HashMap<String, Vec<RepositorySummary>>,
}

impl HistoryManager {
    pub fn new() -> Self {
        Self {
            ids: FetchState::NotFetched,
            details: HashMap::new(),
        }
    }

    /// The current state of the id listing.
    pub fn ids_state(&self) -> &FetchState<Vec<String>> {
        &self.ids
    }

    /// Returns the cached detail for an id, if present.
    pub fn cached_detail(&self, id: &str) -> Option<&Vec<RepositorySummary>> {
        self.details.get(id)
    }

    /// Drops all cached state. Called on logout so one user's history
    /// never leaks into the next session.
    pub fn reset(&mut self) {
        self.ids = FetchState::NotFetched;
        self.details.clear();
    }

    /// Marks the id listing as in flight. Returns `false` when a fetch is
    /// already running or the listing has settled, so callers never issue
    /// a duplicate network call.
    pub fn begin_ids_fetch(&mut self) -> bool {
        if self.ids.needs_fetch() {
            self.ids = FetchState::Fetching;
            true
        } else {
            false
        }
    }

    /// Records the result of an in-flight id fetch.
    pub fn finish_ids_fetch(
        &mut self,
        result: Result<Vec<String>, ApiError>,
    ) -> Result<Vec<String>, HistoryError> {
        match result {
            Ok(ids) => {
                debug!(count = ids.len(), "loaded recommendation id listing");
                self.ids = FetchState::Fetched(ids.clone());
                Ok(ids)
            }
            Err(e) => {
                warn!("failed to load recommendation ids: {}", e);
                self.ids = FetchState::Failed(e.to_string());
                Err(HistoryError::FetchIds(e.to_string()))
            }
        }
    }

    /// Fetches the id listing once.
    ///
    /// A second call while `Fetching` or after `Fetched`/`Failed` issues
    /// no network call. An empty listing is `Fetched(vec![])` — valid,
    /// and distinct from failure. A call while the fetch is in flight is
    /// `ListingInFlight`, never a fabricated empty success.
    pub async fn load_ids(
        &mut self,
        api: &ApiGatewayClient,
        username: &str,
        token: &str,
    ) -> Result<Vec<String>, HistoryError> {
        match &self.ids {
            FetchState::Fetched(ids) => return Ok(ids.clone()),
            FetchState::Fetching => return Err(HistoryError::ListingInFlight),
            FetchState::Failed(msg) => return Err(HistoryError::FetchIds(msg.clone())),
            FetchState::NotFetched => {}
        }

        self.ids = FetchState::Fetching;
        let result = api.list_recommendation_ids(username, token).await;
        self.finish_ids_fetch(result)
    }

    /// Caches a freshly fetched detail set, reversing it so the newest
    /// entries come first, and returns the selection event.
    pub fn store_detail(
        &mut self,
        id: &str,
        mut items: Vec<RepositorySummary>,
    ) -> RecommendationSelected {
        items.reverse();
        self.details.insert(id.to_string(), items.clone());
        RecommendationSelected {
            id: id.to_string(),
            items,
        }
    }

    /// Selects a previous recommendation set by id.
    ///
    /// Served from the cache when present; otherwise fetched, stored
    /// reversed (reverse-chronological within the set), and returned. The
    /// emitted event carries the cached ordering, identical on first and
    /// repeat selection. On failure the cache is untouched.
    pub async fn select_id(
        &mut self,
        api: &ApiGatewayClient,
        id: &str,
        token: &str,
    ) -> Result<RecommendationSelected, HistoryError> {
        if let Some(items) = self.details.get(id) {
            debug!(id, "serving recommendation detail from cache");
            return Ok(RecommendationSelected {
                id: id.to_string(),
                items: items.clone(),
            });
        }

        match api.fetch_recommendation_detail(id, token).await {
            Ok(items) => Ok(self.store_detail(id, items)),
            Err(ApiError::NotFound(id)) => Err(HistoryError::FetchDetail(format!(
                "Recommendation {} not found",
                id
            ))),
            Err(e) => {
                warn!(id, "failed to fetch recommendation detail: {}", e);
                Err(HistoryError::FetchDetail(e.to_string()))
            }
        }
    }
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new()
    }
}
