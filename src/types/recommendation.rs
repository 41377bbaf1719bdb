use serde::{Deserialize, Serialize};

/// A single repository recommendation as returned by the backend.
///
/// Immutable and rendered read-only. `topics` is a comma-delimited string,
/// matching the backend's wire format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub full_name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    #[serde(default)]
    pub updated_at: String,
    #[serde(default)]
    pub topics: String,
    #[serde(default)]
    pub repo_url: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// The request body sent to the recommendation endpoints.
///
/// Built by the form manager; `languages` and `extra_topics` are ordered,
/// trimmed, and contain no duplicates or empty entries.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationRequest {
    pub username: String,
    pub languages: Vec<String>,
    pub extra_topics: Vec<String>,
}

/// Event value emitted when a previous recommendation set is selected.
///
/// Carries both the set identifier and the cached items so the subscriber
/// never has to reach back into the history manager's state.
#[derive(Debug, Clone, PartialEq)]
pub struct RecommendationSelected {
    pub id: String,
    pub items: Vec<RepositorySummary>,
}

/// Outcome of a form submission, produced by `FormManager::finish_submit`.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// The backend returned a recommendation set.
    Recommendations(Vec<RepositorySummary>),
    /// The daily quota was reached. Informational; the list is not populated.
    DailyLimit(String),
    /// The request failed with a user-visible message.
    Rejected(String),
}

/// Explicit per-resource fetch state.
///
/// Replaces implicit "already fetched" booleans: a resource is either not
/// yet requested, in flight, cached, or failed with a message.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    NotFetched,
    Fetching,
    Fetched(T),
    Failed(String),
}

impl<T> FetchState<T> {
    /// Returns true if a fetch should be issued for this resource.
    pub fn needs_fetch(&self) -> bool {
        matches!(self, FetchState::NotFetched)
    }
}
