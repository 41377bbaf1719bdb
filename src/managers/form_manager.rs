//! Form Manager for RepoScout.
//!
//! State machine over the recommendation request form: username, language
//! and topic tag sequences, their pending input texts, and the submitting
//! flag. Tags are committed via explicit gestures — an Enter key
//! (`commit_*`) or a comma typed into the pending text — and are always
//! trimmed, non-empty, and unique, in first-insertion order.
//!
//! Submission is split into `begin_submit` / `finish_submit` so the UI
//! event loop can apply the same transitions without holding a borrow of
//! the manager across an await point. `submitting` returns to `false` on
//! every path through `finish_submit`.

use crate::types::errors::{ApiError, FormError};
use crate::types::recommendation::{RecommendationRequest, RepositorySummary, SubmitOutcome};

/// The recommendation request form.
pub struct FormManager {
    username: String,
    languages: Vec<String>,
    topics: Vec<String>,
    language_input: String,
    topic_input: String,
    submitting: bool,
    /// Whether submission requires a stored session credential. The
    /// anonymous variant drives the same machine against the
    /// no-auth endpoint.
    require_auth: bool,
}

impl FormManager {
    pub fn new(require_auth: bool) -> Self {
        Self {
            username: String::new(),
            languages: Vec::new(),
            topics: Vec::new(),
            language_input: String::new(),
            topic_input: String::new(),
            submitting: false,
            require_auth,
        }
    }

    // ─── Field accessors ───

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn languages(&self) -> &[String] {
        &self.languages
    }

    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    pub fn language_input(&self) -> &str {
        &self.language_input
    }

    pub fn topic_input(&self) -> &str {
        &self.topic_input
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn requires_auth(&self) -> bool {
        self.require_auth
    }

    // ─── Transitions ───

    pub fn set_username(&mut self, username: &str) {
        self.username = username.to_string();
    }

    /// Updates the pending language text. If the text contains a comma,
    /// every comma-separated piece is committed as a tag and the pending
    /// text is cleared.
    pub fn set_language_input(&mut self, text: &str) {
        if text.contains(',') {
            for piece in text.split(',') {
                Self::push_tag(&mut self.languages, piece);
            }
            self.language_input.clear();
        } else {
            self.language_input = text.to_string();
        }
    }

    /// Updates the pending topic text, committing on comma as for languages.
    pub fn set_topic_input(&mut self, text: &str) {
        if text.contains(',') {
            for piece in text.split(',') {
                Self::push_tag(&mut self.topics, piece);
            }
            self.topic_input.clear();
        } else {
            self.topic_input = text.to_string();
        }
    }

    /// Enter-key gesture: moves trimmed, non-empty, non-duplicate pending
    /// language text into the tag sequence and clears the pending text.
    pub fn commit_language(&mut self) {
        let pending = std::mem::take(&mut self.language_input);
        Self::push_tag(&mut self.languages, &pending);
    }

    /// Enter-key gesture for the topic input.
    pub fn commit_topic(&mut self) {
        let pending = std::mem::take(&mut self.topic_input);
        Self::push_tag(&mut self.topics, &pending);
    }

    /// Removes exactly one matching language tag by value equality.
    pub fn remove_language(&mut self, tag: &str) {
        if let Some(pos) = self.languages.iter().position(|t| t == tag) {
            self.languages.remove(pos);
        }
    }

    /// Removes exactly one matching topic tag by value equality.
    pub fn remove_topic(&mut self, tag: &str) {
        if let Some(pos) = self.topics.iter().position(|t| t == tag) {
            self.topics.remove(pos);
        }
    }

    fn push_tag(tags: &mut Vec<String>, text: &str) {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return;
        }
        if tags.iter().any(|t| t == trimmed) {
            return;
        }
        tags.push(trimmed.to_string());
    }

    // ─── Submission ───

    /// Guards and starts a submission.
    ///
    /// Fails fast — before any network call — when the username is empty,
    /// when authentication is required but no credential exists, or when a
    /// submit is already in flight. On success sets `submitting = true`
    /// and returns the request the caller should send.
    pub fn begin_submit(&mut self, has_credential: bool) -> Result<RecommendationRequest, FormError> {
        if self.submitting {
            return Err(FormError::AlreadySubmitting);
        }
        if self.username.trim().is_empty() {
            return Err(FormError::MissingUsername);
        }
        if self.require_auth && !has_credential {
            return Err(FormError::NotAuthenticated);
        }

        self.submitting = true;
        Ok(RecommendationRequest {
            username: self.username.trim().to_string(),
            languages: self.languages.clone(),
            extra_topics: self.topics.clone(),
        })
    }

    /// Completes a submission started with `begin_submit`.
    ///
    /// Clears `submitting` unconditionally, then classifies the result:
    /// `Recommendations` on success, `DailyLimit` on the rate-limit
    /// outcome (the list is never populated), `Rejected` with a
    /// user-visible message on any other failure.
    pub fn finish_submit(
        &mut self,
        result: Result<Vec<RepositorySummary>, ApiError>,
    ) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(items) => SubmitOutcome::Recommendations(items),
            Err(ApiError::RateLimited(_)) => SubmitOutcome::DailyLimit(
                "You have reached your daily limit. Please try again tomorrow.".to_string(),
            ),
            Err(ApiError::NetworkError(_)) => {
                SubmitOutcome::Rejected("Network error. Please try again later.".to_string())
            }
            Err(e) => SubmitOutcome::Rejected(e.to_string()),
        }
    }
}
