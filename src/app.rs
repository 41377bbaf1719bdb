//! App Core for RepoScout.
//!
//! Central struct wiring the token store, settings, API client, and the
//! session, form, and history managers; runs the startup verification and
//! the shutdown flush.

use std::sync::Arc;
use std::time::Duration;

use url::Url;

use crate::database::connection::Database;
use crate::managers::form_manager::FormManager;
use crate::managers::history_manager::HistoryManager;
use crate::managers::session_manager::SessionManager;
use crate::managers::token_store::TokenStore;
use crate::services::api_client::ApiGatewayClient;
use crate::services::settings_engine::{SettingsEngine, SettingsEngineTrait};

/// Central application struct holding all managers and services.
pub struct App {
    pub db: Arc<Database>,
    pub token_store: Arc<TokenStore>,
    pub settings_engine: SettingsEngine,
    pub api: ApiGatewayClient,
    pub session_manager: SessionManager,
    pub form_manager: FormManager,
    pub anon_form_manager: FormManager,
    pub history_manager: HistoryManager,
}

impl App {
    /// Creates a new App, initializing all managers and services.
    ///
    /// Loads settings first so the API client is built against the
    /// configured backend base URL.
    pub fn new(db_path: &str) -> Result<Self, Box<dyn std::error::Error>> {
        Self::with_settings_path(db_path, None)
    }

    /// As [`App::new`], with an explicit settings file path for tests.
    pub fn with_settings_path(
        db_path: &str,
        settings_path: Option<String>,
    ) -> Result<Self, Box<dyn std::error::Error>> {
        let db = Arc::new(Database::open(db_path)?);

        let mut settings_engine = SettingsEngine::new(settings_path);
        let settings = settings_engine.load().unwrap_or_default();

        let base_url = Url::parse(&settings.backend.api_base_url)
            .map_err(|e| format!("Invalid api_base_url: {}", e))?;
        let api = ApiGatewayClient::new(
            base_url,
            Duration::from_secs(settings.backend.request_timeout_secs),
        )
        .map_err(|e| format!("API client init failed: {}", e))?;

        let token_store = Arc::new(
            TokenStore::new(db.clone()).map_err(|e| format!("TokenStore init failed: {}", e))?,
        );
        let session_manager = SessionManager::new(token_store.clone());

        Ok(Self {
            db,
            token_store,
            settings_engine,
            api,
            session_manager,
            form_manager: FormManager::new(true),
            anon_form_manager: FormManager::new(false),
            history_manager: HistoryManager::new(),
        })
    }

    /// Startup sequence: verify any persisted credential.
    pub async fn startup(&mut self) {
        self.session_manager.startup(&self.api).await;
    }

    /// Shutdown sequence: flush settings to disk.
    pub fn shutdown(&mut self) {
        let _ = self.settings_engine.save();
    }

    /// Logout clears both the session and the per-user history cache.
    pub fn logout(&mut self) {
        self.session_manager.logout();
        self.history_manager.reset();
    }

    /// The maximum topic chips per card, from settings.
    pub fn max_topics_per_card(&self) -> usize {
        self.settings_engine.get_settings().display.max_topics_per_card
    }
}
