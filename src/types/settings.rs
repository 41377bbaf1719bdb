use serde::{Deserialize, Serialize};

/// Top-level client settings container.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientSettings {
    pub backend: BackendSettings,
    pub display: DisplaySettings,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            backend: BackendSettings::default(),
            display: DisplaySettings::default(),
        }
    }
}

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BackendSettings {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
}

impl Default for BackendSettings {
    fn default() -> Self {
        Self {
            api_base_url: "http://127.0.0.1:8000".to_string(),
            request_timeout_secs: 30,
        }
    }
}

/// Presentation settings for the recommendation cards.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DisplaySettings {
    /// Maximum number of topic chips rendered on a repository card.
    pub max_topics_per_card: usize,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            max_topics_per_card: 7,
        }
    }
}
