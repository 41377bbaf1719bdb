// RepoScout services
// Leaf components with no dependency on the managers layer.

pub mod api_client;
pub mod settings_engine;
pub mod token_cipher;
