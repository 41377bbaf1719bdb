// RepoScout shared type definitions
// Each submodule defines types used across the application.

pub mod errors;
pub mod recommendation;
pub mod session;
pub mod settings;
