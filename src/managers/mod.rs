// RepoScout managers
// Stateful components owning one slice of application state each.

pub mod form_manager;
pub mod history_manager;
pub mod session_manager;
pub mod token_store;
