//! Unit tests for error types.
//!
//! Verifies that every error variant renders a user-presentable Display
//! message and implements std::error::Error.

use reposcout::types::errors::{
    ApiError, CryptoError, FormError, HistoryError, SettingsError, StoreError,
};

#[test]
fn test_api_error_display() {
    assert_eq!(
        ApiError::Validation("Username is required".to_string()).to_string(),
        "Validation error: Username is required"
    );
    assert_eq!(
        ApiError::Unauthorized.to_string(),
        "Unauthorized: invalid or expired token"
    );
    assert_eq!(
        ApiError::RateLimited("Reached your daily limit".to_string()).to_string(),
        "Rate limited: Reached your daily limit"
    );
    assert_eq!(
        ApiError::NetworkError("connection refused".to_string()).to_string(),
        "Network error: connection refused"
    );
    assert_eq!(ApiError::NotFound("abc".to_string()).to_string(), "Not found: abc");
    assert_eq!(
        ApiError::ServerError("boom".to_string()).to_string(),
        "Server error: boom"
    );
}

#[test]
fn test_crypto_error_display() {
    assert!(CryptoError::KeyDerivation("x".to_string())
        .to_string()
        .contains("Key derivation failed"));
    assert!(CryptoError::Seal("x".to_string()).to_string().contains("Seal failed"));
    assert!(CryptoError::Open("x".to_string()).to_string().contains("Open failed"));
    assert!(CryptoError::InvalidKey("x".to_string())
        .to_string()
        .contains("Invalid key"));
}

#[test]
fn test_store_error_display() {
    assert!(StoreError::DatabaseError("locked".to_string())
        .to_string()
        .contains("database error"));
    assert!(StoreError::CryptoError("bad tag".to_string())
        .to_string()
        .contains("crypto error"));
}

#[test]
fn test_settings_error_display() {
    assert!(SettingsError::InvalidKey("nope.nope".to_string())
        .to_string()
        .contains("Invalid settings key"));
    assert!(SettingsError::InvalidValue("wrong type".to_string())
        .to_string()
        .contains("Invalid settings value"));
}

#[test]
fn test_form_error_messages_are_user_facing() {
    assert_eq!(FormError::MissingUsername.to_string(), "Username is required");
    assert_eq!(
        FormError::NotAuthenticated.to_string(),
        "Sign in with GitHub before requesting recommendations"
    );
    assert_eq!(
        FormError::AlreadySubmitting.to_string(),
        "A request is already in progress"
    );
}

#[test]
fn test_history_error_display() {
    assert!(HistoryError::FetchIds("timeout".to_string())
        .to_string()
        .contains("recommendation IDs"));
    assert!(HistoryError::FetchDetail("500".to_string())
        .to_string()
        .contains("recommendation details"));
    assert_eq!(
        HistoryError::ListingInFlight.to_string(),
        "Recommendations are still loading"
    );
}

#[test]
fn test_errors_are_std_errors() {
    fn assert_error<E: std::error::Error>(_: E) {}
    assert_error(ApiError::Unauthorized);
    assert_error(CryptoError::Seal(String::new()));
    assert_error(StoreError::DatabaseError(String::new()));
    assert_error(SettingsError::InvalidKey(String::new()));
    assert_error(FormError::MissingUsername);
    assert_error(HistoryError::NotAuthenticated);
}
