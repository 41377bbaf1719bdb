use std::fmt;

// === ApiError ===

/// Errors returned by the recommendation backend API client.
#[derive(Debug)]
pub enum ApiError {
    /// A required field was missing or invalid; caught before any network call.
    Validation(String),
    /// The bearer token is missing, invalid, or expired.
    Unauthorized,
    /// The backend reported the daily recommendation quota was reached.
    /// Informational, not a failure of the request itself.
    RateLimited(String),
    /// No response reached the server (connect failure, timeout, DNS).
    NetworkError(String),
    /// The requested resource does not exist on the backend.
    NotFound(String),
    /// The backend returned a structured error response.
    ServerError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Validation(msg) => write!(f, "Validation error: {}", msg),
            ApiError::Unauthorized => write!(f, "Unauthorized: invalid or expired token"),
            ApiError::RateLimited(msg) => write!(f, "Rate limited: {}", msg),
            ApiError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            ApiError::NotFound(id) => write!(f, "Not found: {}", id),
            ApiError::ServerError(msg) => write!(f, "Server error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

// === CryptoError ===

/// Errors related to cryptographic operations on the stored credential.
#[derive(Debug)]
pub enum CryptoError {
    /// Failed to derive the at-rest key from the passphrase.
    KeyDerivation(String),
    /// Sealing the token failed.
    Seal(String),
    /// Opening a sealed token failed.
    Open(String),
    /// Failed to generate random bytes.
    RandomGeneration(String),
    /// The provided key is invalid.
    InvalidKey(String),
}

impl fmt::Display for CryptoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CryptoError::KeyDerivation(msg) => write!(f, "Key derivation failed: {}", msg),
            CryptoError::Seal(msg) => write!(f, "Seal failed: {}", msg),
            CryptoError::Open(msg) => write!(f, "Open failed: {}", msg),
            CryptoError::RandomGeneration(msg) => {
                write!(f, "Random generation failed: {}", msg)
            }
            CryptoError::InvalidKey(msg) => write!(f, "Invalid key: {}", msg),
        }
    }
}

impl std::error::Error for CryptoError {}

// === StoreError ===

/// Errors related to token store operations.
#[derive(Debug)]
pub enum StoreError {
    /// Database operation failed.
    DatabaseError(String),
    /// Cryptographic operation failed while sealing the token.
    CryptoError(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::DatabaseError(msg) => write!(f, "Token store database error: {}", msg),
            StoreError::CryptoError(msg) => write!(f, "Token store crypto error: {}", msg),
        }
    }
}

impl std::error::Error for StoreError {}

// === SettingsError ===

/// Errors related to settings management.
#[derive(Debug)]
pub enum SettingsError {
    /// An I/O error occurred while reading or writing settings.
    IoError(String),
    /// Failed to serialize or deserialize settings.
    SerializationError(String),
    /// The provided settings key is invalid.
    InvalidKey(String),
    /// The provided settings value is invalid.
    InvalidValue(String),
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::IoError(msg) => write!(f, "Settings I/O error: {}", msg),
            SettingsError::SerializationError(msg) => {
                write!(f, "Settings serialization error: {}", msg)
            }
            SettingsError::InvalidKey(key) => write!(f, "Invalid settings key: {}", key),
            SettingsError::InvalidValue(msg) => {
                write!(f, "Invalid settings value: {}", msg)
            }
        }
    }
}

impl std::error::Error for SettingsError {}

// === FormError ===

/// Errors raised by the recommendation form before any network call.
#[derive(Debug)]
pub enum FormError {
    /// The username field is empty.
    MissingUsername,
    /// No session credential exists and the form requires authentication.
    NotAuthenticated,
    /// A submit is already in flight.
    AlreadySubmitting,
}

impl fmt::Display for FormError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormError::MissingUsername => write!(f, "Username is required"),
            FormError::NotAuthenticated => {
                write!(f, "Sign in with GitHub before requesting recommendations")
            }
            FormError::AlreadySubmitting => write!(f, "A request is already in progress"),
        }
    }
}

impl std::error::Error for FormError {}

// === HistoryError ===

/// Errors related to previous-recommendation retrieval.
#[derive(Debug)]
pub enum HistoryError {
    /// Failed to fetch the list of recommendation ids.
    FetchIds(String),
    /// Failed to fetch the detail for a recommendation id.
    FetchDetail(String),
    /// The id listing fetch is still in flight.
    ListingInFlight,
    /// No session credential exists.
    NotAuthenticated,
}

impl fmt::Display for HistoryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HistoryError::FetchIds(msg) => {
                write!(f, "Failed to fetch recommendation IDs: {}", msg)
            }
            HistoryError::FetchDetail(msg) => {
                write!(f, "Failed to fetch recommendation details: {}", msg)
            }
            HistoryError::ListingInFlight => write!(f, "Recommendations are still loading"),
            HistoryError::NotAuthenticated => write!(f, "Not authenticated"),
        }
    }
}

impl std::error::Error for HistoryError {}
