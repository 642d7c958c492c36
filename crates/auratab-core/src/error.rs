//! Error types for Aura Tab Core

use thiserror::Error;

/// Main error type for Aura Tab operations
#[derive(Error, Debug)]
pub enum Error {
    #[error("settings error: {0}")]
    Settings(#[from] SettingsError),

    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("bus error: {0}")]
    Bus(#[from] BusError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Settings manager errors
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("settings manager is not initialized")]
    NotInitialized,

    #[error("unrecognized setting key: {0}")]
    UnknownKey(String),
}

/// Persistent store errors
#[derive(Error, Debug)]
pub enum StoreError {
    /// The host store API is missing or disabled. Readers fall back to
    /// compiled defaults; writers surface this to the caller.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("store read failed: {0}")]
    ReadFailed(String),

    #[error("store write failed: {0}")]
    WriteFailed(String),

    #[error("store watch error: {0}")]
    Watch(String),
}

/// Message bus errors
#[derive(Error, Debug)]
pub enum BusError {
    #[error("no endpoint registered for destination: {0}")]
    NoEndpoint(String),

    #[error("endpoint inbox closed")]
    EndpointClosed,

    #[error("request timed out")]
    Timeout,
}

impl Error {
    /// True when the failure means the persistent store could not be
    /// reached at all (as opposed to rejecting a particular operation).
    pub fn is_store_unavailable(&self) -> bool {
        matches!(self, Error::Store(StoreError::Unavailable(_)))
    }
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;
