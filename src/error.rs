//! Error handling for the portal client

use std::fmt;
use thiserror::Error;

/// Unified error type for the portal client
#[derive(Error, Debug)]
pub enum Error {
    /// Network or HTTP related errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Authentication errors
    #[error("Authentication error: {0}")]
    Auth(String),

    /// The one classified auth failure: a known invalid-credential code
    /// from the provider, surfaced as "wrong email or password"
    #[error("wrong email or password")]
    InvalidCredentials,

    /// Document store errors
    #[error("Database error: {0}")]
    Database(String),

    /// Blob storage errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// A record that was expected to exist does not
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller's role does not permit the operation
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// A write that would move a record out of a terminal state
    #[error("invalid status transition: {0}")]
    InvalidTransition(String),

    /// General errors
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Create a new authentication error
    pub fn auth<T: fmt::Display>(msg: T) -> Self {
        Error::Auth(msg.to_string())
    }

    /// Create a new database error
    pub fn database<T: fmt::Display>(msg: T) -> Self {
        Error::Database(msg.to_string())
    }

    /// Create a new storage error
    pub fn storage<T: fmt::Display>(msg: T) -> Self {
        Error::Storage(msg.to_string())
    }

    /// Create a new forbidden error
    pub fn forbidden<T: fmt::Display>(msg: T) -> Self {
        Error::Forbidden(msg.to_string())
    }

    /// Create a new general error
    pub fn general<T: fmt::Display>(msg: T) -> Self {
        Error::General(msg.to_string())
    }
}
