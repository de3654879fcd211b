//! Error types for the FamilyFlow assistant backend.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while handling an assistant request.
#[derive(Error, Debug)]
pub enum Error {
    /// No Authorization header was supplied
    #[error("Missing Authorization header")]
    MissingCredential,

    /// Authorization header was present but not `Bearer <token>`
    #[error("Authorization must be: Bearer <token>")]
    MalformedCredential,

    /// Token verification failed; the cause stays server-side
    #[error("Invalid bearer token: {0}")]
    InvalidCredential(String),

    /// Request validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Model provider error (absorbed by the model caller, never surfaced as HTTP)
    #[error("Model provider error: {0}")]
    ModelProvider(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Get HTTP status code for this error.
    pub fn status_code(&self) -> u16 {
        match self {
            Error::MissingCredential
            | Error::MalformedCredential
            | Error::InvalidCredential(_) => 401,
            Error::Validation(_) => 400,
            _ => 500,
        }
    }

    /// Message safe to return to the client.
    ///
    /// Credential failures all collapse to the same line so verification
    /// internals never leak; the full cause is logged server-side.
    pub fn public_message(&self) -> String {
        match self {
            Error::MissingCredential
            | Error::MalformedCredential
            | Error::InvalidCredential(_) => "Authentication required".to_string(),
            Error::Validation(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }
}
