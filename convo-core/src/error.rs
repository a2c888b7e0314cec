//! Error taxonomy shared by the API client and the echo loop.
//!
//! Every failure is classified so callers can decide between retrying
//! ([`ConvoError::is_transient`]) and aborting with a diagnostic.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvoError {
    /// Network failure, timeout, rate limiting or provider-side 5xx. Safe to retry.
    #[error("Transient error: {0}")]
    Transient(String),

    /// Authentication or configuration problem. Retrying will not help.
    #[error("Fatal error: {0}")]
    Fatal(String),

    /// Non-success response that is neither transient nor an auth failure (400, 404, ...).
    #[error("API error (status {status}, code {code:?}): {message}")]
    Api {
        status: u16,
        code: Option<u32>,
        message: String,
    },

    /// Response body did not match the expected schema.
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl ConvoError {
    /// Maps an HTTP status code and provider message to the matching variant.
    pub fn from_status(status: u16, code: Option<u32>, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 | 403 => ConvoError::Fatal(format!("authentication rejected ({}): {}", status, message)),
            429 => ConvoError::Transient(format!("rate limited: {}", message)),
            500..=599 => ConvoError::Transient(format!("provider error {}: {}", status, message)),
            _ => ConvoError::Api {
                status,
                code,
                message,
            },
        }
    }

    /// True when the failed operation may succeed if attempted again.
    pub fn is_transient(&self) -> bool {
        matches!(self, ConvoError::Transient(_))
    }

    /// True when the process should stop instead of retrying or skipping.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ConvoError::Fatal(_) | ConvoError::Config(_))
    }
}

pub type Result<T> = std::result::Result<T, ConvoError>;
