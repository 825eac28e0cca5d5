//! Error types for the crypto-pay-rs library.
//!
//! Every failure falls into one of a few categories (see [`ErrorKind`]) so that
//! callers can decide on their own retry policy.

use serde_json::Value;
use thiserror::Error;

/// Main error type for Crypto Pay operations.
#[derive(Error, Debug)]
pub enum CryptoPayError {
    /// Error while sending the request or reading the response
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The response body was not a JSON envelope
    #[error("Invalid response body: {0}")]
    InvalidBody(String),

    /// The API answered with `ok: false`; holds the `error` field verbatim
    #[error("Bad request: {0}")]
    Api(Value),

    /// The result did not match the expected record shape
    #[error("Decode error: {0}")]
    Decode(#[source] serde_json::Error),

    /// A field the record needs was missing from the result
    #[error("Missing required field: {0}")]
    MissingField(String),

    /// Unknown asset, button or status code
    #[error("Invalid code: {0}")]
    InvalidCode(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error parsing URL
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),
}

/// Broad category of a [`CryptoPayError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Network failure or a response that is not an envelope
    Transport,
    /// The remote service rejected the call
    Api,
    /// The result could not be turned into a typed record
    Decode,
    /// Bad local input: token, URL, environment or enum code
    Config,
}

impl CryptoPayError {
    /// Returns the category of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CryptoPayError::Http(_) | CryptoPayError::InvalidBody(_) => ErrorKind::Transport,
            CryptoPayError::Api(_) => ErrorKind::Api,
            CryptoPayError::Decode(_) | CryptoPayError::MissingField(_) => ErrorKind::Decode,
            CryptoPayError::InvalidCode(_)
            | CryptoPayError::Config(_)
            | CryptoPayError::Url(_) => ErrorKind::Config,
        }
    }

    /// The numeric `code` of an API error, if the server sent one.
    pub fn code(&self) -> Option<i64> {
        match self {
            CryptoPayError::Api(error) => error.get("code").and_then(Value::as_i64),
            _ => None,
        }
    }

    /// The `name` of an API error (e.g. `INVOICES_NOT_FOUND`), if the server sent one.
    pub fn name(&self) -> Option<&str> {
        match self {
            CryptoPayError::Api(error) => error.get("name").and_then(Value::as_str),
            _ => None,
        }
    }
}

/// Result type alias for Crypto Pay operations.
pub type Result<T> = std::result::Result<T, CryptoPayError>;
