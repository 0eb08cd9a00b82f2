//! Error types for the Maximo activity client.
//!
//! # Design
//! Two kinds of failure reach the host: input validation errors, raised
//! before any request is built, and request errors, raised when Maximo
//! answers with a non-2xx status. The remaining variants cover JSON and
//! transport failures around those two.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

/// A non-2xx response from Maximo.
///
/// `error` holds the best-effort parsed error body (the `Error` member of
/// Maximo's envelope when present, otherwise the whole body).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestError {
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(message) => write!(f, "{message}"),
            None => write!(f, "Maximo request failed."),
        }
    }
}

impl std::error::Error for RequestError {}

/// Errors returned by request builders, response parsers and activities.
#[derive(Debug, thiserror::Error)]
pub enum MaximoError {
    /// A required activity input was absent or empty.
    #[error("{0} is required")]
    MissingInput(&'static str),

    /// An activity input was present but unusable.
    #[error("{0}")]
    InvalidInput(String),

    /// The service descriptor cannot be used to build a request.
    #[error("{0}")]
    Config(String),

    /// Maximo returned a non-2xx status.
    #[error(transparent)]
    Request(#[from] RequestError),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The transport could not complete the round-trip.
    #[error("transport failed: {0}")]
    Transport(String),

    /// No activity is registered under this name.
    #[error("unknown activity: {0}")]
    UnknownActivity(String),
}

impl MaximoError {
    /// HTTP status carried by a request error, if any.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            MaximoError::Request(err) => Some(err.status_code),
            _ => None,
        }
    }
}
