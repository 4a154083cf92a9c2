//! Errors returned by `ListsClient` parse and build methods.
//!
//! The server answers every failure with `{ "error": message }`. Statuses the
//! caller reacts to differently get their own variant; the message is kept
//! when the body carries one.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    /// 401: missing, malformed or expired token, or a wrong password.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 400: the server refused the request, e.g. a validation failure or a
    /// list that does not exist.
    #[error("{0}")]
    Rejected(String),

    /// 409: the account changed since it was loaded. Retrying is safe.
    #[error("conflict: {0}")]
    Conflict(String),

    /// Any other unexpected status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    #[error("serialization failed: {0}")]
    SerializationError(String),
}
