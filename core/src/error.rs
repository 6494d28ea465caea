//! Error types for the marketplace client core.
//!
//! # Design
//! `NotFound` gets a dedicated variant because screens distinguish "the record
//! is gone" from "the server returned an unexpected status". Every other
//! non-2xx response lands in `HttpError` with the raw status and body. None of
//! these are retried and none of them touch the credential cache.

use thiserror::Error;

use crate::session::StorageError;

/// Errors returned by `MarketplaceClient` build and parse methods.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// An operation that addresses a single record was called without an id.
    #[error("operation {0} requires a record id")]
    MissingId(&'static str),

    /// Create or update was called without a request body.
    #[error("operation {0} requires a request body")]
    MissingBody(&'static str),

    /// The credential cache could not persist a value.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl ApiError {
    /// HTTP status carried by the error, if the server produced one.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound => Some(404),
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}
