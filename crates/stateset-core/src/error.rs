//! # Error Types
//!
//! Errors raised while constructing core primitives. Transition rejections
//! are not errors of this crate; they live in `stateset-contracts`.

use thiserror::Error;

/// Top-level error type for core primitives.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Canonicalization failed.
    #[error("canonicalization error: {0}")]
    Canonicalization(#[from] CanonicalizationError),

    /// A party key or name failed validation.
    #[error("invalid party: {0}")]
    InvalidParty(String),

    /// A linear identifier could not be parsed.
    #[error("invalid linear id {input:?}: {reason}")]
    InvalidLinearId {
        /// The rejected input.
        input: String,
        /// Parser message.
        reason: String,
    },

    /// A timestamp could not be parsed or was not UTC.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

/// Error during canonical serialization.
#[derive(Error, Debug)]
pub enum CanonicalizationError {
    /// Float values are not permitted in canonical representations.
    #[error("float values are not permitted in canonical representations; use an integer amount: {0}")]
    FloatRejected(f64),

    /// JSON serialization failed.
    #[error("serialization failed: {0}")]
    SerializationFailed(#[from] serde_json::Error),
}
