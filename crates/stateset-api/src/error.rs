//! # API Error Types
//!
//! Structured error type implementing `axum::response::IntoResponse`.
//! Contract rejections become 422 responses whose `details` carry the
//! serialized [`RejectReason`]; everything else maps to the usual status
//! codes. Internal error details are never returned to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use stateset_contracts::{describe_rejection, RejectReason, SignerDirectory};
use thiserror::Error;
use utoipa::ToSchema;

/// Structured JSON error response body.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: ErrorDetail,
}

/// Inner error detail.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorDetail {
    /// Machine-readable error code (e.g., "NOT_FOUND", "MISSING_SIGNERS").
    pub code: String,
    /// Human-readable error message.
    pub message: String,
    /// The rejection reason, present only for 422 responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Application-level error type that implements [`IntoResponse`] for Axum.
#[derive(Error, Debug)]
pub enum AppError {
    /// Resource not found (404).
    #[error("not found: {0}")]
    NotFound(String),

    /// The contract rejected the proposed transition (422).
    #[error("{message}")]
    Rejected {
        reason: RejectReason,
        message: String,
    },

    /// Request body or parameters could not be parsed (400).
    #[error("bad request: {0}")]
    BadRequest(String),

    /// Authentication failure: missing or invalid token (401).
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// Conflict with current vault contents (409).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Internal server error (500). Message is logged but not returned to client.
    #[error("internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// A rejection whose message names parties the directory knows.
    pub fn rejected<D: SignerDirectory + ?Sized>(reason: RejectReason, directory: &D) -> Self {
        let message = describe_rejection(&reason, directory);
        Self::Rejected { reason, message }
    }

    /// Return the HTTP status code and machine-readable error code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            Self::Rejected { reason, .. } => (StatusCode::UNPROCESSABLE_ENTITY, reason.code()),
            Self::BadRequest(_) => (StatusCode::BAD_REQUEST, "BAD_REQUEST"),
            Self::Unauthorized(_) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            Self::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            Self::Internal(_) => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        }
    }
}

impl From<RejectReason> for AppError {
    fn from(reason: RejectReason) -> Self {
        let message = reason.to_string();
        Self::Rejected { reason, message }
    }
}

impl From<stateset_core::CoreError> for AppError {
    fn from(err: stateset_core::CoreError) -> Self {
        match err {
            stateset_core::CoreError::Canonicalization(e) => Self::Internal(e.to_string()),
            other => Self::BadRequest(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        let message = match &self {
            Self::Internal(_) => "An internal error occurred".to_string(),
            other => other.to_string(),
        };

        if matches!(&self, Self::Internal(_)) {
            tracing::error!(error = %self, "internal server error");
        }

        let details = match &self {
            Self::Rejected { reason, .. } => serde_json::to_value(reason).ok(),
            _ => None,
        };

        let body = ErrorBody {
            error: ErrorDetail {
                code: code.to_string(),
                message,
                details,
            },
        };

        (status, Json(body)).into_response()
    }
}
