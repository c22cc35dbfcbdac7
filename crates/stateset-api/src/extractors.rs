//! # Custom Extractors & Validation
//!
//! Provides the [`Validate`] trait for request DTOs and helpers to extract
//! JSON bodies and query parameters with errors in the API's error shape.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::Query;
use axum::Json;
use stateset_contracts::SignerSet;
use stateset_core::PartyKey;

use crate::error::AppError;

/// Request types that check rules serde cannot express.
pub trait Validate {
    fn validate(&self) -> Result<(), String>;
}

/// Extract a JSON body, mapping deserialization errors to [`AppError::BadRequest`].
pub fn extract_json<T>(result: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    result
        .map(|Json(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Extract a JSON body and validate it using the [`Validate`] trait.
pub fn extract_validated_json<T: Validate>(
    result: Result<Json<T>, JsonRejection>,
) -> Result<T, AppError> {
    let value = extract_json(result)?;
    value.validate().map_err(AppError::BadRequest)?;
    Ok(value)
}

/// Extract query parameters, mapping errors to [`AppError::BadRequest`].
pub fn extract_query<T>(result: Result<Query<T>, QueryRejection>) -> Result<T, AppError> {
    result
        .map(|Query(v)| v)
        .map_err(|err| AppError::BadRequest(err.body_text()))
}

/// Parse an optional key filter such as `?owner=`.
pub fn parse_key_filter(raw: Option<&str>) -> Result<Option<PartyKey>, AppError> {
    raw.map(PartyKey::new).transpose().map_err(AppError::from)
}

/// Reject signer lists that repeat a key; a set would silently hide the typo.
pub fn signer_set(keys: &[PartyKey]) -> Result<SignerSet, String> {
    let set: SignerSet = keys.iter().cloned().collect();
    if set.len() != keys.len() {
        return Err("signers must not contain duplicates".to_string());
    }
    Ok(set)
}
