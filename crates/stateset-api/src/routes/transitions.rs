//! # Transition Dry Run
//!
//! `POST /v1/transitions/validate` runs a full proposal through the contract
//! engine without touching the vault. Callers use it to check a transaction
//! they intend to finalise elsewhere.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stateset_contracts::Proposal;
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::extract_json;
use crate::middleware::metrics::record_verdict;
use crate::state::AppState;

/// A proposal as submitted for a dry run: `family`, `commands`,
/// `consumed`, `produced` and `signers`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(transparent)]
#[schema(value_type = Object)]
pub struct ProposalBody(pub Proposal);

/// Outcome of an accepted dry run.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ValidateResponse {
    pub accepted: bool,
    /// `account` or `agreement`.
    pub family: String,
    /// Command name of the resolved intent.
    pub intent: String,
}

/// Build the transitions router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/transitions/validate", post(validate_transition))
}

/// POST /v1/transitions/validate: Validate a proposal without committing it.
#[utoipa::path(
    post,
    path = "/v1/transitions/validate",
    request_body = ProposalBody,
    responses(
        (status = 200, description = "Proposal accepted", body = ValidateResponse),
        (status = 400, description = "Malformed proposal", body = crate::error::ErrorBody),
        (status = 422, description = "Proposal rejected", body = crate::error::ErrorBody),
    ),
    tag = "transitions"
)]
pub async fn validate_transition(
    State(state): State<AppState>,
    body: Result<Json<ProposalBody>, JsonRejection>,
) -> Result<Json<ValidateResponse>, AppError> {
    let ProposalBody(proposal) = extract_json(body)?;
    let family = proposal.family();

    let verdict = proposal.validate(&state.contracts);
    let intent = verdict.as_ref().map_or("dry_run", |a| a.intent);
    record_verdict(family, intent, &verdict.as_ref().map(|_| ()).map_err(Clone::clone));

    let accepted = verdict.map_err(|reason| AppError::rejected(reason, &state))?;
    tracing::debug!(%family, intent, "dry run accepted");
    Ok(Json(ValidateResponse {
        accepted: true,
        family: accepted.family.to_string(),
        intent: accepted.intent.to_string(),
    }))
}
