//! # Party Directory
//!
//! Every party that has appeared on a committed record, with the name it
//! last carried. Rejection messages use the same directory to name missing
//! signers.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::state::AppState;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct PartyEntry {
    pub owning_key: String,
    pub name: String,
}

/// Build the parties router.
pub fn router() -> Router<AppState> {
    Router::new().route("/v1/parties", get(list_parties))
}

/// GET /v1/parties: Known parties, sorted by key.
#[utoipa::path(
    get,
    path = "/v1/parties",
    responses((status = 200, description = "Known parties", body = Vec<PartyEntry>)),
    tag = "parties"
)]
pub async fn list_parties(State(state): State<AppState>) -> Json<Vec<PartyEntry>> {
    let mut entries: Vec<PartyEntry> = state
        .parties
        .entries()
        .into_iter()
        .map(|(key, name)| PartyEntry {
            owning_key: key.to_string(),
            name,
        })
        .collect();
    entries.sort_by(|a, b| a.owning_key.cmp(&b.owning_key));
    Json(entries)
}
