//! # Agreement API
//!
//! Agreements are created in `REQUEST` and move through the lifecycle by
//! POSTing an action to `/v1/agreements/{linear_id}/{action}`. The server
//! computes the successor version from the status rule, so a caller only
//! names the action and supplies endorsements.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stateset_contracts::{
    Agreement, AgreementIntent, AgreementType, Contract, Intent, RecordSchema, SignerSet,
    INITIAL_STATUS,
};
use stateset_core::{LinearId, Party, PartyKey, Timestamp};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, parse_key_filter, signer_set, Validate};
use crate::middleware::metrics::record_verdict;
use crate::routes::{require_non_empty, SignedRequest};
use crate::state::{AppState, Versioned};

// ─── DTOs ────────────────────────────────────────────────────────────

/// Request to propose a new agreement.
///
/// Status, linear id and creation time are assigned by the server.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAgreementRequest {
    pub number: String,
    pub name: String,
    pub hash: String,
    #[schema(value_type = String, example = "MSA")]
    pub agreement_type: AgreementType,
    pub value: i64,
    #[schema(value_type = Object)]
    pub party: Party,
    #[schema(value_type = Object)]
    pub counterparty: Party,
    #[schema(value_type = String, format = DateTime)]
    pub start_date: Timestamp,
    #[schema(value_type = String, format = DateTime)]
    pub end_date: Timestamp,
    #[serde(default)]
    pub active: Option<bool>,
    #[schema(value_type = Vec<String>)]
    pub signers: Vec<PartyKey>,
}

impl Validate for CreateAgreementRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("number", &self.number)?;
        require_non_empty("name", &self.name)?;
        if self.end_date < self.start_date {
            return Err("end_date must not precede start_date".to_string());
        }
        signer_set(&self.signers).map(|_| ())
    }
}

impl CreateAgreementRequest {
    fn into_agreement(self, linear_id: LinearId, now: Timestamp) -> (Agreement, SignerSet) {
        let supplied = self.signers.into_iter().collect();
        let agreement = Agreement {
            number: self.number,
            name: self.name,
            hash: self.hash,
            status: INITIAL_STATUS,
            agreement_type: self.agreement_type,
            value: self.value,
            party: self.party,
            counterparty: self.counterparty,
            start_date: self.start_date,
            end_date: self.end_date,
            active: self.active,
            created_at: Some(now),
            last_updated: None,
            linear_id,
        };
        (agreement, supplied)
    }
}

/// `?party=` filter.
#[derive(Debug, Deserialize)]
pub struct PartyQuery {
    pub party: Option<String>,
}

/// An agreement version as stored in the vault.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AgreementView {
    #[schema(value_type = Object)]
    pub agreement: Agreement,
    /// One-line human summary.
    pub summary: String,
    pub digest: String,
    pub committed_at: String,
    pub superseded: usize,
}

impl From<&Versioned<Agreement>> for AgreementView {
    fn from(v: &Versioned<Agreement>) -> Self {
        Self {
            summary: v.current.to_string(),
            agreement: v.current.clone(),
            digest: v.digest.to_string(),
            committed_at: v.committed_at.to_string(),
            superseded: v.history.len(),
        }
    }
}

/// One entry of an agreement's version chain.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HistoryEntry {
    #[schema(value_type = Object)]
    pub agreement: Agreement,
    pub digest: String,
    /// Command that consumed this version; absent for the live version.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub consumed_at: Option<String>,
}

// ─── Router ──────────────────────────────────────────────────────────

/// Build the agreements router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/agreements", get(list_agreements).post(create_agreement))
        .route("/v1/agreements/{linear_id}", get(get_agreement))
        .route("/v1/agreements/{linear_id}/history", get(agreement_history))
        .route("/v1/agreements/{linear_id}/{action}", post(apply_action))
}

/// Map a path action to its intent. `create` is not an action.
pub fn parse_action(action: &str) -> Option<AgreementIntent> {
    match action {
        "review" => Some(AgreementIntent::Review),
        "activate" => Some(AgreementIntent::Activate),
        "terminate" => Some(AgreementIntent::Terminate),
        "renew" => Some(AgreementIntent::Renew),
        "expire" => Some(AgreementIntent::Expire),
        "amend" => Some(AgreementIntent::Amend),
        _ => None,
    }
}

fn parse_linear_id(raw: &str) -> Result<LinearId, AppError> {
    LinearId::parse(raw).map_err(AppError::from)
}

fn not_found(linear_id: &LinearId) -> AppError {
    AppError::NotFound(format!("agreement {linear_id} not found"))
}

fn run_contract(
    state: &AppState,
    intent: AgreementIntent,
    consumed: &[Agreement],
    produced: &[Agreement],
    supplied: &SignerSet,
) -> Result<(), AppError> {
    let verdict = state
        .contracts
        .agreement
        .validate(intent, consumed, produced, supplied);
    record_verdict(Agreement::FAMILY, intent.command_name(), &verdict);
    verdict.map_err(|reason| AppError::rejected(reason, state))
}

// ─── Handlers ────────────────────────────────────────────────────────

/// GET /v1/agreements: List agreements, optionally by participant key.
#[utoipa::path(
    get,
    path = "/v1/agreements",
    params(("party" = Option<String>, Query, description = "Party or counterparty key")),
    responses(
        (status = 200, description = "Agreements", body = Vec<AgreementView>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "agreements"
)]
pub async fn list_agreements(
    State(state): State<AppState>,
    query: Result<Query<PartyQuery>, QueryRejection>,
) -> Result<Json<Vec<AgreementView>>, AppError> {
    let query = extract_query(query)?;
    let key = parse_key_filter(query.party.as_deref())?;
    let mut views: Vec<AgreementView> = state
        .agreements
        .list()
        .iter()
        .filter(|v| {
            key.as_ref().map_or(true, |k| {
                v.current.participants().iter().any(|p| &p.owning_key == k)
            })
        })
        .map(AgreementView::from)
        .collect();
    views.sort_by(|a, b| {
        a.agreement
            .number
            .cmp(&b.agreement.number)
            .then(a.agreement.linear_id.cmp(&b.agreement.linear_id))
    });
    Ok(Json(views))
}

/// POST /v1/agreements: Propose an agreement (`CreateAgreement`).
#[utoipa::path(
    post,
    path = "/v1/agreements",
    request_body = CreateAgreementRequest,
    responses(
        (status = 201, description = "Agreement created in REQUEST", body = AgreementView),
        (status = 400, description = "Malformed request", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "agreements"
)]
pub async fn create_agreement(
    State(state): State<AppState>,
    body: Result<Json<CreateAgreementRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AgreementView>), AppError> {
    let req = extract_validated_json(body)?;
    let linear_id = LinearId::new();
    let now = Timestamp::now();
    let (agreement, supplied) = req.into_agreement(linear_id, now);

    run_contract(
        &state,
        AgreementIntent::Create,
        &[],
        std::slice::from_ref(&agreement),
        &supplied,
    )?;

    let entry = Versioned::issue(agreement, now)?;
    let view = AgreementView::from(&entry);
    if !state.agreements.insert_new(linear_id, entry) {
        return Err(AppError::Conflict(format!("agreement {linear_id} already exists")));
    }

    state.register_parties(view.agreement.participants());
    tracing::info!(linear_id = %linear_id, number = %view.agreement.number, "agreement created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/agreements/{linear_id}: Current version of an agreement.
#[utoipa::path(
    get,
    path = "/v1/agreements/{linear_id}",
    params(("linear_id" = String, Path, description = "Agreement linear id (UUID)")),
    responses(
        (status = 200, description = "Agreement found", body = AgreementView),
        (status = 400, description = "Malformed id", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "agreements"
)]
pub async fn get_agreement(
    State(state): State<AppState>,
    Path(linear_id): Path<String>,
) -> Result<Json<AgreementView>, AppError> {
    let linear_id = parse_linear_id(&linear_id)?;
    state
        .agreements
        .get(&linear_id)
        .map(|v| Json(AgreementView::from(&v)))
        .ok_or_else(|| not_found(&linear_id))
}

/// GET /v1/agreements/{linear_id}/history: Consumed versions, oldest first,
/// followed by the live version.
#[utoipa::path(
    get,
    path = "/v1/agreements/{linear_id}/history",
    params(("linear_id" = String, Path, description = "Agreement linear id (UUID)")),
    responses(
        (status = 200, description = "Version chain", body = Vec<HistoryEntry>),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "agreements"
)]
pub async fn agreement_history(
    State(state): State<AppState>,
    Path(linear_id): Path<String>,
) -> Result<Json<Vec<HistoryEntry>>, AppError> {
    let linear_id = parse_linear_id(&linear_id)?;
    let entry = state
        .agreements
        .get(&linear_id)
        .ok_or_else(|| not_found(&linear_id))?;

    let mut chain: Vec<HistoryEntry> = entry
        .history
        .into_iter()
        .map(|c| HistoryEntry {
            agreement: c.record,
            digest: c.digest.to_string(),
            consumed_by: Some(c.consumed_by),
            consumed_at: Some(c.consumed_at.to_string()),
        })
        .collect();
    chain.push(HistoryEntry {
        agreement: entry.current,
        digest: entry.digest.to_string(),
        consumed_by: None,
        consumed_at: None,
    });
    Ok(Json(chain))
}

/// POST /v1/agreements/{linear_id}/{action}: Apply a lifecycle action.
///
/// `action` is one of `review`, `activate`, `terminate`, `renew`, `expire`
/// or `amend`.
#[utoipa::path(
    post,
    path = "/v1/agreements/{linear_id}/{action}",
    params(
        ("linear_id" = String, Path, description = "Agreement linear id (UUID)"),
        ("action" = String, Path, description = "review | activate | terminate | renew | expire | amend"),
    ),
    request_body = SignedRequest,
    responses(
        (status = 200, description = "Transition committed", body = AgreementView),
        (status = 404, description = "Unknown agreement or action", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "agreements"
)]
pub async fn apply_action(
    State(state): State<AppState>,
    Path((linear_id, action)): Path<(String, String)>,
    body: Result<Json<SignedRequest>, JsonRejection>,
) -> Result<Json<AgreementView>, AppError> {
    let intent = parse_action(&action)
        .ok_or_else(|| AppError::NotFound(format!("unknown agreement action: {action}")))?;
    let linear_id = parse_linear_id(&linear_id)?;
    let req = extract_validated_json(body)?;
    let supplied = req.signer_set();
    let target = state
        .contracts
        .agreement
        .target_status(intent)
        .ok_or_else(|| AppError::Internal(format!("{intent} has no status rule")))?;

    let view = state
        .agreements
        .try_update(&linear_id, |entry| {
            let next = entry.current.with_status(target);
            run_contract(
                &state,
                intent,
                std::slice::from_ref(&entry.current),
                std::slice::from_ref(&next),
                &supplied,
            )?;
            entry.supersede(next, intent.command_name(), Timestamp::now())?;
            Ok::<_, AppError>(AgreementView::from(&*entry))
        })
        .ok_or_else(|| not_found(&linear_id))??;

    tracing::info!(
        linear_id = %linear_id,
        intent = intent.command_name(),
        status = %view.agreement.status,
        "agreement committed"
    );
    Ok(Json(view))
}
