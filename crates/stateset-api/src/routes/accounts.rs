//! # Account API
//!
//! Create, transfer, share and delete accounts. Deletion removes the
//! account from the vault; its history goes with it.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use stateset_contracts::{
    Account, AccountIntent, Contract, Intent, RecordSchema, SignerSet,
};
use stateset_core::{Party, PartyKey, Timestamp};
use utoipa::ToSchema;

use crate::error::AppError;
use crate::extractors::{extract_query, extract_validated_json, parse_key_filter, signer_set, Validate};
use crate::middleware::metrics::record_verdict;
use crate::routes::{require_non_empty, SignedRequest};
use crate::state::{AppState, Versioned};

/// Request to open an account.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(value_type = Object)]
    pub account: Account,
    #[schema(value_type = Vec<String>)]
    pub signers: Vec<PartyKey>,
}

impl Validate for CreateAccountRequest {
    fn validate(&self) -> Result<(), String> {
        require_non_empty("account.name", &self.account.name)?;
        signer_set(&self.signers).map(|_| ())
    }
}

/// Request to hand an account to a new controller.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TransferAccountRequest {
    #[schema(value_type = Object)]
    pub controller: Party,
    #[schema(value_type = Vec<String>)]
    pub signers: Vec<PartyKey>,
}

impl Validate for TransferAccountRequest {
    fn validate(&self) -> Result<(), String> {
        signer_set(&self.signers).map(|_| ())
    }
}

/// `?owner=` filter.
#[derive(Debug, Deserialize)]
pub struct OwnerQuery {
    pub owner: Option<String>,
}

/// An account version as stored in the vault.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AccountView {
    #[schema(value_type = Object)]
    pub account: Account,
    /// `sha256:<hex>` content address of this version.
    pub digest: String,
    pub committed_at: String,
    /// Number of versions this one superseded.
    pub superseded: usize,
}

impl From<&Versioned<Account>> for AccountView {
    fn from(v: &Versioned<Account>) -> Self {
        Self {
            account: v.current.clone(),
            digest: v.digest.to_string(),
            committed_at: v.committed_at.to_string(),
            superseded: v.history.len(),
        }
    }
}

/// Build the accounts router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/v1/accounts", get(list_accounts).post(create_account))
        .route("/v1/accounts/{account_id}", get(get_account))
        .route("/v1/accounts/{account_id}/transfer", post(transfer_account))
        .route("/v1/accounts/{account_id}/share", post(share_account))
        .route("/v1/accounts/{account_id}/delete", post(delete_account))
}

fn run_contract(
    state: &AppState,
    intent: AccountIntent,
    consumed: &[Account],
    produced: &[Account],
    supplied: &SignerSet,
) -> Result<(), AppError> {
    let verdict = state.contracts.account.validate(intent, consumed, produced, supplied);
    record_verdict(Account::FAMILY, intent.command_name(), &verdict);
    verdict.map_err(|reason| AppError::rejected(reason, state))
}

fn not_found(account_id: &str) -> AppError {
    AppError::NotFound(format!("account {account_id} not found"))
}

/// Consume the current version and commit its successor.
fn evolve(
    state: &AppState,
    account_id: &str,
    intent: AccountIntent,
    supplied: &SignerSet,
    successor: impl FnOnce(&Account) -> Account,
) -> Result<AccountView, AppError> {
    let view = state
        .accounts
        .try_update(&account_id.to_string(), |entry| {
            let next = successor(&entry.current);
            run_contract(
                state,
                intent,
                std::slice::from_ref(&entry.current),
                std::slice::from_ref(&next),
                supplied,
            )?;
            entry.supersede(next, intent.command_name(), Timestamp::now())?;
            Ok::<_, AppError>(AccountView::from(&*entry))
        })
        .ok_or_else(|| not_found(account_id))??;

    state.register_parties(view.account.participants());
    tracing::info!(account_id, intent = intent.command_name(), digest = %view.digest, "account committed");
    Ok(view)
}

/// GET /v1/accounts: List accounts, optionally by controller key.
#[utoipa::path(
    get,
    path = "/v1/accounts",
    params(("owner" = Option<String>, Query, description = "Controller key filter")),
    responses(
        (status = 200, description = "Accounts", body = Vec<AccountView>),
        (status = 400, description = "Invalid filter", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn list_accounts(
    State(state): State<AppState>,
    query: Result<Query<OwnerQuery>, QueryRejection>,
) -> Result<Json<Vec<AccountView>>, AppError> {
    let query = extract_query(query)?;
    let owner = parse_key_filter(query.owner.as_deref())?;
    let mut views: Vec<AccountView> = state
        .accounts
        .list()
        .iter()
        .filter(|v| {
            owner
                .as_ref()
                .map_or(true, |key| &v.current.controller.owning_key == key)
        })
        .map(AccountView::from)
        .collect();
    views.sort_by(|a, b| a.account.account_id.cmp(&b.account.account_id));
    Ok(Json(views))
}

/// POST /v1/accounts: Open an account (`CreateAccount`).
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = AccountView),
        (status = 409, description = "Account id already in use", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn create_account(
    State(state): State<AppState>,
    body: Result<Json<CreateAccountRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AccountView>), AppError> {
    let req = extract_validated_json(body)?;
    let supplied: SignerSet = req.signers.iter().cloned().collect();
    let intent = AccountIntent::Create;

    run_contract(&state, intent, &[], std::slice::from_ref(&req.account), &supplied)?;

    let account_id = req.account.account_id.clone();
    let entry = Versioned::issue(req.account, Timestamp::now())?;
    let view = AccountView::from(&entry);
    if !state.accounts.insert_new(account_id.clone(), entry) {
        return Err(AppError::Conflict(format!("account {account_id} already exists")));
    }

    state.register_parties(view.account.participants());
    tracing::info!(account_id = %account_id, digest = %view.digest, "account created");
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /v1/accounts/{account_id}: Current version of an account.
#[utoipa::path(
    get,
    path = "/v1/accounts/{account_id}",
    params(("account_id" = String, Path, description = "Account identifier")),
    responses(
        (status = 200, description = "Account found", body = AccountView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn get_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
) -> Result<Json<AccountView>, AppError> {
    state
        .accounts
        .get(&account_id)
        .map(|v| Json(AccountView::from(&v)))
        .ok_or_else(|| not_found(&account_id))
}

/// POST /v1/accounts/{account_id}/transfer: Change controller (`TransferAccount`).
#[utoipa::path(
    post,
    path = "/v1/accounts/{account_id}/transfer",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = TransferAccountRequest,
    responses(
        (status = 200, description = "Transfer committed", body = AccountView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn transfer_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<TransferAccountRequest>, JsonRejection>,
) -> Result<Json<AccountView>, AppError> {
    let req = extract_validated_json(body)?;
    let supplied: SignerSet = req.signers.iter().cloned().collect();
    let controller = req.controller;
    let view = evolve(&state, &account_id, AccountIntent::Transfer, &supplied, |prior| Account {
        controller,
        ..prior.clone()
    })?;
    Ok(Json(view))
}

/// POST /v1/accounts/{account_id}/share: Re-share with the processor (`ShareAccount`).
#[utoipa::path(
    post,
    path = "/v1/accounts/{account_id}/share",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = SignedRequest,
    responses(
        (status = 200, description = "Share committed", body = AccountView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn share_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<SignedRequest>, JsonRejection>,
) -> Result<Json<AccountView>, AppError> {
    let req = extract_validated_json(body)?;
    let view = evolve(
        &state,
        &account_id,
        AccountIntent::Share,
        &req.signer_set(),
        Account::clone,
    )?;
    Ok(Json(view))
}

/// POST /v1/accounts/{account_id}/delete: Retire an account (`DeleteAccount`).
#[utoipa::path(
    post,
    path = "/v1/accounts/{account_id}/delete",
    params(("account_id" = String, Path, description = "Account identifier")),
    request_body = SignedRequest,
    responses(
        (status = 200, description = "Final version, now consumed", body = AccountView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody),
        (status = 422, description = "Transition rejected", body = crate::error::ErrorBody),
    ),
    tag = "accounts"
)]
pub async fn delete_account(
    State(state): State<AppState>,
    Path(account_id): Path<String>,
    body: Result<Json<SignedRequest>, JsonRejection>,
) -> Result<Json<AccountView>, AppError> {
    let req = extract_validated_json(body)?;
    let supplied = req.signer_set();
    let intent = AccountIntent::Delete;
    let (removed, ()) = state
        .accounts
        .try_remove(&account_id, |entry| {
            run_contract(&state, intent, std::slice::from_ref(&entry.current), &[], &supplied)
        })
        .ok_or_else(|| not_found(&account_id))??;

    tracing::info!(account_id = %account_id, "account deleted");
    Ok(Json(AccountView::from(&removed)))
}
