//! # OpenAPI Specification Assembly
//!
//! Assembles all utoipa-documented routes into a single OpenAPI 3.1 spec,
//! served at `/openapi.json`. Ledger records appear as free-form objects;
//! their field lists are documented on the record types themselves.

use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

use crate::state::AppState;

/// Assembled OpenAPI spec for the entire API surface.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Stateset API",
        version = "0.1.0",
        description = "Account and agreement ledger. Every mutation is validated by the transition contracts before it is committed.",
        license(name = "Apache-2.0")
    ),
    paths(
        // Accounts
        crate::routes::accounts::list_accounts,
        crate::routes::accounts::create_account,
        crate::routes::accounts::get_account,
        crate::routes::accounts::transfer_account,
        crate::routes::accounts::share_account,
        crate::routes::accounts::delete_account,
        // Agreements
        crate::routes::agreements::list_agreements,
        crate::routes::agreements::create_agreement,
        crate::routes::agreements::get_agreement,
        crate::routes::agreements::agreement_history,
        crate::routes::agreements::apply_action,
        // Transitions
        crate::routes::transitions::validate_transition,
        // Parties
        crate::routes::parties::list_parties,
    ),
    components(schemas(
        crate::error::ErrorBody,
        crate::error::ErrorDetail,
        crate::routes::SignedRequest,
        crate::routes::accounts::CreateAccountRequest,
        crate::routes::accounts::TransferAccountRequest,
        crate::routes::accounts::AccountView,
        crate::routes::agreements::CreateAgreementRequest,
        crate::routes::agreements::AgreementView,
        crate::routes::agreements::HistoryEntry,
        crate::routes::transitions::ProposalBody,
        crate::routes::transitions::ValidateResponse,
        crate::routes::parties::PartyEntry,
    )),
    tags(
        (name = "accounts", description = "Account lifecycle"),
        (name = "agreements", description = "Agreement lifecycle"),
        (name = "transitions", description = "Dry-run validation of proposed transactions"),
        (name = "parties", description = "Known participants"),
    )
)]
pub struct ApiDoc;

/// Build the OpenAPI router.
pub fn router() -> Router<AppState> {
    Router::new().route("/openapi.json", get(openapi_json))
}

/// GET /openapi.json: Return the generated OpenAPI specification.
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&String> = spec.paths.paths.keys().collect();
        for expected in [
            "/v1/accounts",
            "/v1/accounts/{account_id}",
            "/v1/accounts/{account_id}/transfer",
            "/v1/accounts/{account_id}/share",
            "/v1/accounts/{account_id}/delete",
            "/v1/agreements",
            "/v1/agreements/{linear_id}",
            "/v1/agreements/{linear_id}/history",
            "/v1/agreements/{linear_id}/{action}",
            "/v1/transitions/validate",
            "/v1/parties",
        ] {
            assert!(paths.iter().any(|p| p.as_str() == expected), "missing {expected}");
        }
    }

    #[test]
    fn dry_run_documents_its_request_body() {
        let spec = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let body = &spec["paths"]["/v1/transitions/validate"]["post"]["requestBody"];
        assert!(body.is_object(), "validate route has no request body: {body}");
        assert!(spec["components"]["schemas"]["ProposalBody"].is_object());
    }
}
