//! # Integration Tests for stateset-api
//!
//! Drives the full router with `oneshot`: account and agreement lifecycles,
//! rejection responses, the dry-run endpoint, authentication, and the
//! OpenAPI document.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stateset_api::auth::SecretToken;
use stateset_api::config::AppConfig;
use stateset_api::state::AppState;

/// Helper: build the test app with auth disabled and no metrics recorder.
fn test_app() -> axum::Router {
    stateset_api::app(AppState::new())
}

/// Helper: build the test app with auth enabled.
fn test_app_with_auth(token: &str) -> axum::Router {
    let config = AppConfig {
        auth_token: Some(SecretToken::new(token)),
        ..AppConfig::default()
    };
    stateset_api::app(AppState::with_config(config, None))
}

/// Helper: read response body as string.
async fn body_string(response: axum::http::Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

/// Helper: send a request and decode the JSON reply.
async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(v) => builder
            .header("content-type", "application/json")
            .body(Body::from(v.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let text = body_string(response).await;
    let value = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap_or(Value::String(text))
    };
    (status, value)
}

fn account_json(id: &str) -> Value {
    json!({
        "account_id": id,
        "name": "Northwind Grocers",
        "business_type": "Grocery",
        "industry": "Retail",
        "phone": "555-0100",
        "year_started": 1999,
        "annual_revenue": 1200000,
        "address": "2 Elm St",
        "city": "Austin",
        "state": "TX",
        "zip_code": "73301",
        "controller": {"name": "Owner", "owning_key": "k-owner"},
        "processor": {"name": "Bank", "owning_key": "k-bank"}
    })
}

fn agreement_request(signers: &[&str]) -> Value {
    json!({
        "number": "AGR-100",
        "name": "Master services",
        "hash": "9f86d081",
        "agreement_type": "MSA",
        "value": 250000,
        "party": {"name": "Seller Co", "owning_key": "k-seller"},
        "counterparty": {"name": "Buyer Co", "owning_key": "k-buyer"},
        "start_date": "2026-01-01T00:00:00Z",
        "end_date": "2027-01-01T00:00:00Z",
        "signers": signers
    })
}

async fn create_account(app: &axum::Router, id: &str) {
    let (status, _) = send(
        app,
        "POST",
        "/v1/accounts",
        Some(json!({"account": account_json(id), "signers": ["k-owner"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_agreement(app: &axum::Router) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/v1/agreements",
        Some(agreement_request(&["k-seller", "k-buyer"])),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["agreement"]["linear_id"].as_str().unwrap().to_string()
}

// -- Health Checks ------------------------------------------------------------

#[tokio::test]
async fn test_liveness_check() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health/liveness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ok");
}

#[tokio::test]
async fn test_readiness_check() {
    let app = test_app();
    let response = app
        .oneshot(Request::builder().uri("/health/readiness").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "ready");
}

// -- Accounts -----------------------------------------------------------------

#[tokio::test]
async fn test_create_and_get_account() {
    let app = test_app();
    create_account(&app, "ACC-1").await;

    let (status, body) = send(&app, "GET", "/v1/accounts/ACC-1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["controller"]["owning_key"], "k-owner");
    assert!(body["digest"].as_str().unwrap().starts_with("sha256:"));
    assert_eq!(body["superseded"], 0);
}

#[tokio::test]
async fn test_duplicate_account_conflicts() {
    let app = test_app();
    create_account(&app, "ACC-1").await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts",
        Some(json!({"account": account_json("ACC-1"), "signers": ["k-owner"]})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"]["code"], "CONFLICT");
}

#[tokio::test]
async fn test_unsigned_account_create_is_rejected() {
    let app = test_app();
    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts",
        Some(json!({"account": account_json("ACC-1"), "signers": ["k-bank"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MISSING_SIGNERS");
    assert_eq!(body["error"]["details"]["code"], "MISSING_SIGNERS");

    let (status, _) = send(&app, "GET", "/v1/accounts/ACC-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_rejection_message_names_known_party() {
    let app = test_app();
    create_account(&app, "ACC-1").await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/share",
        Some(json!({"signers": []})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        body["error"]["message"],
        "transaction must also be signed by Owner (k-owner)"
    );
}

#[tokio::test]
async fn test_transfer_requires_new_controller() {
    let app = test_app();
    create_account(&app, "ACC-1").await;
    let new_controller = json!({"name": "Heir", "owning_key": "k-heir"});

    let (status, _) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/transfer",
        Some(json!({"controller": new_controller, "signers": ["k-owner"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/transfer",
        Some(json!({"controller": new_controller, "signers": ["k-heir"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["controller"]["owning_key"], "k-heir");
    assert_eq!(body["superseded"], 1);

    let (_, list) = send(&app, "GET", "/v1/accounts?owner=k-heir", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = send(&app, "GET", "/v1/accounts?owner=k-owner", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_account() {
    let app = test_app();
    create_account(&app, "ACC-1").await;

    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/delete",
        Some(json!({"signers": ["k-bank"]})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MISSING_SIGNERS");

    let (status, _) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/delete",
        Some(json!({"signers": ["k-owner"]})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, "GET", "/v1/accounts/ACC-1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_duplicate_signers_are_bad_request() {
    let app = test_app();
    create_account(&app, "ACC-1").await;
    let (status, body) = send(
        &app,
        "POST",
        "/v1/accounts/ACC-1/share",
        Some(json!({"signers": ["k-owner", "k-owner"]})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Agreements ---------------------------------------------------------------

#[tokio::test]
async fn test_create_agreement_assigns_request_status() {
    let app = test_app();
    let id = create_agreement(&app).await;

    let (status, body) = send(&app, "GET", &format!("/v1/agreements/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agreement"]["status"], "REQUEST");
    assert!(body["agreement"]["created_at"].is_string());
    assert!(body["summary"].as_str().unwrap().contains("Buyer Co has a contract with Seller Co"));
}

#[tokio::test]
async fn test_create_agreement_needs_both_parties() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/v1/agreements", Some(agreement_request(&["k-seller"]))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "MISSING_SIGNERS");
}

#[tokio::test]
async fn test_agreement_lifecycle_and_history() {
    let app = test_app();
    let id = create_agreement(&app).await;
    let signed = json!({"signers": ["k-seller", "k-buyer"]});

    let (status, body) = send(&app, "POST", &format!("/v1/agreements/{id}/activate"), Some(signed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agreement"]["status"], "INEFFECT");

    let (status, body) = send(&app, "POST", &format!("/v1/agreements/{id}/renew"), Some(signed.clone())).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["agreement"]["status"], "RENEWED");

    let (status, history) = send(&app, "GET", &format!("/v1/agreements/{id}/history"), None).await;
    assert_eq!(status, StatusCode::OK);
    let chain = history.as_array().unwrap();
    assert_eq!(chain.len(), 3);
    assert_eq!(chain[0]["agreement"]["status"], "REQUEST");
    assert_eq!(chain[0]["consumed_by"], "ActivateAgreement");
    assert_eq!(chain[1]["consumed_by"], "RenewAgreement");
    assert!(chain[2].get("consumed_by").is_none());
}

#[tokio::test]
async fn test_illegal_status_step_is_rejected() {
    let app = test_app();
    let id = create_agreement(&app).await;
    let signed = json!({"signers": []});

    let (status, _) = send(&app, "POST", &format!("/v1/agreements/{id}/review"), Some(signed.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", &format!("/v1/agreements/{id}/activate"), Some(signed)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "ILLEGAL_STATUS_TRANSITION");
    assert_eq!(body["error"]["details"]["from"], "IN_REVIEW");
    assert_eq!(body["error"]["details"]["to"], "INEFFECT");

    let (_, current) = send(&app, "GET", &format!("/v1/agreements/{id}"), None).await;
    assert_eq!(current["agreement"]["status"], "IN_REVIEW");
}

#[tokio::test]
async fn test_unknown_action_and_malformed_id() {
    let app = test_app();
    let id = create_agreement(&app).await;
    let signed = json!({"signers": []});

    let (status, _) = send(&app, "POST", &format!("/v1/agreements/{id}/approve"), Some(signed.clone())).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "GET", "/v1/agreements/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        "POST",
        "/v1/agreements/00000000-0000-0000-0000-000000000000/activate",
        Some(signed),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_list_agreements_by_party() {
    let app = test_app();
    create_agreement(&app).await;

    let (_, list) = send(&app, "GET", "/v1/agreements?party=k-buyer", None).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    let (_, list) = send(&app, "GET", "/v1/agreements?party=k-stranger", None).await;
    assert!(list.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_parties_are_registered_on_commit() {
    let app = test_app();
    create_agreement(&app).await;

    let (status, body) = send(&app, "GET", "/v1/parties", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!([
            {"owning_key": "k-buyer", "name": "Buyer Co"},
            {"owning_key": "k-seller", "name": "Seller Co"}
        ])
    );
}

// -- Dry Run ------------------------------------------------------------------

#[tokio::test]
async fn test_dry_run_accepts_without_committing() {
    let app = test_app();
    let proposal = json!({
        "family": "account",
        "commands": ["CreateAccount"],
        "produced": [account_json("ACC-9")],
        "signers": ["k-owner"]
    });
    let (status, body) = send(&app, "POST", "/v1/transitions/validate", Some(proposal)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"accepted": true, "family": "account", "intent": "CreateAccount"}));

    let (status, _) = send(&app, "GET", "/v1/accounts/ACC-9", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_dry_run_rejects_ambiguous_commands() {
    let app = test_app();
    let proposal = json!({
        "family": "account",
        "commands": ["CreateAccount", "ShareAccount"],
        "produced": [account_json("ACC-9")],
        "signers": ["k-owner"]
    });
    let (status, body) = send(&app, "POST", "/v1/transitions/validate", Some(proposal)).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["error"]["code"], "UNRECOGNIZED_COMMAND");
}

#[tokio::test]
async fn test_dry_run_malformed_body() {
    let app = test_app();
    let (status, body) = send(&app, "POST", "/v1/transitions/validate", Some(json!({"family": "ledger"}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "BAD_REQUEST");
}

// -- Auth, OpenAPI, Metrics ---------------------------------------------------

#[tokio::test]
async fn test_auth_required_when_configured() {
    let app = test_app_with_auth("s3cret");

    let (status, body) = send(&app, "GET", "/v1/parties", None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"]["code"], "UNAUTHORIZED");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/v1/parties")
                .header("authorization", "Bearer s3cret")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = send(&app, "GET", "/health/liveness", None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_openapi_spec() {
    let app = test_app();
    let (status, body) = send(&app, "GET", "/openapi.json", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["info"]["title"], "Stateset API");
    assert!(body["paths"]["/v1/transitions/validate"].is_object());
}

#[tokio::test]
async fn test_metrics_unavailable_without_recorder() {
    let app = test_app();
    let (status, _) = send(&app, "GET", "/metrics", None).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}
