//! # Prometheus Metrics
//!
//! Counters go through the `metrics` facade. The binary installs a
//! Prometheus recorder and hands its [`PrometheusHandle`] to the state so
//! `GET /metrics` can render it; without a recorder the counters are no-ops.
//!
//! | Counter | Labels |
//! |---|---|
//! | `stateset_http_requests_total` | `method`, `status` |
//! | `stateset_http_errors_total` | `method`, `status` |
//! | `stateset_transitions_total` | `family`, `intent`, `outcome` |
//! | `stateset_auth_failures_total` | none |

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use stateset_contracts::{RecordFamily, RejectReason};

/// Install the process-wide Prometheus recorder.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

/// Middleware that counts requests and error responses.
pub async fn metrics_middleware(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_string();
    let response = next.run(request).await;
    let status = response.status();

    metrics::counter!(
        "stateset_http_requests_total",
        "method" => method.clone(),
        "status" => status.as_u16().to_string()
    )
    .increment(1);
    if status.is_client_error() || status.is_server_error() {
        metrics::counter!(
            "stateset_http_errors_total",
            "method" => method,
            "status" => status.as_u16().to_string()
        )
        .increment(1);
    }

    response
}

/// Count one contract verdict.
pub fn record_verdict(family: RecordFamily, intent: &'static str, verdict: &Result<(), RejectReason>) {
    let outcome = match verdict {
        Ok(()) => "accepted",
        Err(reason) => reason.code(),
    };
    metrics::counter!(
        "stateset_transitions_total",
        "family" => family.as_str(),
        "intent" => intent,
        "outcome" => outcome
    )
    .increment(1);
}

/// Render the Prometheus exposition text, or 503 if no recorder is installed.
pub fn render(handle: Option<&PrometheusHandle>) -> Response {
    match handle {
        Some(h) => (
            [(axum::http::header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            h.render(),
        )
            .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, "metrics recorder not installed").into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;

    #[tokio::test]
    async fn render_without_recorder_is_unavailable() {
        let response = render(None);
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn render_with_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            record_verdict(
                RecordFamily::Agreement,
                "ActivateAgreement",
                &Err(RejectReason::structural("x")),
            );
        });
        let response = render(Some(&handle));
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("stateset_transitions_total"));
        assert!(text.contains("outcome=\"STRUCTURAL_VIOLATION\""));
    }
}
