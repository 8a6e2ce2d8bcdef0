//! Decision and domain-error mapping onto HTTP responses.

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use formlane_authz::{Decision, DenialKind};
use formlane_core::DomainError;

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Map a denial to a status code.
///
/// The decision's structured denial kind decides; reason strings are for
/// display only and are never matched on.
pub fn decision_to_response(decision: &Decision) -> axum::response::Response {
    let reason = decision
        .reason
        .clone()
        .unwrap_or_else(|| "Access denied".to_string());

    match decision.denial {
        Some(DenialKind::NotFound) => json_error(StatusCode::NOT_FOUND, "not_found", reason),
        Some(DenialKind::Configuration) | Some(DenialKind::Internal) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", reason)
        }
        Some(DenialKind::Unauthorized) | None => {
            json_error(StatusCode::FORBIDDEN, "forbidden", reason)
        }
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        DomainError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        DomainError::Validation(msg) => {
            json_error(StatusCode::BAD_REQUEST, "validation_error", msg)
        }
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
    }
}
