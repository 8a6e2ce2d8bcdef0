//! Answer endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

use formlane_authz::{Action, ResourceKind};
use formlane_core::AnswerId;
use formlane_store::ResourceStore;

use crate::app::AppState;
use crate::context::Caller;
use crate::errors;
use crate::guard;

pub fn router() -> Router {
    Router::new().route("/:id", get(get_answer).put(update_answer).delete(delete_answer))
}

async fn get_answer(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Answer, Action::Read, &ctx).await {
        return resp;
    }

    let Ok(answer_id) = AnswerId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed answer id");
    };
    match state.store.answer(answer_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Answer not found"),
        Err(e) => {
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct UpdateAnswer {
    value: String,
}

async fn update_answer(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<UpdateAnswer>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Answer, Action::Update, &ctx).await {
        return resp;
    }

    let Ok(answer_id) = AnswerId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed answer id");
    };
    match state.store.update_answer(answer_id, body.value) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn delete_answer(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Answer, Action::Delete, &ctx).await {
        return resp;
    }

    let Ok(answer_id) = AnswerId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed answer id");
    };
    match state.store.remove_answer(answer_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
