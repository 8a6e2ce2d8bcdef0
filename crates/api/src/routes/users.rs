//! User endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};

use formlane_authz::{Action, ResourceKind};
use formlane_core::UserId;

use crate::app::AppState;
use crate::context::Caller;
use crate::errors;
use crate::guard;

pub fn router() -> Router {
    Router::new().route("/:id", get(get_user))
}

async fn get_user(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::User, Action::Read, &ctx).await {
        return resp;
    }

    let Ok(user_id) = UserId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed user id");
    };
    match state.store.user(user_id) {
        Some(record) => Json(record).into_response(),
        None => errors::json_error(StatusCode::NOT_FOUND, "not_found", "User not found"),
    }
}
