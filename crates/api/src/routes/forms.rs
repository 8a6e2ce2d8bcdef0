//! Form submission endpoints.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;

use formlane_authz::{Action, CheckRequest, ResourceKind};
use formlane_core::{AnswerId, AnswerRecord, FormId, FormRecord, TemplateId};
use formlane_store::ResourceStore;

use crate::app::AppState;
use crate::context::Caller;
use crate::errors;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_form))
        .route("/:id", get(get_form).delete(delete_form))
        .route("/:id/answers", post(create_answer))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateForm {
    template_id: TemplateId,
}

/// Submitting a form requires read access to its template, so a private
/// template only collects submissions from its owner, its ACL and admins.
async fn create_form(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreateForm>,
) -> Response {
    let ctx = caller.context();
    if let Err(resp) = guard::require(&state, ResourceKind::Form, Action::Create, &ctx).await {
        return resp;
    }
    let Some(user) = caller.identity() else {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "Unauthorized");
    };

    let visible = state
        .checker
        .check_access(CheckRequest {
            kind: ResourceKind::Template,
            resource_id: Some(*body.template_id.as_uuid()),
            user: Some(&user),
            action: Action::Read,
        })
        .await;
    if !visible.access {
        return errors::decision_to_response(&visible);
    }

    let record = FormRecord::new(FormId::new(), body.template_id, user.id);
    state.store.insert_form(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_form(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let Ok(form_id) = FormId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed form id");
    };

    let user = caller.identity();
    let decision = state.checker.check_form_read(form_id, user.as_ref()).await;
    if !decision.access {
        return errors::decision_to_response(&decision);
    }

    match state.store.form(form_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Form not found"),
        Err(e) => {
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
        }
    }
}

async fn delete_form(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Form, Action::Delete, &ctx).await {
        return resp;
    }

    let Ok(form_id) = FormId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed form id");
    };
    match state.store.remove_form(form_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
struct CreateAnswer {
    value: String,
}

async fn create_answer(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<CreateAnswer>,
) -> Response {
    let ctx = caller.context();
    if let Err(resp) = guard::require(&state, ResourceKind::Answer, Action::Create, &ctx).await {
        return resp;
    }

    let Ok(form_id) = FormId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed form id");
    };

    // Answers are only attachable to forms the caller can read.
    let user = caller.identity();
    let visible = state.checker.check_form_read(form_id, user.as_ref()).await;
    if !visible.access {
        return errors::decision_to_response(&visible);
    }

    let record = AnswerRecord::new(AnswerId::new(), form_id, body.value);
    state.store.insert_answer(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

pub async fn list_my_forms(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Response {
    let ctx = caller.context();
    if let Err(resp) = guard::require(&state, ResourceKind::UserForms, Action::Read, &ctx).await {
        return resp;
    }
    let Some(user) = caller.identity() else {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "Unauthorized");
    };
    Json(state.store.forms_by_user(user.id)).into_response()
}
