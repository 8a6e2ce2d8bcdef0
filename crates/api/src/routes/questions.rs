//! Question endpoints.
//!
//! Creation and listing hang off `/templates/:id/questions`; the bulk
//! update, bulk delete and reorder operations live here because their
//! scope comes from the request body, not the path.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{patch, put},
};
use serde::Deserialize;

use formlane_authz::{Action, ResourceKind};
use formlane_core::{QuestionId, QuestionRecord, TemplateId};

use crate::app::AppState;
use crate::context::Caller;
use crate::errors;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/", put(update_questions).delete(delete_questions))
        .route("/reorder", patch(reorder_questions))
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreateQuestion {
    title: String,
}

pub async fn create_question(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<CreateQuestion>,
) -> Response {
    let ctx = caller.context().with_param("templateId", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Question, Action::Create, &ctx).await {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    let record = QuestionRecord::new(QuestionId::new(), template_id, body.title);
    state.store.insert_question(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

pub async fn list_questions(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("templateId", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Question, Action::Read, &ctx).await {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    let mut questions = state.store.questions_by_template(template_id);
    questions.sort_by_key(|q| q.position);
    Json(questions).into_response()
}

#[derive(Debug, Deserialize)]
struct QuestionPatch {
    id: QuestionId,
    title: String,
}

#[derive(Debug, Deserialize)]
struct UpdateQuestions {
    questions: Vec<QuestionPatch>,
}

async fn update_questions(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    // The raw body feeds the locator; the typed view is parsed after the
    // guard so denial reasons stay uniform for malformed payloads too.
    let ctx = caller.context().with_body(body.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Question, Action::Update, &ctx).await {
        return resp;
    }

    let patches: UpdateQuestions = match serde_json::from_value(body) {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "bad_request", e.to_string()),
    };
    for patch in patches.questions {
        if let Err(e) = state.store.update_question(patch.id, patch.title) {
            return errors::domain_error_to_response(e);
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DeleteQuestions {
    question_ids: Vec<QuestionId>,
}

async fn delete_questions(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let ctx = caller.context().with_body(body.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Question, Action::Delete, &ctx).await {
        return resp;
    }

    let ids: DeleteQuestions = match serde_json::from_value(body) {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "bad_request", e.to_string()),
    };
    for id in ids.question_ids {
        if let Err(e) = state.store.remove_question(id) {
            return errors::domain_error_to_response(e);
        }
    }
    StatusCode::NO_CONTENT.into_response()
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReorderQuestions {
    template_id: TemplateId,
    question_ids: Vec<QuestionId>,
}

async fn reorder_questions(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<serde_json::Value>,
) -> Response {
    let ctx = caller.context().with_body(body.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Question, Action::Reorder, &ctx).await {
        return resp;
    }

    let order: ReorderQuestions = match serde_json::from_value(body) {
        Ok(p) => p,
        Err(e) => return errors::json_error(StatusCode::BAD_REQUEST, "bad_request", e.to_string()),
    };
    match state
        .store
        .reorder_questions(order.template_id, &order.question_ids)
    {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}
