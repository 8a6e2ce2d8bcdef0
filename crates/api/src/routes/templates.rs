//! Template endpoints, including ACL management.

use std::str::FromStr;
use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Extension, Path},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
};
use serde::Deserialize;

use formlane_authz::{Action, ResourceKind};
use formlane_core::{TemplateId, TemplateRecord, UserId};
use formlane_store::ResourceStore;

use crate::app::AppState;
use crate::context::Caller;
use crate::errors;
use crate::guard;

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_template))
        .route(
            "/:id",
            get(get_template).put(update_template).delete(delete_template),
        )
        .route("/:id/access", post(grant_access))
        .route("/:id/access/:userId", delete(revoke_access))
        .route("/:id/forms", get(list_template_forms))
        .route(
            "/:id/questions",
            post(super::questions::create_question).get(super::questions::list_questions),
        )
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CreateTemplate {
    title: Option<String>,
    #[serde(default)]
    is_public: bool,
}

async fn create_template(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Json(body): Json<CreateTemplate>,
) -> Response {
    let ctx = caller.context();
    if let Err(resp) = guard::require(&state, ResourceKind::Template, Action::Create, &ctx).await {
        return resp;
    }
    let Some(user) = caller.identity() else {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "Unauthorized");
    };

    let record = TemplateRecord::new(TemplateId::new(), user.id, body.is_public)
        .titled(body.title.unwrap_or_default());
    state.store.insert_template(record.clone());

    (StatusCode::CREATED, Json(record)).into_response()
}

async fn get_template(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Template, Action::Read, &ctx).await {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    match state.store.template(template_id).await {
        Ok(Some(record)) => Json(record).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "Template not found"),
        Err(e) => {
            errors::json_error(StatusCode::INTERNAL_SERVER_ERROR, "internal_error", e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UpdateTemplate {
    title: Option<String>,
    is_public: Option<bool>,
}

async fn update_template(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<UpdateTemplate>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Template, Action::Update, &ctx).await {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    match state.store.update_template(template_id, body.title, body.is_public) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn delete_template(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) = guard::require(&state, ResourceKind::Template, Action::Delete, &ctx).await {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    match state.store.remove_template(template_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GrantAccess {
    user_id: UserId,
}

async fn grant_access(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
    Json(body): Json<GrantAccess>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) =
        guard::require(&state, ResourceKind::Template, Action::ManageAccess, &ctx).await
    {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    match state.store.grant_access(template_id, body.user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn revoke_access(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path((id, user_id)): Path<(String, String)>,
) -> Response {
    let ctx = caller.context().with_param("id", id.clone());
    if let Err(resp) =
        guard::require(&state, ResourceKind::Template, Action::ManageAccess, &ctx).await
    {
        return resp;
    }

    let (Ok(template_id), Ok(user_id)) = (TemplateId::from_str(&id), UserId::from_str(&user_id))
    else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed id");
    };
    match state.store.revoke_access(template_id, user_id) {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(e) => errors::domain_error_to_response(e),
    }
}

async fn list_template_forms(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
    Path(id): Path<String>,
) -> Response {
    let ctx = caller.context().with_param("templateId", id.clone());
    if let Err(resp) =
        guard::require(&state, ResourceKind::TemplateForms, Action::Read, &ctx).await
    {
        return resp;
    }

    let Ok(template_id) = TemplateId::from_str(&id) else {
        return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "malformed template id");
    };
    Json(state.store.forms_by_template(template_id)).into_response()
}

pub async fn list_my_templates(
    Extension(state): Extension<Arc<AppState>>,
    Extension(caller): Extension<Caller>,
) -> Response {
    let ctx = caller.context();
    if let Err(resp) =
        guard::require(&state, ResourceKind::UserTemplates, Action::Read, &ctx).await
    {
        return resp;
    }
    let Some(user) = caller.identity() else {
        return errors::json_error(StatusCode::FORBIDDEN, "forbidden", "Unauthorized");
    };
    Json(state.store.templates_by_owner(user.id)).into_response()
}
