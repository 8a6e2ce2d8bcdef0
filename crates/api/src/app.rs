//! Application wiring.

use std::sync::Arc;

use axum::{Extension, Router, middleware, routing::get};

use formlane_authz::AccessChecker;
use formlane_store::{InMemoryStore, ResourceStore};

use crate::routes;

/// Shared per-process services.
pub struct AppState {
    pub checker: AccessChecker,
    pub store: Arc<InMemoryStore>,
}

/// Build the full router over an in-memory store.
pub fn build_app(store: Arc<InMemoryStore>) -> Router {
    let reads: Arc<dyn ResourceStore> = store.clone();
    let state = Arc::new(AppState {
        checker: AccessChecker::new(reads),
        store,
    });

    Router::new()
        .route("/health", get(routes::health))
        .nest("/templates", routes::templates::router())
        .nest("/questions", routes::questions::router())
        .nest("/forms", routes::forms::router())
        .nest("/answers", routes::answers::router())
        .nest("/users", routes::users::router())
        .route("/me/templates", get(routes::templates::list_my_templates))
        .route("/me/forms", get(routes::forms::list_my_forms))
        .layer(middleware::from_fn(crate::middleware::identity))
        .layer(Extension(state))
}
