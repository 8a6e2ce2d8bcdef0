//! Route-side access guard.
//!
//! Every handler assembles a [`RequestContext`] and calls [`require`]
//! before touching the store; the guard turns denials into ready-to-send
//! responses so handlers only see granted decisions.

use axum::response::Response;

use formlane_authz::{Action, Decision, RequestContext, ResourceKind};

use crate::app::AppState;
use crate::errors;

pub async fn require(
    state: &AppState,
    kind: ResourceKind,
    action: Action,
    ctx: &RequestContext,
) -> Result<Decision, Response> {
    let decision = state.checker.authorize_request(kind, action, ctx).await;
    if decision.is_granted() {
        Ok(decision)
    } else {
        Err(errors::decision_to_response(&decision))
    }
}
