//! Derives the identifier(s) a request is acting on, per resource kind and
//! action.
//!
//! The locator is pure: it reads path parameters, body fields and the
//! caller identity out of a transport-free [`RequestContext`] and never
//! touches the store.

use std::collections::HashMap;
use std::str::FromStr;

use thiserror::Error;
use uuid::Uuid;

use crate::identity::Identity;
use crate::matrix::{Action, ResourceKind};

/// Request-scoped inputs the locator may draw from.
#[derive(Debug, Clone, Default)]
pub struct RequestContext {
    params: HashMap<String, String>,
    body: serde_json::Value,
    user: Option<Identity>,
}

impl RequestContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = body;
        self
    }

    pub fn with_user(mut self, user: Identity) -> Self {
        self.user = Some(user);
        self
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    pub fn body(&self) -> &serde_json::Value {
        &self.body
    }

    pub fn user(&self) -> Option<&Identity> {
        self.user.as_ref()
    }
}

/// What a request is acting on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target {
    /// No existing instance (creation-class actions).
    Unscoped,
    One(Uuid),
    /// Bulk operations: every listed id must pass its own check.
    Many(Vec<Uuid>),
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("Missing {} ID", .0.label())]
    MissingId(ResourceKind),

    #[error("Invalid {} ID", .0.label())]
    InvalidId(ResourceKind),
}

/// Resolve the target of `(kind, action)` from the request context.
pub fn locate(
    kind: ResourceKind,
    action: Action,
    ctx: &RequestContext,
) -> Result<Target, LocateError> {
    match kind {
        ResourceKind::Template => match action {
            Action::Create => Ok(Target::Unscoped),
            _ => one_from_param(ctx, "id", kind),
        },
        ResourceKind::Question => match action {
            // Reordering is authorized against the owning template, whose id
            // rides in the body.
            Action::Reorder => one_from_body(ctx, "templateId", kind),
            Action::Create | Action::Read | Action::ReadPrivate => {
                one_from_param(ctx, "templateId", kind)
            }
            Action::Update => many_from_body(ctx, "questions", kind, IdShape::ObjectWithId),
            Action::Delete => many_from_body(ctx, "questionIds", kind, IdShape::PlainString),
            _ => one_from_param(ctx, "id", kind),
        },
        ResourceKind::Form => match action {
            Action::Create => Ok(Target::Unscoped),
            Action::GetUserForms => caller_id(ctx, kind),
            _ => one_from_param(ctx, "id", kind),
        },
        ResourceKind::Answer => match action {
            Action::Create => Ok(Target::Unscoped),
            _ => one_from_param(ctx, "id", kind),
        },
        // Self-scoped collections: always the caller's own id, never someone
        // else's.
        ResourceKind::UserForms | ResourceKind::UserTemplates => caller_id(ctx, kind),
        ResourceKind::TemplateForms => one_from_param(ctx, "templateId", kind),
        ResourceKind::User => one_from_param(ctx, "id", kind),
    }
}

enum IdShape {
    /// `[{"id": "...", ...}, ...]`
    ObjectWithId,
    /// `["...", ...]`
    PlainString,
}

fn parse_id(raw: &str, kind: ResourceKind) -> Result<Uuid, LocateError> {
    Uuid::from_str(raw).map_err(|_| LocateError::InvalidId(kind))
}

fn one_from_param(
    ctx: &RequestContext,
    key: &str,
    kind: ResourceKind,
) -> Result<Target, LocateError> {
    let raw = ctx.param(key).ok_or(LocateError::MissingId(kind))?;
    parse_id(raw, kind).map(Target::One)
}

fn one_from_body(
    ctx: &RequestContext,
    field: &str,
    kind: ResourceKind,
) -> Result<Target, LocateError> {
    let raw = ctx
        .body()
        .get(field)
        .and_then(|v| v.as_str())
        .ok_or(LocateError::MissingId(kind))?;
    parse_id(raw, kind).map(Target::One)
}

fn many_from_body(
    ctx: &RequestContext,
    field: &str,
    kind: ResourceKind,
    shape: IdShape,
) -> Result<Target, LocateError> {
    let items = ctx
        .body()
        .get(field)
        .and_then(|v| v.as_array())
        .ok_or(LocateError::MissingId(kind))?;

    let mut ids: Vec<Uuid> = Vec::with_capacity(items.len());
    for item in items {
        let raw = match shape {
            IdShape::ObjectWithId => item.get("id").and_then(|v| v.as_str()),
            IdShape::PlainString => item.as_str(),
        }
        .ok_or(LocateError::MissingId(kind))?;

        let id = parse_id(raw, kind)?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(LocateError::MissingId(kind));
    }
    Ok(Target::Many(ids))
}

fn caller_id(ctx: &RequestContext, kind: ResourceKind) -> Result<Target, LocateError> {
    let user = ctx.user().ok_or(LocateError::MissingId(kind))?;
    Ok(Target::One(*user.id.as_uuid()))
}
