//! Per-resource-kind policy evaluators.
//!
//! The template evaluator is the only one with real grading logic; the
//! dependent kinds (question, form, answer) resolve their owning template
//! and delegate to it. Grading itself is a pure function — no IO, no
//! panics — and the async wrappers only add the fetches.

use std::sync::Arc;

use async_trait::async_trait;
use uuid::Uuid;

use formlane_core::{AnswerId, FormId, QuestionId, TemplateId, TemplateRecord};
use formlane_store::ResourceStore;

use crate::decision::{Decision, RoleToken};
use crate::identity::Identity;
use crate::matrix::{Action, ResourceKind};

/// A policy evaluator for one resource kind.
///
/// New kinds are supported by registering another implementation with the
/// checker, not by growing a switch.
#[async_trait]
pub trait ResourcePolicy: Send + Sync {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision;
}

/// Grade a fetched template against a caller and action.
///
/// First match wins, and the order encodes priority: admin and ownership
/// grants apply to any action, the ACL grant applies to any action (the
/// outer matrix check decides whether the `acl` token is acceptable), and
/// public visibility only ever satisfies `read`.
pub fn grade_template(
    template: &TemplateRecord,
    user: Option<&Identity>,
    action: Action,
) -> Decision {
    if let Some(user) = user {
        if user.is_admin() {
            return Decision::granted(RoleToken::Admin);
        }
        if template.is_owned_by(user.id) {
            return Decision::granted(RoleToken::Owner);
        }
        if template.grants_access_to(user.id) {
            return Decision::granted(RoleToken::Acl);
        }
    }
    if action == Action::Read && template.is_public {
        return Decision::granted(RoleToken::Any);
    }
    Decision::unauthorized()
}

/// Fetch a template and grade it. Shared by the template evaluator and
/// every delegation evaluator.
async fn template_decision(
    store: &dyn ResourceStore,
    id: TemplateId,
    user: Option<&Identity>,
    action: Action,
) -> Decision {
    match store.template(id).await {
        Err(e) => {
            tracing::warn!(template_id = %id, error = %e, "template fetch failed during access check");
            Decision::internal()
        }
        Ok(None) => Decision::not_found(ResourceKind::Template),
        Ok(Some(template)) => grade_template(&template, user, action),
    }
}

/// Grant `owner` iff the target id is the caller's own id.
fn self_scope(id: Uuid, user: Option<&Identity>) -> Decision {
    match user {
        Some(user) if *user.id.as_uuid() == id => Decision::granted(RoleToken::Owner),
        _ => Decision::unauthorized(),
    }
}

/// Base evaluator for templates.
pub struct TemplatePolicy {
    store: Arc<dyn ResourceStore>,
}

impl TemplatePolicy {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourcePolicy for TemplatePolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision {
        template_decision(&*self.store, TemplateId::from(id), user, action).await
    }
}

/// Delegation evaluator for questions.
///
/// Create/read/read_private/reorder checks arrive already addressed to the
/// owning template (the locator resolves them that way); only update and
/// delete carry question ids that need a hop.
pub struct QuestionPolicy {
    store: Arc<dyn ResourceStore>,
}

impl QuestionPolicy {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourcePolicy for QuestionPolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision {
        match action {
            Action::Update | Action::Delete => match self.store.question(QuestionId::from(id)).await {
                Err(e) => {
                    tracing::warn!(question_id = %id, error = %e, "question fetch failed during access check");
                    Decision::internal()
                }
                Ok(None) => Decision::not_found(ResourceKind::Question),
                Ok(Some(question)) => {
                    template_decision(&*self.store, question.template_id, user, action).await
                }
            },
            _ => template_decision(&*self.store, TemplateId::from(id), user, action).await,
        }
    }
}

/// Delegation evaluator for forms.
///
/// The decision is the owning template's decision, forwarded unchanged.
/// The narrower submitter grant deliberately lives a layer up (see
/// `AccessChecker::check_form_read`), not here.
pub struct FormPolicy {
    store: Arc<dyn ResourceStore>,
}

impl FormPolicy {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourcePolicy for FormPolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision {
        if action == Action::GetUserForms {
            // Per-user listing is self-scoped, not template-delegated.
            return self_scope(id, user);
        }
        match self.store.form(FormId::from(id)).await {
            Err(e) => {
                tracing::warn!(form_id = %id, error = %e, "form fetch failed during access check");
                Decision::internal()
            }
            Ok(None) => Decision::not_found(ResourceKind::Form),
            Ok(Some(form)) => {
                template_decision(&*self.store, form.template_id, user, action).await
            }
        }
    }
}

/// Delegation evaluator for answers: two hops, answer → form → template.
pub struct AnswerPolicy {
    store: Arc<dyn ResourceStore>,
}

impl AnswerPolicy {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourcePolicy for AnswerPolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision {
        let answer = match self.store.answer(AnswerId::from(id)).await {
            Err(e) => {
                tracing::warn!(answer_id = %id, error = %e, "answer fetch failed during access check");
                return Decision::internal();
            }
            Ok(None) => return Decision::not_found(ResourceKind::Answer),
            Ok(Some(answer)) => answer,
        };

        match self.store.form(answer.form_id).await {
            Err(e) => {
                tracing::warn!(form_id = %answer.form_id, error = %e, "form fetch failed during access check");
                Decision::internal()
            }
            Ok(None) => Decision::not_found(ResourceKind::Form),
            Ok(Some(form)) => {
                template_decision(&*self.store, form.template_id, user, action).await
            }
        }
    }
}

/// Evaluator for a template's submission listing.
///
/// Listing the forms submitted against a template is a template-ownership
/// right over other people's forms, so an `owner` grant from the template
/// is relabelled `template_owner`.
pub struct TemplateFormsPolicy {
    store: Arc<dyn ResourceStore>,
}

impl TemplateFormsPolicy {
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl ResourcePolicy for TemplateFormsPolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, action: Action) -> Decision {
        let decision = template_decision(&*self.store, TemplateId::from(id), user, action).await;
        if decision.access && decision.role == Some(RoleToken::Owner) {
            return Decision::granted(RoleToken::TemplateOwner);
        }
        decision
    }
}

/// Evaluator for self-scoped collections (`user_forms`, `user_templates`,
/// `user`).
pub struct SelfScopePolicy;

#[async_trait]
impl ResourcePolicy for SelfScopePolicy {
    async fn evaluate(&self, id: Uuid, user: Option<&Identity>, _action: Action) -> Decision {
        self_scope(id, user)
    }
}
