//! The unified access-checking orchestrator.

use std::collections::HashMap;
use std::sync::Arc;

use uuid::Uuid;

use formlane_core::FormId;
use formlane_store::ResourceStore;

use crate::decision::{Decision, DenialKind, RoleToken};
use crate::identity::Identity;
use crate::locator::{RequestContext, Target, locate};
use crate::matrix::{Action, PermissionsMatrix, ResourceKind};
use crate::policy::{
    AnswerPolicy, FormPolicy, QuestionPolicy, ResourcePolicy, SelfScopePolicy,
    TemplateFormsPolicy, TemplatePolicy,
};

/// One access check: who wants to do what to which resource.
#[derive(Debug, Clone, Copy)]
pub struct CheckRequest<'a> {
    pub kind: ResourceKind,
    /// `None` for instance-less actions (creation), where only the matrix
    /// and the caller's presence can decide.
    pub resource_id: Option<Uuid>,
    pub user: Option<&'a Identity>,
    pub action: Action,
}

/// Combines matrix lookup, evaluator dispatch and the final role/matrix
/// cross-check into a single allow/deny decision.
///
/// Stateless per check; the only shared state is the immutable matrix and
/// the policy registry built at construction.
pub struct AccessChecker {
    matrix: PermissionsMatrix,
    policies: HashMap<ResourceKind, Arc<dyn ResourcePolicy>>,
    store: Arc<dyn ResourceStore>,
}

impl AccessChecker {
    /// Checker with the default policy table and evaluator registry.
    pub fn new(store: Arc<dyn ResourceStore>) -> Self {
        Self::with_matrix(store, PermissionsMatrix::default_policy())
    }

    /// Checker with an injected permissions matrix.
    pub fn with_matrix(store: Arc<dyn ResourceStore>, matrix: PermissionsMatrix) -> Self {
        let mut policies: HashMap<ResourceKind, Arc<dyn ResourcePolicy>> = HashMap::new();
        policies.insert(
            ResourceKind::Template,
            Arc::new(TemplatePolicy::new(store.clone())),
        );
        policies.insert(
            ResourceKind::Question,
            Arc::new(QuestionPolicy::new(store.clone())),
        );
        policies.insert(ResourceKind::Form, Arc::new(FormPolicy::new(store.clone())));
        policies.insert(
            ResourceKind::Answer,
            Arc::new(AnswerPolicy::new(store.clone())),
        );
        policies.insert(
            ResourceKind::TemplateForms,
            Arc::new(TemplateFormsPolicy::new(store.clone())),
        );
        let self_scope = Arc::new(SelfScopePolicy);
        policies.insert(ResourceKind::UserForms, self_scope.clone());
        policies.insert(ResourceKind::UserTemplates, self_scope.clone());
        policies.insert(ResourceKind::User, self_scope);

        Self::with_policies(store, matrix, policies)
    }

    /// Checker with a fully custom evaluator registry. New resource kinds
    /// are supported by registering implementations here.
    pub fn with_policies(
        store: Arc<dyn ResourceStore>,
        matrix: PermissionsMatrix,
        policies: HashMap<ResourceKind, Arc<dyn ResourcePolicy>>,
    ) -> Self {
        Self {
            matrix,
            policies,
            store,
        }
    }

    /// Decide one access check.
    pub async fn check_access(&self, req: CheckRequest<'_>) -> Decision {
        // Admin fast path: no matrix consultation, no resource fetch.
        if let Some(user) = req.user {
            if user.is_admin() {
                return Decision::granted(RoleToken::Admin);
            }
        }

        let allowed = match self.matrix.lookup(req.kind, req.action) {
            Some(set) if !set.is_empty() => set,
            _ => {
                tracing::warn!(
                    kind = ?req.kind,
                    action = ?req.action,
                    "permissions matrix has no usable entry"
                );
                return Decision::denied(
                    DenialKind::Configuration,
                    "Invalid permissions configuration",
                );
            }
        };

        let Some(resource_id) = req.resource_id else {
            // Instance-less actions are decided by the matrix alone: `any`
            // admits everyone, `authenticated` admits any present caller.
            if allowed.contains(RoleToken::Any) {
                return Decision::granted(RoleToken::Any);
            }
            if allowed.contains(RoleToken::Authenticated) && req.user.is_some() {
                return Decision::granted(RoleToken::Authenticated);
            }
            return Decision::unauthorized();
        };

        let Some(policy) = self.policies.get(&req.kind) else {
            tracing::warn!(kind = ?req.kind, "no policy evaluator registered");
            return Decision::denied(
                DenialKind::Configuration,
                "Resource policy not implemented",
            );
        };

        let decision = policy.evaluate(resource_id, req.user, req.action).await;

        if decision.access {
            // Mandatory cross-check: the evaluator's grant only stands if
            // its role token is acceptable for this kind/action.
            match decision.role {
                Some(role) if allowed.contains(role) => {
                    tracing::debug!(kind = ?req.kind, action = ?req.action, role = %role, "access granted");
                    decision
                }
                _ => Decision::denied(DenialKind::Unauthorized, "Access denied"),
            }
        } else {
            let denial = decision.denial.unwrap_or(DenialKind::Unauthorized);
            let reason = decision.reason.unwrap_or_else(|| "Access denied".to_string());
            Decision::denied(denial, reason)
        }
    }

    /// Locate the target(s) of a request, then decide.
    ///
    /// Locator failures deny before any policy evaluation runs — admins
    /// included, since without an id there is nothing to bypass *to*. For
    /// bulk targets every id must pass and the first denial wins.
    pub async fn authorize_request(
        &self,
        kind: ResourceKind,
        action: Action,
        ctx: &RequestContext,
    ) -> Decision {
        let target = match locate(kind, action, ctx) {
            Ok(target) => target,
            Err(e) => return Decision::denied(DenialKind::Unauthorized, e.to_string()),
        };

        let user = ctx.user();
        match target {
            Target::Unscoped => {
                self.check_access(CheckRequest {
                    kind,
                    resource_id: None,
                    user,
                    action,
                })
                .await
            }
            Target::One(id) => {
                self.check_access(CheckRequest {
                    kind,
                    resource_id: Some(id),
                    user,
                    action,
                })
                .await
            }
            Target::Many(ids) => {
                let mut granted = Decision::unauthorized();
                for id in ids {
                    let decision = self
                        .check_access(CheckRequest {
                            kind,
                            resource_id: Some(id),
                            user,
                            action,
                        })
                        .await;
                    if !decision.access {
                        return decision;
                    }
                    granted = decision;
                }
                granted
            }
        }
    }

    /// Form read with the narrower submitter grant layered on top.
    ///
    /// The delegation evaluator only knows the owning template; a form's
    /// own submitter may read it regardless of template standing. Only an
    /// Unauthorized denial is softened — not-found and faults pass through.
    pub async fn check_form_read(&self, form_id: FormId, user: Option<&Identity>) -> Decision {
        let decision = self
            .check_access(CheckRequest {
                kind: ResourceKind::Form,
                resource_id: Some(*form_id.as_uuid()),
                user,
                action: Action::Read,
            })
            .await;

        if decision.access || decision.denial != Some(DenialKind::Unauthorized) {
            return decision;
        }
        let Some(user) = user else {
            return decision;
        };

        match self.store.form(form_id).await {
            Err(e) => {
                tracing::warn!(form_id = %form_id, error = %e, "form fetch failed during submitter check");
                Decision::internal()
            }
            Ok(Some(form)) if form.is_submitted_by(user.id) => {
                Decision::granted(RoleToken::Owner)
            }
            _ => decision,
        }
    }
}
