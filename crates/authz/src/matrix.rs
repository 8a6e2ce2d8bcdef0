//! Static permissions matrix: resource kind × action → allowed role tokens.
//!
//! The matrix is policy *configuration*, loaded once and never mutated at
//! runtime. An absent or empty entry is a configuration error and the
//! checker fails the request closed rather than guessing.

use std::collections::HashMap;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::decision::RoleToken;

/// The kinds of resources access checks know about.
///
/// The aggregate kinds (`user_forms`, `template_forms`, `user_templates`)
/// cover list-style endpoints that do not address a single stored record.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Template,
    Question,
    Form,
    Answer,
    UserForms,
    TemplateForms,
    UserTemplates,
    User,
}

impl ResourceKind {
    /// Display label used in decision reasons.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Template => "Template",
            Self::Question => "Question",
            Self::Form => "Form",
            Self::Answer => "Answer",
            Self::UserForms => "User forms",
            Self::TemplateForms => "Template forms",
            Self::UserTemplates => "User templates",
            Self::User => "User",
        }
    }
}

/// Actions the policy surface distinguishes.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Create,
    Read,
    ReadPrivate,
    ReadAll,
    Update,
    Delete,
    ManageAccess,
    Reorder,
    GetUserForms,
}

/// An explicit, ordered set of role tokens.
///
/// Being an explicit type keeps "empty set" distinguishable from "no entry
/// at all"; both are misconfiguration, but the caller decides that, not a
/// truthiness coincidence.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RoleSet(Vec<RoleToken>);

impl RoleSet {
    pub fn new(tokens: &[RoleToken]) -> Self {
        let mut inner = Vec::with_capacity(tokens.len());
        for &token in tokens {
            if !inner.contains(&token) {
                inner.push(token);
            }
        }
        Self(inner)
    }

    pub fn contains(&self, token: RoleToken) -> bool {
        self.0.contains(&token)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = RoleToken> + '_ {
        self.0.iter().copied()
    }
}

/// Process-wide, read-only permission configuration.
#[derive(Debug, Clone, Default)]
pub struct PermissionsMatrix {
    entries: HashMap<(ResourceKind, Action), RoleSet>,
}

impl PermissionsMatrix {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Builder step used while assembling a matrix. There is deliberately
    /// no mutating accessor once the matrix is handed to a checker.
    pub fn allow(mut self, kind: ResourceKind, action: Action, tokens: &[RoleToken]) -> Self {
        self.entries.insert((kind, action), RoleSet::new(tokens));
        self
    }

    /// Look up the allowed role tokens for a kind/action pair.
    ///
    /// `None` (and an empty set) must be treated by the caller as a
    /// configuration error, never as a silent deny.
    pub fn lookup(&self, kind: ResourceKind, action: Action) -> Option<&RoleSet> {
        self.entries.get(&(kind, action))
    }

    /// The default policy table.
    pub fn default_policy() -> Self {
        use Action::*;
        use ResourceKind::*;
        use RoleToken::*;

        Self::empty()
            .allow(Template, Create, &[Authenticated, Admin])
            .allow(Template, Read, &[Any, Authenticated, Owner, Acl, Admin])
            .allow(Template, ReadPrivate, &[Owner, Acl, Admin])
            .allow(Template, ReadAll, &[Admin])
            .allow(Template, Update, &[Owner, Admin])
            .allow(Template, Delete, &[Owner, Admin])
            .allow(Template, ManageAccess, &[Owner, Admin])
            .allow(Question, Create, &[Owner, Admin])
            .allow(Question, Read, &[Any, Authenticated, Owner, Acl, Admin])
            .allow(Question, ReadPrivate, &[Owner, Acl, Admin])
            .allow(Question, Update, &[Owner, Admin])
            .allow(Question, Delete, &[Owner, Admin])
            .allow(Question, Reorder, &[Owner, Admin])
            .allow(Form, Create, &[Authenticated, Admin])
            .allow(Form, Read, &[Owner, Acl, Admin, TemplateOwner])
            .allow(Form, ReadPrivate, &[Owner, Admin])
            .allow(Form, ReadAll, &[Admin])
            .allow(Form, GetUserForms, &[Owner, Admin])
            .allow(Form, Delete, &[Owner, Admin])
            .allow(Answer, Create, &[Authenticated, Admin])
            .allow(Answer, Read, &[Owner, Acl, Admin])
            .allow(Answer, Update, &[Owner, Admin])
            .allow(Answer, Delete, &[Owner, Admin])
            .allow(UserForms, Read, &[Owner, Admin])
            .allow(UserTemplates, Read, &[Owner, Admin])
            .allow(TemplateForms, Read, &[TemplateOwner, Admin])
            .allow(User, Read, &[Owner, Admin])
            .allow(User, Update, &[Owner, Admin])
            .allow(User, Delete, &[Admin])
    }

    /// The shared default matrix, built once at first use.
    pub fn global() -> &'static PermissionsMatrix {
        static GLOBAL: OnceLock<PermissionsMatrix> = OnceLock::new();
        GLOBAL.get_or_init(PermissionsMatrix::default_policy)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_configured_tokens() {
        let matrix = PermissionsMatrix::default_policy();
        let set = matrix.lookup(ResourceKind::Template, Action::Update).unwrap();
        assert!(set.contains(RoleToken::Owner));
        assert!(set.contains(RoleToken::Admin));
        assert!(!set.contains(RoleToken::Acl));
    }

    #[test]
    fn absent_pair_is_none() {
        let matrix = PermissionsMatrix::default_policy();
        assert!(matrix.lookup(ResourceKind::User, Action::Reorder).is_none());
    }

    #[test]
    fn role_set_dedupes_preserving_order() {
        let set = RoleSet::new(&[RoleToken::Owner, RoleToken::Admin, RoleToken::Owner]);
        let tokens: Vec<_> = set.iter().collect();
        assert_eq!(tokens, vec![RoleToken::Owner, RoleToken::Admin]);
    }

    #[test]
    fn public_visibility_never_reaches_write_actions() {
        // `any` may only ever appear in read-class entries.
        let matrix = PermissionsMatrix::default_policy();
        for action in [Action::Update, Action::Delete, Action::ManageAccess] {
            if let Some(set) = matrix.lookup(ResourceKind::Template, action) {
                assert!(!set.contains(RoleToken::Any));
            }
        }
    }

    #[test]
    fn global_is_stable() {
        let a = PermissionsMatrix::global();
        let b = PermissionsMatrix::global();
        assert!(std::ptr::eq(a, b));
    }
}
