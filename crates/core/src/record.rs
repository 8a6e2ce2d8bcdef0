//! Resource records shared by the store and the authorization engine.
//!
//! These are read-model shapes, not aggregates: the engine only ever reads
//! them, and the fields carried here are exactly what access decisions and
//! the thin API glue need.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::id::{AnswerId, FormId, QuestionId, TemplateId, UserId};

/// Stored account role. Distinct from the situational role tokens produced
/// by policy evaluation.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AccountRole {
    User,
    Admin,
}

/// A user account. Role changes only happen via admin promotion, which is
/// outside this system.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: UserId,
    pub role: AccountRole,
}

/// A template: the owning root of questions, forms and answers.
///
/// `access` is the ACL — explicit per-user read-class grants, unique per
/// user by construction of the set. `is_public` widens read-class actions
/// only; it never grants writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateRecord {
    pub id: TemplateId,
    pub owner_id: UserId,
    pub title: String,
    pub is_public: bool,
    pub access: HashSet<UserId>,
    pub created_at: DateTime<Utc>,
}

impl TemplateRecord {
    pub fn new(id: TemplateId, owner_id: UserId, is_public: bool) -> Self {
        Self {
            id,
            owner_id,
            title: String::new(),
            is_public,
            access: HashSet::new(),
            created_at: Utc::now(),
        }
    }

    pub fn titled(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }

    pub fn grants_access_to(&self, user_id: UserId) -> bool {
        self.access.contains(&user_id)
    }
}

/// A question. Immutably bound to its template; access always delegates
/// there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionRecord {
    pub id: QuestionId,
    pub template_id: TemplateId,
    pub title: String,
    pub position: u32,
}

impl QuestionRecord {
    pub fn new(id: QuestionId, template_id: TemplateId, title: impl Into<String>) -> Self {
        Self {
            id,
            template_id,
            title: title.into(),
            position: 0,
        }
    }
}

/// A submitted form. `user_id` is the submitter, which is deliberately a
/// different role than owning the template the form was filled against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormRecord {
    pub id: FormId,
    pub template_id: TemplateId,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
}

impl FormRecord {
    pub fn new(id: FormId, template_id: TemplateId, user_id: UserId) -> Self {
        Self {
            id,
            template_id,
            user_id,
            created_at: Utc::now(),
        }
    }

    pub fn is_submitted_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }
}

/// An answer. Reaches its template through its form (two hops).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerRecord {
    pub id: AnswerId,
    pub form_id: FormId,
    pub value: String,
}

impl AnswerRecord {
    pub fn new(id: AnswerId, form_id: FormId, value: impl Into<String>) -> Self {
        Self {
            id,
            form_id,
            value: value.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ownership_and_grants_are_distinct() {
        let owner = UserId::new();
        let member = UserId::new();
        let mut template = TemplateRecord::new(TemplateId::new(), owner, false);
        template.access.insert(member);

        assert!(template.is_owned_by(owner));
        assert!(!template.is_owned_by(member));
        assert!(template.grants_access_to(member));
        assert!(!template.grants_access_to(owner));
    }

    #[test]
    fn account_roles_serialize_screaming() {
        let json = serde_json::to_string(&AccountRole::Admin).unwrap();
        assert_eq!(json, "\"ADMIN\"");
        let role: AccountRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(role, AccountRole::User);
    }
}
