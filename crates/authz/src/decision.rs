//! The access decision model.

use serde::{Deserialize, Serialize};

use crate::matrix::ResourceKind;

/// Situational grant classification produced by policy evaluation.
///
/// Distinct from the stored account role: the same user is `owner` on one
/// template and `acl` or `any` on another, within the same request.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleToken {
    Admin,
    Owner,
    Acl,
    Any,
    Authenticated,
    TemplateOwner,
}

impl RoleToken {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Owner => "owner",
            Self::Acl => "acl",
            Self::Any => "any",
            Self::Authenticated => "authenticated",
            Self::TemplateOwner => "template_owner",
        }
    }
}

impl core::fmt::Display for RoleToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Structured classification of a denial, so callers can map decisions to
/// status codes without matching on reason strings.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DenialKind {
    /// The permissions matrix has no usable entry — fatal for the request.
    Configuration,
    /// The resource, or a link in its ownership chain, does not exist.
    NotFound,
    /// Role/ownership/ACL/visibility checks failed.
    Unauthorized,
    /// The store collaborator faulted; the cause is logged, not leaked.
    Internal,
}

/// Outcome of an access check.
///
/// Every denial carries a display-ready reason and a [`DenialKind`]; grants
/// carry the role token that satisfied the permissions matrix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Decision {
    pub access: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleToken>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub denial: Option<DenialKind>,
}

impl Decision {
    pub fn granted(role: RoleToken) -> Self {
        Self {
            access: true,
            role: Some(role),
            reason: None,
            denial: None,
        }
    }

    pub fn denied(denial: DenialKind, reason: impl Into<String>) -> Self {
        Self {
            access: false,
            role: None,
            reason: Some(reason.into()),
            denial: Some(denial),
        }
    }

    pub fn not_found(kind: ResourceKind) -> Self {
        Self::denied(DenialKind::NotFound, format!("{} not found", kind.label()))
    }

    pub fn unauthorized() -> Self {
        Self::denied(DenialKind::Unauthorized, "Unauthorized")
    }

    pub fn internal() -> Self {
        Self::denied(DenialKind::Internal, "Internal server error")
    }

    pub fn is_granted(&self) -> bool {
        self.access
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_names_the_resource_kind() {
        let d = Decision::not_found(ResourceKind::Question);
        assert!(!d.access);
        assert_eq!(d.denial, Some(DenialKind::NotFound));
        assert_eq!(d.reason.as_deref(), Some("Question not found"));
    }

    #[test]
    fn role_tokens_serialize_snake_case() {
        let json = serde_json::to_string(&RoleToken::TemplateOwner).unwrap();
        assert_eq!(json, "\"template_owner\"");
        assert_eq!(RoleToken::TemplateOwner.as_str(), "template_owner");
    }
}
