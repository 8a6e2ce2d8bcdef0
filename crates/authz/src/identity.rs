//! The verified caller identity.

use serde::{Deserialize, Serialize};

use formlane_core::{AccountRole, UserId};

/// An already-verified caller.
///
/// Proving who the caller is belongs to an external authentication
/// collaborator; this engine receives the result as an opaque id + stored
/// role pair. Unauthenticated requests are modelled as `Option<Identity>`
/// being `None`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub id: UserId,
    pub role: AccountRole,
}

impl Identity {
    pub fn new(id: UserId, role: AccountRole) -> Self {
        Self { id, role }
    }

    pub fn user(id: UserId) -> Self {
        Self::new(id, AccountRole::User)
    }

    pub fn admin(id: UserId) -> Self {
        Self::new(id, AccountRole::Admin)
    }

    pub fn is_admin(&self) -> bool {
        self.role == AccountRole::Admin
    }
}
