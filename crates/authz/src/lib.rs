//! `formlane-authz` — the authorization decision engine.
//!
//! This crate is intentionally decoupled from HTTP and storage: identity
//! arrives already verified, resources are reached only through the
//! [`formlane_store::ResourceStore`] contract, and every outcome is a
//! [`Decision`] — the engine never raises across its public boundary.

pub mod checker;
pub mod decision;
pub mod identity;
pub mod locator;
pub mod matrix;
pub mod policy;

pub use checker::{AccessChecker, CheckRequest};
pub use decision::{Decision, DenialKind, RoleToken};
pub use identity::Identity;
pub use locator::{LocateError, RequestContext, Target, locate};
pub use matrix::{Action, PermissionsMatrix, ResourceKind, RoleSet};
pub use policy::{ResourcePolicy, grade_template};
