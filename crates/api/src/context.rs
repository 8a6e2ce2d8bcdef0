//! Request-scoped caller context.

use formlane_authz::{Identity, RequestContext};

/// The caller attached to a request by the identity middleware.
///
/// `None` means the request is anonymous; whether that is acceptable is
/// the access checker's call, not the middleware's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller(pub Option<Identity>);

impl Caller {
    pub fn identity(&self) -> Option<Identity> {
        self.0
    }

    /// Start a locator context carrying this caller.
    pub fn context(&self) -> RequestContext {
        match self.0 {
            Some(user) => RequestContext::new().with_user(user),
            None => RequestContext::new(),
        }
    }
}
