//! Identity extraction middleware.
//!
//! Authentication is external: an upstream gateway verifies credentials
//! and forwards the result as trusted headers. This middleware only
//! parses them into a [`Caller`] extension; malformed or absent headers
//! degrade to an anonymous request.

use std::str::FromStr;

use axum::{
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use formlane_authz::Identity;
use formlane_core::{AccountRole, UserId};

use crate::context::Caller;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_ROLE_HEADER: &str = "x-user-role";

pub async fn identity(
    mut req: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Response {
    let caller = Caller(identity_from_headers(req.headers()));
    req.extensions_mut().insert(caller);
    next.run(req).await
}

fn identity_from_headers(headers: &HeaderMap) -> Option<Identity> {
    let raw_id = headers.get(USER_ID_HEADER)?.to_str().ok()?;
    let id = UserId::from_str(raw_id).ok()?;

    let role = match headers.get(USER_ROLE_HEADER).and_then(|v| v.to_str().ok()) {
        Some("ADMIN") => AccountRole::Admin,
        _ => AccountRole::User,
    };

    Some(Identity::new(id, role))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn parses_verified_headers() {
        let id = UserId::new();
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_str(&id.to_string()).unwrap());
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("ADMIN"));

        let identity = identity_from_headers(&headers).unwrap();
        assert_eq!(identity.id, id);
        assert!(identity.is_admin());
    }

    #[test]
    fn unknown_role_degrades_to_user() {
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&UserId::new().to_string()).unwrap(),
        );
        headers.insert(USER_ROLE_HEADER, HeaderValue::from_static("ROOT"));

        let identity = identity_from_headers(&headers).unwrap();
        assert!(!identity.is_admin());
    }

    #[test]
    fn malformed_id_means_anonymous() {
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        assert!(identity_from_headers(&headers).is_none());
    }
}
