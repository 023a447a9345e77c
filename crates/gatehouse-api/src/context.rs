//! Request context extraction.
//!
//! The gateway in front of this service authenticates callers and forwards
//! the verified identity as headers. Requests without the identity header
//! run as anonymous.

use axum::http::HeaderMap;
use gatehouse_core::context::AppContext;
use gatehouse_core::uid::Uid;

/// Header carrying the authenticated user's id.
pub const USER_ID_HEADER: &str = "x-user-id";
/// Header carrying the authenticated user's roles, comma separated.
pub const ROLES_HEADER: &str = "x-roles";

/// Builds the request context from the forwarded identity headers.
///
/// A missing or unparseable `x-user-id` yields an anonymous context; the
/// authorization checks downstream reject anonymous callers where needed.
#[must_use]
pub fn from_headers(headers: &HeaderMap) -> AppContext {
    let Some(user_id) = headers
        .get(USER_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .and_then(|raw| Uid::parse(raw, "user_id").ok())
    else {
        return AppContext::anonymous();
    };

    let roles = headers
        .get(ROLES_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|role| !role.is_empty())
                .map(ToOwned::to_owned)
                .collect()
        })
        .unwrap_or_default();

    AppContext::authenticated(user_id, roles)
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;

    use super::*;

    #[test]
    fn test_missing_identity_header_yields_anonymous_context() {
        // Arrange
        let headers = HeaderMap::new();

        // Act
        let ctx = from_headers(&headers);

        // Assert
        assert!(ctx.actor.is_none());
    }

    #[test]
    fn test_identity_header_yields_authenticated_context_with_roles() {
        // Arrange
        let user_id = Uid::generate();
        let mut headers = HeaderMap::new();
        headers.insert(
            USER_ID_HEADER,
            HeaderValue::from_str(&user_id.to_string()).unwrap(),
        );
        headers.insert(ROLES_HEADER, HeaderValue::from_static("admin, auditor"));

        // Act
        let ctx = from_headers(&headers);

        // Assert
        let actor = ctx.actor.unwrap();
        assert_eq!(actor.user_id, user_id);
        assert_eq!(actor.roles, vec!["admin".to_owned(), "auditor".to_owned()]);
    }

    #[test]
    fn test_malformed_user_id_yields_anonymous_context() {
        // Arrange
        let mut headers = HeaderMap::new();
        headers.insert(USER_ID_HEADER, HeaderValue::from_static("not-a-uuid"));
        headers.insert(ROLES_HEADER, HeaderValue::from_static("admin"));

        // Act
        let ctx = from_headers(&headers);

        // Assert
        assert!(ctx.actor.is_none());
    }
}
