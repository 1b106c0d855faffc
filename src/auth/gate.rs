//! Credential gate for user-scoped listings.
//!
//! `authenticate` turns the raw cookie into verified claims, `authorize_scope`
//! checks that those claims cover the requested owner. Only a successful
//! `guard_scope` produces a [`ScopedEmail`], and only a `ScopedEmail` can put
//! an owner predicate into a listing query.

use tracing::warn;

use super::{claims::Claims, jwt::JwtKeys};
use crate::error::ApiError;

/// An owner email the requester has proven to hold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopedEmail(String);

impl ScopedEmail {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

pub fn authenticate(keys: &JwtKeys, token: Option<&str>) -> Result<Claims, ApiError> {
    let token = token.ok_or(ApiError::Unauthenticated("Not authorized"))?;
    keys.verify(token).map_err(|e| {
        warn!(error = %e, "invalid or expired token");
        ApiError::Unauthenticated("Unauthorized")
    })
}

pub fn authorize_scope(claims: &Claims, requested: &str) -> Result<ScopedEmail, ApiError> {
    if claims.email() != Some(requested) {
        warn!(requested, holder = ?claims.email(), "scope mismatch");
        return Err(ApiError::Forbidden);
    }
    Ok(ScopedEmail(requested.to_owned()))
}

pub fn guard_scope(
    keys: &JwtKeys,
    token: Option<&str>,
    requested: &str,
) -> Result<ScopedEmail, ApiError> {
    let claims = authenticate(keys, token)?;
    authorize_scope(&claims, requested)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use time::{Duration, OffsetDateTime};

    fn keys() -> JwtKeys {
        JwtKeys::new("gate-secret", Duration::hours(1))
    }

    fn token_for(value: Value) -> String {
        keys().sign(value.as_object().cloned().unwrap()).unwrap()
    }

    #[test]
    fn missing_token_is_unauthenticated() {
        let err = guard_scope(&keys(), None, "a@x.com").unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated("Not authorized")));
    }

    #[test]
    fn garbage_token_is_unauthenticated() {
        let err = guard_scope(&keys(), Some("nope"), "a@x.com").unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated("Unauthorized")));
    }

    #[test]
    fn expired_token_is_unauthenticated() {
        let fields = json!({ "email": "a@x.com" }).as_object().cloned().unwrap();
        let issued = OffsetDateTime::now_utc() - Duration::hours(2);
        let token = keys()
            .encode(&Claims::new(fields, issued, Duration::hours(1)))
            .unwrap();
        let err = guard_scope(&keys(), Some(&token), "a@x.com").unwrap_err();
        assert!(matches!(err, ApiError::Unauthenticated(_)));
    }

    #[test]
    fn other_identity_is_forbidden() {
        let token = token_for(json!({ "email": "b@x.com" }));
        let err = guard_scope(&keys(), Some(&token), "a@x.com").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn claims_without_email_are_forbidden() {
        let token = token_for(json!({ "name": "anon" }));
        let err = guard_scope(&keys(), Some(&token), "a@x.com").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden));
    }

    #[test]
    fn email_match_is_exact() {
        let token = token_for(json!({ "email": "A@x.com" }));
        assert!(guard_scope(&keys(), Some(&token), "a@x.com").is_err());

        let token = token_for(json!({ "email": "a@x.com" }));
        let scope = guard_scope(&keys(), Some(&token), "a@x.com").unwrap();
        assert_eq!(scope.as_str(), "a@x.com");
    }
}
