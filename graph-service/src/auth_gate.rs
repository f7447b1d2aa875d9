use graph_core::AppError;
use graph_security::{Level, Principal, SecurityError};

/// Authorization check applied after the [`Principal`] extractor has already
/// authenticated the request (SPEC_FULL.md §4.1's `Authenticated → Authorizing`
/// transition). Grounded on `r2e_security::extractor`'s
/// extract-then-validate shape and `graph-security::principal::Principal`'s
/// `authorized_for` predicate — kept as a plain function rather than a second
/// extractor or middleware layer, since the required level differs per route
/// and per HTTP method and axum has no clean way to parameterize a
/// `FromRequestParts` impl by route.
pub fn require_level(principal: &Principal, org_id: &str, required: Level) -> Result<(), AppError> {
    if principal.authorized_for(org_id, required) {
        Ok(())
    } else {
        Err(AppError::from(SecurityError::InsufficientPermissions))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(permissions: &[&str]) -> Principal {
        Principal {
            sub: "user-1".to_string(),
            email: "user@example.com".to_string(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[test]
    fn allows_matching_org_and_sufficient_level() {
        let p = principal(&["acme:write"]);
        assert!(require_level(&p, "acme", Level::Read).is_ok());
    }

    #[test]
    fn rejects_insufficient_level() {
        let p = principal(&["acme:read"]);
        let err = require_level(&p, "acme", Level::Write).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn rejects_wrong_org() {
        let p = principal(&["other:audit"]);
        let err = require_level(&p, "acme", Level::Read).unwrap_err();
        assert!(matches!(err, AppError::Forbidden(_)));
    }

    #[test]
    fn wildcard_org_allows_any_org() {
        let p = principal(&["*:read"]);
        assert!(require_level(&p, "acme", Level::Read).is_ok());
    }
}
