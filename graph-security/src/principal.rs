/// The authenticated actor derived from a verified token, per SPEC_FULL.md's
/// glossary: "the authenticated actor (id, email) derived from the token."
///
/// Unlike the teacher's `AuthenticatedUser` (which carries a flat `roles: Vec<String>`),
/// `permissions` holds `<org>:<level>` scope strings — this service's authorization
/// model has no role concept, only org-scoped permission levels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub sub: String,
    pub email: String,
    pub permissions: Vec<String>,
}

/// Permission levels in ascending order of privilege, per SPEC_FULL.md §4.1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    Read,
    Write,
    Audit,
}

impl Level {
    fn parse(s: &str) -> Option<Level> {
        match s {
            "read" => Some(Level::Read),
            "write" => Some(Level::Write),
            "audit" => Some(Level::Audit),
            _ => None,
        }
    }
}

/// One `<orgScope>:<level>` scope held by a principal, parsed from a raw
/// permission string. `orgScope` and `level` may each be the wildcard `"*"`.
struct Scope<'a> {
    org: &'a str,
    level: &'a str,
}

impl<'a> Scope<'a> {
    fn parse(raw: &'a str) -> Option<Scope<'a>> {
        let (org, level) = raw.rsplit_once(':')?;
        if org.is_empty() || level.is_empty() {
            return None;
        }
        Some(Scope { org, level })
    }

    fn satisfies(&self, org_id: &str, required: Level) -> bool {
        let org_matches = self.org == org_id || self.org == "*";
        if !org_matches {
            return false;
        }
        if self.level == "*" {
            return true;
        }
        match Level::parse(self.level) {
            Some(held) => held >= required,
            None => false,
        }
    }
}

impl Principal {
    /// Implements the authorization predicate from SPEC_FULL.md §4.1:
    /// `(s == orgId ∨ s == "*") ∧ (l == "*" ∨ rank(l) ≥ rank(requiredLevel))`.
    pub fn authorized_for(&self, org_id: &str, required: Level) -> bool {
        self.permissions
            .iter()
            .filter_map(|raw| Scope::parse(raw))
            .any(|scope| scope.satisfies(org_id, required))
    }

    /// The distinct set of org ids this principal holds any permission scope for,
    /// used by `GET /orgs` (SPEC_FULL.md §6.1). A `"*"` org scope is omitted since
    /// it does not name a concrete org.
    pub fn held_orgs(&self) -> Vec<String> {
        let mut orgs: Vec<String> = self
            .permissions
            .iter()
            .filter_map(|raw| Scope::parse(raw))
            .map(|s| s.org.to_string())
            .filter(|org| org != "*")
            .collect();
        orgs.sort();
        orgs.dedup();
        orgs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn principal(perms: &[&str]) -> Principal {
        Principal {
            sub: "user-1".into(),
            email: "user@example.com".into(),
            permissions: perms.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn level_ordering() {
        assert!(Level::Read < Level::Write);
        assert!(Level::Write < Level::Audit);
    }

    #[test]
    fn exact_org_exact_level_matches() {
        let p = principal(&["acme:read"]);
        assert!(p.authorized_for("acme", Level::Read));
        assert!(!p.authorized_for("acme", Level::Write));
        assert!(!p.authorized_for("other", Level::Read));
    }

    #[test]
    fn higher_level_subsumes_lower() {
        let p = principal(&["acme:write"]);
        assert!(p.authorized_for("acme", Level::Read));
        assert!(p.authorized_for("acme", Level::Write));
        assert!(!p.authorized_for("acme", Level::Audit));
    }

    #[test]
    fn wildcard_org_matches_any_org() {
        let p = principal(&["*:write"]);
        assert!(p.authorized_for("acme", Level::Write));
        assert!(p.authorized_for("anything", Level::Read));
        assert!(!p.authorized_for("acme", Level::Audit));
    }

    #[test]
    fn wildcard_level_matches_any_level() {
        let p = principal(&["acme:*"]);
        assert!(p.authorized_for("acme", Level::Audit));
        assert!(!p.authorized_for("other", Level::Read));
    }

    #[test]
    fn wildcard_org_and_level_is_superuser() {
        let p = principal(&["*:*"]);
        assert!(p.authorized_for("anything", Level::Audit));
    }

    #[test]
    fn malformed_scope_is_ignored() {
        let p = principal(&["not-a-scope"]);
        assert!(!p.authorized_for("acme", Level::Read));
    }

    #[test]
    fn held_orgs_dedups_and_excludes_wildcard() {
        let p = principal(&["acme:read", "acme:write", "beta:audit", "*:read"]);
        assert_eq!(p.held_orgs(), vec!["acme".to_string(), "beta".to_string()]);
    }
}
