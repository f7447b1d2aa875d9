use std::sync::Arc;

use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use crate::config::SecurityConfig;
use crate::error::SecurityError;
use crate::jwks::JwksCache;
use crate::principal::Principal;

/// Source of decoding keys: a remote JWKS cache in production, or a static
/// key for tests. Grounded on `r2e_security::jwt::KeySource`.
enum KeySource {
    Jwks(Arc<JwksCache>),
    Static(DecodingKey),
}

/// Raw JWT claims shape per SPEC_FULL.md §6.2: `sub`, `email`, `permissions`
/// (array of strings, or a single comma-joined string).
#[derive(Debug, Deserialize)]
struct RawClaims {
    sub: String,
    email: String,
    #[serde(default)]
    permissions: PermissionsClaim,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum PermissionsClaim {
    List(Vec<String>),
    Joined(String),
    Absent,
}

impl Default for PermissionsClaim {
    fn default() -> Self {
        PermissionsClaim::Absent
    }
}

impl PermissionsClaim {
    fn into_vec(self) -> Vec<String> {
        match self {
            PermissionsClaim::List(v) => v,
            PermissionsClaim::Joined(s) => s
                .split(',')
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty())
                .collect(),
            PermissionsClaim::Absent => Vec::new(),
        }
    }
}

/// Decodes and verifies a bearer/cookie token against the configured JWKS,
/// issuer, and audience, returning a [`Principal`] on success.
///
/// Grounded on `r2e-security::jwt::JwtClaimsValidator::validate`.
pub struct JwtValidator {
    key_source: KeySource,
    config: SecurityConfig,
}

impl JwtValidator {
    pub fn new(jwks: Arc<JwksCache>, config: SecurityConfig) -> Self {
        Self {
            key_source: KeySource::Jwks(jwks),
            config,
        }
    }

    /// Builds a validator with a fixed decoding key instead of a JWKS cache,
    /// for tests that sign tokens locally rather than standing up an IdP.
    pub fn new_with_static_key(key: DecodingKey, config: SecurityConfig) -> Self {
        Self {
            key_source: KeySource::Static(key),
            config,
        }
    }

    pub async fn validate(&self, token: &str) -> Result<Principal, SecurityError> {
        let header = decode_header(token)
            .map_err(|e| SecurityError::InvalidToken(format!("malformed header: {e}")))?;

        let key = match &self.key_source {
            KeySource::Static(key) => key.clone(),
            KeySource::Jwks(jwks) => {
                if !matches!(header.alg, Algorithm::RS256 | Algorithm::RS384 | Algorithm::RS512) {
                    return Err(SecurityError::InvalidToken("unsupported algorithm".to_string()));
                }
                let kid = header
                    .kid
                    .ok_or_else(|| SecurityError::InvalidToken("token missing kid".to_string()))?;
                jwks.get_key(&kid).await?
            }
        };

        let mut validation = Validation::new(header.alg);
        validation.set_issuer(&[&self.config.issuer]);
        validation.set_audience(&[&self.config.audience]);
        validation.leeway = self.config.clock_skew_secs;

        let data = decode::<RawClaims>(token, &key, &validation)
            .map_err(|e| SecurityError::InvalidToken(e.to_string()))?;

        if data.claims.sub.is_empty() || data.claims.email.is_empty() {
            return Err(SecurityError::InvalidToken(
                "token missing required sub/email claims".to_string(),
            ));
        }

        Ok(Principal {
            sub: data.claims.sub,
            email: data.claims.email,
            permissions: data.claims.permissions.into_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn permissions_claim_parses_comma_joined() {
        let claim = PermissionsClaim::Joined("acme:read, acme:write ,*:audit".to_string());
        assert_eq!(
            claim.into_vec(),
            vec!["acme:read".to_string(), "acme:write".to_string(), "*:audit".to_string()]
        );
    }

    #[test]
    fn permissions_claim_parses_list() {
        let claim = PermissionsClaim::List(vec!["acme:read".to_string()]);
        assert_eq!(claim.into_vec(), vec!["acme:read".to_string()]);
    }

    #[test]
    fn permissions_claim_absent_is_empty() {
        assert!(PermissionsClaim::Absent.into_vec().is_empty());
    }
}
