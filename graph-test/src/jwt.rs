use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

/// HS256 test-token builder carrying `sub`/`email`/`permissions`, signed with
/// a fixed secret and decoded in tests via `JwtValidator::new_with_static_key`.
/// Grounded on `example-app/src/main.rs`'s `generate_test_token()`, adapted
/// from the teacher's flat `roles` claim to this service's `<org>:<level>`
/// `permissions` scopes.
pub struct TestJwt {
    secret: Vec<u8>,
    issuer: String,
    audience: String,
}

impl TestJwt {
    pub fn new(secret: impl Into<Vec<u8>>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            issuer: issuer.into(),
            audience: audience.into(),
        }
    }

    /// Issues a token valid for one hour carrying the given `sub`/`email`/`permissions`.
    pub fn issue(&self, sub: &str, email: &str, permissions: &[&str]) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_secs()
            + 3600;

        let claims = json!({
            "sub": sub,
            "email": email,
            "permissions": permissions,
            "iss": self.issuer,
            "aud": self.audience,
            "exp": exp,
        });

        encode(&Header::new(jsonwebtoken::Algorithm::HS256), &claims, &EncodingKey::from_secret(&self.secret))
            .expect("failed to sign test token")
    }

    pub fn decoding_key(&self) -> jsonwebtoken::DecodingKey {
        jsonwebtoken::DecodingKey::from_secret(&self.secret)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{decode, Validation};
    use serde::Deserialize;

    #[derive(Deserialize)]
    struct Claims {
        sub: String,
        permissions: Vec<String>,
    }

    #[test]
    fn issued_token_round_trips() {
        let fixture = TestJwt::new("test-secret", "graph-service", "graph-app");
        let token = fixture.issue("user-1", "user@example.com", &["acme:write"]);

        let mut validation = Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.set_issuer(&["graph-service"]);
        validation.set_audience(&["graph-app"]);
        let decoded = decode::<Claims>(&token, &fixture.decoding_key(), &validation).unwrap();

        assert_eq!(decoded.claims.sub, "user-1");
        assert_eq!(decoded.claims.permissions, vec!["acme:write".to_string()]);
    }
}
