use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum_extra::extract::cookie::CookieJar;

use crate::error::SecurityError;
use crate::jwt::JwtValidator;
use crate::principal::Principal;
use std::sync::Arc;

/// Extracts the bearer token from `Authorization: Bearer <token>`, falling
/// back to the `session=<token>` cookie, per SPEC_FULL.md §4.1.
pub fn extract_token(parts: &Parts) -> Result<String, SecurityError> {
    if let Some(header) = parts.headers.get(axum::http::header::AUTHORIZATION) {
        let value = header
            .to_str()
            .map_err(|_| SecurityError::InvalidToken("non-ascii Authorization header".to_string()))?;
        if let Some(token) = value.strip_prefix("Bearer ") {
            if !token.is_empty() {
                return Ok(token.to_string());
            }
        }
        return Err(SecurityError::InvalidToken("unsupported auth scheme".to_string()));
    }

    let jar = CookieJar::from_headers(&parts.headers);
    if let Some(cookie) = jar.get("session") {
        if !cookie.value().is_empty() {
            return Ok(cookie.value().to_string());
        }
    }

    Err(SecurityError::MissingToken)
}

/// Axum extractor that verifies the request's token and yields the resulting
/// [`Principal`]. Requires application state from which an `Arc<JwtValidator>`
/// can be obtained via [`FromRef`].
impl<S> FromRequestParts<S> for Principal
where
    Arc<JwtValidator>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = SecurityError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let token = extract_token(parts)?;
        let validator = Arc::<JwtValidator>::from_ref(state);
        validator.validate(&token).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{HeaderValue, Request};

    fn parts_with_header(name: axum::http::HeaderName, value: &str) -> Parts {
        let mut req = Request::builder().body(()).unwrap();
        req.headers_mut().insert(name, HeaderValue::from_str(value).unwrap());
        let (parts, _) = req.into_parts();
        parts
    }

    #[test]
    fn extracts_bearer_token() {
        let parts = parts_with_header(axum::http::header::AUTHORIZATION, "Bearer abc123");
        assert_eq!(extract_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn extracts_session_cookie_fallback() {
        let parts = parts_with_header(axum::http::header::COOKIE, "session=abc123; other=1");
        assert_eq!(extract_token(&parts).unwrap(), "abc123");
    }

    #[test]
    fn missing_token_is_missing_error() {
        let req = Request::builder().body(()).unwrap();
        let (parts, _) = req.into_parts();
        assert!(matches!(extract_token(&parts), Err(SecurityError::MissingToken)));
    }

    #[test]
    fn wrong_scheme_is_invalid() {
        let parts = parts_with_header(axum::http::header::AUTHORIZATION, "Basic abc123");
        assert!(matches!(extract_token(&parts), Err(SecurityError::InvalidToken(_))));
    }
}
