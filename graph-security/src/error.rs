use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use graph_core::AppError;
use serde_json::json;

/// Auth-gate failures. Unlike the upstream framework's `SecurityError`, each
/// variant maps to one of the two distinct public messages SPEC_FULL.md §4.1
/// requires ("Missing authentication token" vs "Invalid authentication token"),
/// plus the separate authorization failure message.
#[derive(Debug)]
pub enum SecurityError {
    MissingToken,
    InvalidToken(String),
    InsufficientPermissions,
    JwksFetchFailed(String),
}

impl SecurityError {
    pub fn public_message(&self) -> &'static str {
        match self {
            SecurityError::MissingToken => "Missing authentication token",
            SecurityError::InvalidToken(_) => "Invalid authentication token",
            SecurityError::JwksFetchFailed(_) => "Invalid authentication token",
            SecurityError::InsufficientPermissions => "Insufficient permissions",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            SecurityError::InsufficientPermissions => StatusCode::FORBIDDEN,
            _ => StatusCode::UNAUTHORIZED,
        }
    }
}

impl std::fmt::Display for SecurityError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecurityError::MissingToken => write!(f, "missing authentication token"),
            SecurityError::InvalidToken(msg) => write!(f, "invalid token: {msg}"),
            SecurityError::JwksFetchFailed(msg) => write!(f, "jwks fetch failed: {msg}"),
            SecurityError::InsufficientPermissions => write!(f, "insufficient permissions"),
        }
    }
}

impl std::error::Error for SecurityError {}

impl IntoResponse for SecurityError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = json!({ "error": self.public_message() });
        (status, Json(body)).into_response()
    }
}

impl From<SecurityError> for AppError {
    fn from(err: SecurityError) -> Self {
        match err {
            SecurityError::InsufficientPermissions => AppError::Forbidden(err.public_message().to_string()),
            _ => AppError::Unauthorized(err.public_message().to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_token_message() {
        assert_eq!(SecurityError::MissingToken.public_message(), "Missing authentication token");
        assert_eq!(SecurityError::MissingToken.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn invalid_token_message() {
        let err = SecurityError::InvalidToken("bad signature".into());
        assert_eq!(err.public_message(), "Invalid authentication token");
        assert_eq!(err.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn insufficient_permissions_is_403() {
        let err = SecurityError::InsufficientPermissions;
        assert_eq!(err.public_message(), "Insufficient permissions");
        assert_eq!(err.status(), StatusCode::FORBIDDEN);
    }
}
