use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Error body shape, matching `graph-core::AppError`'s `{error}` convention.
#[derive(Debug, Serialize)]
pub struct OidcErrorBody {
    pub error: String,
}

/// Errors from the authorization-code callback flow. Grounded on
/// `r2e-oidc::error::OidcError`'s error-code/status-code/description shape,
/// trimmed to the callback's own failure modes (discovery, exchange,
/// id_token verification) rather than a full OAuth grant-type taxonomy.
#[derive(Debug)]
pub enum OidcError {
    MissingCode,
    DiscoveryFailed(String),
    ExchangeFailed(String),
    InvalidIdToken(String),
}

impl OidcError {
    fn status_code(&self) -> StatusCode {
        match self {
            OidcError::MissingCode => StatusCode::BAD_REQUEST,
            OidcError::DiscoveryFailed(_) => StatusCode::BAD_GATEWAY,
            OidcError::ExchangeFailed(_) => StatusCode::BAD_GATEWAY,
            OidcError::InvalidIdToken(_) => StatusCode::UNAUTHORIZED,
        }
    }

    fn description(&self) -> String {
        match self {
            OidcError::MissingCode => "missing authorization code".to_string(),
            OidcError::DiscoveryFailed(s) => format!("OIDC discovery failed: {s}"),
            OidcError::ExchangeFailed(s) => format!("token exchange failed: {s}"),
            OidcError::InvalidIdToken(s) => format!("invalid id_token: {s}"),
        }
    }
}

impl IntoResponse for OidcError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = OidcErrorBody {
            error: self.description(),
        };
        (status, Json(body)).into_response()
    }
}

impl std::fmt::Display for OidcError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

impl std::error::Error for OidcError {}

impl From<graph_security::SecurityError> for OidcError {
    fn from(err: graph_security::SecurityError) -> Self {
        OidcError::InvalidIdToken(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_code_is_bad_request() {
        assert_eq!(OidcError::MissingCode.status_code(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn invalid_id_token_is_unauthorized() {
        let err = OidcError::InvalidIdToken("bad signature".to_string());
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }
}
