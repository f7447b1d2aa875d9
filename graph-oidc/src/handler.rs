use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::Deserialize;

use crate::client::exchange_code;
use crate::error::OidcError;
use crate::state::OidcState;

#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
}

/// `GET /auth/callback?code=...`, per SPEC_FULL.md §6.3. Grounded on
/// `graph-security::extractor::extract_token`'s cookie-handling idiom for how
/// the outgoing `session` cookie is built.
pub async fn callback(
    State(state): State<Arc<OidcState>>,
    Query(query): Query<CallbackQuery>,
    jar: CookieJar,
) -> Result<Response, OidcError> {
    let code = query.code.ok_or(OidcError::MissingCode)?;

    let document = state.discovery.get().await?;
    let id_token = exchange_code(&state.http_client, &document, &state.config, &code).await?;

    let validator = state.id_token_validator().await?;
    validator.validate(&id_token).await?;

    let mut cookie = Cookie::new("session", id_token);
    cookie.set_path("/");
    cookie.set_http_only(true);
    cookie.set_secure(true);
    cookie.set_same_site(SameSite::Lax);

    let jar = jar.add(cookie);
    Ok((jar, Redirect::to("/")).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn callback_query_code_is_optional_to_detect_missing() {
        let query: CallbackQuery = serde_json::from_str("{}").unwrap();
        assert!(query.code.is_none());
    }
}
