use serde::Deserialize;

use crate::config::OidcClientConfig;
use crate::discovery::DiscoveryDocument;
use crate::error::OidcError;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    id_token: String,
}

/// POSTs the authorization code to the IdP's token endpoint, per
/// SPEC_FULL.md §6.3 step 1: `grant_type=authorization_code`, `code`,
/// `client_id`, `client_secret`, `redirect_uri`. Grounded on
/// `graph-security::jwks::JwksCache`'s use of a bare `reqwest::Client` for a
/// single outbound call with no retry/backoff beyond what reqwest itself does.
pub async fn exchange_code(
    client: &reqwest::Client,
    discovery: &DiscoveryDocument,
    config: &OidcClientConfig,
    code: &str,
) -> Result<String, OidcError> {
    let params = [
        ("grant_type", "authorization_code"),
        ("code", code),
        ("client_id", &config.client_id),
        ("client_secret", &config.client_secret),
        ("redirect_uri", &config.redirect_uri),
    ];

    let response = client
        .post(&discovery.token_endpoint)
        .form(&params)
        .send()
        .await
        .map_err(|e| OidcError::ExchangeFailed(e.to_string()))?;

    if !response.status().is_success() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(OidcError::ExchangeFailed(format!("{status}: {body}")));
    }

    let body: TokenResponse = response
        .json()
        .await
        .map_err(|e| OidcError::ExchangeFailed(e.to_string()))?;
    Ok(body.id_token)
}
