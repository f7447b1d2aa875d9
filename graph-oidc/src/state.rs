use std::sync::Arc;
use std::time::Duration;

use graph_security::{JwksCache, JwtValidator, SecurityConfig};
use tokio::sync::OnceCell;

use crate::config::OidcClientConfig;
use crate::discovery::DiscoveryCache;
use crate::error::OidcError;

/// Shared OIDC callback state. The `id_token` validator is built lazily on
/// first use, once the discovery document (and therefore `jwks_uri`/`issuer`)
/// is known — unlike the Auth Gate's [`JwtValidator`], which is configured
/// upfront from a static `OIDC_DISCOVERY_URL`-derived JWKS endpoint.
pub struct OidcState {
    pub config: OidcClientConfig,
    pub discovery: DiscoveryCache,
    pub http_client: reqwest::Client,
    jwks_cache_ttl: Duration,
    jwks_min_refresh_interval: Duration,
    validator: OnceCell<Arc<JwtValidator>>,
}

impl OidcState {
    pub fn new(config: OidcClientConfig, jwks_cache_ttl: Duration, jwks_min_refresh_interval: Duration) -> Self {
        Self {
            discovery: DiscoveryCache::new(config.discovery_url.clone(), Duration::from_secs(3600)),
            config,
            http_client: reqwest::Client::new(),
            jwks_cache_ttl,
            jwks_min_refresh_interval,
            validator: OnceCell::new(),
        }
    }

    /// Returns the `id_token` validator, constructing it from the discovery
    /// document's `jwks_uri`/`issuer` on first call.
    pub async fn id_token_validator(&self) -> Result<Arc<JwtValidator>, OidcError> {
        if let Some(v) = self.validator.get() {
            return Ok(v.clone());
        }
        let document = self.discovery.get().await?;
        let jwks = Arc::new(JwksCache::new(
            document.jwks_uri.clone(),
            self.jwks_cache_ttl,
            self.jwks_min_refresh_interval,
        ));
        let security_config = SecurityConfig::new(
            document.jwks_uri,
            document.issuer,
            self.config.client_id.clone(),
        );
        let validator = Arc::new(JwtValidator::new(jwks, security_config));
        Ok(self.validator.get_or_init(|| async { validator }).await.clone())
    }
}
