use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Deserialize;
use tokio::sync::RwLock;

use crate::error::OidcError;

/// The subset of an OIDC discovery document this service consumes.
#[derive(Debug, Clone, Deserialize)]
pub struct DiscoveryDocument {
    pub authorization_endpoint: String,
    pub token_endpoint: String,
    pub jwks_uri: String,
    pub issuer: String,
}

struct CacheInner {
    document: Option<DiscoveryDocument>,
    fetched_at: Option<Instant>,
}

/// Fetches and caches the OIDC discovery document, per SPEC_FULL.md §6.3
/// ("Load discovery document"). Grounded on `graph-security::jwks::JwksCache`'s
/// TTL-gated refresh shape, simplified to a single-document cache with no
/// per-key rate-limit lock since the discovery document changes far less often
/// than signing keys do.
pub struct DiscoveryCache {
    client: reqwest::Client,
    url: String,
    ttl: Duration,
    inner: RwLock<CacheInner>,
}

fn is_stale(fetched_at: Option<Instant>, ttl: Duration) -> bool {
    match fetched_at {
        None => true,
        Some(at) => at.elapsed() >= ttl,
    }
}

impl DiscoveryCache {
    pub fn new(url: impl Into<String>, ttl: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            ttl,
            inner: RwLock::new(CacheInner {
                document: None,
                fetched_at: None,
            }),
        }
    }

    pub async fn get(&self) -> Result<DiscoveryDocument, OidcError> {
        {
            let guard = self.inner.read().await;
            if !is_stale(guard.fetched_at, self.ttl) {
                if let Some(doc) = &guard.document {
                    return Ok(doc.clone());
                }
            }
        }

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| OidcError::DiscoveryFailed(e.to_string()))?;
        let document: DiscoveryDocument = response
            .json()
            .await
            .map_err(|e| OidcError::DiscoveryFailed(e.to_string()))?;

        let mut guard = self.inner.write().await;
        guard.document = Some(document.clone());
        guard.fetched_at = Some(Instant::now());
        Ok(document)
    }
}

pub type SharedDiscoveryCache = Arc<DiscoveryCache>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_when_never_fetched() {
        assert!(is_stale(None, Duration::from_secs(600)));
    }

    #[test]
    fn not_stale_within_ttl() {
        assert!(!is_stale(Some(Instant::now()), Duration::from_secs(600)));
    }
}
