use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use jsonwebtoken::DecodingKey;
use serde::Deserialize;
use tokio::sync::{Mutex, RwLock};

use crate::error::SecurityError;

#[derive(Debug, Deserialize)]
struct Jwk {
    kid: String,
    n: String,
    e: String,
    #[serde(default)]
    kty: String,
}

#[derive(Debug, Deserialize)]
struct JwksResponse {
    keys: Vec<Jwk>,
}

struct CachedJwk {
    n: String,
    e: String,
}

impl CachedJwk {
    fn to_decoding_key(&self) -> Result<DecodingKey, SecurityError> {
        DecodingKey::from_rsa_components(&self.n, &self.e)
            .map_err(|e| SecurityError::JwksFetchFailed(format!("invalid RSA key components: {e}")))
    }
}

struct CacheInner {
    keys: HashMap<String, CachedJwk>,
    fetched_at: Option<Instant>,
    last_attempt: Option<Instant>,
}

/// Fetches and caches a remote JWKS document, keyed by `kid`.
///
/// Grounded on the teacher's `r2e-security::jwks::JwksCache`: a TTL-based cache with a
/// rate-limited refresh path so a storm of unknown-`kid` lookups can't hammer the IdP.
pub struct JwksCache {
    client: reqwest::Client,
    url: String,
    ttl: Duration,
    min_refresh_interval: Duration,
    inner: RwLock<CacheInner>,
    refresh_lock: Mutex<()>,
}

fn is_stale(fetched_at: Option<Instant>, ttl: Duration) -> bool {
    match fetched_at {
        None => true,
        Some(at) => at.elapsed() >= ttl,
    }
}

fn can_attempt(last_attempt: Option<Instant>, min_interval: Duration) -> bool {
    match last_attempt {
        None => true,
        Some(at) => at.elapsed() >= min_interval,
    }
}

impl JwksCache {
    pub fn new(url: impl Into<String>, ttl: Duration, min_refresh_interval: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            ttl,
            min_refresh_interval,
            inner: RwLock::new(CacheInner {
                keys: HashMap::new(),
                fetched_at: None,
                last_attempt: None,
            }),
            refresh_lock: Mutex::new(()),
        }
    }

    /// Resolve a decoding key for `kid`, refreshing the cache if stale or if the
    /// key is simply unknown (e.g. the IdP rotated keys since our last fetch).
    pub async fn get_key(&self, kid: &str) -> Result<DecodingKey, SecurityError> {
        {
            let guard = self.inner.read().await;
            if !is_stale(guard.fetched_at, self.ttl) {
                if let Some(jwk) = guard.keys.get(kid) {
                    return jwk.to_decoding_key();
                }
            }
        }

        self.try_refresh().await?;

        let guard = self.inner.read().await;
        guard
            .keys
            .get(kid)
            .ok_or_else(|| SecurityError::InvalidToken(format!("unknown signing key: {kid}")))
            .and_then(|jwk| jwk.to_decoding_key())
    }

    async fn try_refresh(&self) -> Result<(), SecurityError> {
        let _permit = self.refresh_lock.lock().await;

        // Another task may have refreshed while we waited for the lock.
        {
            let guard = self.inner.read().await;
            if !is_stale(guard.fetched_at, self.ttl) {
                return Ok(());
            }
            if !can_attempt(guard.last_attempt, self.min_refresh_interval) {
                return Ok(());
            }
        }

        {
            let mut guard = self.inner.write().await;
            guard.last_attempt = Some(Instant::now());
        }

        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|e| SecurityError::JwksFetchFailed(e.to_string()))?;

        let body: JwksResponse = response
            .json()
            .await
            .map_err(|e| SecurityError::JwksFetchFailed(e.to_string()))?;

        let mut keys = HashMap::new();
        for jwk in body.keys {
            if jwk.kty != "RSA" && !jwk.kty.is_empty() {
                continue;
            }
            keys.insert(jwk.kid.clone(), CachedJwk { n: jwk.n, e: jwk.e });
        }

        let mut guard = self.inner.write().await;
        guard.keys = keys;
        guard.fetched_at = Some(Instant::now());
        Ok(())
    }
}

pub type SharedJwksCache = Arc<JwksCache>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stale_when_never_fetched() {
        assert!(is_stale(None, Duration::from_secs(600)));
    }

    #[test]
    fn not_stale_within_ttl() {
        let now = Instant::now();
        assert!(!is_stale(Some(now), Duration::from_secs(600)));
    }

    #[test]
    fn can_attempt_when_never_attempted() {
        assert!(can_attempt(None, Duration::from_secs(10)));
    }

    #[test]
    fn cannot_attempt_within_rate_limit() {
        let now = Instant::now();
        assert!(!can_attempt(Some(now), Duration::from_secs(10)));
    }
}
