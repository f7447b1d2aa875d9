/// Configuration for the JWT/JWKS verification pipeline.
#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub jwks_url: String,
    pub issuer: String,
    pub audience: String,
    /// Defaults to 600s (~10 minutes) per SPEC_FULL.md §4.1.
    pub jwks_cache_ttl_secs: u64,
    pub jwks_min_refresh_interval_secs: u64,
    /// Clock-skew tolerance applied to `exp`/`nbf` checks, in seconds.
    pub clock_skew_secs: u64,
}

impl SecurityConfig {
    pub fn new(jwks_url: impl Into<String>, issuer: impl Into<String>, audience: impl Into<String>) -> Self {
        Self {
            jwks_url: jwks_url.into(),
            issuer: issuer.into(),
            audience: audience.into(),
            jwks_cache_ttl_secs: 600,
            jwks_min_refresh_interval_secs: 10,
            clock_skew_secs: 30,
        }
    }

    pub fn with_cache_ttl(mut self, secs: u64) -> Self {
        self.jwks_cache_ttl_secs = secs;
        self
    }

    pub fn with_min_refresh_interval(mut self, secs: u64) -> Self {
        self.jwks_min_refresh_interval_secs = secs;
        self
    }

    pub fn with_clock_skew(mut self, secs: u64) -> Self {
        self.clock_skew_secs = secs;
        self
    }
}
