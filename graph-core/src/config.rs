use std::fmt;

/// Configuration load failure.
#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid { key: &'static str, reason: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing required config key: {key}"),
            ConfigError::Invalid { key, reason } => {
                write!(f, "invalid value for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Flat, env-var-only configuration matching SPEC_FULL.md §6.5 / §10.4.
///
/// Resolution order: `.env` file (non-overwriting), then process environment.
/// Required keys are missing-fails-fast at startup; everything else has a default.
#[derive(Debug, Clone)]
pub struct GraphConfig {
    pub bind_addr: String,
    pub log_level: String,
    pub init_db: bool,
    pub database_url: String,
    pub cache_url: Option<String>,
    pub snapshot_dir: String,
    pub oidc_discovery_url: String,
    pub oidc_client_id: String,
    pub oidc_client_secret: String,
    pub oidc_redirect_uri: String,
    pub cors_allowed_origins: Option<String>,
    pub vx_url: Option<String>,
    pub vx_api_key: Option<String>,
    pub vx_edge_collection: Option<String>,
    pub ep_url: Option<String>,
    pub ep_api_key: Option<String>,
    pub jwks_cache_ttl_secs: u64,
    pub jwks_min_refresh_interval_secs: u64,
}

fn require(key: &'static str) -> Result<String, ConfigError> {
    std::env::var(key).map_err(|_| ConfigError::Missing(key))
}

fn optional(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|v| !v.is_empty())
}

fn optional_or(key: &str, default: &str) -> String {
    optional(key).unwrap_or_else(|| default.to_string())
}

fn truthy(val: &str) -> bool {
    matches!(val.to_ascii_lowercase().as_str(), "1" | "true" | "yes" | "on")
}

impl GraphConfig {
    /// Load configuration from `.env` (if present) then the process environment.
    pub fn load() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();

        let jwks_cache_ttl_secs = optional("JWKS_CACHE_TTL_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                key: "JWKS_CACHE_TTL_SECS",
                reason: e.to_string(),
            })?
            .unwrap_or(600);

        let jwks_min_refresh_interval_secs = optional("JWKS_MIN_REFRESH_INTERVAL_SECS")
            .map(|v| v.parse::<u64>())
            .transpose()
            .map_err(|e| ConfigError::Invalid {
                key: "JWKS_MIN_REFRESH_INTERVAL_SECS",
                reason: e.to_string(),
            })?
            .unwrap_or(10);

        Ok(GraphConfig {
            bind_addr: optional_or("BIND_ADDR", "0.0.0.0:3000"),
            log_level: optional_or("LOG_LEVEL", "info"),
            init_db: optional("INIT_DB").map(|v| truthy(&v)).unwrap_or(false),
            database_url: require("DATABASE_URL")?,
            cache_url: optional("CACHE_URL"),
            snapshot_dir: optional_or("SNAPSHOT_DIR", "./snapshots"),
            oidc_discovery_url: require("OIDC_DISCOVERY_URL")?,
            oidc_client_id: require("OIDC_CLIENT_ID")?,
            oidc_client_secret: require("OIDC_CLIENT_SECRET")?,
            oidc_redirect_uri: optional_or("OIDC_REDIRECT_URI", "http://localhost:3000/auth/callback"),
            cors_allowed_origins: optional("CORS_ALLOWED_ORIGINS"),
            vx_url: optional("VX_URL"),
            vx_api_key: optional("VX_API_KEY"),
            vx_edge_collection: optional("VX_EDGE_COLLECTION"),
            ep_url: optional("EP_URL"),
            ep_api_key: optional("EP_API_KEY"),
            jwks_cache_ttl_secs,
            jwks_min_refresh_interval_secs,
        })
    }

    /// Maps LOG_LEVEL's non-standard `performance` value onto a tracing filter
    /// directive that isolates per-stage duration logs under `target=perf`.
    pub fn tracing_filter(&self) -> String {
        match self.log_level.as_str() {
            "performance" => "info,perf=debug".to_string(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthy_recognizes_common_forms() {
        assert!(truthy("1"));
        assert!(truthy("true"));
        assert!(truthy("TRUE"));
        assert!(truthy("yes"));
        assert!(!truthy("0"));
        assert!(!truthy("false"));
        assert!(!truthy(""));
    }

    #[test]
    fn tracing_filter_maps_performance() {
        let mut cfg = test_config();
        cfg.log_level = "performance".to_string();
        assert_eq!(cfg.tracing_filter(), "info,perf=debug");
        cfg.log_level = "debug".to_string();
        assert_eq!(cfg.tracing_filter(), "debug");
    }

    fn test_config() -> GraphConfig {
        GraphConfig {
            bind_addr: "0.0.0.0:3000".into(),
            log_level: "info".into(),
            init_db: false,
            database_url: "postgres://localhost/test".into(),
            cache_url: None,
            snapshot_dir: "./snapshots".into(),
            oidc_discovery_url: "https://idp.example/.well-known/openid-configuration".into(),
            oidc_client_id: "client".into(),
            oidc_client_secret: "secret".into(),
            oidc_redirect_uri: "http://localhost:3000/auth/callback".into(),
            cors_allowed_origins: None,
            vx_url: None,
            vx_api_key: None,
            vx_edge_collection: None,
            ep_url: None,
            ep_api_key: None,
            jwks_cache_ttl_secs: 600,
            jwks_min_refresh_interval_secs: 10,
        }
    }
}
