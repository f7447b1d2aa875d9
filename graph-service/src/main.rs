use std::future::Future;
use std::net::SocketAddr;
use std::pin::Pin;
use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

use graph_cache::{InMemoryKv, KvCache};
use graph_core::{GraphConfig, HealthIndicator, HealthState, HealthStatus};
use graph_data::{ensure_schema, EdgeRepository, NodeRepository};
use graph_engine::{EdgeService, NodeService, QueryService, SnapshotService, TraversalService};
use graph_oidc::{OidcClientConfig, OidcState};
use graph_security::{JwksCache, JwtValidator, SecurityConfig};

use graph_service::object_store::SnapshotStore;
use graph_service::state::AppState;
use graph_service::router;

struct DurableStoreIndicator {
    pool: sqlx::PgPool,
}

impl HealthIndicator for DurableStoreIndicator {
    fn name(&self) -> &'static str {
        "durable-store"
    }

    fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>> {
        Box::pin(async move {
            match sqlx::query("SELECT 1").execute(&self.pool).await {
                Ok(_) => HealthStatus::Up,
                Err(e) => HealthStatus::Down { reason: e.to_string() },
            }
        })
    }
}

struct CacheIndicator {
    cache: Arc<dyn KvCache>,
}

impl HealthIndicator for CacheIndicator {
    fn name(&self) -> &'static str {
        "cache"
    }

    fn check(&self) -> Pin<Box<dyn Future<Output = HealthStatus> + Send + '_>> {
        Box::pin(async move {
            let key = "__health_check__";
            self.cache.set(key, bytes::Bytes::from_static(b"1")).await;
            match self.cache.get(key).await {
                Some(_) => HealthStatus::Up,
                None => HealthStatus::Down { reason: "cache write did not round-trip".to_string() },
            }
        })
    }
}

#[tokio::main]
async fn main() {
    let config = GraphConfig::load().expect("failed to load configuration");
    graph_core::init_tracing(&config.tracing_filter());

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&config.database_url)
        .await
        .expect("failed to connect to durable store");

    if config.init_db {
        ensure_schema(&pool).await.expect("failed to apply durable-store schema");
    }

    let nodes = NodeRepository::new(pool.clone());
    let edges = EdgeRepository::new(pool.clone());

    let cache: Arc<dyn KvCache> = Arc::new(InMemoryKv::new());

    // The Auth Gate and the OIDC callback both trust the same IdP, so they
    // share the discovery document but keep independent caches: the gate's
    // validator is built once at startup, the callback's lazily on first use.
    let discovery = graph_oidc::discovery::DiscoveryCache::new(config.oidc_discovery_url.clone(), Duration::from_secs(3600));
    let document = discovery.get().await.expect("failed to load OIDC discovery document");

    let jwks = Arc::new(JwksCache::new(
        document.jwks_uri.clone(),
        Duration::from_secs(config.jwks_cache_ttl_secs),
        Duration::from_secs(config.jwks_min_refresh_interval_secs),
    ));
    let security_config = SecurityConfig::new(document.jwks_uri, document.issuer, config.oidc_client_id.clone());
    let jwt_validator = Arc::new(JwtValidator::new(jwks, security_config));

    let oidc_config = OidcClientConfig::new(
        config.oidc_discovery_url.clone(),
        config.oidc_client_id.clone(),
        config.oidc_client_secret.clone(),
        config.oidc_redirect_uri.clone(),
    );
    let oidc_state = Arc::new(OidcState::new(
        oidc_config,
        Duration::from_secs(config.jwks_cache_ttl_secs),
        Duration::from_secs(config.jwks_min_refresh_interval_secs),
    ));

    let mut edge_service = EdgeService::new(edges.clone());
    if let (Some(ep_url), Some(vx_url)) = (&config.ep_url, &config.vx_url) {
        let embedder = Arc::new(graph_engine::EmbeddingClient::new(
            ep_url.clone(),
            config.ep_api_key.clone().unwrap_or_default(),
        ));
        let vector_index = Arc::new(graph_engine::VectorIndexClient::new(
            vx_url.clone(),
            config.vx_api_key.clone().unwrap_or_default(),
            config.vx_edge_collection.clone().unwrap_or_else(|| "edges".to_string()),
        ));
        edge_service = edge_service.with_vectorization(embedder, vector_index);
    }

    let app_state = AppState {
        node_service: NodeService::new(nodes.clone(), edges.clone(), cache.clone()),
        edge_service,
        query_service: Arc::new(QueryService::new(nodes.clone(), edges.clone())),
        traversal_service: Arc::new(TraversalService::new(nodes.clone(), edges.clone())),
        snapshot_service: Arc::new(SnapshotService::new(nodes, edges, cache.clone())),
        jwt_validator,
        cache,
        snapshot_store: SnapshotStore::new(config.snapshot_dir.clone()),
    };

    let health_state = Arc::new(HealthState::new(vec![
        Arc::new(DurableStoreIndicator { pool }),
        Arc::new(CacheIndicator { cache: app_state.cache.clone() }),
    ]));

    let app = router::build_router(app_state, oidc_state, health_state, config.cors_allowed_origins.as_deref());

    let addr: SocketAddr = config.bind_addr.parse().expect("invalid BIND_ADDR");
    tracing::info!(%addr, "graph-service listening");
    let listener = tokio::net::TcpListener::bind(addr).await.expect("failed to bind");
    axum::serve(listener, app.into_make_service_with_connect_info::<SocketAddr>())
        .await
        .expect("server error");
}
