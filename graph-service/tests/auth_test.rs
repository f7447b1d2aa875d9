//! End-to-end Auth Gate coverage through the real router, per SPEC_FULL.md
//! §4.1/§6.1. Grounded on `examples/example-app/tests/http_verbs_test.rs`'s
//! shape: build a real router over fake/unreachable backing services, drive
//! it with `TestApp`, assert on status codes. No database is ever reached
//! here since every case is rejected before a handler calls a repository.

use std::sync::Arc;

use graph_cache::{InMemoryKv, KvCache};
use graph_engine::{EdgeService, NodeService, QueryService, SnapshotService, TraversalService};
use graph_oidc::{OidcClientConfig, OidcState};
use graph_security::{JwtValidator, SecurityConfig};
use graph_test::{TestApp, TestJwt};

fn unreachable_pool() -> sqlx::PgPool {
    sqlx::Pool::connect_lazy("postgres://localhost/unused").unwrap()
}

fn test_app() -> (TestApp, TestJwt) {
    let pool = unreachable_pool();
    let nodes = graph_data::NodeRepository::new(pool.clone());
    let edges = graph_data::EdgeRepository::new(pool);
    let cache: Arc<dyn KvCache> = Arc::new(InMemoryKv::new());

    let fixture = TestJwt::new("test-secret", "graph-service", "graph-app");
    let validator = Arc::new(JwtValidator::new_with_static_key(
        fixture.decoding_key(),
        SecurityConfig::new("unused", "graph-service", "graph-app"),
    ));

    let state = graph_service::state::AppState {
        node_service: NodeService::new(nodes.clone(), edges.clone(), cache.clone()),
        edge_service: EdgeService::new(edges.clone()),
        query_service: Arc::new(QueryService::new(nodes.clone(), edges.clone())),
        traversal_service: Arc::new(TraversalService::new(nodes.clone(), edges.clone())),
        snapshot_service: Arc::new(SnapshotService::new(nodes, edges, cache.clone())),
        jwt_validator: validator,
        cache,
        snapshot_store: graph_service::object_store::SnapshotStore::new(std::env::temp_dir()),
    };

    let oidc_state = Arc::new(OidcState::new(
        OidcClientConfig::new("https://idp.example/.well-known/openid-configuration", "client", "secret", "http://localhost/auth/callback"),
        std::time::Duration::from_secs(600),
        std::time::Duration::from_secs(10),
    ));

    let health_state = Arc::new(graph_core::HealthState::new(vec![]));
    let router = graph_service::router::build_router(state, oidc_state, health_state, None);
    (TestApp::new(router), fixture)
}

#[tokio::test]
async fn missing_token_is_unauthorized() {
    let (app, _fixture) = test_app();
    app.get("/acme/nodes").await.assert_unauthorized();
}

#[tokio::test]
async fn insufficient_level_is_forbidden() {
    let (app, fixture) = test_app();
    let token = fixture.issue("user-1", "user@example.com", &["acme:read"]);
    app.post_json_authenticated("/acme/nodes", &serde_json::json!({}), &token)
        .await
        .assert_forbidden();
}

#[tokio::test]
async fn wrong_org_is_forbidden() {
    let (app, fixture) = test_app();
    let token = fixture.issue("user-1", "user@example.com", &["beta:audit"]);
    app.get_authenticated("/acme/nodes", &token).await.assert_forbidden();
}

#[tokio::test]
async fn session_cookie_is_accepted_as_bearer_fallback() {
    let (app, fixture) = test_app();
    let token = fixture.issue("user-1", "user@example.com", &["acme:read"]);
    let response = app.get_with_session_cookie("/orgs", &token).await;
    let response = response.assert_ok();
    let body: serde_json::Value = response.json();
    assert_eq!(body["orgs"], serde_json::json!(["acme"]));
}
