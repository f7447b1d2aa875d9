use std::sync::Arc;

use axum::extract::FromRef;
use graph_cache::KvCache;
use graph_engine::{EdgeService, NodeService, QueryService, SnapshotService, TraversalService};
use graph_security::JwtValidator;

use crate::object_store::SnapshotStore;

/// Shared application state. Grounded on `example-postgres/src/state.rs`'s
/// plain `#[derive(Clone)]` state struct with `FromRef` impls per dependency,
/// generalized from a single `ArticleService` to the graph engine's five
/// services plus the JWT validator the Auth Gate extractor needs.
#[derive(Clone)]
pub struct AppState {
    pub node_service: NodeService,
    pub edge_service: EdgeService,
    pub query_service: Arc<QueryService>,
    pub traversal_service: Arc<TraversalService>,
    pub snapshot_service: Arc<SnapshotService>,
    pub jwt_validator: Arc<JwtValidator>,
    pub cache: Arc<dyn KvCache>,
    pub snapshot_store: SnapshotStore,
}

impl FromRef<AppState> for Arc<JwtValidator> {
    fn from_ref(state: &AppState) -> Self {
        state.jwt_validator.clone()
    }
}
