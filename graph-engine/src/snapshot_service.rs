use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;

use graph_cache::{node_cache_key, KvCache};
use graph_data::{AuditContext, EdgeRecord, EdgeRepository, NodeFilter, NodeRecord, NodeRepository, Snapshot};

use crate::dto::ImportRequest;
use crate::error::EngineError;

/// Export/import orchestration for `/:org/metadata/export|import`, per
/// SPEC_FULL.md §4.7. Grounded on `graph-data::snapshot::Snapshot`'s format and
/// the same `NodeRepository`/`EdgeRepository` upsert path `NodeService`/`EdgeService`
/// use for single-record writes.
pub struct SnapshotService {
    nodes: NodeRepository,
    edges: EdgeRepository,
    cache: Arc<dyn KvCache>,
}

impl SnapshotService {
    pub fn new(nodes: NodeRepository, edges: EdgeRepository, cache: Arc<dyn KvCache>) -> Self {
        Self { nodes, edges, cache }
    }

    async fn refresh_cache(&self, org_id: &str, node: &NodeRecord) {
        let key = node_cache_key(org_id, &node.id);
        if let Ok(bytes) = serde_json::to_vec(node) {
            self.cache.set(&key, Bytes::from(bytes)).await;
        }
    }

    /// Fetches every node and edge in `org_id` and assembles a [`Snapshot`].
    /// Callers are responsible for persisting the blob to the snapshot store
    /// (SPEC_FULL.md §6.4's `export-<org>-<timestamp>.json` object).
    pub async fn export(&self, org_id: &str) -> Result<Snapshot, EngineError> {
        let mut all_nodes = Vec::new();
        let mut filter = NodeFilter::new();
        filter.limit = 1000;
        loop {
            let (page, total) = self.nodes.list(org_id, &filter).await?;
            let fetched_so_far = (filter.page as i64 - 1) * filter.limit as i64 + page.len() as i64;
            all_nodes.extend(page);
            if fetched_so_far >= total || all_nodes.is_empty() {
                break;
            }
            filter.page += 1;
        }

        let mut all_edges = Vec::new();
        let mut edge_filter = graph_data::EdgeFilter::new();
        edge_filter.limit = 1000;
        loop {
            let (page, total) = self.edges.list(org_id, &edge_filter).await?;
            let fetched_so_far = (edge_filter.page as i64 - 1) * edge_filter.limit as i64 + page.len() as i64;
            all_edges.extend(page);
            if fetched_so_far >= total || all_edges.is_empty() {
                break;
            }
            edge_filter.page += 1;
        }

        Ok(Snapshot::new(org_id.to_string(), all_nodes, all_edges, Utc::now()))
    }

    /// Validates the payload's declared version/org_id (if any), then upserts
    /// every node then every edge, filling `org_id` and audit fields where
    /// absent and refreshing the KV cache per imported node.
    pub async fn import(
        &self,
        org_id: &str,
        request: ImportRequest,
        audit: &AuditContext,
    ) -> Result<(usize, usize), EngineError> {
        let validation = Snapshot {
            timestamp: Utc::now(),
            version: request.version.clone().unwrap_or_else(|| graph_data::SNAPSHOT_VERSION.to_string()),
            org_id: request.org_id.clone().unwrap_or_else(|| org_id.to_string()),
            nodes: vec![],
            edges: vec![],
        };
        validation
            .validate_for_import(org_id)
            .map_err(|e| EngineError::BadRequest(e.to_string()))?;

        let now = Utc::now();
        let mut imported_nodes = 0usize;
        for item in request.nodes {
            let has_prior_audit = item.created_by.is_some();
            let node = NodeRecord {
                id: item.id,
                org_id: item.org_id.unwrap_or_else(|| org_id.to_string()),
                node_type: item.node_type,
                properties: item.properties,
                created_at: if has_prior_audit { item.created_at.unwrap_or(now) } else { now },
                updated_at: now,
                created_by: item.created_by.unwrap_or_else(|| audit.principal_id.clone()),
                updated_by: audit.principal_id.clone(),
                user_agent: item.user_agent,
                client_ip: item.client_ip,
            };
            self.nodes.upsert(&node).await?;
            self.refresh_cache(org_id, &node).await;
            imported_nodes += 1;
        }

        let mut imported_edges = 0usize;
        for item in request.edges {
            let has_prior_audit = item.created_by.is_some();
            let edge = EdgeRecord {
                id: item.id,
                org_id: item.org_id.unwrap_or_else(|| org_id.to_string()),
                from_node: item.from_node,
                to_node: item.to_node,
                relationship_type: item.relationship_type,
                properties: item.properties,
                created_at: if has_prior_audit { item.created_at.unwrap_or(now) } else { now },
                updated_at: now,
                created_by: item.created_by.unwrap_or_else(|| audit.principal_id.clone()),
                updated_by: audit.principal_id.clone(),
                user_agent: item.user_agent,
                client_ip: item.client_ip,
            };
            self.edges.upsert(&edge).await?;
            imported_edges += 1;
        }

        Ok((imported_nodes, imported_edges))
    }
}
