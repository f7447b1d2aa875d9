use std::sync::Arc;

use bytes::Bytes;
use chrono::Utc;
use uuid::Uuid;

use graph_cache::{node_cache_key, KvCache};
use graph_data::{entity::shallow_merge, AuditContext, EdgeRepository, NodeFilter, NodeRecord, NodeRepository};

use crate::dto::{CreateNodeRequest, DeleteNodeResult, NodeListResponse, PaginationMeta, UpdateNodeRequest};
use crate::error::EngineError;

/// Whether a node read was served from the KV cache or hydrated from the
/// durable store, for the `X-Node-Cache` response header (SPEC_FULL.md §4.3).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn header_value(self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

/// Node CRUD orchestration: KV read-through, DS upsert, cascade delete.
/// Grounded on `example-app/src/services.rs`'s `UserService` (a `Clone`-able
/// async service struct wrapping shared state), generalized from an in-memory
/// `Vec` to real `graph-data` repositories plus a `graph-cache` read-through.
#[derive(Clone)]
pub struct NodeService {
    nodes: NodeRepository,
    edges: EdgeRepository,
    cache: Arc<dyn KvCache>,
}

impl NodeService {
    pub fn new(nodes: NodeRepository, edges: EdgeRepository, cache: Arc<dyn KvCache>) -> Self {
        Self { nodes, edges, cache }
    }

    pub async fn get(&self, org_id: &str, id: &str) -> Result<(NodeRecord, CacheStatus), EngineError> {
        let key = node_cache_key(org_id, id);
        if let Some(bytes) = self.cache.get(&key).await {
            if let Ok(node) = serde_json::from_slice::<NodeRecord>(&bytes) {
                return Ok((node, CacheStatus::Hit));
            }
        }

        let node = self
            .nodes
            .find(org_id, id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("node {id} not found in org {org_id}")))?;

        self.refresh_cache(&key, &node).await;
        Ok((node, CacheStatus::Miss))
    }

    pub async fn list(&self, org_id: &str, filter: &NodeFilter) -> Result<NodeListResponse, EngineError> {
        let (rows, total_records) = self.nodes.list(org_id, filter).await?;
        let pagination = PaginationMeta::new(filter.page, filter.limit, total_records);
        Ok(NodeListResponse { data: rows, pagination })
    }

    pub async fn create(
        &self,
        org_id: &str,
        request: CreateNodeRequest,
        audit: &AuditContext,
    ) -> Result<NodeRecord, EngineError> {
        let now = Utc::now();
        let node = NodeRecord {
            id: request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            org_id: org_id.to_string(),
            node_type: request.node_type.unwrap_or_else(|| "default".to_string()),
            properties: request.properties,
            created_at: now,
            updated_at: now,
            created_by: audit.principal_id.clone(),
            updated_by: audit.principal_id.clone(),
            user_agent: audit.user_agent.clone(),
            client_ip: audit.client_ip.clone(),
        };

        let saved = self.nodes.upsert(&node).await?;
        let key = node_cache_key(org_id, &saved.id);
        self.refresh_cache(&key, &saved).await;
        Ok(saved)
    }

    pub async fn update(
        &self,
        org_id: &str,
        id: &str,
        request: UpdateNodeRequest,
        audit: &AuditContext,
    ) -> Result<NodeRecord, EngineError> {
        let existing = self
            .nodes
            .find(org_id, id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("node {id} not found in org {org_id}")))?;

        let node_type = request.node_type.unwrap_or(existing.node_type);
        let merged_properties = shallow_merge(&existing.properties, &request.properties);

        let saved = self
            .nodes
            .update(org_id, id, &node_type, &merged_properties, &audit.principal_id)
            .await?;

        let key = node_cache_key(org_id, id);
        self.refresh_cache(&key, &saved).await;
        Ok(saved)
    }

    pub async fn delete(&self, org_id: &str, id: &str) -> Result<DeleteNodeResult, EngineError> {
        self.nodes
            .find(org_id, id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("node {id} not found in org {org_id}")))?;

        let deleted_edges = self.edges.delete_incident(org_id, id).await?;
        self.nodes.delete(org_id, id).await?;
        self.cache.remove(&node_cache_key(org_id, id)).await;

        Ok(DeleteNodeResult {
            id: id.to_string(),
            deleted_edges,
            timestamp: Utc::now(),
        })
    }

    async fn refresh_cache(&self, key: &str, node: &NodeRecord) {
        if let Ok(bytes) = serde_json::to_vec(node) {
            self.cache.set(key, Bytes::from(bytes)).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cache_status_header_values() {
        assert_eq!(CacheStatus::Hit.header_value(), "HIT");
        assert_eq!(CacheStatus::Miss.header_value(), "MISS");
    }
}
