use chrono::Utc;
use uuid::Uuid;

use graph_data::{entity::shallow_merge, AuditContext, EdgeFilter, EdgeRecord, EdgeRepository};

use crate::dto::{
    CreateEdgeRequest, DeleteEdgeResult, EdgeListMetadata, EdgeListResponse, UpdateEdgeRequest,
};
use crate::error::EngineError;
use crate::vectorization::{vectorize_edge_best_effort, vectorize_keys, EmbeddingClient, VectorIndexClient};

/// Edge CRUD orchestration plus the vectorization side-channel. Grounded on
/// the same `example-app/src/services.rs` service-struct shape as
/// [`crate::node_service::NodeService`], extended with an optional
/// EP/VX client pair the teacher has no counterpart for.
#[derive(Clone)]
pub struct EdgeService {
    edges: EdgeRepository,
    vectorizer: Option<(std::sync::Arc<EmbeddingClient>, std::sync::Arc<VectorIndexClient>)>,
}

impl EdgeService {
    pub fn new(edges: EdgeRepository) -> Self {
        Self { edges, vectorizer: None }
    }

    pub fn with_vectorization(
        mut self,
        embedder: std::sync::Arc<EmbeddingClient>,
        vector_index: std::sync::Arc<VectorIndexClient>,
    ) -> Self {
        self.vectorizer = Some((embedder, vector_index));
        self
    }

    pub async fn get(&self, org_id: &str, id: &str) -> Result<EdgeRecord, EngineError> {
        self.edges
            .find(org_id, id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("edge {id} not found in org {org_id}")))
    }

    pub async fn list(&self, org_id: &str, filter: &EdgeFilter) -> Result<EdgeListResponse, EngineError> {
        let (rows, total) = self.edges.list(org_id, filter).await?;
        let filters = serde_json::json!({
            "relationship_type": filter.relationship_type,
            "from_node": filter.from_node,
            "to_node": filter.to_node,
        });
        Ok(EdgeListResponse {
            edges: rows,
            metadata: EdgeListMetadata {
                org_id: org_id.to_string(),
                total,
                filters,
            },
        })
    }

    /// Creates the edge; `from_node`/`to_node` are required (SPEC_FULL.md §9,
    /// resolved open question 1: missing required fields → `400`, not `500`).
    pub async fn create(
        &self,
        org_id: &str,
        request: CreateEdgeRequest,
        audit: &AuditContext,
    ) -> Result<EdgeRecord, EngineError> {
        let from_node = request
            .from_node
            .ok_or_else(|| EngineError::BadRequest("from_node is required".to_string()))?;
        let to_node = request
            .to_node
            .ok_or_else(|| EngineError::BadRequest("to_node is required".to_string()))?;

        let now = Utc::now();
        let edge = EdgeRecord {
            id: request.id.unwrap_or_else(|| Uuid::new_v4().to_string()),
            org_id: org_id.to_string(),
            from_node,
            to_node,
            relationship_type: request.relationship_type.unwrap_or_else(|| "related".to_string()),
            properties: request.properties,
            created_at: now,
            updated_at: now,
            created_by: audit.principal_id.clone(),
            updated_by: audit.principal_id.clone(),
            user_agent: audit.user_agent.clone(),
            client_ip: audit.client_ip.clone(),
        };

        let saved = self.edges.upsert(&edge).await?;
        self.maybe_vectorize(&saved).await;
        Ok(saved)
    }

    pub async fn update(
        &self,
        org_id: &str,
        id: &str,
        request: UpdateEdgeRequest,
        audit: &AuditContext,
    ) -> Result<EdgeRecord, EngineError> {
        let existing = self
            .edges
            .find(org_id, id)
            .await?
            .ok_or_else(|| EngineError::NotFound(format!("edge {id} not found in org {org_id}")))?;

        let relationship_type = request.relationship_type.unwrap_or(existing.relationship_type);
        let merged_properties = shallow_merge(&existing.properties, &request.properties);

        let saved = self
            .edges
            .update(org_id, id, &relationship_type, &merged_properties, &audit.principal_id)
            .await?;
        self.maybe_vectorize(&saved).await;
        Ok(saved)
    }

    pub async fn delete(&self, org_id: &str, id: &str) -> Result<DeleteEdgeResult, EngineError> {
        let deleted = self.edges.delete(org_id, id).await?;
        if !deleted {
            return Err(EngineError::NotFound(format!("edge {id} not found in org {org_id}")));
        }
        Ok(DeleteEdgeResult {
            id: id.to_string(),
            success: true,
        })
    }

    async fn maybe_vectorize(&self, edge: &EdgeRecord) {
        let Some(keys) = vectorize_keys(&edge.properties) else {
            return;
        };
        let Some((embedder, vector_index)) = &self.vectorizer else {
            tracing::debug!(edge_id = %edge.id, "vectorize requested but no EP/VX configured, skipping");
            return;
        };
        vectorize_edge_best_effort(embedder, vector_index, edge, &keys).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn create_without_from_node_is_bad_request() {
        let service = EdgeService::new(unreachable_repo());
        let audit = AuditContext {
            principal_id: "user-1".to_string(),
            user_agent: None,
            client_ip: None,
        };
        let request = CreateEdgeRequest {
            id: None,
            from_node: None,
            to_node: Some("n2".to_string()),
            relationship_type: None,
            properties: serde_json::json!({}),
        };
        let err = service.create("acme", request, &audit).await.unwrap_err();
        assert!(matches!(err, EngineError::BadRequest(_)));
    }

    fn unreachable_repo() -> EdgeRepository {
        // Validation fails before any repository call, so an unconnected pool is fine for this test.
        EdgeRepository::new(sqlx::Pool::connect_lazy("postgres://localhost/unused").unwrap())
    }
}
