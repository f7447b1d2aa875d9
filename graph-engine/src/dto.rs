use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use graph_data::{EdgeRecord, NodeRecord};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateNodeRequest {
    pub id: Option<String>,
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateNodeRequest {
    #[serde(rename = "type")]
    pub node_type: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteNodeResult {
    pub id: String,
    pub deleted_edges: u64,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub page: u32,
    pub limit: u32,
    pub total_records: i64,
    pub total_pages: u32,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u32>,
    pub prev_page: Option<u32>,
}

impl PaginationMeta {
    pub fn new(page: u32, limit: u32, total_records: i64) -> Self {
        let page = page.max(1);
        let limit = limit.max(1);
        let total_pages = if total_records <= 0 {
            0
        } else {
            ((total_records as u64 + limit as u64 - 1) / limit as u64) as u32
        };
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        Self {
            page,
            limit,
            total_records,
            total_pages,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then_some(page + 1),
            prev_page: has_prev_page.then_some(page - 1),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NodeListResponse {
    pub data: Vec<NodeRecord>,
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEdgeRequest {
    pub id: Option<String>,
    pub from_node: Option<String>,
    pub to_node: Option<String>,
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateEdgeRequest {
    pub relationship_type: Option<String>,
    #[serde(default)]
    pub properties: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeListMetadata {
    pub org_id: String,
    pub total: i64,
    pub filters: serde_json::Value,
}

#[derive(Debug, Clone, Serialize)]
pub struct EdgeListResponse {
    pub edges: Vec<EdgeRecord>,
    pub metadata: EdgeListMetadata,
}

#[derive(Debug, Clone, Serialize)]
pub struct DeleteEdgeResult {
    pub id: String,
    pub success: bool,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct QueryRequest {
    pub node_type: Option<String>,
    pub relationship_type: Option<String>,
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryMetadata {
    pub total_nodes: usize,
    pub total_edges: usize,
    pub query_time_ms: u64,
    pub org_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct QueryResponse {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub metadata: QueryMetadata,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TraverseRequest {
    pub start_node: String,
    pub max_depth: Option<u32>,
    pub relationship_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraverseMetadata {
    pub org_id: String,
    pub start_node: String,
    pub max_depth: u32,
    pub relationship_types: Option<Vec<String>>,
    pub total_nodes: usize,
    pub total_edges: usize,
    pub total_paths: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct TraverseResponse {
    pub nodes: Vec<NodeRecord>,
    pub edges: Vec<EdgeRecord>,
    pub paths: Vec<Vec<String>>,
    pub metadata: TraverseMetadata,
}

/// Node entry inside an import payload. Unlike [`NodeRecord`], the tenant and
/// audit fields are optional — `SnapshotService::import` fills them in from the
/// target org and the authenticated principal when absent, per SPEC_FULL.md §4.7.
#[derive(Debug, Clone, Deserialize)]
pub struct ImportNodeRequest {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
}

/// Edge entry inside an import payload. Same optionality rules as
/// [`ImportNodeRequest`].
#[derive(Debug, Clone, Deserialize)]
pub struct ImportEdgeRequest {
    pub id: String,
    pub from_node: String,
    pub to_node: String,
    pub relationship_type: String,
    #[serde(default)]
    pub properties: serde_json::Value,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub updated_by: Option<String>,
    #[serde(default)]
    pub user_agent: Option<String>,
    #[serde(default)]
    pub client_ip: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ImportRequest {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub org_id: Option<String>,
    #[serde(default)]
    pub nodes: Vec<ImportNodeRequest>,
    #[serde(default)]
    pub edges: Vec<ImportEdgeRequest>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImportResponse {
    pub org_id: String,
    pub imported_nodes: usize,
    pub imported_edges: usize,
    pub timestamp: DateTime<Utc>,
    pub imported_by: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pagination_meta_computes_total_pages() {
        let meta = PaginationMeta::new(1, 10, 25);
        assert_eq!(meta.total_pages, 3);
        assert!(meta.has_next_page);
        assert!(!meta.has_prev_page);
        assert_eq!(meta.next_page, Some(2));
        assert_eq!(meta.prev_page, None);
    }

    #[test]
    fn pagination_meta_last_page_has_no_next() {
        let meta = PaginationMeta::new(3, 10, 25);
        assert!(!meta.has_next_page);
        assert!(meta.has_prev_page);
        assert_eq!(meta.next_page, None);
        assert_eq!(meta.prev_page, Some(2));
    }

    #[test]
    fn pagination_meta_zero_records_has_zero_pages() {
        let meta = PaginationMeta::new(1, 10, 0);
        assert_eq!(meta.total_pages, 0);
        assert!(!meta.has_next_page);
    }
}
