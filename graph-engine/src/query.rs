use std::collections::HashSet;
use std::time::Instant;

use graph_data::{EdgeFilter, EdgeRecord, EdgeRepository, NodeFilter, NodeRepository};

use crate::dto::{QueryMetadata, QueryRequest, QueryResponse};
use crate::error::EngineError;

/// `POST /:org/query`: a single outer-join of nodes against their incident
/// edges, filtered by org and optional `node_type`/`relationship_type`,
/// per SPEC_FULL.md §4.5. Grounded on `graph-data`'s repository query style;
/// the join itself is expressed as two independently-filtered fetches plus an
/// in-memory dedup rather than a single SQL outer join, since the node and
/// edge predicates (`node_type` vs `relationship_type`) apply to different
/// tables and graph-data's repositories already expose org-scoped filtered
/// listing for each.
pub struct QueryService {
    nodes: NodeRepository,
    edges_repo: EdgeRepository,
}

impl QueryService {
    pub fn new(nodes: NodeRepository, edges_repo: EdgeRepository) -> Self {
        Self { nodes, edges_repo }
    }

    pub async fn run(&self, org_id: &str, request: QueryRequest) -> Result<QueryResponse, EngineError> {
        let started = Instant::now();
        let limit = request.limit.unwrap_or(100);

        let mut node_filter = NodeFilter::new();
        node_filter.node_type = request.node_type;
        node_filter.limit = limit;
        let (nodes, _) = self.nodes.list(org_id, &node_filter).await?;

        let mut edge_filter = EdgeFilter::new();
        edge_filter.relationship_type = request.relationship_type;
        edge_filter.limit = limit;
        let (candidate_edges, _) = self.edges_repo.list(org_id, &edge_filter).await?;

        let node_ids: HashSet<String> = nodes.iter().map(|n| n.id.clone()).collect();
        let edges: Vec<EdgeRecord> = candidate_edges
            .into_iter()
            .filter(|e| node_ids.contains(&e.from_node) || node_ids.contains(&e.to_node))
            .collect();

        let nodes = dedup_by_id(nodes, |n| n.id.clone());
        let edges = dedup_by_id(edges, |e| e.id.clone());

        let metadata = QueryMetadata {
            total_nodes: nodes.len(),
            total_edges: edges.len(),
            query_time_ms: started.elapsed().as_millis() as u64,
            org_id: org_id.to_string(),
        };

        Ok(QueryResponse { nodes, edges, metadata })
    }
}

fn dedup_by_id<T, F: Fn(&T) -> String>(items: Vec<T>, key: F) -> Vec<T> {
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(key(item)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dedup_by_id_removes_duplicates_keeping_first() {
        let items = vec![("a", 1), ("b", 2), ("a", 3)];
        let result = dedup_by_id(items, |(id, _)| id.to_string());
        assert_eq!(result, vec![("a", 1), ("b", 2)]);
    }
}
