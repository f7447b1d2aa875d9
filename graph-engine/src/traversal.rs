use std::collections::HashSet;
use std::sync::Mutex;

use graph_data::{EdgeRecord, EdgeRepository, NodeRecord, NodeRepository};

use crate::dto::{TraverseMetadata, TraverseRequest, TraverseResponse};
use crate::error::EngineError;

const DEFAULT_MAX_DEPTH: u32 = 3;

struct TraversalState {
    visited: HashSet<String>,
    nodes: Vec<NodeRecord>,
    edges: Vec<EdgeRecord>,
    paths: Vec<Vec<String>>,
}

/// Outgoing-edge depth-limited DFS rooted at a start node, per
/// SPEC_FULL.md §4.6. New — no single teacher file matches this traversal
/// shape; built directly from the spec's algorithm description, using the
/// `graph-data` repositories for node/edge fetches the same way
/// [`crate::node_service::NodeService`] does.
pub struct TraversalService {
    nodes: NodeRepository,
    edges: EdgeRepository,
}

impl TraversalService {
    pub fn new(nodes: NodeRepository, edges: EdgeRepository) -> Self {
        Self { nodes, edges }
    }

    pub async fn run(&self, org_id: &str, request: TraverseRequest) -> Result<TraverseResponse, EngineError> {
        let max_depth = request.max_depth.unwrap_or(DEFAULT_MAX_DEPTH);
        let relationship_types = request.relationship_types.clone();

        let state = Mutex::new(TraversalState {
            visited: HashSet::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            paths: Vec::new(),
        });

        self.visit(
            org_id,
            &request.start_node,
            0,
            max_depth,
            relationship_types.as_deref(),
            vec![request.start_node.clone()],
            &state,
        )
        .await?;

        let state = state.into_inner().unwrap();
        let metadata = TraverseMetadata {
            org_id: org_id.to_string(),
            start_node: request.start_node,
            max_depth,
            relationship_types,
            total_nodes: state.nodes.len(),
            total_edges: state.edges.len(),
            total_paths: state.paths.len(),
        };

        Ok(TraverseResponse {
            nodes: state.nodes,
            edges: state.edges,
            paths: state.paths,
            metadata,
        })
    }

    fn visit<'a>(
        &'a self,
        org_id: &'a str,
        node_id: &'a str,
        depth: u32,
        max_depth: u32,
        relationship_types: Option<&'a [String]>,
        path: Vec<String>,
        state: &'a Mutex<TraversalState>,
    ) -> std::pin::Pin<Box<dyn std::future::Future<Output = Result<(), EngineError>> + Send + 'a>> {
        Box::pin(async move {
            let already_visited = {
                let guard = state.lock().unwrap();
                guard.visited.contains(node_id)
            };

            if depth >= max_depth || already_visited {
                if path.len() > 1 {
                    state.lock().unwrap().paths.push(path);
                }
                return Ok(());
            }

            {
                let mut guard = state.lock().unwrap();
                guard.visited.insert(node_id.to_string());
            }

            if let Some(node) = self.nodes.find(org_id, node_id).await? {
                state.lock().unwrap().nodes.push(node);
            }

            let outgoing = self.edges.outgoing(org_id, std::slice::from_ref(&node_id.to_string())).await?;
            let outgoing: Vec<EdgeRecord> = outgoing
                .into_iter()
                .filter(|e| match relationship_types {
                    Some(types) => types.iter().any(|t| t == &e.relationship_type),
                    None => true,
                })
                .collect();

            if outgoing.is_empty() && path.len() > 1 {
                state.lock().unwrap().paths.push(path.clone());
            }

            for edge in outgoing {
                state.lock().unwrap().edges.push(edge.clone());
                let mut next_path = path.clone();
                next_path.push(edge.to_node.clone());
                self.visit(org_id, &edge.to_node, depth + 1, max_depth, relationship_types, next_path, state)
                    .await?;
            }

            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_max_depth_is_three() {
        assert_eq!(DEFAULT_MAX_DEPTH, 3);
    }
}
