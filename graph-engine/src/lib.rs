pub mod dto;
pub mod edge_service;
pub mod error;
pub mod node_service;
pub mod query;
pub mod snapshot_service;
pub mod traversal;
pub mod vectorization;

pub use edge_service::EdgeService;
pub use error::EngineError;
pub use node_service::{CacheStatus, NodeService};
pub use query::QueryService;
pub use snapshot_service::SnapshotService;
pub use traversal::TraversalService;
pub use vectorization::{EmbeddingClient, VectorIndexClient};
