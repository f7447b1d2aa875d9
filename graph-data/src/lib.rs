pub mod edge_repo;
pub mod entity;
pub mod error;
pub mod schema;
pub mod snapshot;
pub mod node_repo;

pub use edge_repo::{EdgeFilter, EdgeRepository, NodeWithEdges};
pub use entity::{AuditContext, EdgeRecord, NodeRecord};
pub use error::DataError;
pub use node_repo::{NodeFilter, NodeRepository, SortOrder};
pub use schema::ensure_schema;
pub use snapshot::{Snapshot, SnapshotError, SNAPSHOT_VERSION};
