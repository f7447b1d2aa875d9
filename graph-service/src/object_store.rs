use std::path::PathBuf;

use serde::Serialize;
use serde_json::json;

/// Filesystem-backed object store for exported snapshots, per SPEC_FULL.md
/// §4.7/§6.5 (`SNAPSHOT_DIR` — "`SNAPSHOT_DIR` or object-store binding").
/// New; the spec names only an "Object Store (OS)" role with no concrete
/// backend, so a plain directory-of-files implementation stands in, mirroring
/// `graph-cache::InMemoryKv`'s "one trivial backend behind the simplest
/// possible interface" texture.
#[derive(Clone)]
pub struct SnapshotStore {
    dir: PathBuf,
}

impl SnapshotStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Writes `body` verbatim under `export-<org>-<timestamp>.json`, plus a
    /// `.meta.json` sidecar carrying `{exportedAt, orgId, nodeCount, edgeCount}`.
    pub async fn put_export<T: Serialize>(
        &self,
        org_id: &str,
        exported_at: chrono::DateTime<chrono::Utc>,
        node_count: usize,
        edge_count: usize,
        body: &T,
    ) -> std::io::Result<String> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let key = format!("export-{org_id}-{}.json", exported_at.timestamp());
        let path = self.dir.join(&key);
        let meta_path = self.dir.join(format!("{key}.meta.json"));

        let metadata = json!({
            "exportedAt": exported_at,
            "orgId": org_id,
            "nodeCount": node_count,
            "edgeCount": edge_count,
        });

        tokio::fs::write(&path, serde_json::to_vec_pretty(body)?).await?;
        tokio::fs::write(&meta_path, serde_json::to_vec_pretty(&metadata)?).await?;
        Ok(key)
    }
}
