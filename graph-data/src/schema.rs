use sqlx::PgPool;

use crate::error::DataError;

/// DDL for the two durable-store tables and their indexes, per SPEC_FULL.md §6.6.
/// Applied at startup only when `INIT_DB` is truthy — production deployments are
/// expected to own migrations separately.
const CREATE_NODES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS nodes (
    id          TEXT NOT NULL,
    org_id      TEXT NOT NULL,
    type        TEXT NOT NULL,
    properties  JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at  TIMESTAMPTZ NOT NULL,
    updated_at  TIMESTAMPTZ NOT NULL,
    created_by  TEXT NOT NULL,
    updated_by  TEXT NOT NULL,
    user_agent  TEXT,
    client_ip   TEXT,
    PRIMARY KEY (id, org_id)
)
"#;

const CREATE_EDGES_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS edges (
    id                  TEXT NOT NULL,
    org_id              TEXT NOT NULL,
    from_node           TEXT NOT NULL,
    to_node             TEXT NOT NULL,
    relationship_type   TEXT NOT NULL,
    properties          JSONB NOT NULL DEFAULT '{}'::jsonb,
    created_at          TIMESTAMPTZ NOT NULL,
    updated_at          TIMESTAMPTZ NOT NULL,
    created_by          TEXT NOT NULL,
    updated_by          TEXT NOT NULL,
    user_agent          TEXT,
    client_ip           TEXT,
    PRIMARY KEY (id, org_id)
)
"#;

const CREATE_INDEXES: &[&str] = &[
    "CREATE INDEX IF NOT EXISTS idx_nodes_org_id ON nodes (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_type ON nodes (type)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_created_by ON nodes (created_by)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_updated_by ON nodes (updated_by)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_created_at ON nodes (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_updated_at ON nodes (updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_nodes_org_type ON nodes (org_id, type)",
    "CREATE INDEX IF NOT EXISTS idx_edges_org_id ON edges (org_id)",
    "CREATE INDEX IF NOT EXISTS idx_edges_created_by ON edges (created_by)",
    "CREATE INDEX IF NOT EXISTS idx_edges_updated_by ON edges (updated_by)",
    "CREATE INDEX IF NOT EXISTS idx_edges_created_at ON edges (created_at)",
    "CREATE INDEX IF NOT EXISTS idx_edges_updated_at ON edges (updated_at)",
    "CREATE INDEX IF NOT EXISTS idx_edges_from_node ON edges (from_node)",
    "CREATE INDEX IF NOT EXISTS idx_edges_to_node ON edges (to_node)",
    "CREATE INDEX IF NOT EXISTS idx_edges_relationship_type ON edges (relationship_type)",
    "CREATE INDEX IF NOT EXISTS idx_edges_org_from_node ON edges (org_id, from_node)",
    "CREATE INDEX IF NOT EXISTS idx_edges_org_to_node ON edges (org_id, to_node)",
    "CREATE INDEX IF NOT EXISTS idx_edges_org_relationship_type ON edges (org_id, relationship_type)",
];

/// Idempotently creates the durable-store schema. Safe to call on every
/// startup when `INIT_DB=true`.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), DataError> {
    sqlx::query(CREATE_NODES_TABLE).execute(pool).await?;
    sqlx::query(CREATE_EDGES_TABLE).execute(pool).await?;
    for stmt in CREATE_INDEXES {
        sqlx::query(stmt).execute(pool).await?;
    }
    tracing::info!("durable-store schema ensured");
    Ok(())
}
