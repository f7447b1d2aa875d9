use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::entity::EdgeRecord;
use crate::error::DataError;

/// Optional filter/paging parameters for `GET /:org/edges`, per SPEC_FULL.md §4.4.
#[derive(Debug, Clone, Default)]
pub struct EdgeFilter {
    pub relationship_type: Option<String>,
    pub from_node: Option<String>,
    pub to_node: Option<String>,
    pub page: u32,
    pub limit: u32,
}

impl EdgeFilter {
    pub fn new() -> Self {
        Self {
            page: 1,
            limit: 100,
            ..Default::default()
        }
    }

    fn offset(&self) -> i64 {
        let page = self.page.max(1) as i64;
        (page - 1) * self.limit.max(1) as i64
    }
}

/// A node joined with its incident edges, per the outer-join query of SPEC_FULL.md §4.5.
#[derive(Debug, Clone)]
pub struct NodeWithEdges {
    pub node_id: String,
    pub edges: Vec<EdgeRecord>,
}

/// Postgres-backed edge repository. Grounded on `r2e-data-sqlx::SqlxRepository`,
/// extended with the outer-join query and outgoing-edge traversal fetch the
/// teacher's generic repository has no counterpart for.
#[derive(Clone)]
pub struct EdgeRepository {
    pool: PgPool,
}

impl EdgeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, org_id: &str, id: &str) -> Result<Option<EdgeRecord>, DataError> {
        let row = sqlx::query_as::<_, EdgeRecord>(
            r#"SELECT id, org_id, from_node, to_node, relationship_type, properties,
                      created_at, updated_at, created_by, updated_by, user_agent, client_ip
               FROM edges WHERE org_id = $1 AND id = $2"#,
        )
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self, org_id: &str, filter: &EdgeFilter) -> Result<(Vec<EdgeRecord>, i64), DataError> {
        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM edges WHERE org_id = ");
        count_qb.push_bind(org_id);
        Self::push_filters(&mut count_qb, filter);
        let total_records: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"SELECT id, org_id, from_node, to_node, relationship_type, properties,
                      created_at, updated_at, created_by, updated_by, user_agent, client_ip
               FROM edges WHERE org_id = "#,
        );
        qb.push_bind(org_id);
        Self::push_filters(&mut qb, filter);
        qb.push(" ORDER BY created_at DESC");
        qb.push(" LIMIT ");
        qb.push_bind(filter.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset());

        let rows = qb.build_query_as::<EdgeRecord>().fetch_all(&self.pool).await?;
        Ok((rows, total_records))
    }

    fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &EdgeFilter) {
        if let Some(r) = &filter.relationship_type {
            qb.push(" AND relationship_type = ");
            qb.push_bind(r.clone());
        }
        if let Some(f) = &filter.from_node {
            qb.push(" AND from_node = ");
            qb.push_bind(f.clone());
        }
        if let Some(t) = &filter.to_node {
            qb.push(" AND to_node = ");
            qb.push_bind(t.clone());
        }
    }

    /// All edges with `from_node IN (node_ids)`, used by the depth-limited
    /// traversal of SPEC_FULL.md §4.6.
    pub async fn outgoing(&self, org_id: &str, node_ids: &[String]) -> Result<Vec<EdgeRecord>, DataError> {
        if node_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, EdgeRecord>(
            r#"SELECT id, org_id, from_node, to_node, relationship_type, properties,
                      created_at, updated_at, created_by, updated_by, user_agent, client_ip
               FROM edges WHERE org_id = $1 AND from_node = ANY($2)"#,
        )
        .bind(org_id)
        .bind(node_ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Outer-join of `node_ids` against their incident edges (both directions),
    /// per SPEC_FULL.md §4.5: nodes with no edges still appear, with an empty list.
    pub async fn with_incident_edges(
        &self,
        org_id: &str,
        node_ids: &[String],
    ) -> Result<Vec<NodeWithEdges>, DataError> {
        if node_ids.is_empty() {
            return Ok(Vec::new());
        }
        let rows = sqlx::query_as::<_, EdgeRecord>(
            r#"SELECT id, org_id, from_node, to_node, relationship_type, properties,
                      created_at, updated_at, created_by, updated_by, user_agent, client_ip
               FROM edges
               WHERE org_id = $1 AND (from_node = ANY($2) OR to_node = ANY($2))"#,
        )
        .bind(org_id)
        .bind(node_ids)
        .fetch_all(&self.pool)
        .await?;

        Ok(node_ids
            .iter()
            .map(|id| {
                let edges = rows
                    .iter()
                    .filter(|e| &e.from_node == id || &e.to_node == id)
                    .cloned()
                    .collect();
                NodeWithEdges {
                    node_id: id.clone(),
                    edges,
                }
            })
            .collect())
    }

    /// Insert-or-replace on `(id, org_id)` conflict. `from_node`/`to_node`/
    /// `created_at`/`created_by` are excluded from the update set — an edge's
    /// endpoints and provenance are immutable across a re-upsert.
    pub async fn upsert(&self, edge: &EdgeRecord) -> Result<EdgeRecord, DataError> {
        let row = sqlx::query_as::<_, EdgeRecord>(
            r#"INSERT INTO edges (id, org_id, from_node, to_node, relationship_type, properties,
                                   created_at, updated_at, created_by, updated_by, user_agent, client_ip)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
               ON CONFLICT (id, org_id) DO UPDATE SET
                   relationship_type = excluded.relationship_type,
                   properties = excluded.properties,
                   updated_at = excluded.updated_at,
                   updated_by = excluded.updated_by,
                   user_agent = excluded.user_agent,
                   client_ip = excluded.client_ip
               RETURNING id, org_id, from_node, to_node, relationship_type, properties,
                         created_at, updated_at, created_by, updated_by, user_agent, client_ip"#,
        )
        .bind(&edge.id)
        .bind(&edge.org_id)
        .bind(&edge.from_node)
        .bind(&edge.to_node)
        .bind(&edge.relationship_type)
        .bind(&edge.properties)
        .bind(edge.created_at)
        .bind(edge.updated_at)
        .bind(&edge.created_by)
        .bind(&edge.updated_by)
        .bind(&edge.user_agent)
        .bind(&edge.client_ip)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Explicit update for `PUT /:org/edges/:id`: preserves endpoints and
    /// provenance, advances `updated_at`.
    pub async fn update(
        &self,
        org_id: &str,
        id: &str,
        relationship_type: &str,
        properties: &serde_json::Value,
        updated_by: &str,
    ) -> Result<EdgeRecord, DataError> {
        let row = sqlx::query_as::<_, EdgeRecord>(
            r#"UPDATE edges SET relationship_type = $1, properties = $2, updated_at = $3, updated_by = $4
               WHERE org_id = $5 AND id = $6
               RETURNING id, org_id, from_node, to_node, relationship_type, properties,
                         created_at, updated_at, created_by, updated_by, user_agent, client_ip"#,
        )
        .bind(relationship_type)
        .bind(properties)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DataError::NotFound(format!("edge {id} not found in org {org_id}")))?;
        Ok(row)
    }

    pub async fn delete(&self, org_id: &str, id: &str) -> Result<bool, DataError> {
        let result = sqlx::query("DELETE FROM edges WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Deletes every edge incident to `node_id` (either direction), used when a
    /// node is deleted. Per SPEC_FULL.md §4.3, node deletion cascades to edges.
    pub async fn delete_incident(&self, org_id: &str, node_id: &str) -> Result<u64, DataError> {
        let result = sqlx::query(
            "DELETE FROM edges WHERE org_id = $1 AND (from_node = $2 OR to_node = $2)",
        )
        .bind(org_id)
        .bind(node_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offset_is_zero_on_first_page() {
        let mut filter = EdgeFilter::new();
        filter.page = 1;
        filter.limit = 20;
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn offset_advances_with_page() {
        let mut filter = EdgeFilter::new();
        filter.page = 2;
        filter.limit = 20;
        assert_eq!(filter.offset(), 20);
    }
}
