use chrono::Utc;
use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::entity::NodeRecord;
use crate::error::DataError;

/// Optional filter/paging/sort parameters for `GET /:org/nodes`, per
/// SPEC_FULL.md §4.3.
#[derive(Debug, Clone, Default)]
pub struct NodeFilter {
    pub node_type: Option<String>,
    pub created_by: Option<String>,
    pub updated_by: Option<String>,
    pub page: u32,
    pub limit: u32,
    pub sort_by: String,
    pub sort_order: SortOrder,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Default for SortOrder {
    fn default() -> Self {
        SortOrder::Desc
    }
}

impl SortOrder {
    fn as_sql(self) -> &'static str {
        match self {
            SortOrder::Asc => "ASC",
            SortOrder::Desc => "DESC",
        }
    }
}

/// Columns eligible for `sort_by`; anything else falls back to `created_at`.
const SORTABLE_COLUMNS: &[&str] = &["created_at", "updated_at", "created_by", "updated_by", "id"];

fn sanitize_sort_column(requested: &str) -> &'static str {
    SORTABLE_COLUMNS
        .iter()
        .find(|c| **c == requested)
        .copied()
        .unwrap_or("created_at")
}

impl NodeFilter {
    pub fn new() -> Self {
        Self {
            page: 1,
            limit: 100,
            sort_by: "created_at".to_string(),
            sort_order: SortOrder::Desc,
            ..Default::default()
        }
    }

    fn offset(&self) -> i64 {
        let page = self.page.max(1) as i64;
        (page - 1) * self.limit.max(1) as i64
    }
}

/// Postgres-backed node repository. Grounded on `r2e-data-sqlx::SqlxRepository`,
/// generalized from a single generic CRUD wrapper into the richer, spec-specific
/// query shapes (pagination, cascade delete, org-scoped filtering) the teacher's
/// generic repository does not cover.
#[derive(Clone)]
pub struct NodeRepository {
    pool: PgPool,
}

impl NodeRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find(&self, org_id: &str, id: &str) -> Result<Option<NodeRecord>, DataError> {
        let row = sqlx::query_as::<_, NodeRecord>(
            r#"SELECT id, org_id, type as "node_type: _", properties, created_at, updated_at,
                      created_by, updated_by, user_agent, client_ip
               FROM nodes WHERE org_id = $1 AND id = $2"#,
        )
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    pub async fn list(&self, org_id: &str, filter: &NodeFilter) -> Result<(Vec<NodeRecord>, i64), DataError> {
        let sort_col = sanitize_sort_column(&filter.sort_by);

        let mut count_qb: QueryBuilder<Postgres> =
            QueryBuilder::new("SELECT COUNT(*) FROM nodes WHERE org_id = ");
        count_qb.push_bind(org_id);
        Self::push_filters(&mut count_qb, filter);
        let total_records: i64 = count_qb.build_query_scalar().fetch_one(&self.pool).await?;

        let mut qb: QueryBuilder<Postgres> = QueryBuilder::new(
            r#"SELECT id, org_id, type as node_type, properties, created_at, updated_at,
                      created_by, updated_by, user_agent, client_ip
               FROM nodes WHERE org_id = "#,
        );
        qb.push_bind(org_id);
        Self::push_filters(&mut qb, filter);
        qb.push(format!(" ORDER BY {} {}", sort_col, filter.sort_order.as_sql()));
        qb.push(" LIMIT ");
        qb.push_bind(filter.limit as i64);
        qb.push(" OFFSET ");
        qb.push_bind(filter.offset());

        let rows = qb.build_query_as::<NodeRecord>().fetch_all(&self.pool).await?;
        Ok((rows, total_records))
    }

    fn push_filters(qb: &mut QueryBuilder<Postgres>, filter: &NodeFilter) {
        if let Some(t) = &filter.node_type {
            qb.push(" AND type = ");
            qb.push_bind(t.clone());
        }
        if let Some(c) = &filter.created_by {
            qb.push(" AND created_by = ");
            qb.push_bind(c.clone());
        }
        if let Some(u) = &filter.updated_by {
            qb.push(" AND updated_by = ");
            qb.push_bind(u.clone());
        }
    }

    /// Insert-or-replace on `(id, org_id)` conflict. `created_at`/`created_by`
    /// are excluded from the update set so a conflicting write can never reset
    /// them — the resolved open question in SPEC_FULL.md §9.
    pub async fn upsert(&self, node: &NodeRecord) -> Result<NodeRecord, DataError> {
        let row = sqlx::query_as::<_, NodeRecord>(
            r#"INSERT INTO nodes (id, org_id, type, properties, created_at, updated_at,
                                   created_by, updated_by, user_agent, client_ip)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
               ON CONFLICT (id, org_id) DO UPDATE SET
                   type = excluded.type,
                   properties = excluded.properties,
                   updated_at = excluded.updated_at,
                   updated_by = excluded.updated_by,
                   user_agent = excluded.user_agent,
                   client_ip = excluded.client_ip
               RETURNING id, org_id, type as node_type, properties, created_at, updated_at,
                         created_by, updated_by, user_agent, client_ip"#,
        )
        .bind(&node.id)
        .bind(&node.org_id)
        .bind(&node.node_type)
        .bind(&node.properties)
        .bind(node.created_at)
        .bind(node.updated_at)
        .bind(&node.created_by)
        .bind(&node.updated_by)
        .bind(&node.user_agent)
        .bind(&node.client_ip)
        .fetch_one(&self.pool)
        .await?;
        Ok(row)
    }

    /// Explicit update for `PUT /:org/nodes/:id`: preserves `created_at`/`created_by`,
    /// advances `updated_at` to `Utc::now()`.
    pub async fn update(
        &self,
        org_id: &str,
        id: &str,
        node_type: &str,
        properties: &serde_json::Value,
        updated_by: &str,
    ) -> Result<NodeRecord, DataError> {
        let row = sqlx::query_as::<_, NodeRecord>(
            r#"UPDATE nodes SET type = $1, properties = $2, updated_at = $3, updated_by = $4
               WHERE org_id = $5 AND id = $6
               RETURNING id, org_id, type as node_type, properties, created_at, updated_at,
                         created_by, updated_by, user_agent, client_ip"#,
        )
        .bind(node_type)
        .bind(properties)
        .bind(Utc::now())
        .bind(updated_by)
        .bind(org_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| DataError::NotFound(format!("node {id} not found in org {org_id}")))?;
        Ok(row)
    }

    /// Deletes the node row. Returns `true` if a row was deleted.
    pub async fn delete(&self, org_id: &str, id: &str) -> Result<bool, DataError> {
        let result = sqlx::query("DELETE FROM nodes WHERE org_id = $1 AND id = $2")
            .bind(org_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_sort_column_accepts_known_column() {
        assert_eq!(sanitize_sort_column("updated_at"), "updated_at");
    }

    #[test]
    fn sanitize_sort_column_rejects_unknown_falls_back() {
        assert_eq!(sanitize_sort_column("properties->>'x'"), "created_at");
    }

    #[test]
    fn offset_is_zero_on_first_page() {
        let mut filter = NodeFilter::new();
        filter.page = 1;
        filter.limit = 50;
        assert_eq!(filter.offset(), 0);
    }

    #[test]
    fn offset_advances_with_page() {
        let mut filter = NodeFilter::new();
        filter.page = 3;
        filter.limit = 50;
        assert_eq!(filter.offset(), 100);
    }

    #[test]
    fn page_zero_is_treated_as_page_one() {
        let mut filter = NodeFilter::new();
        filter.page = 0;
        filter.limit = 50;
        assert_eq!(filter.offset(), 0);
    }
}
