use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A typed vertex inside an organization. See SPEC_FULL.md §3.1.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NodeRecord {
    pub id: String,
    pub org_id: String,
    #[serde(rename = "type")]
    pub node_type: String,
    pub properties: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

/// A directed, typed relationship between two nodes in the same org. See
/// SPEC_FULL.md §3.1.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct EdgeRecord {
    pub id: String,
    pub org_id: String,
    pub from_node: String,
    pub to_node: String,
    pub relationship_type: String,
    pub properties: serde_json::Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub created_by: String,
    pub updated_by: String,
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

/// Request-transport provenance and authenticated-principal identity, used to
/// stamp audit fields per SPEC_FULL.md §3.2(5).
#[derive(Debug, Clone)]
pub struct AuditContext {
    pub principal_id: String,
    pub user_agent: Option<String>,
    pub client_ip: Option<String>,
}

impl NodeRecord {
    /// Shallow-merges `update` into `self.properties`; top-level keys in
    /// `update` win. Per SPEC_FULL.md §4.3 and the resolved design note in §9
    /// ("deep-merge semantics are intentionally out of scope").
    pub fn merge_properties(existing: &serde_json::Value, update: &serde_json::Value) -> serde_json::Value {
        shallow_merge(existing, update)
    }
}

pub fn shallow_merge(existing: &serde_json::Value, update: &serde_json::Value) -> serde_json::Value {
    let mut merged = existing.as_object().cloned().unwrap_or_default();
    if let Some(update_obj) = update.as_object() {
        for (key, value) in update_obj {
            merged.insert(key.clone(), value.clone());
        }
    }
    serde_json::Value::Object(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shallow_merge_overwrites_top_level_keys() {
        let existing = json!({"name": "Alice", "role": "admin"});
        let update = json!({"role": "user", "age": 30});
        let merged = shallow_merge(&existing, &update);
        assert_eq!(merged, json!({"name": "Alice", "role": "user", "age": 30}));
    }

    #[test]
    fn shallow_merge_does_not_recurse_into_nested_objects() {
        let existing = json!({"address": {"city": "NYC", "zip": "10001"}});
        let update = json!({"address": {"city": "LA"}});
        let merged = shallow_merge(&existing, &update);
        assert_eq!(merged, json!({"address": {"city": "LA"}}));
    }

    #[test]
    fn shallow_merge_with_empty_update_preserves_existing() {
        let existing = json!({"a": 1});
        let update = json!({});
        assert_eq!(shallow_merge(&existing, &update), existing);
    }
}
