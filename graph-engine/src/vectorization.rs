use serde::{Deserialize, Serialize};
use serde_json::Value;

use graph_data::EdgeRecord;

/// Builds the embedding-provider input text for an edge's `properties.vectorize`
/// keys, per SPEC_FULL.md §4.4: for each listed key present in `properties`,
/// one `"<key normalized>: <value>"` line, keys separated by a blank line.
/// Normalization: lowercase the key, underscores become spaces.
pub fn build_vectorization_text(properties: &Value, keys: &[String]) -> String {
    let mut sections = Vec::new();
    for key in keys {
        if let Some(value) = properties.get(key) {
            let normalized_key = key.to_lowercase().replace('_', " ");
            let rendered = render_value(value);
            sections.push(format!("{normalized_key}: {rendered}"));
        }
    }
    sections.join("\n\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.to_lowercase(),
        other => other.to_string(),
    }
}

/// Extracts the `properties.vectorize` key list, if present and non-empty.
pub fn vectorize_keys(properties: &Value) -> Option<Vec<String>> {
    let list = properties.get("vectorize")?.as_array()?;
    let keys: Vec<String> = list
        .iter()
        .filter_map(|v| v.as_str().map(str::to_string))
        .collect();
    (!keys.is_empty()).then_some(keys)
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embedding: Vec<f32>,
}

/// Embedding-provider client. Grounded on `graph-security/src/jwks.rs`'s bare
/// `reqwest::Client` + typed-JSON-response shape.
pub struct EmbeddingClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl EmbeddingClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
        }
    }

    pub async fn embed(&self, text: &str) -> Result<Vec<f32>, reqwest::Error> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&EmbedRequest { input: text })
            .send()
            .await?
            .error_for_status()?;
        let body: EmbedResponse = response.json().await?;
        Ok(body.embedding)
    }
}

#[derive(Debug, Serialize)]
struct VxPayload {
    edge_id: String,
    from_node: String,
    to_node: String,
    org_id: String,
    relationship_type: String,
}

#[derive(Debug, Serialize)]
struct VxUpsertRequest {
    collection: String,
    id: String,
    vector: Vec<f32>,
    payload: VxPayload,
}

/// Vector-index client. A failed upsert here must never roll back the edge's
/// durable-store write — see SPEC_FULL.md §9, resolved open question 2.
pub struct VectorIndexClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
    collection: String,
}

impl VectorIndexClient {
    pub fn new(url: impl Into<String>, api_key: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            api_key: api_key.into(),
            collection: collection.into(),
        }
    }

    pub async fn upsert_point(&self, edge: &EdgeRecord, vector: Vec<f32>) -> Result<(), reqwest::Error> {
        let body = VxUpsertRequest {
            collection: self.collection.clone(),
            id: edge.id.clone(),
            vector,
            payload: VxPayload {
                edge_id: edge.id.clone(),
                from_node: edge.from_node.clone(),
                to_node: edge.to_node.clone(),
                org_id: edge.org_id.clone(),
                relationship_type: edge.relationship_type.clone(),
            },
        };
        self.client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(())
    }
}

/// Best-effort vectorization side-channel. Any EP/VX failure is logged and
/// swallowed — never surfaced to the caller, never rolls back the edge write.
pub async fn vectorize_edge_best_effort(
    embedder: &EmbeddingClient,
    vector_index: &VectorIndexClient,
    edge: &EdgeRecord,
    keys: &[String],
) {
    let text = build_vectorization_text(&edge.properties, keys);
    if text.is_empty() {
        return;
    }
    match embedder.embed(&text).await {
        Ok(vector) => {
            if let Err(e) = vector_index.upsert_point(edge, vector).await {
                tracing::warn!(edge_id = %edge.id, error = %e, "vector index upsert failed, continuing");
            }
        }
        Err(e) => {
            tracing::warn!(edge_id = %edge.id, error = %e, "embedding request failed, continuing");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn build_text_normalizes_key_and_lowercases_string_value() {
        let properties = json!({"display_name": "ACME Corp"});
        let text = build_vectorization_text(&properties, &["display_name".to_string()]);
        assert_eq!(text, "display name: acme corp");
    }

    #[test]
    fn build_text_joins_multiple_keys_with_blank_line() {
        let properties = json!({"a_key": "Value", "b_key": "Other"});
        let text = build_vectorization_text(&properties, &["a_key".to_string(), "b_key".to_string()]);
        assert_eq!(text, "a key: value\n\nb key: other");
    }

    #[test]
    fn build_text_skips_missing_keys() {
        let properties = json!({"present": "yes"});
        let text = build_vectorization_text(&properties, &["present".to_string(), "absent".to_string()]);
        assert_eq!(text, "present: yes");
    }

    #[test]
    fn vectorize_keys_returns_none_when_absent() {
        let properties = json!({});
        assert_eq!(vectorize_keys(&properties), None);
    }

    #[test]
    fn vectorize_keys_returns_none_when_empty_list() {
        let properties = json!({"vectorize": []});
        assert_eq!(vectorize_keys(&properties), None);
    }

    #[test]
    fn vectorize_keys_returns_list_when_present() {
        let properties = json!({"vectorize": ["name", "description"]});
        assert_eq!(
            vectorize_keys(&properties),
            Some(vec!["name".to_string(), "description".to_string()])
        );
    }
}
