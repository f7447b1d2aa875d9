use async_trait::async_trait;
use bytes::Bytes;
use dashmap::DashMap;

/// Read-through KV cache abstraction for node lookups, per SPEC_FULL.md §3.2(3):
/// keys are `node:<org>:<id>`, values reflect a committed DS state, and deletes
/// must remove the key. No TTL is specified — staleness is tolerated except on
/// explicit delete, so entries live until overwritten or removed.
///
/// Grounded on `r2e-cache::CacheStore`, trimmed of the TTL-bearing `TtlCache<K,V>`
/// and `remove_by_prefix` (this spec has no per-node TTL and no bulk-prefix
/// invalidation requirement).
#[async_trait]
pub trait KvCache: Send + Sync {
    async fn get(&self, key: &str) -> Option<Bytes>;
    async fn set(&self, key: &str, value: Bytes);
    async fn remove(&self, key: &str);
    async fn clear(&self);
}

/// Default in-process backend. Swappable for a network-backed implementation
/// (e.g. Redis) by implementing [`KvCache`] — the spec names only the "Cache (KV)"
/// role, not a specific backend.
#[derive(Default)]
pub struct InMemoryKv {
    store: DashMap<String, Bytes>,
}

impl InMemoryKv {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl KvCache for InMemoryKv {
    async fn get(&self, key: &str) -> Option<Bytes> {
        self.store.get(key).map(|v| v.clone())
    }

    async fn set(&self, key: &str, value: Bytes) {
        self.store.insert(key.to_string(), value);
    }

    async fn remove(&self, key: &str) {
        self.store.remove(key);
    }

    async fn clear(&self) {
        self.store.clear();
    }
}

/// Builds the tenant-scoped cache key for a node, per SPEC_FULL.md §3.2(3).
pub fn node_cache_key(org_id: &str, id: &str) -> String {
    format!("node:{org_id}:{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn set_then_get_round_trips() {
        let cache = InMemoryKv::new();
        cache.set("node:acme:1", Bytes::from_static(b"payload")).await;
        assert_eq!(cache.get("node:acme:1").await, Some(Bytes::from_static(b"payload")));
    }

    #[tokio::test]
    async fn get_miss_returns_none() {
        let cache = InMemoryKv::new();
        assert_eq!(cache.get("node:acme:missing").await, None);
    }

    #[tokio::test]
    async fn remove_deletes_key() {
        let cache = InMemoryKv::new();
        cache.set("node:acme:1", Bytes::from_static(b"payload")).await;
        cache.remove("node:acme:1").await;
        assert_eq!(cache.get("node:acme:1").await, None);
    }

    #[test]
    fn cache_key_includes_org_and_id() {
        assert_eq!(node_cache_key("acme", "42"), "node:acme:42");
    }

    #[tokio::test]
    async fn keys_are_org_scoped_no_cross_tenant_collision() {
        let cache = InMemoryKv::new();
        cache.set(&node_cache_key("acme", "1"), Bytes::from_static(b"acme-payload")).await;
        cache.set(&node_cache_key("other", "1"), Bytes::from_static(b"other-payload")).await;
        assert_eq!(cache.get(&node_cache_key("acme", "1")).await, Some(Bytes::from_static(b"acme-payload")));
        assert_eq!(cache.get(&node_cache_key("other", "1")).await, Some(Bytes::from_static(b"other-payload")));
    }
}
