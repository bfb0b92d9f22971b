use crate::schema::DashboardSnapshot;
use chrono::Utc;
use log::{debug, warn};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Mutex;

/// Cached snapshots older than this are recomputed.
pub const MAX_SNAPSHOT_AGE_MS: i64 = 60 * 60 * 1000;

/// The local persistent key-value store the dashboard cache and onboarding
/// drafts ride on. Entries are opaque JSON blobs; writes are best-effort
/// and never fail the caller.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// In-memory backend, mainly for tests and short-lived sessions.
#[derive(Default)]
pub struct MemoryStore {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.lock().ok()?.get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.insert(key.to_string(), value.to_string());
        }
    }

    fn remove(&self, key: &str) {
        if let Ok(mut entries) = self.entries.lock() {
            entries.remove(key);
        }
    }
}

/// Directory-backed store: one JSON file per key.
pub struct DirStore {
    dir: PathBuf,
}

impl DirStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl KeyValueStore for DirStore {
    fn get(&self, key: &str) -> Option<String> {
        std::fs::read_to_string(self.path(key)).ok()
    }

    fn set(&self, key: &str, value: &str) {
        if let Err(err) = std::fs::create_dir_all(&self.dir)
            .and_then(|_| std::fs::write(self.path(key), value))
        {
            warn!("failed to persist {key}: {err}");
        }
    }

    fn remove(&self, key: &str) {
        let _ = std::fs::remove_file(self.path(key));
    }
}

/// A stored snapshot plus everything needed to decide whether it may be
/// served again: owning tenant, the date range it was computed for, and
/// its creation time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub tenant_id: String,
    pub range: (String, String),
    pub created_at_ms: i64,
    pub snapshot: DashboardSnapshot,
}

/// Single-slot-per-tenant snapshot cache.
///
/// An entry is valid only when tenant, date range and age all match the
/// current request; any mismatch, including a blob that no longer
/// parses, is a miss that forces recomputation.
pub struct SnapshotCache {
    backend: Box<dyn KeyValueStore>,
    max_age_ms: i64,
}

impl SnapshotCache {
    pub fn new(backend: Box<dyn KeyValueStore>) -> Self {
        Self {
            backend,
            max_age_ms: MAX_SNAPSHOT_AGE_MS,
        }
    }

    pub fn with_max_age(backend: Box<dyn KeyValueStore>, max_age_ms: i64) -> Self {
        Self {
            backend,
            max_age_ms,
        }
    }

    fn key(tenant_id: &str) -> String {
        format!("dashboard_cache_{tenant_id}")
    }

    pub fn lookup(&self, tenant_id: &str, range: &(String, String)) -> Option<DashboardSnapshot> {
        let raw = self.backend.get(&Self::key(tenant_id))?;
        let entry: CacheEntry = match serde_json::from_str(&raw) {
            Ok(entry) => entry,
            Err(err) => {
                debug!("discarding unreadable cache blob for {tenant_id}: {err}");
                return None;
            }
        };

        if entry.tenant_id != tenant_id || entry.range != *range {
            return None;
        }
        if Utc::now().timestamp_millis() - entry.created_at_ms >= self.max_age_ms {
            return None;
        }

        Some(entry.snapshot)
    }

    pub fn store(&self, tenant_id: &str, range: &(String, String), snapshot: &DashboardSnapshot) {
        let entry = CacheEntry {
            tenant_id: tenant_id.to_string(),
            range: range.clone(),
            created_at_ms: Utc::now().timestamp_millis(),
            snapshot: snapshot.clone(),
        };

        match serde_json::to_string(&entry) {
            Ok(blob) => self.backend.set(&Self::key(tenant_id), &blob),
            Err(err) => warn!("failed to serialize cache entry for {tenant_id}: {err}"),
        }
    }

    pub fn invalidate(&self, tenant_id: &str) {
        self.backend.remove(&Self::key(tenant_id));
    }
}

fn draft_key(tenant_id: &str) -> String {
    format!("onboarding_draft_{tenant_id}")
}

/// Persists in-progress onboarding form state so it survives reloads.
pub fn save_draft<T: Serialize>(store: &dyn KeyValueStore, tenant_id: &str, draft: &T) {
    match serde_json::to_string(draft) {
        Ok(blob) => store.set(&draft_key(tenant_id), &blob),
        Err(err) => warn!("failed to serialize onboarding draft for {tenant_id}: {err}"),
    }
}

/// Rehydrates onboarding form state. A missing or structurally
/// incompatible blob is a fresh start, never an error.
pub fn load_draft<T: DeserializeOwned + Default>(store: &dyn KeyValueStore, tenant_id: &str) -> T {
    let Some(raw) = store.get(&draft_key(tenant_id)) else {
        return T::default();
    };

    match serde_json::from_str(&raw) {
        Ok(draft) => draft,
        Err(err) => {
            debug!("discarding unreadable onboarding draft for {tenant_id}: {err}");
            T::default()
        }
    }
}

pub fn clear_draft(store: &dyn KeyValueStore, tenant_id: &str) {
    store.remove(&draft_key(tenant_id));
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(total: f64) -> DashboardSnapshot {
        DashboardSnapshot {
            total_sales: total,
            order_count: 1,
            ..Default::default()
        }
    }

    fn range() -> (String, String) {
        ("2023-06-01".to_string(), "2023-06-07".to_string())
    }

    #[test]
    fn test_hit_requires_tenant_and_range_match() {
        let cache = SnapshotCache::new(Box::new(MemoryStore::new()));
        cache.store("tenant-a", &range(), &snapshot(100.0));

        let hit = cache.lookup("tenant-a", &range()).unwrap();
        assert_eq!(hit.total_sales, 100.0);

        assert!(cache.lookup("tenant-b", &range()).is_none());

        let other_range = ("2023-05-01".to_string(), "2023-05-07".to_string());
        assert!(cache.lookup("tenant-a", &other_range).is_none());
    }

    #[test]
    fn test_expired_entry_misses() {
        let cache = SnapshotCache::with_max_age(Box::new(MemoryStore::new()), 0);
        cache.store("tenant-a", &range(), &snapshot(100.0));
        assert!(cache.lookup("tenant-a", &range()).is_none());
    }

    #[test]
    fn test_corrupt_blob_is_a_silent_miss() {
        let backend = MemoryStore::new();
        backend.set("dashboard_cache_tenant-a", "{not json");

        let cache = SnapshotCache::new(Box::new(backend));
        assert!(cache.lookup("tenant-a", &range()).is_none());
    }

    #[test]
    fn test_single_slot_overwrite() {
        let cache = SnapshotCache::new(Box::new(MemoryStore::new()));
        cache.store("tenant-a", &range(), &snapshot(100.0));
        cache.store("tenant-a", &range(), &snapshot(250.0));

        let hit = cache.lookup("tenant-a", &range()).unwrap();
        assert_eq!(hit.total_sales, 250.0);

        cache.invalidate("tenant-a");
        assert!(cache.lookup("tenant-a", &range()).is_none());
    }

    #[test]
    fn test_dir_store_roundtrip() {
        let dir = std::env::temp_dir().join(format!("sdb_cache_test_{}", std::process::id()));
        let store = DirStore::new(&dir);

        store.set("dashboard_cache_t1", "{}");
        assert_eq!(store.get("dashboard_cache_t1").as_deref(), Some("{}"));

        store.remove("dashboard_cache_t1");
        assert!(store.get("dashboard_cache_t1").is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[derive(Debug, Default, PartialEq, Serialize, Deserialize)]
    struct Draft {
        business_name: String,
        step: u32,
    }

    #[test]
    fn test_draft_rehydration_falls_back_to_default() {
        let store = MemoryStore::new();

        let draft = Draft {
            business_name: "Corner Cafe".to_string(),
            step: 2,
        };
        save_draft(&store, "tenant-a", &draft);
        assert_eq!(load_draft::<Draft>(&store, "tenant-a"), draft);

        store.set("onboarding_draft_tenant-a", "[1, 2, 3]");
        assert_eq!(load_draft::<Draft>(&store, "tenant-a"), Draft::default());

        clear_draft(&store, "tenant-a");
        assert_eq!(load_draft::<Draft>(&store, "tenant-a"), Draft::default());
    }
}
