//! ============================================================================
//! Fact Store - Topic dictionary persisted as one JSON snapshot
//! ============================================================================
//! Loaded once, mutated through `save` / `bulk_import` / `reset`, and written
//! back to its storage after every mutation. Observers subscribe to a watch
//! channel carrying the aggregate stats.
//! ============================================================================

use anyhow::Result;
use serde_json::Value;
use std::collections::BTreeMap;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use super::matcher::find_topic;
use crate::db::SnapshotStorage;
use crate::types::{normalize_topic, BrainError, Fact};

/// Aggregate statistics shown by frontends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreStats {
    /// Number of stored facts
    pub count: usize,
    /// Size of the compact JSON snapshot in bytes
    pub bytes: usize,
}

impl StoreStats {
    pub fn kilobytes(&self) -> f64 {
        self.bytes as f64 / 1024.0
    }
}

impl std::fmt::Display for StoreStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} facts, {:.2} KB", self.count, self.kilobytes())
    }
}

/// Topic dictionary backed by snapshot storage
pub struct FactStore {
    facts: BTreeMap<String, Fact>,
    storage: Box<dyn SnapshotStorage>,
    stats_tx: watch::Sender<StoreStats>,
}

impl FactStore {
    /// Load the store from storage. Missing, unreadable or corrupt data
    /// yields an empty store.
    pub fn load(storage: impl SnapshotStorage + 'static) -> Self {
        let facts = match storage.read_all() {
            Ok(Some(raw)) => parse_snapshot(&raw).unwrap_or_else(|e| {
                warn!("{} - starting with empty memory", e);
                BTreeMap::new()
            }),
            Ok(None) => {
                debug!("No stored snapshot, starting with empty memory");
                BTreeMap::new()
            }
            Err(e) => {
                warn!("Failed to read snapshot: {} - starting with empty memory", e);
                BTreeMap::new()
            }
        };

        info!("Loaded {} facts", facts.len());

        let stats = compute_stats(&facts);
        let (stats_tx, _) = watch::channel(stats);

        Self {
            facts,
            storage: Box::new(storage),
            stats_tx,
        }
    }

    /// Store `fact` under the lower-cased `topic` and persist.
    /// Returns the storage key. Empty topics and empty cores are refused
    /// without touching the store.
    pub fn save(&mut self, topic: &str, fact: Fact) -> Result<String> {
        let key = normalize_topic(topic);
        if key.is_empty() {
            return Err(BrainError::UserInput("fact topic is empty".into()).into());
        }
        if fact.core.is_empty() {
            return Err(BrainError::UserInput(format!("fact '{}' has an empty core", key)).into());
        }
        let previous = self.facts.insert(key.clone(), fact);

        if let Err(e) = self.persist() {
            match previous {
                Some(old) => {
                    self.facts.insert(key, old);
                }
                None => {
                    self.facts.remove(&key);
                }
            }
            return Err(e);
        }

        info!("Saved fact: {}", key);
        Ok(key)
    }

    /// Best-matching stored key for free text
    pub fn find(&self, text: &str) -> Option<&str> {
        find_topic(&self.facts, text)
    }

    /// Find and return key and fact together
    pub fn recall(&self, text: &str) -> Option<(&str, &Fact)> {
        let key = self.find(text)?;
        self.facts.get(key).map(|fact| (key, fact))
    }

    pub fn get(&self, key: &str) -> Option<&Fact> {
        self.facts.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.facts.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.facts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }

    /// Wipe storage, then memory. If storage fails nothing changes.
    pub fn reset(&mut self) -> Result<()> {
        self.storage
            .clear()
            .map_err(|e| BrainError::Storage(e.to_string()))?;
        self.facts.clear();
        self.stats_tx.send_replace(compute_stats(&self.facts));

        info!("Memory wiped");
        Ok(())
    }

    /// Merge a single fact-shaped object or an array of them.
    ///
    /// Items without non-empty `topic` and `core` strings are skipped.
    /// Returns how many items were written. Any other payload shape is
    /// rejected without touching the store.
    pub fn bulk_import(&mut self, payload: &Value) -> Result<usize> {
        let items: Vec<&Value> = match payload {
            Value::Array(items) => items.iter().collect(),
            Value::Object(_) => vec![payload],
            other => {
                return Err(BrainError::ImportRejected(format!(
                    "expected an object or an array, got {}",
                    json_kind(other)
                ))
                .into())
            }
        };

        let before = self.facts.clone();
        let mut count = 0;
        for item in items {
            match Fact::from_json(item) {
                Some(fact) => {
                    self.facts.insert(fact.key(), fact);
                    count += 1;
                }
                None => debug!("Skipping import item without topic/core"),
            }
        }

        if let Err(e) = self.persist() {
            self.facts = before;
            return Err(e);
        }

        info!("Batch imported {} facts", count);
        Ok(count)
    }

    /// Parse `raw` as JSON and apply `bulk_import`
    pub fn import_str(&mut self, raw: &str) -> Result<usize> {
        let payload: Value = serde_json::from_str(raw)
            .map_err(|e| BrainError::ImportRejected(format!("invalid JSON: {}", e)))?;
        self.bulk_import(&payload)
    }

    /// Entire store as pretty-printed JSON keyed by normalized topic
    pub fn export_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.facts)?)
    }

    pub fn stats(&self) -> StoreStats {
        *self.stats_tx.borrow()
    }

    /// Receiver that observes every stats change
    pub fn subscribe(&self) -> watch::Receiver<StoreStats> {
        self.stats_tx.subscribe()
    }

    fn persist(&self) -> Result<()> {
        let snapshot = serde_json::to_string(&self.facts)?;
        self.storage
            .write_all(&snapshot)
            .map_err(|e| BrainError::Storage(e.to_string()))?;

        self.stats_tx.send_replace(StoreStats {
            count: self.facts.len(),
            bytes: snapshot.len(),
        });
        Ok(())
    }
}

/// Decode a stored snapshot. Entries that are not facts with a non-empty
/// core are dropped; a snapshot that is not a JSON object is corrupt.
fn parse_snapshot(raw: &str) -> std::result::Result<BTreeMap<String, Fact>, BrainError> {
    let entries: serde_json::Map<String, Value> =
        serde_json::from_str(raw).map_err(|e| BrainError::StorageCorruption(e.to_string()))?;

    let mut facts = BTreeMap::new();
    for (key, value) in entries {
        match serde_json::from_value::<Fact>(value) {
            Ok(fact) if !fact.core.is_empty() => {
                facts.insert(key, fact);
            }
            _ => warn!("Dropping unreadable stored fact: {}", key),
        }
    }
    Ok(facts)
}

fn compute_stats(facts: &BTreeMap<String, Fact>) -> StoreStats {
    StoreStats {
        count: facts.len(),
        bytes: serde_json::to_string(facts).map(|s| s.len()).unwrap_or(0),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::MemoryStorage;
    use anyhow::anyhow;
    use serde_json::json;

    /// Storage whose writes always fail
    struct BrokenStorage;

    impl SnapshotStorage for BrokenStorage {
        fn read_all(&self) -> Result<Option<String>> {
            Err(anyhow!("disk on fire"))
        }
        fn write_all(&self, _snapshot: &str) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
        fn clear(&self) -> Result<()> {
            Err(anyhow!("disk on fire"))
        }
    }

    #[test]
    fn test_save_then_find() {
        let mut store = FactStore::load(MemoryStorage::new());
        let key = store.save("Rust", Fact::new("Rust", "A language")).unwrap();

        assert_eq!(key, "rust");
        assert_eq!(store.find("RUST"), Some("rust"));
        assert_eq!(store.get("rust").unwrap().core, "A language");
    }

    #[test]
    fn test_save_same_topic_twice_keeps_latest() {
        let mut store = FactStore::load(MemoryStorage::new());
        store.save("Tea", Fact::new("Tea", "first")).unwrap();
        store.save("TEA", Fact::new("TEA", "second")).unwrap();

        assert_eq!(store.len(), 1);
        assert_eq!(store.get("tea").unwrap().core, "second");
    }

    #[test]
    fn test_save_persists_snapshot() {
        let storage = MemoryStorage::new();
        let mut store = FactStore::load(storage.clone());
        store.save("cats", Fact::new("cats", "felines")).unwrap();

        let raw = storage.read_all().unwrap().unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value, json!({"cats": {"topic": "cats", "core": "felines"}}));

        let reloaded = FactStore::load(storage);
        assert_eq!(reloaded.get("cats").unwrap().core, "felines");
    }

    #[test]
    fn test_corrupt_snapshot_loads_empty() {
        let store = FactStore::load(MemoryStorage::with_snapshot("{not json"));
        assert!(store.is_empty());

        let store = FactStore::load(MemoryStorage::with_snapshot("[1, 2, 3]"));
        assert!(store.is_empty());
    }

    #[test]
    fn test_unreadable_storage_loads_empty() {
        let store = FactStore::load(BrokenStorage);
        assert!(store.is_empty());
    }

    #[test]
    fn test_bad_entries_are_dropped_on_load() {
        let raw = r#"{"good": {"topic": "Good", "core": "yes"}, "bad": {"topic": "Bad"}, "blank": {"core": ""}}"#;
        let store = FactStore::load(MemoryStorage::with_snapshot(raw));

        assert_eq!(store.len(), 1);
        assert!(store.get("good").is_some());
    }

    #[test]
    fn test_failed_write_rolls_back() {
        let mut store = FactStore::load(BrokenStorage);
        let err = store.save("x", Fact::new("x", "y")).unwrap_err();

        assert!(matches!(
            err.downcast_ref::<BrainError>(),
            Some(BrainError::Storage(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_rejects_empty_core() {
        let storage = MemoryStorage::new();
        let mut store = FactStore::load(storage.clone());

        let err = store.save("ghost", Fact::new("ghost", "")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrainError>(),
            Some(BrainError::UserInput(_))
        ));
        assert!(store.is_empty());
        assert_eq!(storage.read_all().unwrap(), None);
    }

    #[test]
    fn test_save_rejects_empty_topic() {
        let mut store = FactStore::load(MemoryStorage::new());
        store.save("cats", Fact::new("cats", "felines")).unwrap();

        let err = store.save("", Fact::new("", "everything")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrainError>(),
            Some(BrainError::UserInput(_))
        ));
        assert_eq!(store.len(), 1);
        assert_eq!(store.find("zzz"), None);
    }

    #[test]
    fn test_reset_clears_store_and_storage() {
        let storage = MemoryStorage::new();
        let mut store = FactStore::load(storage.clone());
        store.save("cats", Fact::new("cats", "felines")).unwrap();
        store.save("dogs", Fact::new("dogs", "canines")).unwrap();

        store.reset().unwrap();

        assert!(store.is_empty());
        assert_eq!(store.find("cats"), None);
        assert_eq!(storage.read_all().unwrap(), None);
    }

    #[test]
    fn test_bulk_import_skips_incomplete_items() {
        let mut store = FactStore::load(MemoryStorage::new());
        store.save("z", Fact::new("z", "existing")).unwrap();

        let count = store
            .bulk_import(&json!([
                {"topic": "a", "core": "1"},
                {"topic": "b"},
                {"topic": "c", "core": "3"}
            ]))
            .unwrap();

        assert_eq!(count, 2);
        let keys: Vec<&str> = store.keys().collect();
        assert_eq!(keys, vec!["a", "c", "z"]);
    }

    #[test]
    fn test_bulk_import_single_object_and_overwrite() {
        let mut store = FactStore::load(MemoryStorage::new());
        store.save("Sun", Fact::new("Sun", "old")).unwrap();

        let count = store
            .bulk_import(&json!({"topic": "SUN", "core": "a star", "why": "astronomy"}))
            .unwrap();

        assert_eq!(count, 1);
        assert_eq!(store.len(), 1);
        let fact = store.get("sun").unwrap();
        assert_eq!(fact.core, "a star");
        assert_eq!(fact.why(), Some("astronomy"));
    }

    #[test]
    fn test_later_import_items_win() {
        let mut store = FactStore::load(MemoryStorage::new());
        let count = store
            .bulk_import(&json!([
                {"topic": "x", "core": "first"},
                {"topic": "X", "core": "second"}
            ]))
            .unwrap();

        assert_eq!(count, 2);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get("x").unwrap().core, "second");
    }

    #[test]
    fn test_import_rejects_bad_payloads() {
        let mut store = FactStore::load(MemoryStorage::new());

        let err = store.import_str("not json").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrainError>(),
            Some(BrainError::ImportRejected(_))
        ));

        let err = store.bulk_import(&json!("just a string")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrainError>(),
            Some(BrainError::ImportRejected(_))
        ));
        assert!(store.is_empty());
    }

    #[test]
    fn test_export_is_pretty_and_reimportable() {
        let mut store = FactStore::load(MemoryStorage::new());
        store
            .save("Tea", Fact::new("Tea", "A drink").with_how(vec!["boil".into()]))
            .unwrap();

        let exported = store.export_json().unwrap();
        assert!(exported.contains('\n'));

        let value: Value = serde_json::from_str(&exported).unwrap();
        assert_eq!(value["tea"]["how"], json!(["boil"]));

        // An export is an object keyed by topic, not a fact itself
        let mut other = FactStore::load(MemoryStorage::new());
        let items: Vec<Value> = value.as_object().unwrap().values().cloned().collect();
        assert_eq!(other.bulk_import(&Value::Array(items)).unwrap(), 1);
        assert_eq!(other.get("tea"), store.get("tea"));
    }

    #[test]
    fn test_stats_follow_mutations() {
        let mut store = FactStore::load(MemoryStorage::new());
        let mut rx = store.subscribe();
        assert_eq!(store.stats().count, 0);

        store.save("cats", Fact::new("cats", "felines")).unwrap();
        assert!(rx.has_changed().unwrap());
        let stats = *rx.borrow_and_update();
        assert_eq!(stats.count, 1);
        assert_eq!(
            stats.bytes,
            r#"{"cats":{"topic":"cats","core":"felines"}}"#.len()
        );

        store
            .import_str(r#"[{"topic":"dogs","core":"canines"},{"topic":"cats","core":"purring"},{"topic":"x"}]"#)
            .unwrap();
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().count, 2);
        assert!(!rx.has_changed().unwrap());

        store.reset().unwrap();
        assert_eq!(rx.borrow_and_update().count, 0);
    }

    #[test]
    fn test_stats_display() {
        let stats = StoreStats {
            count: 3,
            bytes: 2048,
        };
        assert_eq!(stats.to_string(), "3 facts, 2.00 KB");
    }
}
