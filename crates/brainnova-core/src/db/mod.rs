// ============================================================================
// Snapshot Storage - durable home for the fact store
// ============================================================================
// The fact store is persisted as one JSON object keyed by normalized topic.
// `FactDb` keeps that snapshot in a redb file; `MemoryStorage` keeps it in
// process memory for tests and throwaway sessions.
// Default path: ~/.brainnova/brainnova.redb (override via BRAINNOVA_DB_PATH)
// ============================================================================

use anyhow::{anyhow, Result};
use redb::{Database, TableDefinition};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

// Table definitions
const SNAPSHOTS: TableDefinition<&str, &str> = TableDefinition::new("snapshots");
const META: TableDefinition<&str, i64> = TableDefinition::new("meta");

const SNAPSHOT_KEY: &str = "snapshots:facts";
const SAVED_AT_KEY: &str = "meta:saved_at";

/// Whole-snapshot persistence contract consumed by the fact store
pub trait SnapshotStorage: Send + Sync {
    /// Read the serialized store, or None if nothing was ever written
    fn read_all(&self) -> Result<Option<String>>;

    /// Replace the serialized store
    fn write_all(&self, snapshot: &str) -> Result<()>;

    /// Drop the serialized store
    fn clear(&self) -> Result<()>;
}

/// Resolve ~/.brainnova/brainnova.redb, creating the directory
pub fn default_db_path() -> Result<PathBuf> {
    let home = dirs::home_dir().ok_or_else(|| anyhow!("Cannot determine home directory"))?;
    let dir = home.join(".brainnova");
    std::fs::create_dir_all(&dir)
        .map_err(|e| anyhow!("Failed to create .brainnova directory: {}", e))?;
    Ok(dir.join("brainnova.redb"))
}

/// Embedded database holding the fact snapshot
pub struct FactDb {
    db: Database,
    path: PathBuf,
}

impl FactDb {
    /// Open (or create) the database at the given path.
    /// If `path` is None, uses ~/.brainnova/brainnova.redb
    pub fn open(path: Option<&Path>) -> Result<Self> {
        let db_path = match path {
            Some(p) => p.to_path_buf(),
            None => default_db_path()?,
        };

        info!("Opening database at: {}", db_path.display());

        let db = Database::create(&db_path)
            .map_err(|e| anyhow!("Failed to open database: {}", e))?;

        // Ensure tables exist so reads never hit a missing table
        let write_txn = db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let _ = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to create snapshots table: {}", e))?;
            let _ = write_txn
                .open_table(META)
                .map_err(|e| anyhow!("Failed to create meta table: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit init: {}", e))?;

        Ok(Self { db, path: db_path })
    }

    /// Get the database file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Unix timestamp of the last snapshot write, if any
    pub fn last_saved_at(&self) -> Result<Option<i64>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(META)
            .map_err(|e| anyhow!("Failed to open meta table: {}", e))?;

        let saved_at = table
            .get(SAVED_AT_KEY)
            .map_err(|e| anyhow!("Failed to get saved_at: {}", e))?
            .map(|v| v.value());
        Ok(saved_at)
    }
}

impl SnapshotStorage for FactDb {
    fn read_all(&self) -> Result<Option<String>> {
        let read_txn = self
            .db
            .begin_read()
            .map_err(|e| anyhow!("Failed to begin read: {}", e))?;
        let table = read_txn
            .open_table(SNAPSHOTS)
            .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;

        let snapshot = table
            .get(SNAPSHOT_KEY)
            .map_err(|e| anyhow!("Failed to get snapshot: {}", e))?
            .map(|v| v.value().to_string());
        Ok(snapshot)
    }

    fn write_all(&self, snapshot: &str) -> Result<()> {
        let now = chrono::Utc::now().timestamp();

        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;
            table
                .insert(SNAPSHOT_KEY, snapshot)
                .map_err(|e| anyhow!("Failed to insert snapshot: {}", e))?;

            let mut meta = write_txn
                .open_table(META)
                .map_err(|e| anyhow!("Failed to open meta table: {}", e))?;
            meta.insert(SAVED_AT_KEY, now)
                .map_err(|e| anyhow!("Failed to insert saved_at: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit: {}", e))?;

        debug!("Stored snapshot ({} bytes)", snapshot.len());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let write_txn = self
            .db
            .begin_write()
            .map_err(|e| anyhow!("Failed to begin write: {}", e))?;
        {
            let mut table = write_txn
                .open_table(SNAPSHOTS)
                .map_err(|e| anyhow!("Failed to open snapshots table: {}", e))?;
            table
                .remove(SNAPSHOT_KEY)
                .map_err(|e| anyhow!("Failed to remove snapshot: {}", e))?;

            let mut meta = write_txn
                .open_table(META)
                .map_err(|e| anyhow!("Failed to open meta table: {}", e))?;
            meta.remove(SAVED_AT_KEY)
                .map_err(|e| anyhow!("Failed to remove saved_at: {}", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| anyhow!("Failed to commit clear: {}", e))?;

        info!("Cleared stored snapshot");
        Ok(())
    }
}

/// In-process snapshot storage. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing serialized snapshot
    pub fn with_snapshot(snapshot: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(snapshot.into()))),
        }
    }
}

impl SnapshotStorage for MemoryStorage {
    fn read_all(&self) -> Result<Option<String>> {
        let slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        Ok(slot.clone())
    }

    fn write_all(&self, snapshot: &str) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        *slot = Some(snapshot.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|_| anyhow!("Memory storage lock poisoned"))?;
        *slot = None;
        Ok(())
    }
}
