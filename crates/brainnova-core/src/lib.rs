//! ============================================================================
//! BRAINNOVA-CORE: Fact memory engine
//! ============================================================================
//! This crate handles all logic behind the Brainnova assistant:
//! - Topic/definition fact store persisted in redb
//! - Substring matcher for recall
//! - Mode-aware response engine (teach, recall, confirm, web lookup)
//! - Wikipedia summary lookup for web-augmented mode
//! ============================================================================

pub mod config;
pub mod db;
pub mod engine;
pub mod lookup;
pub mod memory;
pub mod mode;
pub mod types;

// Re-export main types for convenience
pub use config::BrainConfig;
pub use db::{FactDb, MemoryStorage, SnapshotStorage};
pub use engine::Engine;
pub use lookup::{FactLookup, LookupError, LookupHit, WikipediaLookup};
pub use memory::{FactStore, StoreStats};
pub use mode::Mode;
pub use types::*;
