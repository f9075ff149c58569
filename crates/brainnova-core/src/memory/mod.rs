//! ============================================================================
//! Memory Module - Persistent topic/definition memory
//! ============================================================================
//! A flat dictionary of facts keyed by lower-cased topic, recalled through a
//! substring matcher and persisted as a whole after every mutation.
//!
//! ## Usage
//! ```rust,ignore
//! use brainnova_core::db::MemoryStorage;
//! use brainnova_core::memory::FactStore;
//! use brainnova_core::Fact;
//!
//! let mut store = FactStore::load(MemoryStorage::new());
//! store.save("Cats", Fact::new("Cats", "Small felines"))?;
//! assert_eq!(store.find("tell me about cats"), Some("cats"));
//! ```
//! ============================================================================

mod matcher;
mod store;

pub use matcher::find_topic;
pub use store::{FactStore, StoreStats};
