//! ============================================================================
//! Lookup Module - Remote fact sources for web-augmented mode
//! ============================================================================
//! The engine only sees the `FactLookup` trait: one query in, a title and an
//! extract out, or a typed failure. `WikipediaLookup` is the stock source.
//! ============================================================================

mod wikipedia;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

pub use wikipedia::{WikipediaLookup, DEFAULT_SUMMARY_URL};

/// A successful remote lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LookupHit {
    pub title: String,
    pub extract: String,
}

/// Why a remote lookup produced nothing usable
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("Not found")]
    NotFound,

    #[error("Response had no extract")]
    MissingExtract,

    #[error("Transport error: {0}")]
    Transport(String),
}

/// Remote source the engine consults in web-augmented mode
#[async_trait]
pub trait FactLookup: Send + Sync {
    async fn lookup(&self, query: &str) -> Result<LookupHit, LookupError>;

    /// Provenance recorded in the `how` steps of auto-saved facts
    fn source_name(&self) -> &str;
}
