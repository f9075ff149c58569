//! ============================================================================
//! Pending Teach - Single-slot holder for an unconfirmed fact
//! ============================================================================
//! Filled when a plain "X is Y" sentence is seen, emptied when the user
//! confirms. A newer candidate replaces an older one; nothing expires.
//! ============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::types::Fact;

/// Candidate awaiting a yes/no
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingTeach {
    pub topic: String,
    pub core: String,
}

impl PendingTeach {
    pub fn new(topic: impl Into<String>, core: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            core: core.into(),
        }
    }

    /// The fact written on confirmation
    pub fn into_fact(self) -> Fact {
        Fact::new(self.topic, self.core)
    }
}

#[derive(Debug, Clone, Default)]
pub struct PendingSlot {
    candidate: Option<PendingTeach>,
}

impl PendingSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hold `candidate`, returning whatever it replaced
    pub fn offer(&mut self, candidate: PendingTeach) -> Option<PendingTeach> {
        debug!("Pending teach: {} -> {}", candidate.topic, candidate.core);
        self.candidate.replace(candidate)
    }

    /// Remove and return the held candidate
    pub fn take(&mut self) -> Option<PendingTeach> {
        self.candidate.take()
    }

    pub fn peek(&self) -> Option<&PendingTeach> {
        self.candidate.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.candidate.is_some()
    }
}
