//! ============================================================================
//! Response Engine - Mode-aware dispatcher over the fact store
//! ============================================================================
//! One `Engine` is one session: it owns the fact store, the active mode, the
//! pending teach slot and the optional remote lookup.
//!
//! Standard mode tries, in order: `teach:` directive, memory recall,
//! "X is Y" sentence, confirmation of a pending teach, miss. Analytic mode
//! only recalls. Web-augmented mode looks the text up remotely and saves hits.
//!
//! ## Usage
//! ```rust,ignore
//! use brainnova_core::{db::MemoryStorage, memory::FactStore, Engine};
//!
//! let mut engine = Engine::offline(FactStore::load(MemoryStorage::new()));
//! let reply = engine.process("Foo is Bar").await?;   // PATTERN DETECT, 50
//! let reply = engine.process("yes").await?;          // WRITE, 100
//! ```
//! ============================================================================

pub mod grammar;
mod pending;
pub mod replies;

pub use pending::{PendingSlot, PendingTeach};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::lookup::FactLookup;
use crate::memory::FactStore;
use crate::mode::Mode;
use crate::types::{Fact, Reply};
use grammar::{TeachError, UniversalCommand};

const WEB_WHY: &str = "Web Scraped";

/// Stateful response engine for a single session
pub struct Engine {
    store: FactStore,
    mode: Mode,
    pending: PendingSlot,
    lookup: Option<Box<dyn FactLookup>>,
}

impl Engine {
    /// Create an engine with a remote lookup for web-augmented mode
    pub fn new(store: FactStore, lookup: Box<dyn FactLookup>) -> Self {
        Self {
            store,
            mode: Mode::default(),
            pending: PendingSlot::new(),
            lookup: Some(lookup),
        }
    }

    /// Create an engine without a remote lookup; web queries always miss
    pub fn offline(store: FactStore) -> Self {
        Self {
            store,
            mode: Mode::default(),
            pending: PendingSlot::new(),
            lookup: None,
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = mode;
        self
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: Mode) {
        info!("Mode set to {}", mode);
        self.mode = mode;
    }

    /// Advance to the next mode and return it
    pub fn toggle_mode(&mut self) -> Mode {
        self.set_mode(self.mode.next());
        self.mode
    }

    pub fn pending(&self) -> Option<&PendingTeach> {
        self.pending.peek()
    }

    pub fn store(&self) -> &FactStore {
        &self.store
    }

    /// Direct store access for import/export/wipe surfaces
    pub fn store_mut(&mut self) -> &mut FactStore {
        &mut self.store
    }

    /// Handle one line of user input.
    ///
    /// User mistakes and lookup failures come back as zero-confidence
    /// replies; `Err` only means a store write could not be persisted.
    pub async fn process(&mut self, text: &str) -> Result<Reply> {
        let text = text.trim();

        if let Some(command) = grammar::parse_command(text) {
            return self.run_command(command);
        }

        debug!("Processing {:?} in {}", text, self.mode);
        match self.mode {
            Mode::Standard => self.run_standard(text),
            Mode::Analytic => Ok(self.run_analytic(text)),
            Mode::WebAugmented => self.run_web(text).await,
        }
    }

    fn run_command(&mut self, command: UniversalCommand) -> Result<Reply> {
        match command {
            UniversalCommand::Help => Ok(replies::help()),
            UniversalCommand::Reset => {
                self.store.reset()?;
                Ok(replies::memory_wiped())
            }
        }
    }

    fn run_standard(&mut self, text: &str) -> Result<Reply> {
        // 1. Structured teach directive
        if let Some(parsed) = grammar::parse_teach_directive(text) {
            return match parsed {
                Ok(fact) => {
                    let topic = fact.topic.clone();
                    let core = fact.core.clone();
                    self.store.save(&topic, fact)?;
                    Ok(replies::learned(&topic, &core))
                }
                Err(e) => {
                    debug!("Rejected teach directive: {}", e);
                    Ok(match e {
                        TeachError::InvalidJson(_) => replies::invalid_json(),
                        TeachError::MissingFields => replies::missing_fields(),
                    })
                }
            };
        }

        // 2. Memory recall, before pattern detection so known topics are answered
        if let Some((key, fact)) = self.store.recall(text) {
            return Ok(replies::memory_hit(fact.display_topic(key), &fact.core));
        }

        // 3. Implicit "X is Y"
        if let Some(def) = grammar::parse_definition(text) {
            let reply = replies::confirm_teach(&def.subject, &def.definition);
            self.pending
                .offer(PendingTeach::new(def.subject, def.definition));
            return Ok(reply);
        }

        // 4. Confirmation of a pending teach
        if self.pending.is_pending() && grammar::is_confirmation(text) {
            if let Some(candidate) = self.pending.take() {
                let topic = candidate.topic.clone();
                if let Err(e) = self.store.save(&topic, candidate.clone().into_fact()) {
                    // Keep the candidate so the user can confirm again
                    self.pending.offer(candidate);
                    return Err(e);
                }
                return Ok(replies::saved());
            }
        }

        Ok(replies::miss())
    }

    fn run_analytic(&self, text: &str) -> Reply {
        match self.store.recall(text) {
            Some((key, fact)) => replies::analysis(fact.display_topic(key), fact),
            None => replies::no_data(),
        }
    }

    async fn run_web(&mut self, text: &str) -> Result<Reply> {
        let query = grammar::strip_search_verbs(text);

        let Some(lookup) = self.lookup.as_ref() else {
            warn!("Web lookup requested but no lookup is configured");
            return Ok(replies::web_not_found());
        };

        let hit = match lookup.lookup(&query).await {
            Ok(hit) => hit,
            Err(e) => {
                warn!("Lookup for {:?} failed: {}", query, e);
                return Ok(replies::web_not_found());
            }
        };

        let fact = Fact::new(hit.title.clone(), hit.extract.clone())
            .with_why(WEB_WHY)
            .with_how(vec![lookup.source_name().to_string()]);
        self.store.save(&hit.title, fact)?;

        info!("Auto-saved web fact: {}", hit.title);
        Ok(replies::web_fetch(&hit.title, &hit.extract))
    }
}
