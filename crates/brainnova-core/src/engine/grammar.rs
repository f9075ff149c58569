//! ============================================================================
//! Grammar - Fixed input patterns recognized by the engine
//! ============================================================================
//! - `help` / `reset` universal commands
//! - `teach: {json}` structured directive
//! - `<subject> is|means <definition>` implicit teaching
//! - `yes` / `ok` / `save` confirmation words
//! - leading `search` / `find` / `define` verbs for web queries
//! ============================================================================

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::types::Fact;

/// `why` given to taught facts that don't carry one
pub const DEFAULT_TEACH_WHY: &str = "Imported via console";

static TEACH_DIRECTIVE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^teach:\s*(\{.*\})$").expect("valid teach regex"));

static DEFINITION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^([\w\s]+)\s+(?:is|means)\s+(.+)$").expect("valid definition regex")
});

static CONFIRMATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(?:yes|ok|save)\b").expect("valid confirmation regex"));

static SEARCH_VERBS: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(?:(?:search|find|define)\b[\s:]*)+").expect("valid search verb regex")
});

/// Commands honoured in every mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UniversalCommand {
    Help,
    Reset,
}

/// Whole-input, case-insensitive command match
pub fn parse_command(text: &str) -> Option<UniversalCommand> {
    match text.trim().to_lowercase().as_str() {
        "help" => Some(UniversalCommand::Help),
        "reset" => Some(UniversalCommand::Reset),
        _ => None,
    }
}

/// Why a `teach:` directive was refused
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TeachError {
    #[error("teach payload is not valid JSON: {0}")]
    InvalidJson(String),

    #[error("teach payload needs non-empty 'topic' and 'core'")]
    MissingFields,
}

/// Parse `teach: {...}`.
///
/// Returns None when the input is not a teach directive at all, otherwise
/// the fact to store (with a default `why`) or the reason it was refused.
pub fn parse_teach_directive(text: &str) -> Option<Result<Fact, TeachError>> {
    let caps = TEACH_DIRECTIVE.captures(text.trim())?;
    let body = caps.get(1)?.as_str();

    let parsed = serde_json::from_str::<Value>(body)
        .map_err(|e| TeachError::InvalidJson(e.to_string()))
        .and_then(|value| Fact::from_json(&value).ok_or(TeachError::MissingFields))
        .map(|mut fact| {
            if fact.why().is_none() {
                fact.why = Some(DEFAULT_TEACH_WHY.to_string());
            }
            fact
        });

    Some(parsed)
}

/// Candidate fact read from a plain sentence
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
    pub subject: String,
    pub definition: String,
}

/// Match `<subject> is|means <definition>`; questions never match
pub fn parse_definition(text: &str) -> Option<Definition> {
    if text.contains('?') {
        return None;
    }

    let caps = DEFINITION.captures(text.trim())?;
    let subject = caps.get(1)?.as_str().trim();
    let definition = caps.get(2)?.as_str().trim();
    if subject.is_empty() || definition.is_empty() {
        return None;
    }

    Some(Definition {
        subject: subject.to_string(),
        definition: definition.to_string(),
    })
}

/// Does the text contain `yes`, `ok` or `save` as a whole word
pub fn is_confirmation(text: &str) -> bool {
    CONFIRMATION.is_match(text)
}

/// Drop leading search verbs: "search define rust" -> "rust"
pub fn strip_search_verbs(text: &str) -> String {
    SEARCH_VERBS.replace(text.trim(), "").trim().to_string()
}
