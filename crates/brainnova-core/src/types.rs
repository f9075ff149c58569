//! ============================================================================
//! Core Types for Brainnova
//! ============================================================================
//! Defines the fact record, the engine's reply envelope and the error
//! taxonomy. Facts and replies serialize to JSON for export and for any
//! frontend that renders replies.
//! ============================================================================

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A stored topic/definition record.
///
/// Example: `{"topic": "Rust", "core": "A systems language", "why": "...", "how": ["..."]}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fact {
    /// Display name, as the user typed it
    #[serde(default)]
    pub topic: String,
    /// Definition body (never empty for a stored fact)
    pub core: String,
    /// Rationale or provenance
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why: Option<String>,
    /// Ordered process steps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub how: Option<Vec<String>>,
}

impl Fact {
    pub fn new(topic: impl Into<String>, core: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            core: core.into(),
            why: None,
            how: None,
        }
    }

    pub fn with_why(mut self, why: impl Into<String>) -> Self {
        self.why = Some(why.into());
        self
    }

    pub fn with_how(mut self, how: Vec<String>) -> Self {
        self.how = Some(how);
        self
    }

    /// Storage key: the topic lower-cased, nothing else normalized
    pub fn key(&self) -> String {
        normalize_topic(&self.topic)
    }

    /// Topic to show for this fact, falling back to its storage key
    pub fn display_topic<'a>(&'a self, key: &'a str) -> &'a str {
        if self.topic.is_empty() {
            key
        } else {
            &self.topic
        }
    }

    /// Rationale if present and non-empty
    pub fn why(&self) -> Option<&str> {
        self.why.as_deref().filter(|w| !w.is_empty())
    }

    /// Process steps if present and non-empty
    pub fn how(&self) -> Option<&[String]> {
        self.how.as_deref().filter(|h| !h.is_empty())
    }

    /// Build a fact from a loosely-shaped JSON object.
    ///
    /// Returns None unless `topic` and `core` are both non-empty strings.
    /// `why` is kept only when it is a string; `how` only when it is an array
    /// (non-string steps are stringified).
    pub fn from_json(value: &Value) -> Option<Self> {
        let obj = value.as_object()?;
        let topic = non_empty_str(obj.get("topic"))?;
        let core = non_empty_str(obj.get("core"))?;

        let why = obj.get("why").and_then(Value::as_str).map(str::to_string);
        let how = obj.get("how").and_then(Value::as_array).map(|steps| {
            steps
                .iter()
                .map(|step| match step {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect()
        });

        Some(Self {
            topic: topic.to_string(),
            core: core.to_string(),
            why,
            how,
        })
    }
}

fn non_empty_str(value: Option<&Value>) -> Option<&str> {
    value.and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Normalize a topic into its storage key
pub fn normalize_topic(topic: &str) -> String {
    topic.to_lowercase()
}

/// Why the engine produced a reply. Rendered as a short uppercase tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Reason {
    #[serde(rename = "HELP")]
    Help,
    #[serde(rename = "SYSTEM")]
    System,
    #[serde(rename = "SYNTAX ERROR")]
    SyntaxError,
    #[serde(rename = "JSON INJECTION")]
    JsonInjection,
    #[serde(rename = "MEMORY HIT")]
    MemoryHit,
    #[serde(rename = "PATTERN DETECT")]
    PatternDetect,
    #[serde(rename = "WRITE")]
    Write,
    #[serde(rename = "MISS")]
    Miss,
    #[serde(rename = "NO DATA")]
    NoData,
    #[serde(rename = "DEEP RECALL")]
    DeepRecall,
    #[serde(rename = "WEB FETCH")]
    WebFetch,
    #[serde(rename = "404")]
    NotFound,

    // Presentation-side tags
    #[serde(rename = "BOOT")]
    Boot,
    #[serde(rename = "DATA")]
    Data,
    #[serde(rename = "RESET")]
    Reset,
}

impl Reason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Reason::Help => "HELP",
            Reason::System => "SYSTEM",
            Reason::SyntaxError => "SYNTAX ERROR",
            Reason::JsonInjection => "JSON INJECTION",
            Reason::MemoryHit => "MEMORY HIT",
            Reason::PatternDetect => "PATTERN DETECT",
            Reason::Write => "WRITE",
            Reason::Miss => "MISS",
            Reason::NoData => "NO DATA",
            Reason::DeepRecall => "DEEP RECALL",
            Reason::WebFetch => "WEB FETCH",
            Reason::NotFound => "404",
            Reason::Boot => "BOOT",
            Reason::Data => "DATA",
            Reason::Reset => "RESET",
        }
    }
}

impl std::fmt::Display for Reason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The engine's structured output.
///
/// `text` may contain `**bold**` markers and `\n` line breaks; frontends
/// render them, the engine never strips them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub text: String,
    pub reason: Reason,
    /// 0 - 100
    pub confidence: u8,
}

impl Reply {
    pub fn new(text: impl Into<String>, reason: Reason, confidence: u8) -> Self {
        Self {
            text: text.into(),
            reason,
            confidence: confidence.min(100),
        }
    }

    /// Full-confidence reply
    pub fn sure(text: impl Into<String>, reason: Reason) -> Self {
        Self::new(text, reason, 100)
    }

    /// Zero-confidence reply
    pub fn unsure(text: impl Into<String>, reason: Reason) -> Self {
        Self::new(text, reason, 0)
    }
}

/// Error types for the fact engine
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrainError {
    #[error("Invalid input: {0}")]
    UserInput(String),

    #[error("Stored data is corrupt: {0}")]
    StorageCorruption(String),

    #[error("Import rejected: {0}")]
    ImportRejected(String),

    #[error("Storage error: {0}")]
    Storage(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_fact_key_lowercases_only() {
        let fact = Fact::new("Big  Cats", "felines");
        assert_eq!(fact.key(), "big  cats");
    }

    #[test]
    fn test_fact_serialization_omits_empty_optionals() {
        let fact = Fact::new("x", "y");
        let value = serde_json::to_value(&fact).unwrap();
        assert_eq!(value, json!({"topic": "x", "core": "y"}));

        let full = Fact::new("x", "y")
            .with_why("because")
            .with_how(vec!["one".into()]);
        let value = serde_json::to_value(&full).unwrap();
        assert_eq!(value["why"], "because");
        assert_eq!(value["how"], json!(["one"]));
    }

    #[test]
    fn test_from_json_requires_topic_and_core() {
        assert!(Fact::from_json(&json!({"topic": "a", "core": "1"})).is_some());
        assert!(Fact::from_json(&json!({"topic": "b"})).is_none());
        assert!(Fact::from_json(&json!({"topic": "", "core": "1"})).is_none());
        assert!(Fact::from_json(&json!({"topic": "a", "core": 5})).is_none());
        assert!(Fact::from_json(&json!(["topic", "core"])).is_none());
    }

    #[test]
    fn test_from_json_keeps_optionals() {
        let fact = Fact::from_json(&json!({
            "topic": "Tea",
            "core": "A drink",
            "why": "Imported",
            "how": ["boil", 2]
        }))
        .unwrap();
        assert_eq!(fact.why(), Some("Imported"));
        assert_eq!(fact.how().unwrap(), &["boil".to_string(), "2".to_string()]);
    }

    #[test]
    fn test_display_topic_falls_back_to_key() {
        let fact: Fact = serde_json::from_value(json!({"core": "y"})).unwrap();
        assert_eq!(fact.display_topic("stored key"), "stored key");
    }

    #[test]
    fn test_reason_tags() {
        assert_eq!(Reason::MemoryHit.to_string(), "MEMORY HIT");
        assert_eq!(Reason::NotFound.as_str(), "404");
        assert_eq!(
            serde_json::to_value(Reason::SyntaxError).unwrap(),
            json!("SYNTAX ERROR")
        );
    }

    #[test]
    fn test_reply_confidence_clamped() {
        assert_eq!(Reply::new("x", Reason::Miss, 250).confidence, 100);
        assert_eq!(Reply::unsure("x", Reason::Miss).confidence, 0);
    }
}
