//! ============================================================================
//! Matcher - Substring-containment lookup over stored topic keys
//! ============================================================================
//! Exact key first, then the first key (in iteration order) where either the
//! query contains the key or the key contains the query. No scoring: a short
//! key like "a" will match almost any query.
//! ============================================================================

use std::collections::BTreeMap;
use tracing::debug;

use crate::types::Fact;

/// Find the stored key that best matches `text`
pub fn find_topic<'a>(facts: &'a BTreeMap<String, Fact>, text: &str) -> Option<&'a str> {
    let lower = text.to_lowercase();

    if let Some((key, _)) = facts.get_key_value(lower.as_str()) {
        debug!("Exact topic match: {}", key);
        return Some(key.as_str());
    }

    let hit = facts
        .keys()
        .find(|key| lower.contains(key.as_str()) || key.contains(lower.as_str()))
        .map(String::as_str);

    match hit {
        Some(key) => debug!("Substring topic match: {} for {:?}", key, text),
        None => debug!("No topic match for {:?}", text),
    }
    hit
}
