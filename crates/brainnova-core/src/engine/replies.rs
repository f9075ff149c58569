//! ============================================================================
//! Replies - Canonical reply texts
//! ============================================================================
//! `**bold**` and `\n` are part of the reply format; frontends render them.
//! ============================================================================

use crate::mode::Mode;
use crate::types::{Fact, Reason, Reply};

pub fn boot() -> Reply {
    Reply::sure(
        "System Online. Ready for input.\nTry: `teach: {\"topic\":\"x\", \"core\":\"y\"}`",
        Reason::Boot,
    )
}

pub fn help() -> Reply {
    Reply::sure(
        "Commands:\n• `reset` (Wipe)\n• `teach: {json}` (Advanced)\n• `Topic is Definition` (Simple)",
        Reason::Help,
    )
}

pub fn memory_wiped() -> Reply {
    Reply::sure("Memory wiped.", Reason::System)
}

pub fn invalid_json() -> Reply {
    Reply::unsure(
        "Invalid JSON format. Ensure keys are quoted.\nEx: `{\"topic\":\"hi\"}`",
        Reason::SyntaxError,
    )
}

pub fn missing_fields() -> Reply {
    Reply::unsure(
        "JSON must contain 'topic' and 'core' keys.",
        Reason::SyntaxError,
    )
}

pub fn learned(topic: &str, core: &str) -> Reply {
    Reply::sure(
        format!(
            "**Learned:** {}\n**Definition:** {}\n(Structure Saved)",
            topic, core
        ),
        Reason::JsonInjection,
    )
}

pub fn memory_hit(topic: &str, core: &str) -> Reply {
    Reply::sure(format!("**{}**\n{}", topic, core), Reason::MemoryHit)
}

pub fn confirm_teach(subject: &str, definition: &str) -> Reply {
    Reply::new(
        format!("I don't know **{}**. Save as:\n\"{}\"?", subject, definition),
        Reason::PatternDetect,
        50,
    )
}

pub fn saved() -> Reply {
    Reply::sure("Saved.", Reason::Write)
}

pub fn miss() -> Reply {
    Reply::unsure(
        format!(
            "Unknown. Use 'teach:' or switch to {} to search online.",
            Mode::WebAugmented.id()
        ),
        Reason::Miss,
    )
}

pub fn no_data() -> Reply {
    Reply::unsure("I need data to analyze. Teach me first.", Reason::NoData)
}

/// Topic and core, then Logic and Process sections when present
pub fn analysis(topic: &str, fact: &Fact) -> Reply {
    let mut out = format!("**Analysis: {}**\n{}", topic, fact.core);

    if let Some(why) = fact.why() {
        out.push_str(&format!("\n\n**Logic:** {}", why));
    }
    if let Some(steps) = fact.how() {
        let lines: Vec<String> = steps.iter().map(|step| format!("• {}", step)).collect();
        out.push_str("\n\n**Process:**\n");
        out.push_str(&lines.join("\n"));
    }

    Reply::sure(out, Reason::DeepRecall)
}

pub fn web_fetch(title: &str, extract: &str) -> Reply {
    Reply::sure(
        format!("**{}**\n{}\n\n[Auto-saved to Memory]", title, extract),
        Reason::WebFetch,
    )
}

pub fn web_not_found() -> Reply {
    Reply::unsure("Could not find valid data online.", Reason::NotFound)
}

pub fn batch_imported(count: usize) -> Reply {
    Reply::sure(format!("Batch imported {} items.", count), Reason::Data)
}

pub fn wiped_by_user() -> Reply {
    Reply::sure("Memory Wiped.", Reason::Reset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_analysis_plain() {
        let reply = analysis("Tea", &Fact::new("Tea", "A drink"));
        assert_eq!(reply.text, "**Analysis: Tea**\nA drink");
        assert_eq!(reply.reason, Reason::DeepRecall);
    }

    #[test]
    fn test_analysis_with_logic_and_process() {
        let fact = Fact::new("Tea", "A drink")
            .with_why("Culture")
            .with_how(vec!["Boil".into(), "Steep".into()]);
        let reply = analysis("Tea", &fact);
        assert_eq!(
            reply.text,
            "**Analysis: Tea**\nA drink\n\n**Logic:** Culture\n\n**Process:**\n• Boil\n• Steep"
        );
    }

    #[test]
    fn test_analysis_skips_empty_sections() {
        let fact = Fact::new("Tea", "A drink").with_why("").with_how(vec![]);
        assert_eq!(analysis("Tea", &fact).text, "**Analysis: Tea**\nA drink");
    }

    #[test]
    fn test_miss_mentions_web_mode() {
        let reply = miss();
        assert!(reply.text.contains("v6"));
        assert_eq!(reply.confidence, 0);
    }

    #[test]
    fn test_confirm_prompt() {
        let reply = confirm_teach("Foo", "Bar");
        assert_eq!(reply.text, "I don't know **Foo**. Save as:\n\"Bar\"?");
        assert_eq!(reply.confidence, 50);
    }
}
