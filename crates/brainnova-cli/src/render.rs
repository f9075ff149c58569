//! Terminal rendering for engine replies.
//!
//! Reply text carries `**bold**` spans and newlines. Color is used only when
//! stdout is a terminal and NO_COLOR is unset.

use once_cell::sync::Lazy;
use owo_colors::OwoColorize;
use regex::{Captures, Regex};
use std::io::IsTerminal;

use brainnova_core::{Mode, Reply};

static BOLD_SPAN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("valid bold regex"));

/// Whether stdout should receive ANSI styling
pub fn use_color() -> bool {
    std::env::var_os("NO_COLOR").is_none() && std::io::stdout().is_terminal()
}

/// Replace `**span**` with bold text, or strip the markers when `color` is off
pub fn render_markup(text: &str, color: bool) -> String {
    BOLD_SPAN
        .replace_all(text, |caps: &Captures| {
            let span: &str = &caps[1];
            if color {
                span.bold().to_string()
            } else {
                span.to_string()
            }
        })
        .into_owned()
}

/// `[V1] MEMORY HIT (100%)`
pub fn reply_header(mode: Mode, reply: &Reply, color: bool) -> String {
    let badge = format!("[{}]", mode.id().to_uppercase());
    let meta = format!("{} ({}%)", reply.reason, reply.confidence);

    if color {
        let (r, g, b) = mode.accent();
        format!("{} {}", badge.truecolor(r, g, b).bold(), meta.dimmed())
    } else {
        format!("{} {}", badge, meta)
    }
}

pub fn format_reply(mode: Mode, reply: &Reply, color: bool) -> String {
    format!(
        "{}\n{}",
        reply_header(mode, reply, color),
        render_markup(&reply.text, color)
    )
}

pub fn print_reply(mode: Mode, reply: &Reply) {
    println!("{}\n", format_reply(mode, reply, use_color()));
}

/// Mode name in its accent color, used by the prompt and `/mode`
pub fn mode_label(mode: Mode, color: bool) -> String {
    if color {
        let (r, g, b) = mode.accent();
        mode.display_name().truecolor(r, g, b).to_string()
    } else {
        mode.display_name().to_string()
    }
}
