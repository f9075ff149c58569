//! Interactive chat loop.
//!
//! Plain lines go to the engine. Lines starting with `/` are console
//! commands handled here: mode toggle, stats, export, import, wipe, quit.

use anyhow::Result;
use std::io::Write;
use std::path::PathBuf;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};

use brainnova_core::engine::replies;
use brainnova_core::{Engine, Reason, Reply};

use crate::render;

/// Default `/export` target in the working directory
pub const DEFAULT_EXPORT_FILE: &str = "brainnova_backup.json";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    Mode,
    Stats,
    Export(PathBuf),
    Import(PathBuf),
    Wipe,
    Quit,
    Usage(String),
}

impl ChatCommand {
    /// Parse a console command. None means the line is a normal message.
    pub fn parse(line: &str) -> Option<Self> {
        let rest = line.strip_prefix('/')?;
        let mut parts = rest.splitn(2, char::is_whitespace);
        let name = parts.next().unwrap_or("").to_lowercase();
        let arg = parts.next().map(str::trim).filter(|a| !a.is_empty());

        let cmd = match name.as_str() {
            "mode" => ChatCommand::Mode,
            "stats" => ChatCommand::Stats,
            "export" => ChatCommand::Export(PathBuf::from(arg.unwrap_or(DEFAULT_EXPORT_FILE))),
            "import" => match arg {
                Some(path) => ChatCommand::Import(PathBuf::from(path)),
                None => ChatCommand::Usage("Usage: /import PATH".into()),
            },
            "wipe" => ChatCommand::Wipe,
            "quit" | "exit" => ChatCommand::Quit,
            _ => ChatCommand::Usage(
                "Console commands: /mode /stats /export [PATH] /import PATH /wipe /quit".into(),
            ),
        };
        Some(cmd)
    }
}

fn prompt(text: &str) {
    print!("{}", text);
    let _ = std::io::stdout().flush();
}

/// Ask a yes/no question on the given reader. EOF counts as no.
pub async fn confirm<R>(lines: &mut Lines<R>, question: &str) -> Result<bool>
where
    R: AsyncBufRead + Unpin,
{
    prompt(&format!("{} [y/N] ", question));
    let answer = lines.next_line().await?.unwrap_or_default();
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"))
}

pub async fn run(mut engine: Engine, location: &str) -> Result<()> {
    let color = render::use_color();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    println!("Brainnova - memory at {}", location);
    println!("Type /mode to switch modes, /quit to leave.\n");
    render::print_reply(engine.mode(), &replies::boot());

    loop {
        prompt(&format!("{} > ", render::mode_label(engine.mode(), color)));

        let Some(line) = lines.next_line().await? else {
            println!();
            break;
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match ChatCommand::parse(line) {
            None => match engine.process(line).await {
                Ok(reply) => render::print_reply(engine.mode(), &reply),
                Err(e) => {
                    warn!("Turn failed: {}", e);
                    println!("Error: {}\n", e);
                }
            },
            Some(ChatCommand::Quit) => break,
            Some(command) => handle_command(&mut engine, command, &mut lines).await?,
        }
    }

    debug!("Chat session closed");
    Ok(())
}

async fn handle_command<R>(
    engine: &mut Engine,
    command: ChatCommand,
    lines: &mut Lines<R>,
) -> Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let color = render::use_color();

    match command {
        ChatCommand::Mode => {
            let mode = engine.toggle_mode();
            println!("Mode: {}\n", render::mode_label(mode, color));
        }
        ChatCommand::Stats => {
            println!("Memory: {}\n", engine.store().stats());
        }
        ChatCommand::Export(path) => {
            if let Err(e) = crate::export_to(engine.store(), Some(&path)) {
                warn!("Export failed: {}", e);
                println!("Export failed: {}\n", e);
            }
        }
        ChatCommand::Import(path) => match crate::import_from(engine.store_mut(), &path) {
            Ok(count) => render::print_reply(engine.mode(), &replies::batch_imported(count)),
            Err(e) => render::print_reply(
                engine.mode(),
                &Reply::unsure(format!("Import failed: {}", e), Reason::Data),
            ),
        },
        ChatCommand::Wipe => {
            if confirm(lines, "Delete all memories?").await? {
                engine.store_mut().reset()?;
                render::print_reply(engine.mode(), &replies::wiped_by_user());
            } else {
                println!("Aborted.\n");
            }
        }
        ChatCommand::Usage(text) => println!("{}\n", text),
        ChatCommand::Quit => {}
    }

    Ok(())
}
