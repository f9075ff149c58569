// ============================================================================
// brainnova - terminal chat frontend for the Brainnova fact engine
// ============================================================================
// Usage:
//   brainnova                          Interactive chat (same as `chat`)
//   brainnova ask "what is rust"       One engine turn, print the reply
//   brainnova stats                    Fact count, size, database location
//   brainnova export [--output FILE]   Dump memory as pretty JSON
//   brainnova import FILE              Merge a fact or an array of facts
//   brainnova wipe [--yes]             Delete all memories
// ============================================================================

mod chat;
mod render;

use anyhow::{anyhow, Result};
use chrono::{TimeZone, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use brainnova_core::engine::replies;
use brainnova_core::{
    BrainConfig, Engine, FactDb, FactStore, MemoryStorage, Mode, WikipediaLookup,
};

/// Brainnova fact memory assistant
#[derive(Parser)]
#[command(name = "brainnova", version, about = "Teach, recall and look up short facts")]
struct Cli {
    /// Path to the database file (default: ~/.brainnova/brainnova.redb)
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    /// Starting mode: v1/standard, v2/analytic, v6/web
    #[arg(long, global = true)]
    mode: Option<String>,

    /// Keep memory in-process only; nothing is read from or written to disk
    #[arg(long, global = true)]
    ephemeral: bool,

    /// Disable the web lookup; v6 queries always miss
    #[arg(long, global = true)]
    offline: bool,

    /// Debug logging for the engine
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive chat session
    Chat,

    /// Send one message to the engine and print the reply
    Ask {
        /// Message text
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Show fact count, snapshot size and database location
    Stats,

    /// Export all facts as pretty-printed JSON
    Export {
        /// Write to this file instead of stdout
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Import a fact object or an array of facts from a JSON file
    Import {
        /// JSON file to import
        path: PathBuf,
    },

    /// Delete all memories
    Wipe {
        /// Skip the confirmation prompt
        #[arg(long)]
        yes: bool,
    },
}

/// Loaded store plus where it lives
pub(crate) struct Backend {
    pub store: FactStore,
    pub location: String,
    pub saved_at: Option<i64>,
}

fn init_tracing(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::new("warn")
            .add_directive("brainnova_core=debug".parse()?)
            .add_directive("brainnova=debug".parse()?)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

fn load_config(cli: &Cli) -> Result<BrainConfig> {
    let mut config = BrainConfig::from_env();
    if let Some(path) = &cli.db_path {
        config.db_path = Some(path.clone());
    }
    if let Some(mode) = &cli.mode {
        config.mode = mode.parse::<Mode>().map_err(|e| anyhow!(e))?;
    }
    Ok(config)
}

fn open_backend(config: &BrainConfig, ephemeral: bool) -> Result<Backend> {
    if ephemeral {
        return Ok(Backend {
            store: FactStore::load(MemoryStorage::new()),
            location: "(in-memory)".to_string(),
            saved_at: None,
        });
    }

    let db = FactDb::open(config.db_path.as_deref())?;
    let location = db.path().display().to_string();
    let saved_at = db.last_saved_at()?;

    Ok(Backend {
        store: FactStore::load(db),
        location,
        saved_at,
    })
}

fn build_engine(config: &BrainConfig, store: FactStore, offline: bool) -> Result<Engine> {
    let engine = if offline {
        Engine::offline(store)
    } else {
        let lookup = WikipediaLookup::new(config.lookup_url.clone(), config.lookup_timeout())?;
        Engine::new(store, Box::new(lookup))
    };
    Ok(engine.with_mode(config.mode))
}

pub(crate) fn format_timestamp(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| format!("(invalid: {})", ts))
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let dotenv = dotenvy::dotenv();
    init_tracing(cli.verbose)?;
    if let Err(e) = dotenv {
        debug!("No .env loaded: {}", e);
    }

    let config = load_config(&cli)?;
    let backend = open_backend(&config, cli.ephemeral)?;
    info!("Memory loaded from {}", backend.location);

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => {
            let location = backend.location.clone();
            let engine = build_engine(&config, backend.store, cli.offline)?;
            chat::run(engine, &location).await
        }
        Commands::Ask { text } => {
            let mut engine = build_engine(&config, backend.store, cli.offline)?;
            let reply = engine.process(&text.join(" ")).await?;
            render::print_reply(engine.mode(), &reply);
            Ok(())
        }
        Commands::Stats => cmd_stats(&backend),
        Commands::Export { output } => cmd_export(&backend.store, output),
        Commands::Import { path } => cmd_import(backend.store, &path),
        Commands::Wipe { yes } => cmd_wipe(backend.store, yes).await,
    }
}

fn cmd_stats(backend: &Backend) -> Result<()> {
    let stats = backend.store.stats();

    println!("=== Brainnova Memory Stats ===");
    println!("Database: {}", backend.location);
    println!();
    println!("Facts:    {}", stats.count);
    println!("Size:     {:.2} KB", stats.kilobytes());
    println!(
        "Saved:    {}",
        backend
            .saved_at
            .map(format_timestamp)
            .unwrap_or_else(|| "never".into())
    );

    Ok(())
}

pub(crate) fn export_to(store: &FactStore, output: Option<&std::path::Path>) -> Result<()> {
    let json = store.export_json()?;
    match output {
        Some(path) => {
            std::fs::write(path, json.as_bytes())
                .map_err(|e| anyhow!("Failed to write {}: {}", path.display(), e))?;
            println!("Exported {} facts to {}", store.len(), path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn cmd_export(store: &FactStore, output: Option<PathBuf>) -> Result<()> {
    export_to(store, output.as_deref())
}

pub(crate) fn import_from(store: &mut FactStore, path: &std::path::Path) -> Result<usize> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;
    store.import_str(&raw)
}

fn cmd_import(mut store: FactStore, path: &std::path::Path) -> Result<()> {
    let count = import_from(&mut store, path)?;
    render::print_reply(Mode::Standard, &replies::batch_imported(count));
    Ok(())
}

async fn cmd_wipe(mut store: FactStore, yes: bool) -> Result<()> {
    if !yes {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        if !chat::confirm(&mut lines, "Delete all memories?").await? {
            println!("Aborted.");
            return Ok(());
        }
    }

    store.reset()?;
    render::print_reply(Mode::Standard, &replies::wiped_by_user());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_global_flags() {
        let cli = Cli::try_parse_from(["brainnova", "--mode", "v2", "--ephemeral", "stats"]).unwrap();
        assert!(cli.ephemeral);
        assert!(matches!(cli.command, Some(Commands::Stats)));

        let config = load_config(&cli).unwrap();
        assert_eq!(config.mode, Mode::Analytic);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        let cli = Cli::try_parse_from(["brainnova", "--mode", "v9"]).unwrap();
        assert!(load_config(&cli).is_err());
    }

    #[test]
    fn test_ask_joins_words() {
        let cli = Cli::try_parse_from(["brainnova", "ask", "what", "is", "rust"]).unwrap();
        match cli.command {
            Some(Commands::Ask { text }) => assert_eq!(text.join(" "), "what is rust"),
            _ => panic!("expected ask"),
        }
    }

    #[test]
    fn test_export_import_files() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("backup.json");

        let mut store = FactStore::load(MemoryStorage::new());
        store
            .import_str(r#"[{"topic":"a","core":"1"},{"topic":"b"},{"topic":"c","core":"3"}]"#)
            .unwrap();
        export_to(&store, Some(&file)).unwrap();

        // The export is an object keyed by topic: one object, not a fact
        let mut other = FactStore::load(MemoryStorage::new());
        assert_eq!(import_from(&mut other, &file).unwrap(), 0);

        std::fs::write(&file, r#"{"topic":"Solo","core":"one"}"#).unwrap();
        assert_eq!(import_from(&mut other, &file).unwrap(), 1);
        assert!(other.get("solo").is_some());
    }

    #[test]
    fn test_format_timestamp() {
        assert_eq!(format_timestamp(0), "1970-01-01 00:00:00 UTC");
    }
}
