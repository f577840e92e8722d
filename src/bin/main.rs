use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use rangekeeper::actions::{self, SnippetRequest, Target};
use rangekeeper::config::{self, SettingsEventKind, SettingsFile, SettingsLoadOutcome};
use rangekeeper::{
    Document, DocumentId, DocumentStore, Edit, EditResult, EditorHost, FlashScheduler, LogPainter,
    PendingEditController, RangeBundle, TextRange,
};
use serde_json::json;

/// Logging target for the command-line front end.
const LOG_TARGET: &str = "rangekeeper::cli";

/// Batch text edits that keep tracked ranges in place
#[derive(Parser)]
#[command(name = "rangekeeper")]
#[command(version)]
#[command(about = "Batch text edits that keep tracked ranges in place")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply a batch of edits to a file and rebase range bundles
    Apply {
        /// File to edit
        file: PathBuf,

        /// JSON array of edits: [{"range": {"start": 0, "end": 0}, "text": "x", "isReplace": false}]
        #[arg(long)]
        edits: String,

        /// JSON array of range bundles to rebase (nested arrays of tracked ranges)
        #[arg(long)]
        ranges: Option<String>,

        /// Write the result back to the file instead of printing the text
        #[arg(long)]
        write: bool,
    },
    /// Surround ranges of a file with delimiters
    Wrap {
        file: PathBuf,

        #[arg(long)]
        left: String,

        #[arg(long)]
        right: String,

        /// Range to wrap, as START..END (repeatable)
        #[arg(long = "range", required = true)]
        ranges: Vec<TextRange>,

        /// Write the result back to the file instead of printing the text
        #[arg(long)]
        write: bool,

        /// Project root holding rangekeeper.toml (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
    /// Extract a range of a file into a snippet file
    Snippet {
        file: PathBuf,

        /// Snippet name, also the file name stem
        #[arg(long)]
        name: String,

        /// Range to extract, as START..END
        #[arg(long)]
        target: TextRange,

        /// Range inside the target to turn into a placeholder (repeatable)
        #[arg(long = "placeholder")]
        placeholders: Vec<TextRange>,

        /// Language identifier recorded in the snippet scope
        #[arg(long)]
        language: Option<String>,

        #[arg(long)]
        description: Option<String>,

        /// Directory receiving the snippet file (overrides configuration)
        #[arg(long)]
        snippets_dir: Option<PathBuf>,

        /// Project root holding rangekeeper.toml (default: current directory)
        #[arg(long)]
        root: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .target(env_logger::Target::Stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli.command) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(command: Commands) -> EditResult<()> {
    match command {
        Commands::Apply {
            file,
            edits,
            ranges,
            write,
        } => {
            let edits: Vec<Edit> = serde_json::from_str(&edits)?;
            let bundles: Vec<RangeBundle> = match ranges {
                Some(ranges) => serde_json::from_str(&ranges)?,
                None => Vec::new(),
            };

            let mut document = Document::new(std::fs::read_to_string(&file)?);
            let outcome = PendingEditController::batch(&mut document, &edits, &bundles)?;

            if write {
                std::fs::write(&file, &outcome.text)?;
                print_json(&json!({
                    "version": outcome.version,
                    "bundles": outcome.bundles,
                }))
            } else {
                print_json(&outcome)
            }
        }
        Commands::Wrap {
            file,
            left,
            right,
            ranges,
            write,
            root,
        } => {
            let settings = load_settings(root.as_deref(), SettingsFile::default());
            let (store, id) = open_document(&file, None)?;
            let flash = FlashScheduler::new(Arc::new(LogPainter), settings.flash_delay);

            let targets: Vec<Target> = ranges
                .into_iter()
                .map(|range| Target::new(id.clone(), range))
                .collect();
            let that_mark = actions::wrap(&store, &flash, &targets, &left, &right)?;
            flash.cancel_all();

            let text = store.snapshot(&id)?.text;
            if write {
                std::fs::write(&file, &text)?;
                print_json(&json!({ "thatMark": that_mark }))
            } else {
                print_json(&json!({ "text": text, "thatMark": that_mark }))
            }
        }
        Commands::Snippet {
            file,
            name,
            target,
            placeholders,
            language,
            description,
            snippets_dir,
            root,
        } => {
            let overrides = SettingsFile {
                snippets_dir,
                ..SettingsFile::default()
            };
            let settings = load_settings(root.as_deref(), overrides);
            let (store, id) = open_document(&file, language)?;
            store.set_selections(&id, placeholders)?;
            let flash = FlashScheduler::new(Arc::new(LogPainter), settings.flash_delay);

            let request = SnippetRequest {
                name: Some(name),
                description,
            };
            let generated = actions::generate_snippet(
                &store,
                &flash,
                &settings,
                &[Target::new(id, target)],
                &request,
            )?;
            flash.cancel_all();

            print_json(&generated)
        }
    }
}

fn load_settings(root: Option<&Path>, overrides: SettingsFile) -> config::Settings {
    let cwd = std::env::current_dir().ok();
    let root = root.or(cwd.as_deref());
    let SettingsLoadOutcome { settings, events } = config::load_settings(root, overrides);
    for event in events {
        match event.kind {
            SettingsEventKind::Info => log::info!(target: LOG_TARGET, "{}", event.message),
            SettingsEventKind::Warning => log::warn!(target: LOG_TARGET, "{}", event.message),
        }
    }
    settings
}

fn open_document(file: &Path, language: Option<String>) -> EditResult<(DocumentStore, DocumentId)> {
    let text = std::fs::read_to_string(file)?;
    let store = DocumentStore::new();
    let id = DocumentId::new(file.display().to_string());
    store.insert(id.clone(), text, language);
    Ok((store, id))
}

fn print_json<T: serde::Serialize>(value: &T) -> EditResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
