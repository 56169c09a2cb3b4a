//! `cvar` CLI: inspect, edit and reformat console-variable files.
//!
//! ## Usage
//!
//! ```sh
//! # Interactive console, optionally preloaded from a file
//! cvar console -i settings.cvar
//!
//! # Parse and re-emit a file (beautified by default)
//! cvar parse -i settings.cvar
//! cvar parse -i settings.cvar --compact -o settings.min.cvar
//!
//! # Read one variable
//! cvar get graphics.window.width -i settings.cvar
//!
//! # Set one variable and write the result
//! cvar set graphics.window.width 1920 -i settings.cvar -o settings.cvar
//! ```

mod console;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cvar_core::CVarStore;
use std::io::{self, IsTerminal, Read, Write};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "cvar", version, about = "Console variable store CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log parser and store activity to stderr
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Interactive console: `name=value` sets, `name` prints, `exit` quits
    Console {
        /// File to load before the session starts
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Parse a document and write it back out
    Parse {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact output instead of one entry per line
        #[arg(long)]
        compact: bool,
    },
    /// Print the value of a dotted variable name
    Get {
        /// Dotted variable name, e.g. graphics.window.width
        key: String,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<String>,
    },
    /// Set a dotted variable name and print or write the resulting document
    Set {
        /// Dotted variable name, e.g. graphics.window.width
        key: String,
        /// Value: 'quoted' or "quoted" string, true/false, integer, or float with '.'
        value: String,
        /// File to start from (starts from an empty store if omitted)
        #[arg(short, long)]
        input: Option<String>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<String>,
        /// Emit compact output instead of one entry per line
        #[arg(long)]
        compact: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Console { input } => {
            let mut store = CVarStore::new();
            if let Some(path) = input.as_deref() {
                store
                    .load_file(path)
                    .with_context(|| format!("Cannot load cvar document '{}'", path))?;
            }
            let stdin = io::stdin();
            let interactive = stdin.is_terminal();
            console::run(&mut store, stdin.lock(), io::stdout().lock(), interactive)?;
        }
        Commands::Parse {
            input,
            output,
            compact,
        } => {
            let text = read_document(input.as_deref())?;
            let root = cvar_core::unserialize(&text).context("Invalid cvar document")?;
            write_document(output.as_deref(), &cvar_core::to_string(&root, !compact))?;
        }
        Commands::Get { key, input } => {
            let store = load_store(Some(read_document(input.as_deref())?))?;
            match store.get(&key) {
                Some(value) => println!("{}", value),
                None => anyhow::bail!("Invalid variable '{}'", key),
            }
        }
        Commands::Set {
            key,
            value,
            input,
            output,
            compact,
        } => {
            let text = match input.as_deref() {
                Some(path) => Some(read_document(Some(path))?),
                None => None,
            };
            let mut store = load_store(text)?;
            let Some(parsed) = console::parse_value(&value) else {
                anyhow::bail!("Could not determine type for value '{}'", value);
            };
            if !store.set(&key, parsed) {
                anyhow::bail!("Cannot set '{}': a parent is not an object", key);
            }
            write_document(output.as_deref(), &store.to_string(!compact))?;
        }
    }

    Ok(())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load_store(text: Option<String>) -> Result<CVarStore> {
    let mut store = CVarStore::new();
    if let Some(text) = text {
        store.load_str(&text).context("Invalid cvar document")?;
    }
    Ok(store)
}

/// Read a whole cvar document from `path`, or from stdin when no path is given.
fn read_document(path: Option<&str>) -> Result<String> {
    let Some(path) = path else {
        let mut text = String::new();
        io::stdin()
            .lock()
            .read_to_string(&mut text)
            .context("Cannot read cvar document from stdin")?;
        return Ok(text);
    };
    std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read cvar document '{}'", path))
}

/// Write a rendered document to `path`, or to stdout when no path is given.
fn write_document(path: Option<&str>, document: &str) -> Result<()> {
    match path {
        Some(path) => std::fs::write(path, document)
            .with_context(|| format!("Cannot write cvar document '{}'", path)),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(document.as_bytes())
                .and_then(|()| stdout.flush())
                .context("Cannot write cvar document to stdout")
        }
    }
}
