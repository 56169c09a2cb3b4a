//! Line-oriented interactive console over a [`CVarStore`].
//!
//! - `name=value` sets a variable (type inferred from the value text)
//! - `name` prints the variable
//! - `:save FILE` writes the store, beautified
//! - `exit` / `quit` ends the session

use anyhow::{Context, Result};
use cvar_core::{CVarStore, Value};
use std::io::{BufRead, Write};

pub const PROMPT: &str = "cvar > ";

pub const BANNER: &str = "Welcome to the interactive cvar console!\n\
Type <variable> to see its value\n\
Type <variable>=<value> to set a value\n\
Type :save <file> to write the variables to disk\n";

enum Command<'a> {
    Exit,
    Save(&'a str),
    Set { name: &'a str, value: &'a str },
    Get(&'a str),
    Blank,
}

fn classify(line: &str) -> Command<'_> {
    let line = line.trim();
    if line.is_empty() {
        return Command::Blank;
    }
    if line == "exit" || line == "quit" {
        return Command::Exit;
    }
    if let Some(path) = line.strip_prefix(":save") {
        return Command::Save(path.trim());
    }
    match line.split_once('=') {
        Some((name, value)) => Command::Set {
            name: name.trim(),
            value: value.trim(),
        },
        None => Command::Get(line),
    }
}

/// Infer a scalar from console input: quoted text is a string, `true`/`false`
/// a bool, digits an integer, digits with a `.` a float.
pub fn parse_value(text: &str) -> Option<Value> {
    for quote in ['"', '\''] {
        if text.len() >= 2 && text.starts_with(quote) && text.ends_with(quote) {
            return Some(Value::from(&text[1..text.len() - 1]));
        }
    }
    match text {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }
    if let Ok(i) = text.parse::<i32>() {
        return Some(Value::Int(i));
    }
    if text.contains('.') {
        if let Ok(f) = text.parse::<f32>() {
            if f.is_finite() {
                return Some(Value::Float(f));
            }
        }
    }
    None
}

/// Run the console until `exit`/`quit` or end of input. The prompt and banner
/// are only written when `interactive` is set.
pub fn run<R: BufRead, W: Write>(
    store: &mut CVarStore,
    input: R,
    mut out: W,
    interactive: bool,
) -> Result<()> {
    if interactive {
        writeln!(out, "{BANNER}")?;
    }

    let mut lines = input.lines();
    loop {
        if interactive {
            write!(out, "{PROMPT}")?;
            out.flush()?;
        }
        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("Failed to read console input")?;

        match classify(&line) {
            Command::Exit => break,
            Command::Blank => {}
            Command::Save(path) if path.is_empty() => {
                writeln!(out, "Usage: :save <file>")?;
            }
            Command::Save(path) => match store.save_file(path, true) {
                Ok(()) => writeln!(out, "Saved to '{path}'")?,
                Err(e) => writeln!(out, "Could not save to '{path}': {e}")?,
            },
            Command::Set { name, value } => match parse_value(value) {
                Some(v) => {
                    if !store.set(name, v) {
                        writeln!(out, "Cannot set '{name}': a parent is not an object")?;
                    }
                }
                None => writeln!(out, "Could not determine type for value '{value}'")?,
            },
            Command::Get(name) => match store.get(name) {
                Some(value) => writeln!(out, "{value}")?,
                None => writeln!(out, "Invalid variable '{name}'")?,
            },
        }
    }

    tracing::debug!(entries = store.root().len(), "console session ended");
    Ok(())
}
