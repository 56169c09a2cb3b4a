//! Error types for parsing, serializing and loading cvar documents.

use thiserror::Error;

/// Errors that can occur while reading or writing a cvar document.
#[derive(Error, Debug)]
pub enum CVarError {
    /// The input violated the grammar: unexpected token, missing separator,
    /// non-object root, malformed number or unrecognized character.
    /// Includes the 1-based line number where the error was detected.
    #[error("syntax error at line {line}: {message}")]
    Syntax { line: u32, message: String },

    /// The token stream ran out while an object or list was still open.
    #[error("unexpected end of input at line {line}: {message}")]
    UnexpectedEof { line: u32, message: String },

    /// Reading the input or writing the output failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CVarError {
    pub(crate) fn syntax(line: u32, message: impl Into<String>) -> Self {
        CVarError::Syntax {
            line,
            message: message.into(),
        }
    }

    pub(crate) fn eof(line: u32, message: impl Into<String>) -> Self {
        CVarError::UnexpectedEof {
            line,
            message: message.into(),
        }
    }

    /// Source line of a syntax or end-of-input error. `None` for I/O errors.
    pub fn line(&self) -> Option<u32> {
        match self {
            CVarError::Syntax { line, .. } | CVarError::UnexpectedEof { line, .. } => Some(*line),
            CVarError::Io(_) => None,
        }
    }
}

/// Convenience alias used throughout cvar-core.
pub type Result<T> = std::result::Result<T, CVarError>;
