//! Tokenizer for the cvar JSON dialect.
//!
//! At every position the lexer tries, in this order: quoted string, integer,
//! float, `true`/`false`, `null`, single-character punctuation, whitespace.
//! Attempts that do not match hand every consumed byte back to the source, so
//! the next attempt starts from the original position.
//!
//! # Dialect notes
//!
//! - Strings open with `"` or `'` and close with the same character. There
//!   are no escape sequences; backslashes are kept literally.
//! - An integer attempt consumes digits and `-`. If the run is followed by
//!   `.` the attempt is abandoned and the float attempt rereads it.
//! - A float attempt consumes digits, `.`, `e` and `-`. A `+` after the
//!   exponent marker is not accepted, and `1e5` (no `.`) lexes as the integer
//!   `1` followed by an unreadable `e5`.

use crate::error::{CVarError, Result};
use crate::source::BufferedSource;
use crate::value::CVarString;
use std::fmt;
use std::io::BufRead;

const PUNCTUATION: [u8; 8] = [b'{', b'}', b'[', b']', b',', b':', b'"', b'\''];
const WHITESPACE: [u8; 4] = [b' ', b'\t', b'\r', b'\n'];

/// A classified lexical unit.
#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Punct(char),
    String(CVarString),
    Float(f32),
    Int(i32),
    Bool(bool),
    Null,
}

impl TokenKind {
    pub fn is_punct(&self, c: char) -> bool {
        matches!(self, TokenKind::Punct(p) if *p == c)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Punct(c) => write!(f, "'{c}'"),
            TokenKind::String(s) => write!(f, "string \"{s}\""),
            TokenKind::Float(v) => write!(f, "float {v}"),
            TokenKind::Int(v) => write!(f, "integer {v}"),
            TokenKind::Bool(v) => write!(f, "boolean {v}"),
            TokenKind::Null => f.write_str("null"),
        }
    }
}

/// A token and the line on which it began.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

pub struct Lexer<R> {
    source: BufferedSource<R>,
    line: u32,
}

impl<R: BufRead> Lexer<R> {
    pub fn new(source: BufferedSource<R>) -> Self {
        Lexer { source, line: 1 }
    }

    /// Current 1-based line, used for end-of-input diagnostics.
    pub fn line(&self) -> u32 {
        self.line
    }

    /// Produce the next token, or `None` once the input is exhausted.
    pub fn next_token(&mut self) -> Result<Option<Token>> {
        loop {
            let Some(c) = self.source.peek()? else {
                return Ok(None);
            };
            let line = self.line;

            let kind = if let Some(s) = self.lex_string()? {
                Some(TokenKind::String(s))
            } else if let Some(i) = self.lex_int()? {
                Some(TokenKind::Int(i))
            } else if let Some(f) = self.lex_float()? {
                Some(TokenKind::Float(f))
            } else if let Some(b) = self.lex_bool()? {
                Some(TokenKind::Bool(b))
            } else if self.match_literal(b"null")? {
                Some(TokenKind::Null)
            } else {
                None
            };

            if let Some(kind) = kind {
                tracing::trace!(line, token = %kind, "lexed token");
                return Ok(Some(Token { kind, line }));
            }

            if PUNCTUATION.contains(&c) {
                self.source.get()?;
                return Ok(Some(Token {
                    kind: TokenKind::Punct(char::from(c)),
                    line,
                }));
            }

            if WHITESPACE.contains(&c) {
                if c == b'\n' {
                    self.line += 1;
                }
                self.source.get()?;
                continue;
            }

            return Err(CVarError::syntax(line, unexpected_byte(c)));
        }
    }

    fn lex_string(&mut self) -> Result<Option<CVarString>> {
        let quote = match self.source.peek()? {
            Some(q @ (b'"' | b'\'')) => q,
            _ => return Ok(None),
        };
        let start_line = self.line;
        self.source.get()?;

        let mut bytes = Vec::new();
        loop {
            match self.source.get()? {
                Some(b) if b == quote => break,
                Some(b) => {
                    if b == b'\n' {
                        self.line += 1;
                    }
                    bytes.push(b);
                }
                None => {
                    return Err(CVarError::eof(
                        self.line,
                        format!("unterminated string starting at line {start_line}"),
                    ));
                }
            }
        }

        let text = String::from_utf8(bytes).map_err(|_| {
            CVarError::syntax(start_line, "string literal is not valid UTF-8")
        })?;
        Ok(Some(CVarString::new(text)))
    }

    fn lex_int(&mut self) -> Result<Option<i32>> {
        let run = self.take_while(|b| b.is_ascii_digit() || b == b'-')?;
        if self.source.peek()? == Some(b'.') {
            self.source.unget(&run);
            return Ok(None);
        }
        if run.is_empty() {
            return Ok(None);
        }
        let text = ascii(&run);
        text.parse::<i32>()
            .map(Some)
            .map_err(|_| CVarError::syntax(self.line, format!("malformed integer literal '{text}'")))
    }

    fn lex_float(&mut self) -> Result<Option<f32>> {
        let run = self.take_while(|b| b.is_ascii_digit() || matches!(b, b'.' | b'e' | b'-'))?;
        if run.is_empty() {
            return Ok(None);
        }
        let text = ascii(&run);
        match text.parse::<f32>() {
            Ok(f) if f.is_finite() => Ok(Some(f)),
            Ok(_) => Err(CVarError::syntax(
                self.line,
                format!("float literal '{text}' is out of range"),
            )),
            Err(_) => Err(CVarError::syntax(
                self.line,
                format!("malformed float literal '{text}'"),
            )),
        }
    }

    fn lex_bool(&mut self) -> Result<Option<bool>> {
        if self.match_literal(b"true")? {
            return Ok(Some(true));
        }
        if self.match_literal(b"false")? {
            return Ok(Some(false));
        }
        Ok(None)
    }

    /// Read `literal.len()` bytes and compare. On mismatch everything read is
    /// handed back to the source.
    fn match_literal(&mut self, literal: &[u8]) -> Result<bool> {
        let mut read = Vec::with_capacity(literal.len());
        while read.len() < literal.len() {
            match self.source.get()? {
                Some(b) => read.push(b),
                None => break,
            }
        }
        if read == literal {
            return Ok(true);
        }
        self.source.unget(&read);
        Ok(false)
    }

    fn take_while(&mut self, accept: impl Fn(u8) -> bool) -> Result<Vec<u8>> {
        let mut run = Vec::new();
        while let Some(b) = self.source.peek()? {
            if !accept(b) {
                break;
            }
            self.source.get()?;
            run.push(b);
        }
        Ok(run)
    }
}

/// Numeric runs only ever hold ASCII bytes.
fn ascii(run: &[u8]) -> String {
    run.iter().map(|&b| char::from(b)).collect()
}

fn unexpected_byte(b: u8) -> String {
    if b.is_ascii_graphic() {
        format!("unexpected character '{}'", char::from(b))
    } else {
        format!("unexpected byte 0x{b:02X}")
    }
}
