//! Stack-based parser: token stream → value tree.
//!
//! Every open object or list below the root is a [`Frame`] on an explicit
//! stack, so the nesting depth of the input is bounded by heap memory rather
//! than by the native call stack. Opening a container reserves its position in
//! the parent with a placeholder; the finished container replaces the
//! placeholder when its closing bracket is read.
//!
//! # Grammar
//!
//! - The root must be an object.
//! - Entries are separated by `,`; trailing commas are rejected.
//! - Object entries are `"key": value`; a repeated key overwrites the earlier
//!   value in place.
//! - `null` is stored as `Int(0)`.
//! - Nothing but whitespace may follow the root's closing `}`.

use crate::error::{CVarError, Result};
use crate::lexer::{Lexer, Token, TokenKind};
use crate::source::BufferedSource;
use crate::value::{List, Object, Value};
use std::io::{BufRead, Read};

/// Parse a document held in memory.
pub fn unserialize(input: &str) -> Result<Object> {
    unserialize_source(BufferedSource::new(input.as_bytes()))
}

/// Parse a document from any reader, buffered in [`crate::source::DEFAULT_BUFFER`] blocks.
pub fn unserialize_reader<R: Read>(reader: R) -> Result<Object> {
    unserialize_source(BufferedSource::from_reader(reader))
}

/// Parse a document from an already-buffered source.
pub fn unserialize_source<R: BufRead>(source: BufferedSource<R>) -> Result<Object> {
    Parser::new(Lexer::new(source)).parse()
}

/// A nested container under construction.
enum Container {
    Object(Object),
    List(List),
}

impl From<Container> for Value {
    fn from(c: Container) -> Self {
        match c {
            Container::Object(o) => Value::Object(o),
            Container::List(l) => Value::List(l),
        }
    }
}

/// An open container below the root. Its parent already holds a `Null`
/// placeholder at position `slot`, filled in when this frame closes.
struct Frame {
    container: Container,
    slot: usize,
    /// Set once the first entry has been read; later entries need a `,` first.
    continuation: bool,
}

/// The root object, always at the bottom of the stack.
#[derive(Default)]
struct RootFrame {
    entries: Object,
    continuation: bool,
}

/// Mutable view of whichever container is currently receiving entries.
enum Target<'a> {
    Object(&'a mut Object),
    List(&'a mut List),
}

impl Target<'_> {
    fn closing(&self) -> char {
        match self {
            Target::Object(_) => '}',
            Target::List(_) => ']',
        }
    }

    fn describe(&self) -> &'static str {
        match self {
            Target::Object(_) => "object",
            Target::List(_) => "list",
        }
    }

    /// Write a finished child container into the placeholder at `slot`.
    fn fill(self, slot: usize, value: Value) {
        let placeholder = match self {
            Target::Object(obj) => obj.get_index_mut(slot),
            Target::List(list) => list.get_mut(slot),
        };
        if let Some(placeholder) = placeholder {
            *placeholder = value;
        }
    }
}

/// The innermost open container and its continuation flag.
fn top<'a>(root: &'a mut RootFrame, stack: &'a mut [Frame]) -> (Target<'a>, &'a mut bool) {
    match stack.last_mut() {
        Some(Frame {
            container,
            continuation,
            ..
        }) => {
            let target = match container {
                Container::Object(obj) => Target::Object(obj),
                Container::List(list) => Target::List(list),
            };
            (target, continuation)
        }
        None => (Target::Object(&mut root.entries), &mut root.continuation),
    }
}

/// What an entry's value token turned into.
enum Parsed {
    Scalar(Value),
    Open(Container),
}

struct Parser<R> {
    lexer: Lexer<R>,
    root: RootFrame,
    stack: Vec<Frame>,
    max_depth: usize,
    values: usize,
}

impl<R: BufRead> Parser<R> {
    fn new(lexer: Lexer<R>) -> Self {
        Parser {
            lexer,
            root: RootFrame::default(),
            stack: Vec::new(),
            max_depth: 1,
            values: 0,
        }
    }

    fn parse(mut self) -> Result<Object> {
        let first = expect_token(&mut self.lexer, "expected a root object")?;
        if !first.kind.is_punct('{') {
            return Err(CVarError::syntax(first.line, "root must be an object"));
        }

        let root = loop {
            if let Some(root) = self.step()? {
                break root;
            }
        };

        if let Some(extra) = self.lexer.next_token()? {
            return Err(CVarError::syntax(
                extra.line,
                format!("unexpected {} after the root object", extra.kind),
            ));
        }

        tracing::debug!(
            entries = root.len(),
            values = self.values,
            max_depth = self.max_depth,
            "parsed document"
        );
        Ok(root)
    }

    /// Process one entry (or one closing bracket) of the innermost container.
    /// Returns the root object once its closing brace has been consumed.
    fn step(&mut self) -> Result<Option<Object>> {
        let (target, continuation) = top(&mut self.root, &mut self.stack);
        let what = target.describe();

        let token = expect_token(&mut self.lexer, &format!("unterminated {what}"))?;
        if token.kind.is_punct(target.closing()) {
            return Ok(self.close());
        }

        let token = if std::mem::replace(continuation, true) {
            if !token.kind.is_punct(',') {
                return Err(CVarError::syntax(
                    token.line,
                    format!("expected comma separator at line {}, found {}", token.line, token.kind),
                ));
            }
            expect_token(&mut self.lexer, &format!("expected an entry after ',' in {what}"))?
        } else {
            token
        };

        let slot = match target {
            Target::Object(obj) => {
                let key = match token.kind {
                    TokenKind::String(key) => key,
                    other => {
                        return Err(CVarError::syntax(
                            token.line,
                            format!("expected a key, found {other}"),
                        ));
                    }
                };
                let colon =
                    expect_token(&mut self.lexer, &format!("expected ':' after key \"{key}\""))?;
                if !colon.kind.is_punct(':') {
                    return Err(CVarError::syntax(
                        colon.line,
                        format!("expected colon separator after key \"{key}\", found {}", colon.kind),
                    ));
                }
                let value_token =
                    expect_token(&mut self.lexer, &format!("expected a value for key \"{key}\""))?;
                match parse_value(value_token)? {
                    Parsed::Scalar(value) => {
                        obj.insert(key, value);
                        None
                    }
                    Parsed::Open(child) => Some((obj.insert_full(key, Value::Null), child)),
                }
            }
            Target::List(list) => match parse_value(token)? {
                Parsed::Scalar(value) => {
                    list.push(value);
                    None
                }
                Parsed::Open(child) => {
                    list.push(Value::Null);
                    Some((list.len() - 1, child))
                }
            },
        };

        self.values += 1;
        if let Some((slot, container)) = slot {
            self.stack.push(Frame {
                container,
                slot,
                continuation: false,
            });
            self.max_depth = self.max_depth.max(self.stack.len() + 1);
        }
        Ok(None)
    }

    /// Close the innermost container. Returns the root when it is the one
    /// being closed.
    fn close(&mut self) -> Option<Object> {
        let Some(done) = self.stack.pop() else {
            return Some(std::mem::take(&mut self.root.entries));
        };
        let (parent, _) = top(&mut self.root, &mut self.stack);
        parent.fill(done.slot, done.container.into());
        None
    }
}

fn expect_token<R: BufRead>(lexer: &mut Lexer<R>, context: &str) -> Result<Token> {
    match lexer.next_token()? {
        Some(token) => Ok(token),
        None => Err(CVarError::eof(lexer.line(), context)),
    }
}

fn parse_value(token: Token) -> Result<Parsed> {
    let value = match token.kind {
        TokenKind::String(s) => Value::String(s),
        TokenKind::Int(i) => Value::Int(i),
        TokenKind::Float(f) => Value::Float(f),
        TokenKind::Bool(b) => Value::Bool(b),
        TokenKind::Null => Value::Int(0),
        TokenKind::Punct('{') => return Ok(Parsed::Open(Container::Object(Object::new()))),
        TokenKind::Punct('[') => return Ok(Parsed::Open(Container::List(List::new()))),
        other => {
            return Err(CVarError::syntax(
                token.line,
                format!("expected a value, found {other}"),
            ));
        }
    };
    Ok(Parsed::Scalar(value))
}
