//! Stack-based serializer: value tree → text.
//!
//! The walk keeps one iterator per open container on an explicit stack,
//! mirroring the parser, so output depth is not limited by the native stack.
//!
//! Two layouts:
//!
//! - **Compact**: `{"key":value,...}` with no inserted whitespace.
//! - **Beautified**: one entry per line, one tab of indentation per nesting
//!   level, `"key": value`, no trailing commas, and a final newline after the
//!   root's closing brace. Empty containers stay inline as `{}` / `[]`.
//!
//! Strings are written without escaping. A string containing `"` (and no `'`)
//! is delimited with `'` instead so the lexer can read it back; a string
//! containing both quote characters cannot be represented.

use crate::error::Result;
use crate::value::{CVarString, List, Object, Value};
use std::fmt::{self, Write as _};
use std::io::{self, BufWriter, Write};

/// Render `root` as a document.
pub fn to_string(root: &Object, beautified: bool) -> String {
    Document { root, beautified }.to_string()
}

/// Write `root` as a document to `writer`. Output is streamed through a
/// [`BufWriter`]; the document is never held in memory as a whole.
pub fn serialize<W: Write>(writer: &mut W, root: &Object, beautified: bool) -> Result<()> {
    let mut sink = IoSink {
        inner: BufWriter::new(writer),
        bytes: 0,
        error: None,
    };
    if write!(sink, "{}", Document { root, beautified }).is_err() {
        let err = sink
            .error
            .take()
            .unwrap_or_else(|| io::Error::other("formatter error"));
        return Err(err.into());
    }
    sink.inner.flush()?;
    tracing::debug!(bytes = sink.bytes, beautified, "serialized document");
    Ok(())
}

struct Document<'a> {
    root: &'a Object,
    beautified: bool,
}

impl fmt::Display for Document<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_object(self.root, self.beautified, f)?;
        if self.beautified {
            f.write_char('\n')?;
        }
        Ok(())
    }
}

/// Bridges `fmt::Write` onto an `io::Write`, keeping the first I/O error.
struct IoSink<W: Write> {
    inner: BufWriter<W>,
    bytes: usize,
    error: Option<io::Error>,
}

impl<W: Write> fmt::Write for IoSink<W> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        match self.inner.write_all(s.as_bytes()) {
            Ok(()) => {
                self.bytes += s.len();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e);
                Err(fmt::Error)
            }
        }
    }
}

/// Append any value to `out`. Containers are rendered with the full walker;
/// scalars in their literal form.
pub(crate) fn write_value<O: fmt::Write>(
    value: &Value,
    beautified: bool,
    out: &mut O,
) -> fmt::Result {
    match value {
        Value::Object(obj) => write_object(obj, beautified, out),
        Value::List(list) => {
            out.write_char('[')?;
            walk(Level::list(list), beautified, out)
        }
        scalar => write_scalar(scalar, out),
    }
}

fn write_object<O: fmt::Write>(obj: &Object, beautified: bool, out: &mut O) -> fmt::Result {
    out.write_char('{')?;
    walk(Level::object(obj), beautified, out)
}

enum Cursor<'a> {
    Object(indexmap::map::Iter<'a, CVarString, Value>),
    List(std::slice::Iter<'a, Value>),
}

struct Level<'a> {
    cursor: Cursor<'a>,
    first: bool,
}

impl<'a> Level<'a> {
    fn object(obj: &'a Object) -> Self {
        Level {
            cursor: Cursor::Object(obj.iter()),
            first: true,
        }
    }

    fn list(list: &'a List) -> Self {
        Level {
            cursor: Cursor::List(list.iter()),
            first: true,
        }
    }

    fn closing(&self) -> char {
        match self.cursor {
            Cursor::Object(_) => '}',
            Cursor::List(_) => ']',
        }
    }

    fn next_entry(&mut self) -> Option<(Option<&'a CVarString>, &'a Value)> {
        match &mut self.cursor {
            Cursor::Object(it) => it.next().map(|(k, v)| (Some(k), v)),
            Cursor::List(it) => it.next().map(|v| (None, v)),
        }
    }
}

/// Emit the entries and closing bracket of a container whose opening bracket
/// has already been written.
fn walk<O: fmt::Write>(start: Level<'_>, beautified: bool, out: &mut O) -> fmt::Result {
    let mut stack = vec![start];

    loop {
        let depth = stack.len();
        let Some(level) = stack.last_mut() else {
            break;
        };

        let Some((key, value)) = level.next_entry() else {
            let had_entries = !level.first;
            let closing = level.closing();
            stack.pop();
            if beautified && had_entries {
                out.write_char('\n')?;
                indent(depth - 1, out)?;
            }
            out.write_char(closing)?;
            continue;
        };

        if !level.first {
            out.write_char(',')?;
        }
        level.first = false;

        if beautified {
            out.write_char('\n')?;
            indent(depth, out)?;
        }
        if let Some(key) = key {
            write_string(key.as_str(), out)?;
            out.write_str(if beautified { ": " } else { ":" })?;
        }

        match value {
            Value::Object(obj) => {
                out.write_char('{')?;
                stack.push(Level::object(obj));
            }
            Value::List(list) => {
                out.write_char('[')?;
                stack.push(Level::list(list));
            }
            scalar => write_scalar(scalar, out)?,
        }
    }
    Ok(())
}

fn write_scalar<O: fmt::Write>(value: &Value, out: &mut O) -> fmt::Result {
    match value {
        Value::Null => out.write_str("null"),
        Value::Int(i) => write!(out, "{i}"),
        Value::Float(f) => write_float(*f, out),
        Value::Bool(b) => out.write_str(if *b { "true" } else { "false" }),
        Value::String(s) => write_string(s.as_str(), out),
        Value::List(_) | Value::Object(_) => Ok(()),
    }
}

/// Floats always carry a `.` so they lex back as floats. `Display` for `f32`
/// never uses an exponent and is shortest-round-trip, so the value is exact.
fn write_float<O: fmt::Write>(f: f32, out: &mut O) -> fmt::Result {
    if !f.is_finite() {
        return out.write_str("null");
    }
    let text = f.to_string();
    out.write_str(&text)?;
    if !text.contains('.') {
        out.write_str(".0")?;
    }
    Ok(())
}

fn write_string<O: fmt::Write>(s: &str, out: &mut O) -> fmt::Result {
    let quote = if s.contains('"') && !s.contains('\'') {
        '\''
    } else {
        '"'
    };
    out.write_char(quote)?;
    out.write_str(s)?;
    out.write_char(quote)
}

fn indent<O: fmt::Write>(depth: usize, out: &mut O) -> fmt::Result {
    for _ in 0..depth {
        out.write_char('\t')?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float(f: f32) -> String {
        let mut out = String::new();
        write_float(f, &mut out).unwrap();
        out
    }

    #[test]
    fn floats_keep_a_decimal_point() {
        assert_eq!(float(1.0), "1.0");
        assert_eq!(float(-2.5), "-2.5");
        assert_eq!(float(0.1), "0.1");
        assert_eq!(float(f32::NAN), "null");
    }

    #[test]
    fn string_delimiter_avoids_embedded_double_quote() {
        let mut out = String::new();
        write_string(r#"say "hi""#, &mut out).unwrap();
        assert_eq!(out, r#"'say "hi"'"#);
    }
}
