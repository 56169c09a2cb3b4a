//! Buffered byte source with an explicit lookahead stack.
//!
//! The lexer backtracks by handing consumed bytes back through [`BufferedSource::unget`];
//! they are replayed before anything else is read from the underlying reader.

use crate::error::Result;
use std::io::{BufRead, BufReader, Read};

/// Block size used when wrapping an unbuffered reader.
pub const DEFAULT_BUFFER: usize = 8192;

pub struct BufferedSource<R> {
    reader: R,
    /// Bytes handed back by the lexer; the next byte to read is at the end.
    pushback: Vec<u8>,
}

impl<R: Read> BufferedSource<BufReader<R>> {
    /// Wrap an unbuffered reader in a block buffer of [`DEFAULT_BUFFER`] bytes.
    pub fn from_reader(reader: R) -> Self {
        BufferedSource::new(BufReader::with_capacity(DEFAULT_BUFFER, reader))
    }
}

impl<R: BufRead> BufferedSource<R> {
    pub fn new(reader: R) -> Self {
        BufferedSource {
            reader,
            pushback: Vec::new(),
        }
    }

    /// Next byte without consuming it, or `None` at end of input.
    pub fn peek(&mut self) -> Result<Option<u8>> {
        if let Some(&b) = self.pushback.last() {
            return Ok(Some(b));
        }
        let buf = self.reader.fill_buf()?;
        Ok(buf.first().copied())
    }

    /// Consume and return the next byte, or `None` at end of input.
    pub fn get(&mut self) -> Result<Option<u8>> {
        if let Some(b) = self.pushback.pop() {
            return Ok(Some(b));
        }
        let next = self.reader.fill_buf()?.first().copied();
        if next.is_some() {
            self.reader.consume(1);
        }
        Ok(next)
    }

    /// True only when no further bytes are obtainable.
    pub fn eof(&mut self) -> Result<bool> {
        Ok(self.peek()?.is_none())
    }

    /// Return `consumed` to the source so it is read again in the same order.
    pub fn unget(&mut self, consumed: &[u8]) {
        self.pushback.extend(consumed.iter().rev());
    }
}
