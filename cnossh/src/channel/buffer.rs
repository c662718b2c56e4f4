//! Pattern buffer with incremental prompt search.
//!
//! Output is accumulated until a prompt is found; the text up to and including
//! the prompt is split off and anything the device sent after it stays
//! buffered for the next wait. Each search only re-scans the bytes that
//! arrived since the previous miss, plus enough overlap to catch a prompt
//! straddling two reads.
//!
//! Escape sequences are removed by a terminal parser that lives as long as the
//! buffer, so a sequence or a UTF-8 character split across two reads is still
//! handled as one unit.

use std::fmt;

use bytes::{BufMut, Bytes, BytesMut};
use vte::{Parser, Perform};

use super::patterns::{PromptMatch, PromptMatcher};

/// Buffer for accumulating output and searching it for prompts.
pub struct PatternBuffer {
    /// Output received since the last consumed prompt.
    buffer: BytesMut,

    /// Bytes at the front of `buffer` already searched without a match.
    scanned: usize,

    /// Terminal parser; keeps partial sequences between reads.
    parser: Parser,
}

/// Keeps printable text and line control, drops everything else.
struct TextSink<'a> {
    out: &'a mut BytesMut,
}

impl Perform for TextSink<'_> {
    fn print(&mut self, c: char) {
        let mut utf8 = [0u8; 4];
        self.out.extend_from_slice(c.encode_utf8(&mut utf8).as_bytes());
    }

    fn execute(&mut self, byte: u8) {
        if matches!(byte, b'\r' | b'\n' | b'\t') {
            self.out.put_u8(byte);
        }
    }
}

impl PatternBuffer {
    /// Create an empty pattern buffer.
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::with_capacity(4096),
            scanned: 0,
            parser: Parser::new(),
        }
    }

    /// Extend the buffer with raw device output, stripping escape sequences.
    pub fn extend(&mut self, data: &[u8]) {
        let mut sink = TextSink {
            out: &mut self.buffer,
        };
        self.parser.advance(&mut sink, data);
    }

    /// Find the earliest prompt match in the unconsumed output.
    ///
    /// Offsets in the returned match are relative to the start of the buffer.
    pub fn find<M: PromptMatcher + ?Sized>(&mut self, matcher: &M) -> Option<PromptMatch> {
        let overlap = matcher.max_len().saturating_sub(1);
        let start = self.scanned.saturating_sub(overlap);

        match matcher.find_match(&self.buffer[start..]) {
            Some(m) => Some(PromptMatch {
                index: m.index,
                start: m.start + start,
                end: m.end + start,
            }),
            None => {
                self.scanned = self.buffer.len();
                None
            }
        }
    }

    /// Remove and return everything up to (and including) byte `end`.
    pub fn split_through(&mut self, end: usize) -> Bytes {
        let end = end.min(self.buffer.len());
        self.scanned = 0;
        self.buffer.split_to(end).freeze()
    }

    /// Take ownership of the buffer contents and reset.
    pub fn take(&mut self) -> Bytes {
        self.scanned = 0;
        self.buffer.split().freeze()
    }

    /// Get a reference to the buffer contents.
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Get the current buffer length.
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }
}

impl Default for PatternBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for PatternBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PatternBuffer")
            .field("buffer", &String::from_utf8_lossy(&self.buffer))
            .field("scanned", &self.scanned)
            .finish_non_exhaustive()
    }
}
