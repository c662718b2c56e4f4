//! PTY channel abstraction for interactive sessions.

use std::time::Duration;

use bytes::Bytes;
use log::{trace, warn};
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};
use tokio::time::Instant;

use super::buffer::PatternBuffer;
use super::patterns::PromptMatcher;
use crate::error::{ChannelError, Result};

const READ_CHUNK: usize = 8192;

/// High-level PTY channel over an interactive shell stream.
///
/// Any `AsyncRead + AsyncWrite` works: the SSH shell channel in production,
/// an in-memory duplex pipe in tests.
pub struct PtyChannel<S> {
    stream: S,
    buffer: PatternBuffer,
}

impl<S> PtyChannel<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a new PTY channel over `stream`.
    pub fn new(stream: S) -> Self {
        Self {
            stream,
            buffer: PatternBuffer::new(),
        }
    }

    /// Write raw text to the shell.
    pub async fn send(&mut self, text: &str) -> Result<()> {
        self.stream
            .write_all(text.as_bytes())
            .await
            .map_err(ChannelError::Io)?;
        self.stream.flush().await.map_err(ChannelError::Io)?;
        Ok(())
    }

    /// Read until `matcher` finds a prompt or `timeout` elapses.
    ///
    /// On a match, returns exactly the text up to and including the prompt;
    /// anything received after it is kept for the next read. On timeout,
    /// returns everything received so far with `pattern_matched == None`.
    pub async fn read_until<M>(&mut self, matcher: &M, timeout: Duration) -> Result<ReadResult>
    where
        M: PromptMatcher + ?Sized,
    {
        let deadline = Instant::now() + timeout;
        let mut chunk = vec![0u8; READ_CHUNK];

        loop {
            if let Some(m) = self.buffer.find(matcher) {
                return Ok(ReadResult {
                    data: self.buffer.split_through(m.end),
                    pattern_matched: Some(m.index),
                });
            }

            match tokio::time::timeout_at(deadline, self.stream.read(&mut chunk)).await {
                Err(_) => {
                    warn!("No prompt within {:?}, keeping {} bytes", timeout, self.buffer.len());
                    return Ok(ReadResult {
                        data: self.buffer.take(),
                        pattern_matched: None,
                    });
                }
                Ok(Ok(0)) => return Err(ChannelError::Closed.into()),
                Ok(Ok(n)) => {
                    trace!("Read {} bytes: {:?}", n, String::from_utf8_lossy(&chunk[..n]));
                    self.buffer.extend(&chunk[..n]);
                }
                Ok(Err(e)) => return Err(ChannelError::Io(e).into()),
            }
        }
    }

    /// Drain whatever is buffered without waiting.
    pub fn take_buffer(&mut self) -> Bytes {
        self.buffer.take()
    }

    /// Get a reference to the buffer.
    pub fn buffer(&self) -> &PatternBuffer {
        &self.buffer
    }

    /// Shut down the write side of the stream.
    pub async fn shutdown(&mut self) -> Result<()> {
        self.stream.shutdown().await.map_err(ChannelError::Io)?;
        Ok(())
    }
}

/// Result of a read operation.
#[derive(Debug)]
pub struct ReadResult {
    /// The data that was read.
    pub data: Bytes,

    /// Index of the prompt alternative that matched, `None` on timeout.
    pub pattern_matched: Option<usize>,
}

impl ReadResult {
    /// Get the data as a string (lossy UTF-8).
    pub fn as_str(&self) -> std::borrow::Cow<'_, str> {
        String::from_utf8_lossy(&self.data)
    }

    /// Whether the wait ended on its timeout.
    pub fn timed_out(&self) -> bool {
        self.pattern_matched.is_none()
    }
}
