//! Channel layer for prompt matching and PTY operations.
//!
//! This module handles the interactive shell: writing CLI lines, waiting for
//! prompt substrings and stripping ANSI escapes from what the device sends.

mod buffer;
mod patterns;
mod pty;

pub use buffer::PatternBuffer;
pub use patterns::{Prompt, PromptMatch, PromptMatcher};
pub use pty::{PtyChannel, ReadResult};
