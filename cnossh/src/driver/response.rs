//! Response type for a single send-and-wait exchange.

use std::time::Duration;

/// Response from one line sent to the device.
#[derive(Debug, Clone)]
pub struct Response {
    /// The input that was sent (masked if hidden).
    pub input: String,

    /// Everything received up to and including the prompt.
    pub result: String,

    /// The prompt literal that matched, `None` if the wait timed out.
    pub prompt: Option<String>,

    /// Time taken for the exchange.
    pub elapsed: Duration,
}

impl Response {
    /// Create a response for a wait that found its prompt.
    pub fn new(
        input: impl Into<String>,
        result: impl Into<String>,
        prompt: impl Into<String>,
        elapsed: Duration,
    ) -> Self {
        Self {
            input: input.into(),
            result: result.into(),
            prompt: Some(prompt.into()),
            elapsed,
        }
    }

    /// Create a response for a wait that hit its timeout.
    pub fn timed_out(input: impl Into<String>, result: impl Into<String>, elapsed: Duration) -> Self {
        Self {
            input: input.into(),
            result: result.into(),
            prompt: None,
            elapsed,
        }
    }

    /// Whether the expected prompt was seen.
    pub fn is_success(&self) -> bool {
        self.prompt.is_some()
    }

    /// The last line of the result, which holds the device prompt.
    pub fn last_line(&self) -> &str {
        self.result
            .rsplit(['\n', '\r'])
            .find(|line| !line.trim().is_empty())
            .map(str::trim)
            .unwrap_or("")
    }

    /// Get the result lines as an iterator.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.result.lines()
    }

    /// Check if the result contains a substring.
    pub fn contains(&self, pattern: &str) -> bool {
        self.result.contains(pattern)
    }
}

impl std::fmt::Display for Response {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.result)
    }
}
