//! Two-outcome result reported to the caller.

use serde::Serialize;

use crate::driver::{Stall, Transcript};
use crate::platform::TranscriptScanner;

/// What a task run reports: changed with a message, or failed with an error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskOutcome {
    pub changed: bool,

    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub failed: bool,

    pub msg: String,
}

impl TaskOutcome {
    /// The task ran and the device reported no problem.
    pub fn changed(msg: impl Into<String>) -> Self {
        Self {
            changed: true,
            failed: false,
            msg: msg.into(),
        }
    }

    /// The task failed; `msg` is the error text.
    pub fn failed(msg: impl Into<String>) -> Self {
        Self {
            changed: false,
            failed: true,
            msg: msg.into(),
        }
    }

    /// Judge a finished session.
    ///
    /// A device error phrase anywhere in the transcript wins over a stalled
    /// wait, which wins over success.
    pub fn judge(
        transcript: &Transcript,
        stalls: &[Stall],
        scanner: &TranscriptScanner,
        success: &str,
    ) -> Self {
        if let Some(error) = scanner.scan(transcript.as_str()) {
            return Self::failed(error.message());
        }
        match stalls.first() {
            Some(stall) => Self::failed(stall.to_string()),
            None => Self::changed(success),
        }
    }

    pub fn is_success(&self) -> bool {
        !self.failed
    }
}
