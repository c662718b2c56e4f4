//! Scripted send/expect sequences.
//!
//! Transfers on CNOS are conversations: `copy running-config ftp://...` asks
//! for the server password before it starts, and the result only shows once
//! the privileged prompt returns. Each event sends one line and waits for one
//! prompt.

use std::time::Duration;

use crate::channel::Prompt;

/// An event in an interactive command sequence.
///
/// # Example
///
/// ```rust
/// use cnossh::driver::InteractiveEvent;
///
/// let events = vec![
///     InteractiveEvent::new("copy running-config ftp://admin@10.0.0.5/sw.cfg vrf management", "Password:"),
///     InteractiveEvent::hidden("secret", "#"),
/// ];
/// assert!(events[1].hidden);
/// ```
#[derive(Debug, Clone)]
pub struct InteractiveEvent {
    /// The input to send (command or response).
    pub input: String,

    /// Prompt to wait for after sending input.
    pub prompt: Prompt,

    /// Whether this input should be hidden in logs (e.g., passwords).
    pub hidden: bool,

    /// Optional timeout override for this specific event.
    pub timeout: Option<Duration>,
}

impl InteractiveEvent {
    /// Create a new interactive event.
    pub fn new(input: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self {
            input: input.into(),
            prompt: prompt.into(),
            hidden: false,
            timeout: None,
        }
    }

    /// Create an event for hidden input (like passwords).
    pub fn hidden(input: impl Into<String>, prompt: impl Into<Prompt>) -> Self {
        Self {
            hidden: true,
            ..Self::new(input, prompt)
        }
    }

    /// Set a custom timeout for this event.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}

/// Result of an interactive command sequence.
#[derive(Debug, Clone)]
pub struct InteractiveResult {
    /// Results from each step in the sequence.
    pub steps: Vec<InteractiveStep>,

    /// Total time for the entire sequence.
    pub elapsed: Duration,

    /// Whether any step timed out.
    pub timed_out: bool,
}

impl InteractiveResult {
    /// Create a new interactive result.
    pub fn new(steps: Vec<InteractiveStep>, elapsed: Duration) -> Self {
        let timed_out = steps.iter().any(|s| s.timed_out);
        Self {
            steps,
            elapsed,
            timed_out,
        }
    }

    /// Get the final output (from the last step).
    pub fn final_output(&self) -> Option<&str> {
        self.steps.last().map(|s| s.output.as_str())
    }

    /// Get all outputs concatenated.
    pub fn full_output(&self) -> String {
        self.steps.iter().map(|s| s.output.as_str()).collect()
    }
}

/// Result of a single step in an interactive sequence.
#[derive(Debug, Clone)]
pub struct InteractiveStep {
    /// The input that was sent (masked if hidden).
    pub input: String,

    /// The output received after sending input.
    pub output: String,

    /// Time taken for this step.
    pub elapsed: Duration,

    /// Whether the step's prompt never arrived.
    pub timed_out: bool,
}

/// Builder for creating interactive command sequences.
///
/// # Example
///
/// ```rust
/// use cnossh::driver::InteractiveBuilder;
/// use std::time::Duration;
///
/// let events = InteractiveBuilder::new()
///     .send("copy startup-config tftp://10.0.0.5/sw.cfg vrf management")
///     .expect("#")
///     .with_timeout(Duration::from_secs(450))
///     .build();
/// assert_eq!(events.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct InteractiveBuilder {
    events: Vec<InteractiveEvent>,
    default_timeout: Option<Duration>,
}

impl InteractiveBuilder {
    /// Create a new interactive builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an input to send.
    ///
    /// Must be followed by `expect()` to specify what to wait for.
    pub fn send(self, input: impl Into<String>) -> InteractiveBuilderWithInput {
        InteractiveBuilderWithInput {
            builder: self,
            input: input.into(),
            hidden: false,
            timeout: None,
        }
    }

    /// Add a hidden input (like a password).
    pub fn send_hidden(self, input: impl Into<String>) -> InteractiveBuilderWithInput {
        InteractiveBuilderWithInput {
            builder: self,
            input: input.into(),
            hidden: true,
            timeout: None,
        }
    }

    /// Set the default timeout for events without their own.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.default_timeout = Some(timeout);
        for event in &mut self.events {
            event.timeout.get_or_insert(timeout);
        }
        self
    }

    /// Build the list of interactive events.
    pub fn build(self) -> Vec<InteractiveEvent> {
        self.events
    }
}

/// Intermediate state for the builder after `send()` is called.
#[derive(Debug)]
pub struct InteractiveBuilderWithInput {
    builder: InteractiveBuilder,
    input: String,
    hidden: bool,
    timeout: Option<Duration>,
}

impl InteractiveBuilderWithInput {
    /// Specify the prompt to wait for after sending the input.
    pub fn expect(mut self, prompt: impl Into<Prompt>) -> InteractiveBuilder {
        let mut event = InteractiveEvent::new(self.input, prompt);
        event.hidden = self.hidden;
        event.timeout = self.timeout.or(self.builder.default_timeout);

        self.builder.events.push(event);
        self.builder
    }

    /// Set a custom timeout for this specific event.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }
}
