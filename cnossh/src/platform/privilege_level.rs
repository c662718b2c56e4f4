//! Privilege level definition.

use regex::bytes::Regex;

use crate::channel::Prompt;

/// A CLI mode of the device.
///
/// Privilege levels form a graph where each level can have a parent
/// (previous_priv) and commands to escalate/de-escalate between levels.
#[derive(Debug, Clone)]
pub struct PrivilegeLevel {
    /// Name of this privilege level (e.g., "exec", "privileged", "configuration").
    pub name: String,

    /// Regex recognising this level from the last line of output.
    pub pattern: Regex,

    /// Literal substring that marks arrival at this level.
    pub prompt: String,

    /// Further literals accepted after commands issued at this level
    /// (sub-mode prompts such as `(config-if)#`).
    pub prompt_alternatives: Vec<String>,

    /// Name of the parent privilege level (None for root level).
    pub previous_priv: Option<String>,

    /// Command to escalate TO this level from the parent.
    pub escalate_command: Option<String>,

    /// Command to de-escalate FROM this level to the parent.
    pub deescalate_command: Option<String>,

    /// Literal password prompt the device may show while escalating.
    pub escalate_prompt: Option<String>,

    /// Strings that must NOT be in the prompt for this level to match.
    /// Used for disambiguation (e.g., "#" matches both privileged and config).
    pub not_contains: Vec<String>,
}

impl PrivilegeLevel {
    /// Create a new privilege level with minimal required fields.
    pub fn new(
        name: impl Into<String>,
        pattern: &str,
        prompt: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            pattern: Regex::new(pattern)?,
            prompt: prompt.into(),
            prompt_alternatives: vec![],
            previous_priv: None,
            escalate_command: None,
            deescalate_command: None,
            escalate_prompt: None,
            not_contains: vec![],
        })
    }

    /// Set the parent privilege level.
    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.previous_priv = Some(parent.into());
        self
    }

    /// Set the escalation command.
    pub fn with_escalate(mut self, command: impl Into<String>) -> Self {
        self.escalate_command = Some(command.into());
        self
    }

    /// Set the de-escalation command.
    pub fn with_deescalate(mut self, command: impl Into<String>) -> Self {
        self.deescalate_command = Some(command.into());
        self
    }

    /// Set the password prompt that escalation may raise.
    pub fn with_auth(mut self, prompt: impl Into<String>) -> Self {
        self.escalate_prompt = Some(prompt.into());
        self
    }

    /// Accept another literal after commands at this level.
    pub fn with_prompt_alternative(mut self, prompt: impl Into<String>) -> Self {
        self.prompt_alternatives.push(prompt.into());
        self
    }

    /// Add a not_contains pattern.
    pub fn with_not_contains(mut self, pattern: impl Into<String>) -> Self {
        self.not_contains.push(pattern.into());
        self
    }

    /// The prompt to wait for after a command issued at this level.
    pub fn wait_prompt(&self) -> Prompt {
        Prompt::any(std::iter::once(&self.prompt).chain(&self.prompt_alternatives).cloned())
    }

    /// Check if this privilege level matches a prompt.
    pub fn matches(&self, prompt: &str) -> bool {
        if self.not_contains.iter().any(|nc| prompt.contains(nc.as_str())) {
            return false;
        }

        self.pattern.is_match(prompt.as_bytes())
    }
}
