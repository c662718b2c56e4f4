//! Interactive device session.
//!
//! A session owns the shell stream and the transcript. Every exchange is the
//! same primitive: send one line, wait for a prompt substring or a timeout,
//! append whatever arrived to the transcript. Waits that time out are kept as
//! [`Stall`]s so the caller can fail the operation instead of silently
//! working with truncated output.

use std::fmt;
use std::time::{Duration, Instant};

use log::{debug, info, warn};
use secrecy::{ExposeSecret, SecretString};
use tokio::io::{AsyncRead, AsyncWrite};

use super::interactive::{InteractiveEvent, InteractiveResult, InteractiveStep};
use super::privilege::PrivilegeManager;
use super::response::Response;
use super::transcript::Transcript;
use crate::channel::{Prompt, PtyChannel};
use crate::config::Timeouts;
use crate::error::{DriverError, Result};
use crate::platform::PlatformDefinition;
use crate::transport::SshTransport;

const MASK: &str = "********";

/// A prompt wait that ran out of time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stall {
    /// The input sent before waiting (masked if hidden).
    pub input: String,

    /// The prompt that never arrived.
    pub prompt: String,

    /// How long the session waited.
    pub timeout: Duration,
}

impl fmt::Display for Stall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Timed out after {:?} waiting for {} (sent '{}')",
            self.timeout, self.prompt, self.input
        )
    }
}

/// An open shell on a device.
pub struct Session<S> {
    channel: PtyChannel<S>,
    platform: PlatformDefinition,
    privilege_manager: PrivilegeManager,
    timeouts: Timeouts,
    transcript: Transcript,
    stalls: Vec<Stall>,

    /// Keeps the SSH connection alive; `None` for sessions over other streams.
    transport: Option<SshTransport>,
}

impl<S> Session<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    /// Create a session over an already-open shell stream.
    pub fn new(stream: S, platform: PlatformDefinition, timeouts: Timeouts) -> Self {
        let privilege_manager = PrivilegeManager::new(platform.privilege_levels.clone());

        Self {
            channel: PtyChannel::new(stream),
            platform,
            privilege_manager,
            timeouts,
            transcript: Transcript::new(),
            stalls: Vec::new(),
            transport: None,
        }
    }

    pub(crate) fn with_transport(mut self, transport: SshTransport) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Timeouts in effect for this session.
    pub fn timeouts(&self) -> &Timeouts {
        &self.timeouts
    }

    /// Everything captured so far.
    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    /// Add local text (such as a section heading) to the transcript.
    pub fn note(&mut self, text: &str) {
        self.transcript.push_str(text);
    }

    /// Waits that timed out, in order.
    pub fn stalls(&self) -> &[Stall] {
        &self.stalls
    }

    /// Get the current privilege level name.
    pub fn current_privilege(&self) -> Option<&str> {
        self.privilege_manager.current().map(|l| l.name.as_str())
    }

    /// Send `input` followed by a newline and wait for `prompt`.
    pub async fn send_and_wait(
        &mut self,
        input: &str,
        prompt: &Prompt,
        timeout: Duration,
    ) -> Result<Response> {
        self.exchange(input, false, prompt, timeout).await
    }

    /// Like [`send_and_wait`](Self::send_and_wait) but never logs or records `input`.
    pub async fn send_hidden_and_wait(
        &mut self,
        input: &str,
        prompt: &Prompt,
        timeout: Duration,
    ) -> Result<Response> {
        self.exchange(input, true, prompt, timeout).await
    }

    /// Send a command and wait for the current level's prompt.
    pub async fn send_command(&mut self, command: &str) -> Result<Response> {
        let prompt = self.current_prompt();
        let timeout = self.timeouts.prompt;
        self.send_and_wait(command, &prompt, timeout).await
    }

    /// Run a scripted sequence of sends and waits.
    ///
    /// Stops after the first step whose prompt never arrives, so later inputs
    /// (often passwords) are not typed into an unexpected context.
    pub async fn send_interactive(
        &mut self,
        events: &[InteractiveEvent],
    ) -> Result<InteractiveResult> {
        let start = Instant::now();
        let mut steps = Vec::with_capacity(events.len());

        for event in events {
            let timeout = event.timeout.unwrap_or(self.timeouts.prompt);
            let response = self
                .exchange(&event.input, event.hidden, &event.prompt, timeout)
                .await?;

            let timed_out = !response.is_success();
            steps.push(InteractiveStep {
                timed_out,
                input: response.input,
                output: response.result,
                elapsed: response.elapsed,
            });
            if timed_out {
                break;
            }
        }

        Ok(InteractiveResult::new(steps, start.elapsed()))
    }

    /// Bring a fresh shell to the platform's working level.
    ///
    /// Consumes the login banner, wakes the CLI with an empty line, enters
    /// the default privilege (answering an enable password prompt if one is
    /// shown) and runs the platform's on-open commands.
    pub async fn initialize(&mut self, enable_password: Option<&SecretString>) -> Result<()> {
        let any_prompt = Prompt::any(
            self.platform
                .privilege_levels
                .values()
                .map(|level| level.prompt.clone()),
        );
        let timeout = self.timeouts.prompt;

        let banner = self.channel.read_until(&any_prompt, timeout).await?;
        self.transcript.push_str(&banner.as_str());

        let response = self.send_and_wait("", &any_prompt, timeout).await?;
        if !response.is_success() {
            return Err(DriverError::NoPrompt(timeout).into());
        }
        info!(
            "Session ready at '{}'",
            self.current_privilege().unwrap_or("unknown")
        );

        let target = self.platform.default_privilege.clone();
        self.acquire_privilege(&target, enable_password).await?;

        for command in self.platform.on_open_commands.clone() {
            self.send_command(&command).await?;
        }

        Ok(())
    }

    /// Navigate to the `target` privilege level.
    ///
    /// `auth` answers the password prompt of escalations that raise one; an
    /// empty line is sent when no password is configured.
    pub async fn acquire_privilege(
        &mut self,
        target: &str,
        auth: Option<&SecretString>,
    ) -> Result<()> {
        let current = self
            .privilege_manager
            .current()
            .map(|l| l.name.clone())
            .unwrap_or_default();

        if current == target {
            return Ok(());
        }

        let path = self.privilege_manager.find_path(&current, target)?;

        for pair in path.windows(2) {
            let (from, to) = (&pair[0], &pair[1]);

            let transition = self
                .privilege_manager
                .get_transition(from, to)
                .ok_or_else(|| DriverError::NoPrivilegePath {
                    from: from.clone(),
                    to: to.clone(),
                })?;
            let arrival = self
                .privilege_manager
                .get(to)
                .map(|level| level.prompt.clone())
                .ok_or_else(|| DriverError::PrivilegeAcquisitionFailed { target: to.clone() })?;

            debug!("Privilege {} -> {} via '{}'", from, to, transition.command);

            match transition.auth_prompt {
                Some(auth_prompt) => {
                    let timeout = self.timeouts.enable;
                    let expect = Prompt::any([arrival.clone(), auth_prompt.clone()]);
                    let response = self
                        .send_and_wait(&transition.command, &expect, timeout)
                        .await?;

                    if response.prompt.as_deref() == Some(auth_prompt.as_str()) {
                        let secret = auth.map(|p| p.expose_secret()).unwrap_or("");
                        self.send_hidden_and_wait(secret, &Prompt::literal(arrival), timeout)
                            .await?;
                    }
                }
                None => {
                    let timeout = self.timeouts.prompt;
                    self.send_and_wait(&transition.command, &Prompt::literal(arrival), timeout)
                        .await?;
                }
            }

            if self.current_privilege() != Some(to.as_str()) {
                return Err(DriverError::PrivilegeAcquisitionFailed { target: to.clone() }.into());
            }
        }

        Ok(())
    }

    /// Close the shell and, for SSH sessions, the connection.
    pub async fn close(&mut self) -> Result<()> {
        self.flush_pending();

        if let Err(e) = self.channel.shutdown().await {
            debug!("Shell shutdown: {}", e);
        }
        if let Some(transport) = self.transport.take() {
            transport.close().await?;
        }
        Ok(())
    }

    async fn exchange(
        &mut self,
        input: &str,
        hidden: bool,
        prompt: &Prompt,
        timeout: Duration,
    ) -> Result<Response> {
        let shown = if hidden { MASK } else { input };

        // Late output from the previous exchange goes in before this one.
        self.flush_pending();

        debug!("Sending '{}', waiting for {}", shown, prompt);
        let start = Instant::now();
        self.channel.send(&format!("{}\n", input)).await?;

        let read = match self.channel.read_until(prompt, timeout).await {
            Ok(read) => read,
            Err(e) => {
                self.flush_pending();
                return Err(e);
            }
        };
        let elapsed = start.elapsed();
        let text = read.as_str().into_owned();
        self.transcript.push_str(&text);

        match read.pattern_matched.and_then(|index| prompt.get(index)) {
            Some(matched) => {
                let response = Response::new(shown, text, matched, elapsed);
                self.track_privilege(response.last_line());
                Ok(response)
            }
            None => {
                warn!("Timed out after {:?} waiting for {} (sent '{}')", timeout, prompt, shown);
                self.stalls.push(Stall {
                    input: shown.to_string(),
                    prompt: prompt.to_string(),
                    timeout,
                });
                Ok(Response::timed_out(shown, text, elapsed))
            }
        }
    }

    fn current_prompt(&self) -> Prompt {
        match self.privilege_manager.current() {
            Some(level) => level.wait_prompt(),
            None => Prompt::any(
                self.platform
                    .privilege_levels
                    .values()
                    .map(|level| level.prompt.clone()),
            ),
        }
    }

    fn track_privilege(&mut self, prompt_line: &str) {
        let name = match self.privilege_manager.determine_from_prompt(prompt_line) {
            Ok(level) => level.name.clone(),
            Err(_) => return,
        };
        if self.current_privilege() != Some(name.as_str()) {
            debug!("Privilege now '{}'", name);
        }
        let _ = self.privilege_manager.set_current(&name);
    }

    fn flush_pending(&mut self) {
        let pending = self.channel.take_buffer();
        if !pending.is_empty() {
            self.transcript.push_str(&String::from_utf8_lossy(&pending));
        }
    }
}
