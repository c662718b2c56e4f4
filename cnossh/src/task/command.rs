//! Run CLI commands in configuration mode.

use log::info;
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::channel::Prompt;
use crate::driver::Session;
use crate::error::{Result, TaskError};

pub const EXECUTED: &str = "CLI command executed and results saved in file";

const CONFIGURATION: &str = "configuration";

/// Commands to run, in order.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawCommandParams")]
pub struct CommandParams {
    commands: Vec<String>,
}

impl CommandParams {
    /// At least one non-blank command is required.
    pub fn new<I, T>(commands: I) -> std::result::Result<Self, TaskError>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        let commands: Vec<String> = commands
            .into_iter()
            .map(Into::into)
            .filter(|c| !c.trim().is_empty())
            .collect();

        if commands.is_empty() {
            return Err(TaskError::MissingParameter("clicommand"));
        }
        Ok(Self { commands })
    }

    pub fn commands(&self) -> &[String] {
        &self.commands
    }
}

/// `clicommand` plus the optional `clicommand2`, or a `commands` list.
#[derive(Deserialize)]
struct RawCommandParams {
    #[serde(default)]
    clicommand: Option<String>,
    #[serde(default)]
    clicommand2: Option<String>,
    #[serde(default)]
    commands: Vec<String>,
}

impl TryFrom<RawCommandParams> for CommandParams {
    type Error = TaskError;

    fn try_from(raw: RawCommandParams) -> std::result::Result<Self, Self::Error> {
        let mut commands = Vec::new();
        commands.extend(raw.clicommand);
        commands.extend(raw.clicommand2);
        commands.extend(raw.commands);
        Self::new(commands)
    }
}

/// Disable confirmations, enter configuration mode and run each command.
pub async fn execute<S>(session: &mut Session<S>, params: &CommandParams) -> Result<&'static str>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    let timeout = session.timeouts().prompt;
    session
        .send_and_wait("terminal dont-ask", &Prompt::literal("#"), timeout)
        .await?;

    session.acquire_privilege(CONFIGURATION, None).await?;

    for command in params.commands() {
        info!("Running '{}'", command);
        session.send_command(command).await?;
    }

    Ok(EXECUTED)
}
