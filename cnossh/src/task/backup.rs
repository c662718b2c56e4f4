//! Copy a configuration file to a remote server.

use std::fmt;
use std::str::FromStr;

use log::info;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use tokio::io::{AsyncRead, AsyncWrite};

use super::params::optional_secret;
use crate::channel::Prompt;
use crate::driver::{InteractiveBuilder, Session};
use crate::error::{Result, TaskError};

pub const TRANSFERRED: &str = "Config file transferred to server";

const STATUS_HEADING: &str = "\n Config Back Up status \n";
const PASSWORD_PROMPT: &str = "assword:";
const HOST_KEY_QUESTION: &str = "(yes/no)";

/// Which configuration to copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum ConfigType {
    RunningConfig,
    StartupConfig,
}

impl ConfigType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigType::RunningConfig => "running-config",
            ConfigType::StartupConfig => "startup-config",
        }
    }
}

impl FromStr for ConfigType {
    type Err = TaskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "running-config" => Ok(ConfigType::RunningConfig),
            "startup-config" => Ok(ConfigType::StartupConfig),
            _ => Err(TaskError::InvalidConfigType(s.to_string())),
        }
    }
}

impl TryFrom<String> for ConfigType {
    type Error = TaskError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for ConfigType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Transfer protocol understood by the switch's `copy` command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub enum Protocol {
    Sftp,
    Scp,
    Ftp,
    Tftp,
}

impl Protocol {
    pub fn as_str(&self) -> &'static str {
        match self {
            Protocol::Sftp => "sftp",
            Protocol::Scp => "scp",
            Protocol::Ftp => "ftp",
            Protocol::Tftp => "tftp",
        }
    }

    /// SFTP and SCP run over SSH and may ask to trust the server's key.
    pub fn is_secure(&self) -> bool {
        matches!(self, Protocol::Sftp | Protocol::Scp)
    }

    /// Whether the server needs a username and password.
    pub fn needs_credentials(&self) -> bool {
        !matches!(self, Protocol::Tftp)
    }
}

impl FromStr for Protocol {
    type Err = TaskError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "sftp" => Ok(Protocol::Sftp),
            "scp" => Ok(Protocol::Scp),
            "ftp" => Ok(Protocol::Ftp),
            "tftp" => Ok(Protocol::Tftp),
            _ => Err(TaskError::InvalidProtocol(s.to_string())),
        }
    }
}

impl TryFrom<String> for Protocol {
    type Error = TaskError;

    fn try_from(s: String) -> std::result::Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where and how to copy the configuration.
#[derive(Debug, Deserialize)]
pub struct BackupParams {
    #[serde(rename = "configType", alias = "config_type")]
    pub config_type: ConfigType,

    pub protocol: Protocol,

    #[serde(rename = "serverip", alias = "server_ip")]
    pub server_ip: String,

    #[serde(rename = "rcpath", alias = "remote_path")]
    pub remote_path: String,

    #[serde(rename = "serverusername", alias = "server_username", default)]
    pub server_username: Option<String>,

    #[serde(
        rename = "serverpassword",
        alias = "server_password",
        default,
        deserialize_with = "optional_secret"
    )]
    pub server_password: Option<SecretString>,
}

impl BackupParams {
    /// Check that the protocol has the credentials it needs.
    pub fn validate(&self) -> std::result::Result<(), TaskError> {
        if self.server_ip.trim().is_empty() {
            return Err(TaskError::MissingParameter("serverip"));
        }
        if self.remote_path.trim().is_empty() {
            return Err(TaskError::MissingParameter("rcpath"));
        }
        if self.protocol.needs_credentials() {
            if self.server_username.as_deref().is_none_or(str::is_empty) {
                return Err(TaskError::MissingParameter("serverusername"));
            }
            if self.server_password.is_none() {
                return Err(TaskError::MissingParameter("serverpassword"));
            }
        }
        Ok(())
    }

    /// The server URL, with the user for protocols that log in.
    pub fn url(&self) -> String {
        match (&self.server_username, self.protocol.needs_credentials()) {
            (Some(user), true) => format!(
                "{}://{}@{}/{}",
                self.protocol, user, self.server_ip, self.remote_path
            ),
            _ => format!("{}://{}/{}", self.protocol, self.server_ip, self.remote_path),
        }
    }

    /// The `copy` command as the switch expects it.
    pub fn copy_command(&self) -> String {
        format!(
            "copy {} {} {} vrf management",
            self.config_type,
            self.protocol,
            self.url()
        )
    }

    fn password(&self) -> &str {
        self.server_password
            .as_ref()
            .map(|p| p.expose_secret())
            .unwrap_or("")
    }
}

/// Issue the copy and answer the server's prompts.
pub async fn execute<S>(session: &mut Session<S>, params: &BackupParams) -> Result<&'static str>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    params.validate()?;

    session.note(STATUS_HEADING);
    let command = params.copy_command();
    let timeouts = *session.timeouts();
    info!(
        "Copying {} to {} over {}",
        params.config_type, params.server_ip, params.protocol
    );

    match params.protocol {
        Protocol::Tftp => {
            session
                .send_and_wait(&command, &Prompt::literal("#"), timeouts.plain_transfer)
                .await?;
        }
        Protocol::Ftp => {
            let events = InteractiveBuilder::new()
                .send(command)
                .with_timeout(timeouts.prompt)
                .expect(PASSWORD_PROMPT)
                .send_hidden(params.password())
                .with_timeout(timeouts.plain_transfer)
                .expect("#")
                .build();
            session.send_interactive(&events).await?;
        }
        Protocol::Sftp | Protocol::Scp => {
            let first = Prompt::any([HOST_KEY_QUESTION, PASSWORD_PROMPT]);
            let mut response = session
                .send_and_wait(&command, &first, timeouts.enable)
                .await?;

            if response.prompt.as_deref() == Some(HOST_KEY_QUESTION) {
                response = session
                    .send_and_wait("yes", &Prompt::literal(PASSWORD_PROMPT), timeouts.enable)
                    .await?;
            }

            // Never type the password into the CLI itself.
            if response.is_success() {
                session
                    .send_hidden_and_wait(
                        params.password(),
                        &Prompt::literal("#"),
                        timeouts.secure_transfer,
                    )
                    .await?;
            }
        }
    }

    Ok(TRANSFERRED)
}
