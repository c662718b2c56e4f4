//! Driver that connects to a device of any registered platform.

use log::info;

use super::session::Session;
use crate::config::Timeouts;
use crate::error::Result;
use crate::platform::PlatformDefinition;
use crate::transport::config::SshConfig;
use crate::transport::{ShellStream, SshTransport};

/// Connection recipe for one device: SSH settings, platform and timeouts.
#[derive(Debug)]
pub struct GenericDriver {
    ssh_config: SshConfig,
    platform: PlatformDefinition,
    timeouts: Timeouts,
}

impl GenericDriver {
    /// Create a new generic driver.
    pub fn new(ssh_config: SshConfig, platform: PlatformDefinition, timeouts: Timeouts) -> Self {
        Self {
            ssh_config,
            platform,
            timeouts,
        }
    }

    /// Get a reference to the platform definition.
    pub fn platform(&self) -> &PlatformDefinition {
        &self.platform
    }

    /// Get the SSH configuration.
    pub fn ssh_config(&self) -> &SshConfig {
        &self.ssh_config
    }

    /// Connect, open an interactive shell and wrap it in a session.
    ///
    /// The session still has to be initialized before commands are sent.
    pub async fn open(self) -> Result<Session<ShellStream>> {
        let addr = self.ssh_config.socket_addr();
        let transport = SshTransport::connect(self.ssh_config).await?;
        let shell = transport.open_shell().await?;
        info!("Shell open on {} ({})", addr, self.platform.name);

        Ok(Session::new(shell, self.platform, self.timeouts).with_transport(transport))
    }
}
