//! Builder for creating device drivers.

use std::path::PathBuf;

use secrecy::SecretString;

use super::generic::GenericDriver;
use crate::config::Timeouts;
use crate::error::{DriverError, PlatformError, Result};
use crate::platform::{PlatformDefinition, PlatformRegistry};
use crate::transport::config::{AuthMethod, HostKeyVerification, SshConfig};

/// Builder for constructing device drivers.
///
/// # Example
///
/// ```rust,no_run
/// use cnossh::driver::DriverBuilder;
///
/// # async fn example() -> Result<(), cnossh::Error> {
/// let driver = DriverBuilder::new("10.241.107.39")
///     .username("admin")
///     .password("secret")
///     .device_type("g8272_cnos")
///     .build()?;
/// let mut session = driver.open().await?;
/// session.initialize(None).await?;
/// # Ok(())
/// # }
/// ```
pub struct DriverBuilder {
    host: String,
    port: u16,
    username: Option<String>,
    auth: Option<AuthMethod>,
    device_type: Option<String>,
    custom_platform: Option<PlatformDefinition>,
    timeouts: Timeouts,
    host_key_verification: HostKeyVerification,
    known_hosts_path: Option<PathBuf>,
    terminal_size: Option<(u32, u32)>,
}

impl DriverBuilder {
    /// Create a new driver builder for the specified host.
    pub fn new(host: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port: 22,
            username: None,
            auth: None,
            device_type: None,
            custom_platform: None,
            timeouts: Timeouts::default(),
            host_key_verification: HostKeyVerification::default(),
            known_hosts_path: None,
            terminal_size: None,
        }
    }

    /// Set the SSH port (default: 22).
    pub fn port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Set the username for authentication.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Set password authentication.
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.auth = Some(AuthMethod::Password(SecretString::from(password.into())));
        self
    }

    /// Set private key authentication.
    pub fn private_key(mut self, key_path: impl Into<PathBuf>) -> Self {
        self.auth = Some(AuthMethod::PrivateKey {
            path: key_path.into(),
            passphrase: None,
        });
        self
    }

    /// Set the authentication method directly.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Set the inventory device type (e.g., "g8272_cnos").
    pub fn device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    /// Use a platform definition instead of resolving the device type.
    pub fn custom_platform(mut self, platform: PlatformDefinition) -> Self {
        self.custom_platform = Some(platform);
        self
    }

    /// Set the per-step timeouts.
    pub fn timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Set host key verification mode.
    pub fn host_key_verification(mut self, mode: HostKeyVerification) -> Self {
        self.host_key_verification = mode;
        self
    }

    /// Use a specific known_hosts file.
    pub fn known_hosts_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.known_hosts_path = Some(path.into());
        self
    }

    /// Override the platform's terminal dimensions.
    pub fn terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_size = Some((width, height));
        self
    }

    /// Build the driver.
    ///
    /// This resolves the platform but does not connect. Call `open()` on the
    /// returned driver to establish the connection.
    pub fn build(self) -> Result<GenericDriver> {
        if self.host.is_empty() {
            return Err(DriverError::InvalidConfig {
                message: "Host is required".to_string(),
            }
            .into());
        }

        let username = self.username.ok_or_else(|| DriverError::InvalidConfig {
            message: "Username is required".to_string(),
        })?;

        let auth = self.auth.ok_or_else(|| DriverError::InvalidConfig {
            message: "A password or private key is required".to_string(),
        })?;

        let platform = if let Some(custom) = self.custom_platform {
            custom
        } else if let Some(device_type) = self.device_type {
            PlatformRegistry::global()
                .read()
                .map_err(|_| PlatformError::InvalidDefinition {
                    message: "Failed to acquire registry lock".to_string(),
                })?
                .resolve(&device_type)?
                .clone()
        } else {
            return Err(DriverError::InvalidConfig {
                message: "Device type must be specified".to_string(),
            }
            .into());
        };

        let (terminal_width, terminal_height) = self
            .terminal_size
            .unwrap_or((platform.terminal_width, platform.terminal_height));

        let ssh_config = SshConfig {
            host: self.host,
            port: self.port,
            username,
            auth,
            timeout: self.timeouts.connect,
            terminal_width,
            terminal_height,
            host_key_verification: self.host_key_verification,
            known_hosts_path: self.known_hosts_path,
        };

        Ok(GenericDriver::new(ssh_config, platform, self.timeouts))
    }
}
