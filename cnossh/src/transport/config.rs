//! SSH connection configuration.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Host key verification mode, analogous to OpenSSH's `StrictHostKeyChecking`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HostKeyVerification {
    /// Reject unknown and changed keys. Connection fails if the host
    /// is not already in known_hosts.
    Strict,

    /// Accept and auto-learn unknown keys, but reject changed keys.
    #[default]
    AcceptNew,

    /// Accept all keys without checking. For lab use only.
    Disabled,
}

impl FromStr for HostKeyVerification {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "strict" | "yes" => Ok(Self::Strict),
            "accept-new" => Ok(Self::AcceptNew),
            "disabled" | "no" => Ok(Self::Disabled),
            other => Err(format!(
                "unknown host key mode '{}' (expected strict, accept-new or disabled)",
                other
            )),
        }
    }
}

/// SSH connection configuration.
#[derive(Debug)]
pub struct SshConfig {
    /// Target host (hostname or IP address).
    pub host: String,

    /// SSH port (default: 22).
    pub port: u16,

    /// Username for authentication.
    pub username: String,

    /// Authentication method.
    pub auth: AuthMethod,

    /// Connection and authentication timeout.
    pub timeout: Duration,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,

    /// Host key verification mode.
    pub host_key_verification: HostKeyVerification,

    /// Path to known_hosts file (defaults to ~/.ssh/known_hosts).
    pub known_hosts_path: Option<PathBuf>,
}

impl SshConfig {
    /// Get the socket address for connection.
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Authentication method for SSH connections.
#[derive(Debug)]
pub enum AuthMethod {
    /// Password authentication.
    Password(SecretString),

    /// Private key authentication.
    PrivateKey {
        /// Path to the private key file.
        path: PathBuf,
        /// Optional passphrase for encrypted keys.
        passphrase: Option<SecretString>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_key_mode_parsing() {
        let parse = |s: &str| s.parse::<HostKeyVerification>();
        assert_eq!(parse("strict"), Ok(HostKeyVerification::Strict));
        assert_eq!(parse("Accept-New"), Ok(HostKeyVerification::AcceptNew));
        assert_eq!(parse("no"), Ok(HostKeyVerification::Disabled));
        assert!("maybe".parse::<HostKeyVerification>().is_err());
    }

    #[test]
    fn test_host_key_mode_serde() {
        let mode: HostKeyVerification = serde_json::from_str(r#""accept-new""#).unwrap();
        assert_eq!(mode, HostKeyVerification::AcceptNew);
    }
}
