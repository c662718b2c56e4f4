//! Per-step timeouts.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// How long each kind of wait may take before the session gives up on it.
///
/// Serialized as whole seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Timeouts {
    /// TCP connect, handshake and authentication.
    #[serde(with = "secs")]
    pub connect: Duration,

    /// Ordinary CLI prompts.
    #[serde(with = "secs")]
    pub prompt: Duration,

    /// Entering enable mode, including the password exchange.
    #[serde(with = "secs")]
    pub enable: Duration,

    /// SFTP/SCP copies.
    #[serde(with = "secs")]
    pub secure_transfer: Duration,

    /// FTP/TFTP copies.
    #[serde(with = "secs")]
    pub plain_transfer: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            connect: Duration::from_secs(30),
            prompt: Duration::from_secs(2),
            enable: Duration::from_secs(3),
            secure_transfer: Duration::from_secs(90),
            plain_transfer: Duration::from_secs(450),
        }
    }
}

mod secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u64(value.as_secs())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_secs)
    }
}
