//! Task parameters, named the way the orchestration host passes them.
//!
//! A params document is one flat JSON object: connection fields, a `module`
//! tag and the fields of that module.
//!
//! ```json
//! {
//!   "module": "backup",
//!   "host": "10.241.107.39",
//!   "username": "admin",
//!   "password": "admin",
//!   "deviceType": "g8272_cnos",
//!   "outputfile": "./results/backup_10.241.107.39_output.txt",
//!   "configType": "running-config",
//!   "protocol": "sftp",
//!   "serverip": "10.241.106.118",
//!   "rcpath": "/root/cnos/G8272-running-config.txt",
//!   "serverusername": "root",
//!   "serverpassword": "root123"
//! }
//! ```

use std::path::{Path, PathBuf};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer};

use super::backup::BackupParams;
use super::command::CommandParams;
use crate::config::Timeouts;
use crate::error::{Result, TaskError};
use crate::transport::{AuthMethod, HostKeyVerification};

/// Where the switch is and how to log in.
#[derive(Debug, Deserialize)]
pub struct ConnectionParams {
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    pub username: String,

    /// Login password. May be omitted when `ssh_keyfile` is given.
    #[serde(default, deserialize_with = "optional_secret")]
    pub password: Option<SecretString>,

    /// Private key for the SSH login; preferred over the password.
    #[serde(alias = "sshKeyfile", default)]
    pub ssh_keyfile: Option<PathBuf>,

    #[serde(
        rename = "enablePassword",
        alias = "enable_password",
        default,
        deserialize_with = "optional_secret"
    )]
    pub enable_password: Option<SecretString>,

    #[serde(rename = "deviceType", alias = "device_type")]
    pub device_type: String,

    /// Transcript file; appended to, never truncated.
    #[serde(rename = "outputfile", alias = "output_file")]
    pub output_file: PathBuf,

    #[serde(default)]
    pub timeouts: Timeouts,

    #[serde(rename = "hostKeyVerification", alias = "host_key_verification", default)]
    pub host_key_verification: HostKeyVerification,

    #[serde(rename = "knownHosts", alias = "known_hosts", default)]
    pub known_hosts: Option<PathBuf>,
}

impl ConnectionParams {
    /// Take the SSH login method: the key file when given, else the password.
    pub fn take_auth(&mut self) -> Option<AuthMethod> {
        match (self.ssh_keyfile.take(), self.password.take()) {
            (Some(path), _) => Some(AuthMethod::PrivateKey {
                path,
                passphrase: None,
            }),
            (None, Some(password)) => Some(AuthMethod::Password(password)),
            (None, None) => None,
        }
    }
}

/// The operation to run, selected by the `module` field.
#[derive(Debug, Deserialize)]
#[serde(tag = "module", rename_all = "snake_case")]
pub enum TaskKind {
    Save,
    Backup(BackupParams),
    #[serde(rename = "multi_command", alias = "command")]
    Command(CommandParams),
}

impl TaskKind {
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Save => "save",
            TaskKind::Backup(_) => "backup",
            TaskKind::Command(_) => "multi_command",
        }
    }

    /// Reject parameter combinations before connecting.
    pub fn validate(&self) -> std::result::Result<(), TaskError> {
        match self {
            TaskKind::Backup(params) => params.validate(),
            TaskKind::Save | TaskKind::Command(_) => Ok(()),
        }
    }
}

/// A complete request: connection plus task.
#[derive(Debug, Deserialize)]
pub struct ModuleArgs {
    #[serde(flatten)]
    pub connection: ConnectionParams,

    #[serde(flatten)]
    pub task: TaskKind,
}

impl ModuleArgs {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json).map_err(TaskError::InvalidParams)?)
    }

    /// Load a params document from disk.
    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|source| TaskError::ParamsFile {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }
}

fn default_port() -> u16 {
    22
}

/// Absent, `null` and `""` all mean no password.
pub(crate) fn optional_secret<'de, D>(
    deserializer: D,
) -> std::result::Result<Option<SecretString>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.is_empty()).map(SecretString::from))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::backup::{ConfigType, Protocol};
    use secrecy::ExposeSecret;
    use std::time::Duration;

    const CONNECTION: &str = r#"
        "host": "10.241.107.39",
        "username": "admin",
        "password": "admin",
        "deviceType": "g8272_cnos",
        "outputfile": "./results/out.txt"
    "#;

    fn args(fields: &str) -> Result<ModuleArgs> {
        ModuleArgs::from_json(&format!("{{{}, {}}}", CONNECTION, fields))
    }

    #[test]
    fn test_save_params() {
        let args = args(r#""module": "save", "enablePassword": "anil""#).unwrap();
        assert!(matches!(args.task, TaskKind::Save));
        assert_eq!(args.connection.port, 22);
        assert_eq!(
            args.connection.password.as_ref().map(|p| p.expose_secret()),
            Some("admin")
        );
        assert_eq!(
            args.connection.enable_password.as_ref().map(|p| p.expose_secret()),
            Some("anil")
        );
        assert_eq!(args.connection.output_file, PathBuf::from("./results/out.txt"));
        assert_eq!(
            args.connection.host_key_verification,
            HostKeyVerification::AcceptNew
        );
    }

    #[test]
    fn test_backup_params() {
        let args = args(
            r#""module": "backup", "configType": "startup-config", "protocol": "TFTP",
               "serverip": "10.241.106.118", "rcpath": "/anil/G8272-startup-config.txt""#,
        )
        .unwrap();
        match args.task {
            TaskKind::Backup(params) => {
                assert_eq!(params.config_type, ConfigType::StartupConfig);
                assert_eq!(params.protocol, Protocol::Tftp);
                assert!(params.server_password.is_none());
            }
            other => panic!("unexpected task {:?}", other),
        }
    }

    #[test]
    fn test_multi_command_params() {
        let args = args(
            r#""module": "multi_command", "clicommand": "display users", "timeouts": {"prompt": 5}"#,
        )
        .unwrap();
        assert_eq!(args.task.name(), "multi_command");
        assert_eq!(args.connection.timeouts.prompt, Duration::from_secs(5));
        assert_eq!(args.connection.timeouts.enable, Duration::from_secs(3));
    }

    #[test]
    fn test_empty_enable_password_is_none() {
        let args = args(r#""module": "save", "enablePassword": """#).unwrap();
        assert!(args.connection.enable_password.is_none());
    }

    #[test]
    fn test_unknown_module_rejected() {
        assert!(args(r#""module": "reboot""#).is_err());
    }

    #[test]
    fn test_key_file_login() {
        let mut args = ModuleArgs::from_json(
            r#"{"module": "save", "host": "h", "username": "u", "ssh_keyfile": "/home/u/.ssh/id_ed25519",
                "deviceType": "NE2572", "outputfile": "o"}"#,
        )
        .unwrap();
        assert!(args.connection.password.is_none());
        match args.connection.take_auth() {
            Some(AuthMethod::PrivateKey { path, passphrase }) => {
                assert_eq!(path, PathBuf::from("/home/u/.ssh/id_ed25519"));
                assert!(passphrase.is_none());
            }
            other => panic!("unexpected auth {:?}", other),
        }
    }

    #[test]
    fn test_password_login() {
        let mut args = args(r#""module": "save""#).unwrap();
        match args.connection.take_auth() {
            Some(AuthMethod::Password(password)) => assert_eq!(password.expose_secret(), "admin"),
            other => panic!("unexpected auth {:?}", other),
        }
        assert!(args.connection.take_auth().is_none());
    }

    #[test]
    fn test_missing_login_parses_without_auth() {
        let mut args = ModuleArgs::from_json(
            r#"{"module": "save", "host": "h", "username": "u", "deviceType": "NE2572", "outputfile": "o"}"#,
        )
        .unwrap();
        assert!(args.connection.take_auth().is_none());
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("params.json");
        std::fs::write(&path, format!("{{{}, \"module\": \"save\"}}", CONNECTION)).unwrap();
        let args = ModuleArgs::from_file(&path).unwrap();
        assert_eq!(args.connection.host, "10.241.107.39");

        let missing = ModuleArgs::from_file(&dir.path().join("absent.json"));
        assert!(missing.is_err());
    }
}
