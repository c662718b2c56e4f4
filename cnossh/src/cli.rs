//! Command-line interface.
//!
//! Each subcommand builds the same [`ModuleArgs`] a params file would, so
//! the binary and `run <params.json>` share one code path.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use secrecy::SecretString;

use crate::config::Timeouts;
use crate::error::Result;
use crate::task::{BackupParams, CommandParams, ConfigType, ConnectionParams, ModuleArgs, Protocol, TaskKind};
use crate::transport::HostKeyVerification;

/// Save, back up and configure Lenovo CNOS switches over SSH
#[derive(Parser)]
#[command(name = "cnossh")]
#[command(version)]
#[command(after_help = "EXAMPLES:
    # Save the running config
    CNOS_PASSWORD=admin cnossh save --host 10.241.107.39 -u admin \\
        --device-type g8272_cnos -o ./results/save.txt

    # Log in with a key instead of a password
    cnossh save --host 10.241.107.39 -u admin --ssh-keyfile ~/.ssh/id_ed25519 \\
        --device-type NE1032 -o ./results/save.txt

    # Back up the startup config over TFTP
    cnossh backup --host 10.241.107.39 -u admin --device-type NE2572 -o out.txt \\
        --config-type startup-config --protocol tftp --server-ip 10.241.106.118 \\
        --rc-path /anil/G8272-startup-config.txt

    # Run configuration commands
    cnossh command --host 10.241.107.39 -u admin --device-type NE1032 -o out.txt \\
        -c 'interface ethernet 1/1' -c 'description uplink'

    # Run a task from a params file
    cnossh run params.json")]
pub struct Cli {
    /// Log filter, e.g. `debug` or `cnossh=trace` (overrides RUST_LOG)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Save the running config to the startup config
    Save {
        #[command(flatten)]
        connection: ConnectionArgs,
    },

    /// Copy the running or startup config to a server
    Backup {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// running-config or startup-config
        #[arg(long)]
        config_type: ConfigType,

        /// sftp, scp, ftp or tftp
        #[arg(long)]
        protocol: Protocol,

        /// Server address
        #[arg(long)]
        server_ip: String,

        /// Path of the file on the server
        #[arg(long)]
        rc_path: String,

        /// Server login (not used for tftp)
        #[arg(long)]
        server_username: Option<String>,

        /// Server password (not used for tftp)
        #[arg(long, env = "CNOS_SERVER_PASSWORD", hide_env_values = true)]
        server_password: Option<String>,
    },

    /// Run CLI commands in configuration mode
    Command {
        #[command(flatten)]
        connection: ConnectionArgs,

        /// Command to run; repeat for several, run in order
        #[arg(short = 'c', long = "command", visible_alias = "clicommand", required = true)]
        commands: Vec<String>,
    },

    /// Run a task described by a JSON params file
    Run {
        /// Params file
        params: PathBuf,
    },
}

/// Connection options shared by all device subcommands
#[derive(Args)]
pub struct ConnectionArgs {
    /// Switch address
    #[arg(long)]
    pub host: String,

    /// SSH port
    #[arg(long, default_value = "22")]
    pub port: u16,

    /// SSH username
    #[arg(short, long, env = "CNOS_USERNAME")]
    pub username: String,

    /// SSH password
    #[arg(long, env = "CNOS_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Private key for the SSH login, used instead of the password
    #[arg(long, env = "CNOS_SSH_KEYFILE")]
    pub ssh_keyfile: Option<PathBuf>,

    /// Password for `enable`, if the switch asks for one
    #[arg(long, env = "CNOS_ENABLE_PASSWORD", hide_env_values = true)]
    pub enable_password: Option<String>,

    /// Inventory device type, e.g. g8272_cnos or NE2572
    #[arg(long)]
    pub device_type: String,

    /// File the session transcript is appended to
    #[arg(short, long)]
    pub output_file: PathBuf,

    /// Host key checking: strict, accept-new or disabled
    #[arg(long, default_value = "accept-new")]
    pub host_key: HostKeyVerification,

    /// known_hosts file (default ~/.ssh/known_hosts)
    #[arg(long)]
    pub known_hosts: Option<PathBuf>,

    #[command(flatten)]
    pub timeouts: TimeoutArgs,
}

/// Timeout overrides, in seconds
#[derive(Args, Default)]
pub struct TimeoutArgs {
    /// Connect and authentication timeout
    #[arg(long, value_name = "SECS")]
    pub connect_timeout: Option<u64>,

    /// Timeout for ordinary prompts
    #[arg(long, value_name = "SECS")]
    pub prompt_timeout: Option<u64>,

    /// Timeout for entering enable mode
    #[arg(long, value_name = "SECS")]
    pub enable_timeout: Option<u64>,

    /// Timeout for sftp/scp copies
    #[arg(long, value_name = "SECS")]
    pub secure_transfer_timeout: Option<u64>,

    /// Timeout for ftp/tftp copies
    #[arg(long, value_name = "SECS")]
    pub plain_transfer_timeout: Option<u64>,
}

impl TimeoutArgs {
    pub fn apply(&self, mut timeouts: Timeouts) -> Timeouts {
        let secs = Duration::from_secs;
        if let Some(s) = self.connect_timeout {
            timeouts.connect = secs(s);
        }
        if let Some(s) = self.prompt_timeout {
            timeouts.prompt = secs(s);
        }
        if let Some(s) = self.enable_timeout {
            timeouts.enable = secs(s);
        }
        if let Some(s) = self.secure_transfer_timeout {
            timeouts.secure_transfer = secs(s);
        }
        if let Some(s) = self.plain_transfer_timeout {
            timeouts.plain_transfer = secs(s);
        }
        timeouts
    }
}

impl From<ConnectionArgs> for ConnectionParams {
    fn from(args: ConnectionArgs) -> Self {
        ConnectionParams {
            host: args.host,
            port: args.port,
            username: args.username,
            password: args.password.filter(|p| !p.is_empty()).map(SecretString::from),
            ssh_keyfile: args.ssh_keyfile,
            enable_password: args
                .enable_password
                .filter(|p| !p.is_empty())
                .map(SecretString::from),
            device_type: args.device_type,
            output_file: args.output_file,
            timeouts: args.timeouts.apply(Timeouts::default()),
            host_key_verification: args.host_key,
            known_hosts: args.known_hosts,
        }
    }
}

impl Commands {
    /// Turn the parsed subcommand into a task request.
    pub fn into_module_args(self) -> Result<ModuleArgs> {
        match self {
            Commands::Save { connection } => Ok(ModuleArgs {
                connection: connection.into(),
                task: TaskKind::Save,
            }),
            Commands::Backup {
                connection,
                config_type,
                protocol,
                server_ip,
                rc_path,
                server_username,
                server_password,
            } => Ok(ModuleArgs {
                connection: connection.into(),
                task: TaskKind::Backup(BackupParams {
                    config_type,
                    protocol,
                    server_ip,
                    remote_path: rc_path,
                    server_username,
                    server_password: server_password.map(SecretString::from),
                }),
            }),
            Commands::Command {
                connection,
                commands,
            } => Ok(ModuleArgs {
                connection: connection.into(),
                task: TaskKind::Command(CommandParams::new(commands)?),
            }),
            Commands::Run { params } => ModuleArgs::from_file(&params),
        }
    }
}
