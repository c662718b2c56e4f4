//! Error types for cnossh.

use std::io;
use std::time::Duration;

use thiserror::Error;

/// Main error type for cnossh operations.
#[derive(Error, Debug)]
pub enum Error {
    /// SSH transport-level errors
    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    /// Channel operation errors
    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),

    /// Driver-level errors
    #[error("Driver error: {0}")]
    Driver(#[from] DriverError),

    /// Platform/device-family errors
    #[error("Platform error: {0}")]
    Platform(#[from] PlatformError),

    /// Task parameter and output errors
    #[error("Task error: {0}")]
    Task(#[from] TaskError),
}

/// Transport layer errors (SSH connection, authentication).
#[derive(Error, Debug)]
pub enum TransportError {
    /// SSH handshake or protocol error
    #[error("SSH error: {0}")]
    Ssh(#[from] russh::Error),

    /// Authentication failed
    #[error("Authentication failed for user '{user}'")]
    AuthenticationFailed { user: String },

    /// SSH key error
    #[error("SSH key error: {0}")]
    Key(String),

    /// Host is not present in known_hosts and verification is strict
    #[error("Host key for {host}:{port} is not in known_hosts")]
    HostKeyUnknown { host: String, port: u16 },

    /// Host key differs from the one recorded in known_hosts
    #[error("Host key for {host}:{port} changed (known_hosts line {line})")]
    HostKeyChanged { host: String, port: u16, line: usize },

    /// known_hosts could not be read or written
    #[error("known_hosts error: {0}")]
    KnownHosts(String),

    /// Operation timed out
    #[error("Operation timed out after {0:?}")]
    Timeout(Duration),
}

/// Channel layer errors (prompt waits, PTY I/O).
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Channel closed before the expected prompt arrived
    #[error("Channel closed")]
    Closed,

    /// Reading from or writing to the shell failed
    #[error("Channel I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Driver layer errors (session state, privilege escalation).
#[derive(Error, Debug)]
pub enum DriverError {
    /// Failed to acquire target privilege level
    #[error("Failed to acquire privilege level '{target}'")]
    PrivilegeAcquisitionFailed { target: String },

    /// Invalid configuration in the driver builder
    #[error("Invalid configuration: {message}")]
    InvalidConfig { message: String },

    /// Unknown privilege level detected
    #[error("Unknown privilege level from prompt: '{prompt}'")]
    UnknownPrivilege { prompt: String },

    /// The device never showed a prompt after the session opened
    #[error("Device did not present a prompt within {0:?}")]
    NoPrompt(Duration),

    /// No path found between privilege levels
    #[error("No path from privilege '{from}' to '{to}'")]
    NoPrivilegePath { from: String, to: String },
}

/// Platform definition errors.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Invalid platform definition
    #[error("Invalid platform definition: {message}")]
    InvalidDefinition { message: String },

    /// Platform name not present in the registry
    #[error("Unknown platform: {name}")]
    UnknownPlatform { name: String },

    /// A platform with this name is already registered
    #[error("Platform already registered: {name}")]
    AlreadyRegistered { name: String },
}

/// Task parameter and result-file errors.
#[derive(Error, Debug)]
pub enum TaskError {
    /// configType was not running-config or startup-config
    #[error("Invalid configType option '{0}'")]
    InvalidConfigType(String),

    /// protocol was not one of sftp, scp, ftp, tftp
    #[error("Invalid protocol option '{0}'")]
    InvalidProtocol(String),

    /// A parameter required by this task was not supplied
    #[error("Missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// The params file could not be read
    #[error("Failed to read params file {path}: {source}")]
    ParamsFile {
        path: String,
        #[source]
        source: io::Error,
    },

    /// The params file could not be parsed
    #[error("Invalid parameters: {0}")]
    InvalidParams(#[from] serde_json::Error),

    /// The output file could not be written
    #[error("Failed to write output file {path}: {source}")]
    OutputFile {
        path: String,
        #[source]
        source: io::Error,
    },
}

/// Result type alias using cnossh's Error.
pub type Result<T> = std::result::Result<T, Error>;
