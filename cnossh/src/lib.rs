//! # cnossh
//!
//! Lenovo CNOS switch automation over SSH.
//!
//! cnossh drives a switch's interactive CLI the way an operator would: send a
//! line, wait for a prompt, keep everything the switch printed. Three tasks
//! are built on that primitive:
//!
//! - **save**: `write memory`
//! - **backup**: copy the running or startup config to an SFTP, SCP, FTP or
//!   TFTP server
//! - **command**: run CLI commands in configuration mode
//!
//! The transcript of every run is appended to an output file and scanned for
//! device error phrases. A run ends either *changed* with a message or
//! *failed* with an error string.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use cnossh::task::{self, ModuleArgs};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), cnossh::Error> {
//!     let args = ModuleArgs::from_json(r#"{
//!         "module": "save",
//!         "host": "10.241.107.39",
//!         "username": "admin",
//!         "password": "admin",
//!         "deviceType": "g8272_cnos",
//!         "outputfile": "./results/save.txt"
//!     }"#)?;
//!
//!     let outcome = task::run(args).await;
//!     println!("{}", outcome.msg);
//!     Ok(())
//! }
//! ```
//!
//! Lower-level access goes through [`DriverBuilder`] and
//! [`Session`](driver::Session).

pub mod channel;
pub mod cli;
pub mod config;
pub mod driver;
pub mod error;
pub mod platform;
pub mod task;
pub mod transport;

// Re-export main types for convenience
pub use config::Timeouts;
pub use driver::{DriverBuilder, GenericDriver, InteractiveBuilder, Response, Session, Transcript};
pub use error::{Error, Result};
pub use platform::{PlatformDefinition, PlatformRegistry, TranscriptScanner};
pub use task::{ModuleArgs, TaskOutcome};
