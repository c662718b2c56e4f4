//! Platform definitions for device families.
//!
//! This module defines per-family configuration: prompt conventions,
//! privilege levels, session setup commands and the error phrases the
//! device prints when something goes wrong.

mod definition;
mod privilege_level;
mod registry;
pub mod scanner;
pub mod vendors;

pub use definition::PlatformDefinition;
pub use privilege_level::PrivilegeLevel;
pub use registry::{FALLBACK_PLATFORM, PlatformRegistry};
pub use scanner::{DeviceError, TranscriptScanner};
