//! Platform definition for device-family configuration.

use indexmap::IndexMap;

use super::privilege_level::PrivilegeLevel;
use super::scanner::TranscriptScanner;

/// Platform definition containing all device-family configuration.
#[derive(Debug, Clone)]
pub struct PlatformDefinition {
    /// Platform name (e.g., "cnos").
    pub name: String,

    /// Inventory `deviceType` values served by this platform.
    pub device_types: Vec<String>,

    /// Privilege levels for this platform, root first.
    pub privilege_levels: IndexMap<String, PrivilegeLevel>,

    /// Level that commands are issued from after the session is initialized.
    pub default_privilege: String,

    /// Phrases that indicate a device-reported failure.
    pub error_markers: Vec<String>,

    /// Commands to run once the default privilege is reached.
    pub on_open_commands: Vec<String>,

    /// Terminal width for PTY.
    pub terminal_width: u32,

    /// Terminal height for PTY.
    pub terminal_height: u32,
}

impl PlatformDefinition {
    /// Create a new platform definition with minimal required fields.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            device_types: vec![],
            privilege_levels: IndexMap::new(),
            default_privilege: String::new(),
            error_markers: vec![],
            on_open_commands: vec![],
            terminal_width: 511,
            terminal_height: 24,
        }
    }

    /// Add a privilege level.
    pub fn with_privilege(mut self, level: PrivilegeLevel) -> Self {
        self.privilege_levels.insert(level.name.clone(), level);
        self
    }

    /// Set the default privilege level.
    pub fn with_default_privilege(mut self, name: impl Into<String>) -> Self {
        self.default_privilege = name.into();
        self
    }

    /// Add a device type served by this platform.
    pub fn with_device_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_types.push(device_type.into());
        self
    }

    /// Add an error marker.
    pub fn with_error_marker(mut self, marker: impl Into<String>) -> Self {
        self.error_markers.push(marker.into());
        self
    }

    /// Add an on_open command.
    pub fn with_on_open_command(mut self, command: impl Into<String>) -> Self {
        self.on_open_commands.push(command.into());
        self
    }

    /// Set terminal dimensions.
    pub fn with_terminal_size(mut self, width: u32, height: u32) -> Self {
        self.terminal_width = width;
        self.terminal_height = height;
        self
    }

    /// Get a privilege level by name.
    pub fn get_privilege(&self, name: &str) -> Option<&PrivilegeLevel> {
        self.privilege_levels.get(name)
    }

    /// Whether this platform serves the given device type (case-insensitive).
    pub fn serves(&self, device_type: &str) -> bool {
        self.device_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(device_type))
    }

    /// Scanner over this platform's error markers.
    pub fn scanner(&self) -> TranscriptScanner {
        TranscriptScanner::new(&self.error_markers)
    }
}
