//! Lenovo CNOS platform definition.
//!
//! Privilege levels:
//! - `exec` - user EXEC mode with `>` prompt
//! - `privileged` - privileged EXEC mode with `#` prompt
//! - `configuration` - configuration mode with `(config)#` prompt
//!
//! # Prompt Examples
//!
//! ```text
//! G8272>                     # exec mode
//! G8272#                     # privileged mode
//! G8272(config)#             # configuration mode
//! G8272(config-if)#          # config sub-mode (interface)
//! ```
//!
//! # Privilege Graph
//!
//! ```text
//! ┌──────┐  enable     ┌────────────┐  configure t   ┌───────────────┐
//! │ exec ├─────────────► privileged ├────────────────► configuration │
//! │  >   │   disable   │     #      │      end       │  (config)#    │
//! └──────┘◄────────────┴────────────┘◄───────────────┴───────────────┘
//! ```

use crate::platform::scanner::CNOS_ERROR_MARKERS;
use crate::platform::{PlatformDefinition, PrivilegeLevel};

/// Switch models whose inventory `deviceType` maps to CNOS.
pub const DEVICE_TYPES: &[&str] = &[
    "g8272_cnos",
    "g8296_cnos",
    "g8332_cnos",
    "NE1072T",
    "NE1032",
    "NE1032T",
    "NE10032",
    "NE2572",
];

/// Create the CNOS platform definition.
pub fn platform() -> PlatformDefinition {
    let exec = PrivilegeLevel::new("exec", r">\s*$", ">").unwrap();

    // "#" also ends config prompts
    let privileged = PrivilegeLevel::new("privileged", r"#\s*$", "#")
        .unwrap()
        .with_parent("exec")
        .with_escalate("enable")
        .with_deescalate("disable")
        .with_auth("assword:")
        .with_not_contains("(config");

    let configuration = PrivilegeLevel::new("configuration", r"\(config[^)]*\)#\s*$", "(config)#")
        .unwrap()
        .with_parent("privileged")
        .with_escalate("configure t")
        .with_deescalate("end")
        .with_prompt_alternative(")#");

    let mut platform = PlatformDefinition::new("cnos")
        .with_privilege(exec)
        .with_privilege(privileged)
        .with_privilege(configuration)
        .with_default_privilege("privileged")
        .with_on_open_command("terminal-length 0")
        .with_terminal_size(511, 24);

    for device_type in DEVICE_TYPES {
        platform = platform.with_device_type(*device_type);
    }
    for marker in CNOS_ERROR_MARKERS {
        platform = platform.with_error_marker(*marker);
    }

    platform
}
