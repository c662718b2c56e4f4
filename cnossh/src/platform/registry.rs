//! Global platform registry for looking up platform definitions.

use std::collections::HashMap;
use std::sync::{LazyLock, RwLock};

use log::warn;

use super::definition::PlatformDefinition;
use super::vendors;
use crate::error::{PlatformError, Result};

/// Platform used when a device type is not claimed by any platform.
pub const FALLBACK_PLATFORM: &str = "cnos";

/// Global platform registry.
static REGISTRY: LazyLock<RwLock<PlatformRegistry>> = LazyLock::new(|| {
    let mut registry = PlatformRegistry::new();
    registry.register_builtin_platforms();
    RwLock::new(registry)
});

/// Registry for platform definitions.
#[derive(Debug, Default)]
pub struct PlatformRegistry {
    platforms: HashMap<String, PlatformDefinition>,
}

impl PlatformRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            platforms: HashMap::new(),
        }
    }

    /// Create a registry holding the built-in platforms.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_platforms();
        registry
    }

    /// Get the global registry.
    pub fn global() -> &'static RwLock<PlatformRegistry> {
        &REGISTRY
    }

    fn register_builtin_platforms(&mut self) {
        let cnos = vendors::cnos::platform();
        self.platforms.insert(cnos.name.clone(), cnos);
    }

    /// Register a platform definition.
    pub fn register(&mut self, platform: PlatformDefinition) -> Result<()> {
        if self.platforms.contains_key(&platform.name) {
            return Err(PlatformError::AlreadyRegistered {
                name: platform.name.clone(),
            }
            .into());
        }
        self.platforms.insert(platform.name.clone(), platform);
        Ok(())
    }

    /// Get a platform by name.
    pub fn get(&self, name: &str) -> Option<&PlatformDefinition> {
        self.platforms.get(name)
    }

    /// Resolve an inventory `deviceType` to a platform.
    ///
    /// A platform name is accepted as a device type. Unrecognised device
    /// types fall back to the CNOS platform.
    pub fn resolve(&self, device_type: &str) -> Result<&PlatformDefinition> {
        if let Some(platform) = self.platforms.get(device_type) {
            return Ok(platform);
        }

        if let Some(platform) = self.platforms.values().find(|p| p.serves(device_type)) {
            return Ok(platform);
        }

        warn!(
            "Unknown device type '{}', using the {} platform",
            device_type, FALLBACK_PLATFORM
        );
        self.platforms
            .get(FALLBACK_PLATFORM)
            .ok_or_else(|| {
                PlatformError::UnknownPlatform {
                    name: device_type.to_string(),
                }
                .into()
            })
    }

    /// Check if a platform is registered.
    pub fn contains(&self, name: &str) -> bool {
        self.platforms.contains_key(name)
    }

    /// List all registered platform names.
    pub fn names(&self) -> impl Iterator<Item = &String> {
        self.platforms.keys()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_known_device_type() {
        let registry = PlatformRegistry::with_builtins();
        assert_eq!(registry.resolve("g8272_cnos").unwrap().name, "cnos");
        assert_eq!(registry.resolve("ne2572").unwrap().name, "cnos");
        assert_eq!(registry.resolve("cnos").unwrap().name, "cnos");
    }

    #[test]
    fn test_resolve_unknown_falls_back() {
        let registry = PlatformRegistry::with_builtins();
        assert_eq!(registry.resolve("mystery_box").unwrap().name, "cnos");
    }

    #[test]
    fn test_resolve_on_empty_registry() {
        let registry = PlatformRegistry::new();
        assert!(registry.resolve("g8272_cnos").is_err());
    }

    #[test]
    fn test_register_duplicate() {
        let mut registry = PlatformRegistry::with_builtins();
        let err = registry.register(vendors::cnos::platform()).unwrap_err();
        assert!(err.to_string().contains("already registered"));

        registry
            .register(PlatformDefinition::new("lab").with_device_type("lab_box"))
            .unwrap();
        assert_eq!(registry.resolve("LAB_BOX").unwrap().name, "lab");
        assert!(registry.contains("lab"));
    }

    #[test]
    fn test_global_has_cnos() {
        let registry = PlatformRegistry::global().read().unwrap();
        assert!(registry.names().any(|n| n == "cnos"));
    }
}
