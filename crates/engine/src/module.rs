//! Loaded module lookup
//!
//! Signature scans need the base address and mapped size of a game library.
//! The bridge already knows where each library sits, so the span is requested
//! through the host table by its gamedata library name.

use retakes_sdk::RawModule;

use crate::error::ModuleError;
use crate::globals::try_engine;

/// Address range of a loaded module
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleInfo {
    /// Gamedata library name ("server", "engine2", ...)
    pub name: String,
    /// Lowest mapped address
    pub base: usize,
    /// Mapped size in bytes
    pub size: usize,
}

impl ModuleInfo {
    /// Validate a span reported by the bridge
    pub fn from_raw(name: &str, raw: RawModule) -> Result<Self, ModuleError> {
        if raw.base == 0 || raw.size == 0 {
            return Err(ModuleError::Empty(name.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            base: raw.base,
            size: raw.size,
        })
    }

    /// Base address as a byte pointer
    pub fn base_ptr(&self) -> *const u8 {
        self.base as *const u8
    }

    /// Whether an address falls inside this module
    pub fn contains(&self, address: usize) -> bool {
        address >= self.base && address - self.base < self.size
    }
}

/// Find a loaded game library by gamedata name
pub fn find_module(library: &str) -> Result<ModuleInfo, ModuleError> {
    let engine = try_engine()
        .filter(|engine| engine.has_module_lookup())
        .ok_or(ModuleError::Unavailable)?;

    let raw = engine
        .get_module(library)
        .ok_or_else(|| ModuleError::NotFound(library.to_string()))?;
    let module = ModuleInfo::from_raw(library, raw)?;

    tracing::debug!(
        "Found module {} at {:#x} ({} bytes)",
        module.name,
        module.base,
        module.size
    );
    Ok(module)
}
