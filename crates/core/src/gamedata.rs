//! Gamedata system for byte signatures
//!
//! Signatures are loaded from a `gamedata.json` file deployed with the plugin,
//! so a game update that moves a function only needs a JSON edit. Entries that
//! are missing from the file fall back to patterns compiled into the plugin.
//!
//! Scanning only walks memory regions the OS reports as readable, which keeps
//! a bad module span from faulting the server.

use std::collections::HashMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::Deserialize;
use thiserror::Error;

use retakes_engine::ModuleInfo;

/// Errors that can occur when loading gamedata or scanning for signatures
#[derive(Debug, Error)]
pub enum GamedataError {
    #[error("Failed to read gamedata file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse gamedata JSON: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    #[error("Invalid signature format: {0}")]
    InvalidSignature(String),

    #[error("Failed to query module memory: {0}")]
    RegionQuery(String),

    #[error("Failed to find signature in memory: {0}")]
    ScanFailed(String),
}

/// Platform-specific signature entry
#[derive(Debug, Clone, Deserialize)]
pub struct SignatureEntry {
    /// Library to scan (e.g., "server")
    #[serde(default = "default_library")]
    pub library: String,
    /// Windows signature pattern
    pub windows: Option<String>,
    /// Linux signature pattern
    pub linux: Option<String>,
}

fn default_library() -> String {
    "server".to_string()
}

impl SignatureEntry {
    /// Pattern for the platform we were compiled for
    pub fn current_platform(&self) -> Option<&str> {
        #[cfg(target_os = "windows")]
        let sig = self.windows.as_deref();

        #[cfg(not(target_os = "windows"))]
        let sig = self.linux.as_deref();

        sig
    }
}

/// Loaded gamedata
#[derive(Debug, Default)]
pub struct Gamedata {
    signatures: HashMap<String, SignatureEntry>,
}

/// Global gamedata instance
static GAMEDATA: OnceLock<Gamedata> = OnceLock::new();

impl Gamedata {
    /// Load gamedata from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, GamedataError> {
        let content = std::fs::read_to_string(path)?;
        Self::load_from_str(&content)
    }

    /// Load gamedata from a JSON string
    ///
    /// Accepts both `{"Name": {"signatures": {...}}}` and the flat
    /// CounterStrikeSharp layout `{"Name": {"library": ..., "linux": ...}}`.
    pub fn load_from_str(json: &str) -> Result<Self, GamedataError> {
        let raw: HashMap<String, serde_json::Value> = serde_json::from_str(json)?;

        let mut gamedata = Gamedata::default();

        for (name, mut value) in raw {
            if let Some(nested) = value.get_mut("signatures") {
                let entry: SignatureEntry = serde_json::from_value(nested.take())?;
                gamedata.signatures.insert(name, entry);
            } else if value.get("linux").is_some() || value.get("windows").is_some() {
                let entry: SignatureEntry = serde_json::from_value(value)?;
                gamedata.signatures.insert(name, entry);
            } else {
                tracing::debug!("Ignoring gamedata entry without signatures: {}", name);
            }
        }

        tracing::info!("Loaded gamedata: {} signatures", gamedata.signatures.len());

        Ok(gamedata)
    }

    /// Get a signature by name for the current platform
    pub fn get_signature(&self, name: &str) -> Result<&str, GamedataError> {
        let entry = self
            .signatures
            .get(name)
            .ok_or_else(|| GamedataError::SignatureNotFound(name.to_string()))?;

        entry.current_platform().ok_or_else(|| {
            GamedataError::SignatureNotFound(format!("{} (no signature for this platform)", name))
        })
    }

    /// Get the library name for a signature
    pub fn get_signature_library(&self, name: &str) -> Option<&str> {
        self.signatures.get(name).map(|e| e.library.as_str())
    }

    /// Number of loaded signatures
    pub fn len(&self) -> usize {
        self.signatures.len()
    }

    /// True when no signatures were loaded
    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

/// Initialize global gamedata from file
pub fn init_gamedata<P: AsRef<Path>>(path: P) -> Result<(), GamedataError> {
    let gd = Gamedata::load_from_file(path)?;
    GAMEDATA
        .set(gd)
        .map_err(|_| GamedataError::IoError(std::io::Error::other("Gamedata already initialized")))
}

/// Get the global gamedata instance
pub fn gamedata() -> Option<&'static Gamedata> {
    GAMEDATA.get()
}

/// A parsed byte pattern; `None` entries are wildcards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signature(Vec<Option<u8>>);

impl Signature {
    /// Parse a signature pattern string
    ///
    /// Supports:
    /// - Hex bytes: "55 48 89 E5"
    /// - Wildcards: "55 ? 89 E5" or "55 ?? 89 E5"
    pub fn parse(pattern: &str) -> Result<Self, GamedataError> {
        let bytes = pattern
            .split_whitespace()
            .map(|part| match part {
                "?" | "??" => Ok(None),
                hex => u8::from_str_radix(hex, 16).map(Some).map_err(|_| {
                    GamedataError::InvalidSignature(format!("Invalid hex byte: {}", hex))
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;

        if bytes.is_empty() {
            return Err(GamedataError::InvalidSignature(
                "Empty signature pattern".to_string(),
            ));
        }

        Ok(Self(bytes))
    }

    /// Pattern length in bytes
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a parsed signature
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Offset of the first match in `haystack`
    pub fn find_in(&self, haystack: &[u8]) -> Option<usize> {
        if haystack.len() < self.0.len() {
            return None;
        }

        haystack.windows(self.0.len()).position(|window| {
            window
                .iter()
                .zip(&self.0)
                .all(|(actual, expected)| expected.map_or(true, |byte| byte == *actual))
        })
    }
}

/// Scan a loaded module for a signature
///
/// Only readable regions inside the module span are inspected. A match that
/// straddles two regions with different protections is not reported.
///
/// # Safety
/// `module` must describe memory that stays mapped for the duration of the scan.
pub unsafe fn scan_module(
    module: &ModuleInfo,
    signature: &Signature,
) -> Result<*const u8, GamedataError> {
    let regions = region::query_range(module.base_ptr(), module.size)
        .map_err(|e| GamedataError::RegionQuery(e.to_string()))?;

    let module_end = module.base + module.size;

    for region in regions {
        let region = region.map_err(|e| GamedataError::RegionQuery(e.to_string()))?;
        if !region.protection().contains(region::Protection::READ) || region.is_guarded() {
            continue;
        }

        let range = region.as_range();
        let start = range.start.max(module.base);
        let end = range.end.min(module_end);
        if end <= start {
            continue;
        }

        let bytes = std::slice::from_raw_parts(start as *const u8, end - start);
        if let Some(offset) = signature.find_in(bytes) {
            return Ok((start + offset) as *const u8);
        }
    }

    Err(GamedataError::ScanFailed(format!(
        "pattern not present in {}",
        module.name
    )))
}

/// Resolve a named signature inside a module
///
/// The gamedata entry wins when present; otherwise `fallback` is used.
///
/// # Safety
/// Same as [`scan_module`].
pub unsafe fn find_signature(
    name: &str,
    fallback: Option<&str>,
    module: &ModuleInfo,
) -> Result<*const u8, GamedataError> {
    let pattern = match gamedata().map(|gd| gd.get_signature(name)) {
        Some(Ok(sig)) => sig,
        _ => fallback.ok_or_else(|| GamedataError::SignatureNotFound(name.to_string()))?,
    };

    let signature = Signature::parse(pattern)?;
    scan_module(module, &signature).map_err(|e| match e {
        GamedataError::ScanFailed(_) => GamedataError::ScanFailed(name.to_string()),
        other => other,
    })
}
