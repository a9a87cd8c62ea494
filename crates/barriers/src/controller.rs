//! Blocking volume toggling
//!
//! The server binary contains a routine that spawns (or clears) the invisible
//! retake barriers. It is located once by signature and called directly.

use thiserror::Error;

use retakes_core::gamedata::{self, Gamedata, GamedataError};
use retakes_engine::{find_module, ModuleError};
use retakes_sdk::signatures::{BARRIER_SPAWN, BARRIER_SPAWN_LINUX, SERVER_MODULE};
use retakes_sdk::{BarrierToggleFn, Vector};

/// Errors from resolving or calling the native toggle
#[derive(Debug, Error)]
pub enum ControllerError {
    #[error("barrier spawn function not available")]
    Unavailable,

    #[error("server module lookup failed: {0}")]
    Module(#[from] ModuleError),

    #[error("barrier signature lookup failed: {0}")]
    Signature(#[from] GamedataError),
}

/// Something that can raise and clear blocking volumes
pub trait BlockingVolumeController: Send {
    /// Whether calls will reach the game
    fn is_available(&self) -> bool;

    /// Raise one volume spanning `min`..`max`
    fn activate(&self, min: Vector, max: Vector) -> Result<(), ControllerError>;

    /// Clear every active volume
    fn clear(&self) -> Result<(), ControllerError>;
}

/// Controller backed by the server's own barrier routine
pub struct NativeBarrierController {
    toggle: Option<BarrierToggleFn>,
}

impl NativeBarrierController {
    /// Scan the server module for the toggle routine
    ///
    /// Failure leaves the controller permanently unavailable.
    pub fn resolve() -> Self {
        match Self::find_toggle() {
            Ok(toggle) => {
                tracing::info!("Loaded {}", BARRIER_SPAWN);
                Self {
                    toggle: Some(toggle),
                }
            }
            Err(e) => {
                tracing::error!("Could not resolve {}: {}", BARRIER_SPAWN, e);
                Self::unavailable()
            }
        }
    }

    /// A controller whose calls are all no-ops
    pub fn unavailable() -> Self {
        Self { toggle: None }
    }

    fn find_toggle() -> Result<BarrierToggleFn, ControllerError> {
        let library = toggle_library(gamedata::gamedata());
        let module = find_module(library)?;
        let fallback = cfg!(target_os = "linux").then_some(BARRIER_SPAWN_LINUX);

        // SAFETY: the module span is reported by the bridge for a loaded library
        let address = unsafe { gamedata::find_signature(BARRIER_SPAWN, fallback, &module)? };
        tracing::info!("Found {} in {} at {:p}", BARRIER_SPAWN, library, address);

        // SAFETY: the signature marks the entry of a function with this ABI
        Ok(unsafe { std::mem::transmute::<*const u8, BarrierToggleFn>(address) })
    }

    fn call(&self, remove: bool, min: Vector, max: Vector) -> Result<(), ControllerError> {
        let toggle = self.toggle.ok_or(ControllerError::Unavailable)?;
        // SAFETY: resolved from the loaded server module; runs on the game thread
        unsafe { toggle(remove, min, max, 0.0) };
        Ok(())
    }
}

/// Library holding the toggle: the gamedata entry's, else the server
fn toggle_library(gamedata: Option<&Gamedata>) -> &str {
    gamedata
        .and_then(|gd| gd.get_signature_library(BARRIER_SPAWN))
        .unwrap_or(SERVER_MODULE)
}

impl BlockingVolumeController for NativeBarrierController {
    fn is_available(&self) -> bool {
        self.toggle.is_some()
    }

    fn activate(&self, min: Vector, max: Vector) -> Result<(), ControllerError> {
        self.call(false, min, max)
    }

    fn clear(&self) -> Result<(), ControllerError> {
        self.call(true, Vector::ZERO, Vector::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unavailable_controller() {
        let controller = NativeBarrierController::unavailable();
        assert!(!controller.is_available());
        assert!(matches!(
            controller.activate(Vector::ZERO, Vector::new(1.0, 1.0, 1.0)),
            Err(ControllerError::Unavailable)
        ));
        assert!(matches!(controller.clear(), Err(ControllerError::Unavailable)));
    }

    #[test]
    fn test_toggle_library_follows_gamedata() {
        assert_eq!(toggle_library(None), SERVER_MODULE);

        let moved = Gamedata::load_from_str(
            r#"{"RetakesBarrierSpawn": {"library": "server_retakes", "linux": "55 66"}}"#,
        )
        .unwrap();
        assert_eq!(toggle_library(Some(&moved)), "server_retakes");

        let unrelated = Gamedata::load_from_str(r#"{"ClientPrint": {"linux": "55 48"}}"#).unwrap();
        assert_eq!(toggle_library(Some(&unrelated)), SERVER_MODULE);
    }
}
