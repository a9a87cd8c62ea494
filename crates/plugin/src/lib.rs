//! Retakes plugin - FFI layer
//!
//! Compiles to the shared library the native bridge loads. Every export lives
//! in [`ffi`]; this crate holds no game logic of its own.

pub mod ffi;

/// Tear down the barrier plugin and the core registries
pub fn shutdown() {
    retakes_barriers::runtime::unload();
    retakes_core::shutdown();
}
