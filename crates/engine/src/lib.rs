//! Retakes Engine - Host Function Table and Global Storage
//!
//! This crate handles:
//! - Validating the host function table handed over by the native bridge
//! - Storing it in a thread-safe global static
//! - Asking the bridge for loaded library spans (base and size) for signature scanning
//! - Tracking per-map state such as the current map name
//!
//! # Architecture
//!
//! The table is validated once during plugin load via [`loader::load_host`]
//! and stored in [`globals::EngineGlobals`]. Access is provided via the
//! [`engine()`] and [`try_engine()`] functions.
//!
//! # Thread Safety
//!
//! Host functions must only be called from the main game thread. The thread
//! that loaded the plugin is recorded for runtime checks via [`is_main_thread()`].

pub mod error;
pub mod globals;
pub mod loader;
pub mod module;

pub use error::{InterfaceError, ModuleError};
pub use globals::{
    engine, init_engine, is_engine_initialized, is_main_thread, try_engine, EngineGlobals,
};
pub use loader::load_host;
pub use module::{find_module, ModuleInfo};
