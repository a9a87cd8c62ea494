//! Retakes SDK - Shared Type Definitions
//!
//! This crate contains the plain data types shared by every other crate in the
//! workspace and by the native bridge that hosts the plugin. It has no
//! dependencies and compiles quickly, allowing parallel compilation of
//! dependent crates.
//!
//! # Modules
//!
//! - [`vector`] - `#[repr(C)]` world-space vector
//! - [`bombsite`] - The two bombsite identifiers
//! - [`host`] - Function table and player snapshot handed over by the bridge
//! - [`signatures`] - Built-in byte signatures and module names

pub mod bombsite;
pub mod host;
pub mod signatures;
pub mod vector;

pub use bombsite::{Bombsite, ParseBombsiteError};
pub use host::{BarrierToggleFn, HostFunctions, RawModule, RawPlayer};
pub use vector::Vector;
