//! Built-in byte signatures and module names
//!
//! Signatures can be overridden from `gamedata/gamedata.json`; these values are
//! the fallback when no gamedata entry exists.

/// Gamedata key for the barrier toggle routine
pub const BARRIER_SPAWN: &str = "RetakesBarrierSpawn";

/// Default Linux pattern for the barrier toggle routine
pub const BARRIER_SPAWN_LINUX: &str = "55 66 48 0F 7E D0";

/// Library scanned when gamedata does not name one
pub const SERVER_MODULE: &str = "server";
