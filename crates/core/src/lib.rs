//! Retakes plugin core
//!
//! Server-side plumbing shared by the barrier plugin: commands, game events,
//! timers, the next-frame task queue, listeners, permissions, config files
//! and signature scanning.
//!
//! # Re-exports
//!
//! This crate re-exports the SDK and engine crates for convenience:
//! - [`sdk`] - FFI types shared with the native bridge
//! - [`engine`] - Engine globals and module lookup

// Allow the crate to refer to itself as `retakes_core` for proc macro compatibility
extern crate self as retakes_core;

use tracing::info;

pub use retakes_engine as engine;
pub use retakes_sdk as sdk;

pub mod commands;
pub mod config;
pub mod entities;
pub mod events;
pub mod gamedata;
pub mod hooks;
pub mod listeners;
pub mod permissions;
pub mod tasks;
pub mod timers;

pub use commands::{
    register_command, register_command_ex, register_server_command, unregister_command,
    CommandContext, CommandInfo, CommandKey, CommandResult,
};
pub use events::{register_event, unregister_event, EventInfo, GameEventRef, HookResult};
pub use hooks::{frame_count, register_gameframe_callback, unregister_gameframe_callback};
pub use tasks::queue_task;
pub use timers::{
    add_repeating_timer, add_timer, add_timer_with_flags, remove_timer, TimerFlags, TimerKey,
};

pub use entities::{PlayerController, PlayerPawn};

pub use listeners::{on_map_end, on_map_start, remove_listener, ListenerKey};

pub use config::{ConfigError, ConfigResult, CoreConfig, PluginConfig};

pub use permissions::{
    add_permissions, clear_permissions, flags as permission_flags, get_permissions,
    has_any_permission, has_permission, player_has_any_permission, player_has_permission,
    remove_permissions, set_permissions, PermissionData,
};

pub use retakes_macros::console_command;

/// Shutdown the core
///
/// Called from the FFI layer when the plugin is unloaded. Drops every
/// map-scoped timer and any work still waiting for the next frame.
pub fn shutdown() {
    info!("Retakes core shutting down...");
    timers::remove_mapchange_timers();
    let dropped = tasks::clear_queued_tasks();
    if dropped > 0 {
        tracing::debug!("Dropped {} queued task(s)", dropped);
    }
}
