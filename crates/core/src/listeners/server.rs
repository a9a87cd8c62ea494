//! Server lifecycle listeners
//!
//! - OnMapStart: Called when a map is loaded
//! - OnMapEnd: Called when a map is unloaded

use std::sync::Arc;

use super::{collect, register, Listener, ListenerKey};

/// Register a callback to be called when a map starts
///
/// The callback receives the map name (e.g., "de_mirage").
pub fn on_map_start<F>(callback: F) -> ListenerKey
where
    F: Fn(&str) + Send + Sync + 'static,
{
    register(Listener::MapStart(Arc::new(callback)))
}

/// Fire all map start callbacks
///
/// The engine's current map name is updated first so callbacks can read it.
pub fn fire_map_start(map_name: &str) {
    tracing::info!("Firing OnMapStart: {}", map_name);

    if let Some(engine) = retakes_engine::try_engine() {
        engine.set_map_name(map_name);
    }

    let callbacks = collect(|listener| match listener {
        Listener::MapStart(cb) => Some(cb.clone()),
        _ => None,
    });
    for callback in callbacks {
        callback(map_name);
    }
}

/// Register a callback to be called when a map ends
pub fn on_map_end<F>(callback: F) -> ListenerKey
where
    F: Fn() + Send + Sync + 'static,
{
    register(Listener::MapEnd(Arc::new(callback)))
}

/// Fire all map end callbacks
///
/// Timers flagged `STOP_ON_MAPCHANGE` are dropped before the callbacks run.
pub fn fire_map_end() {
    tracing::info!("Firing OnMapEnd");

    crate::timers::remove_mapchange_timers();

    let callbacks = collect(|listener| match listener {
        Listener::MapEnd(cb) => Some(cb.clone()),
        _ => None,
    });
    for callback in callbacks {
        callback();
    }

    if let Some(engine) = retakes_engine::try_engine() {
        engine.clear_map_name();
    }
}
