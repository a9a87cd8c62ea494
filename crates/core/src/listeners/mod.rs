//! Global listeners for server lifecycle events
//!
//! Callbacks live in a single slotmap keyed by [`ListenerKey`]; each entry
//! records which lifecycle event it listens to. Callbacks are cloned out of
//! the registry before they run, so a listener may register or remove other
//! listeners.
//!
//! # Example
//!
//! ```ignore
//! use retakes_core::listeners;
//!
//! let key = listeners::on_map_start(|map_name| {
//!     tracing::info!("Map started: {}", map_name);
//! });
//!
//! listeners::remove_listener(key);
//! ```

pub mod server;

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Key for registered listeners, used for removal
    pub struct ListenerKey;
}

/// A registered callback tagged with the event it listens to
#[derive(Clone)]
enum Listener {
    MapStart(Arc<dyn Fn(&str) + Send + Sync>),
    MapEnd(Arc<dyn Fn() + Send + Sync>),
}

static REGISTRY: LazyLock<RwLock<SlotMap<ListenerKey, Listener>>> =
    LazyLock::new(|| RwLock::new(SlotMap::with_key()));

fn register(listener: Listener) -> ListenerKey {
    REGISTRY.write().insert(listener)
}

/// Snapshot of the listeners matching `select`
fn collect<T>(select: impl Fn(&Listener) -> Option<T>) -> Vec<T> {
    REGISTRY.read().values().filter_map(select).collect()
}

/// Remove a listener by its key
///
/// Returns `true` if the listener was found and removed.
pub fn remove_listener(key: ListenerKey) -> bool {
    REGISTRY.write().remove(key).is_some()
}

pub use server::{fire_map_end, fire_map_start, on_map_end, on_map_start};
