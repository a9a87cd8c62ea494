//! GameFrame hook handler
//!
//! Called every server frame by the native bridge through the plugin exports.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use crate::tasks;
use crate::timers;

new_key_type! {
    /// Key for registered GameFrame callbacks
    pub struct GameFrameKey;
}

/// Callback type for GameFrame listeners
pub type GameFrameCallback = Arc<dyn Fn(bool, bool, bool) + Send + Sync>;

/// GameFrame callback registry
struct GameFrameRegistry {
    callbacks: SlotMap<GameFrameKey, GameFrameCallback>,
}

static REGISTRY: LazyLock<RwLock<GameFrameRegistry>> = LazyLock::new(|| {
    RwLock::new(GameFrameRegistry {
        callbacks: SlotMap::with_key(),
    })
});

/// Frame counter (increments every GameFrame call)
static FRAME_COUNT: AtomicU64 = AtomicU64::new(0);

/// Last frame's processing time (nanoseconds)
static LAST_FRAME_TIME_NS: AtomicU64 = AtomicU64::new(0);

/// Frames slower than this are logged
const SLOW_FRAME_NS: u64 = 1_000_000;

/// Register a callback to be called every GameFrame
///
/// # Arguments
/// * `callback` - Function called with (simulating, first_tick, last_tick)
pub fn register_gameframe_callback<F>(callback: F) -> GameFrameKey
where
    F: Fn(bool, bool, bool) + Send + Sync + 'static,
{
    REGISTRY.write().callbacks.insert(Arc::new(callback))
}

/// Unregister a GameFrame callback
///
/// # Returns
/// `true` if the callback was found and removed
pub fn unregister_gameframe_callback(key: GameFrameKey) -> bool {
    REGISTRY.write().callbacks.remove(key).is_some()
}

/// Get the current frame count
pub fn frame_count() -> u64 {
    FRAME_COUNT.load(Ordering::Relaxed)
}

/// Get the last frame processing time in nanoseconds
pub fn last_frame_time_ns() -> u64 {
    LAST_FRAME_TIME_NS.load(Ordering::Relaxed)
}

/// Run one frame: queued tasks, timers, then frame callbacks
///
/// # Arguments
/// * `simulating` - True if the game is actively simulating (not paused)
/// * `first_tick` - True if this is the first tick of a frame
/// * `last_tick` - True if this is the last tick of a frame
pub fn on_game_frame(simulating: bool, first_tick: bool, last_tick: bool) {
    let start = std::time::Instant::now();

    FRAME_COUNT.fetch_add(1, Ordering::Relaxed);

    let tasks_processed = tasks::process_queued_tasks();
    if tasks_processed > 0 {
        tracing::trace!("Processed {} queued tasks", tasks_processed);
    }

    timers::process();

    let callbacks: Vec<GameFrameCallback> = REGISTRY.read().callbacks.values().cloned().collect();
    for callback in callbacks {
        callback(simulating, first_tick, last_tick);
    }

    let elapsed = start.elapsed().as_nanos() as u64;
    LAST_FRAME_TIME_NS.store(elapsed, Ordering::Relaxed);

    if elapsed > SLOW_FRAME_NS {
        tracing::warn!(
            "GameFrame took {}ms (frame {})",
            elapsed / 1_000_000,
            FRAME_COUNT.load(Ordering::Relaxed)
        );
    }
}
