//! Timer system for scheduling delayed and repeating callbacks
//!
//! Timers are processed every GameFrame tick and can be configured to:
//! - Fire once after a delay
//! - Repeat at a fixed interval
//! - Be automatically cleaned up on map change
//!
//! Due callbacks are collected under the registry lock and run after it is
//! released, so a callback may schedule follow-up timers or cancel others.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use retakes_core::timers::{add_timer_with_flags, remove_timer, TimerFlags};
//!
//! let key = add_timer_with_flags(Duration::from_secs(3), TimerFlags::STOP_ON_MAPCHANGE, || {
//!     tracing::info!("Removing barriers");
//! });
//!
//! // Round ended early
//! remove_timer(key);
//! ```

mod timer;

use std::sync::LazyLock;
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use slotmap::SlotMap;

use timer::{SharedCallback, Timer};
pub use timer::{TimerFlags, TimerKey};

/// Timer registry
struct TimerRegistry {
    timers: SlotMap<TimerKey, Timer>,
}

static REGISTRY: LazyLock<RwLock<TimerRegistry>> = LazyLock::new(|| {
    RwLock::new(TimerRegistry {
        timers: SlotMap::with_key(),
    })
});

/// Add a one-shot timer that fires after the specified delay
///
/// # Returns
/// A key that can be used to cancel the timer via `remove_timer`
pub fn add_timer<F>(delay: Duration, callback: F) -> TimerKey
where
    F: FnMut() + Send + 'static,
{
    add_timer_with_flags(delay, TimerFlags::empty(), callback)
}

/// Add a repeating timer that fires at the specified interval
///
/// The timer will continue firing until cancelled via `remove_timer`.
pub fn add_repeating_timer<F>(interval: Duration, callback: F) -> TimerKey
where
    F: FnMut() + Send + 'static,
{
    add_timer_with_flags(interval, TimerFlags::REPEAT, callback)
}

/// Add a timer with custom flags
///
/// # Arguments
/// * `interval` - Delay (one-shot) or interval between executions (repeating)
/// * `flags` - Combination of `TimerFlags` to control behavior
/// * `callback` - Function to call when the timer fires
pub fn add_timer_with_flags<F>(interval: Duration, flags: TimerFlags, callback: F) -> TimerKey
where
    F: FnMut() + Send + 'static,
{
    let timer = Timer::new(interval, flags, callback);
    let key = REGISTRY.write().timers.insert(timer);
    tracing::trace!("Timer {:?} scheduled in {:?}", key, interval);
    key
}

/// Remove/cancel a timer
///
/// # Returns
/// `true` if the timer was found and removed, `false` if not found
pub fn remove_timer(key: TimerKey) -> bool {
    REGISTRY.write().timers.remove(key).is_some()
}

/// Whether a timer is still scheduled
pub fn timer_exists(key: TimerKey) -> bool {
    REGISTRY.read().timers.contains_key(key)
}

/// Process all timers (called from GameFrame)
///
/// One-shot timers are removed before their callback runs; repeating timers
/// are rescheduled relative to `now`.
pub(crate) fn process() {
    process_at(Instant::now());
}

fn process_at(now: Instant) {
    let due: Vec<TimerKey> = REGISTRY
        .read()
        .timers
        .iter()
        .filter(|(_, timer)| now >= timer.next_fire)
        .map(|(key, _)| key)
        .collect();

    for key in due {
        // Looked up per key: an earlier callback this frame may have cancelled it
        let callback: Option<SharedCallback> = {
            let mut registry = REGISTRY.write();
            match registry.timers.get_mut(key) {
                Some(timer) if timer.is_repeating() => {
                    timer.next_fire = now + timer.interval;
                    Some(timer.callback.clone())
                }
                Some(_) => registry.timers.remove(key).map(|timer| timer.callback),
                None => None,
            }
        };

        if let Some(callback) = callback {
            (callback.lock())();
        }
    }
}

/// Remove all timers with the STOP_ON_MAPCHANGE flag
///
/// Called from the map end listener to clean up map-specific timers.
pub(crate) fn remove_mapchange_timers() {
    let mut registry = REGISTRY.write();
    let before = registry.timers.len();
    registry
        .timers
        .retain(|_, timer| !timer.flags.contains(TimerFlags::STOP_ON_MAPCHANGE));
    let removed = before - registry.timers.len();
    if removed > 0 {
        tracing::debug!("Removed {} timers on map change", removed);
    }
}
