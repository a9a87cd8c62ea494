//! Event manager - registration and dispatch
//!
//! The bridge fires each game event twice: once before the engine broadcasts it
//! (pre) and once after (post). Pre handlers can block the event.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;

use super::raw::GameEventRef;
use super::types::{EventCallback, EventInfo, HookResult};

/// Handlers registered for one event name
#[derive(Default)]
struct EventHook {
    pre_hooks: Vec<EventCallback>,
    post_hooks: Vec<EventCallback>,
}

/// Global event manager
pub static EVENTS: LazyLock<RwLock<EventManager>> =
    LazyLock::new(|| RwLock::new(EventManager::default()));

/// Event manager for registering and dispatching event handlers
#[derive(Default)]
pub struct EventManager {
    /// Map of event name to hook data
    hooks: HashMap<String, EventHook>,
}

impl EventManager {
    /// Handlers for `name` in registration order
    fn handlers(&self, name: &str, post: bool) -> Vec<EventCallback> {
        self.hooks
            .get(name)
            .map(|hook| {
                if post {
                    hook.post_hooks.clone()
                } else {
                    hook.pre_hooks.clone()
                }
            })
            .unwrap_or_default()
    }

    /// Whether anything listens to `name`
    pub fn is_hooked(&self, name: &str) -> bool {
        self.hooks.contains_key(name)
    }
}

/// Register an event handler
///
/// # Arguments
/// * `name` - Event name (e.g., "round_start", "player_ping")
/// * `post` - If true, handler runs after event fires; otherwise before
/// * `callback` - Function to call when event fires
pub fn register_event<F>(name: &str, post: bool, callback: F)
where
    F: Fn(&GameEventRef, &mut EventInfo) -> HookResult + Send + Sync + 'static,
{
    let mut manager = EVENTS.write();

    let hook = manager.hooks.entry(name.to_string()).or_insert_with(|| {
        tracing::debug!("Registering new event hook: {}", name);
        EventHook::default()
    });

    if post {
        hook.post_hooks.push(Arc::new(callback));
    } else {
        hook.pre_hooks.push(Arc::new(callback));
    }

    tracing::trace!(
        "Added {} handler for event '{}' (total: {} pre, {} post)",
        if post { "post" } else { "pre" },
        name,
        hook.pre_hooks.len(),
        hook.post_hooks.len()
    );
}

/// Unregister all handlers for an event
///
/// # Returns
/// true if the event was found and removed
pub fn unregister_event(name: &str) -> bool {
    let removed = EVENTS.write().hooks.remove(name).is_some();
    if removed {
        tracing::debug!("Unregistered all handlers for event: {}", name);
    }
    removed
}

/// Run the pre-fire handlers for an event
///
/// Handlers run in registration order. The highest result wins; `Stop` ends
/// the chain early. A result of `Handled` or above tells the bridge to block
/// the event.
pub fn fire_event_pre(event: &GameEventRef, info: &mut EventInfo) -> HookResult {
    let handlers = EVENTS.read().handlers(event.get_name(), false);
    let mut result = HookResult::Continue;

    for callback in handlers {
        let handler_result = callback(event, info);
        result = result.max(handler_result);

        if handler_result >= HookResult::Stop {
            tracing::trace!("Event '{}' stopped by handler", event.get_name());
            break;
        }
    }

    result
}

/// Run the post-fire handlers for an event
pub fn fire_event_post(event: &GameEventRef, info: &mut EventInfo) {
    let handlers = EVENTS.read().handlers(event.get_name(), true);
    for callback in handlers {
        callback(event, info);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;

    #[test]
    fn test_pre_and_post_dispatch() {
        let pre = Arc::new(AtomicUsize::new(0));
        let post = Arc::new(AtomicUsize::new(0));

        let pre_counter = pre.clone();
        register_event("test_dispatch_event", false, move |event, _| {
            pre_counter.fetch_add(event.get_int("amount", 0) as usize, Ordering::SeqCst);
            HookResult::Continue
        });
        let post_counter = post.clone();
        register_event("test_dispatch_event", true, move |_, _| {
            post_counter.fetch_add(1, Ordering::SeqCst);
            HookResult::Continue
        });

        let event = GameEventRef::new("test_dispatch_event").with("amount", 5);
        let mut info = EventInfo::new(false);

        assert_eq!(fire_event_pre(&event, &mut info), HookResult::Continue);
        fire_event_post(&event, &mut info);

        assert_eq!(pre.load(Ordering::SeqCst), 5);
        assert_eq!(post.load(Ordering::SeqCst), 1);
        assert!(unregister_event("test_dispatch_event"));
        assert!(!EVENTS.read().is_hooked("test_dispatch_event"));
    }

    #[test]
    fn test_stop_ends_chain() {
        let later = Arc::new(AtomicUsize::new(0));

        register_event("test_stop_event", false, |_, info| {
            info.dont_broadcast = true;
            HookResult::Stop
        });
        let counter = later.clone();
        register_event("test_stop_event", false, move |_, _| {
            counter.fetch_add(1, Ordering::SeqCst);
            HookResult::Continue
        });

        let mut info = EventInfo::new(false);
        let result = fire_event_pre(&GameEventRef::new("test_stop_event"), &mut info);

        assert_eq!(result, HookResult::Stop);
        assert!(info.dont_broadcast);
        assert_eq!(later.load(Ordering::SeqCst), 0);
        unregister_event("test_stop_event");
    }

    #[test]
    fn test_unhooked_event_continues() {
        let mut info = EventInfo::new(false);
        let result = fire_event_pre(&GameEventRef::new("test_nobody_listens"), &mut info);
        assert_eq!(result, HookResult::Continue);
    }
}
