//! Outbound bombsite announcements
//!
//! Other plugins subscribe here to learn which site the current round is on.
//! Subscribers run on the next frame, never inside the barrier plugin's lock.

use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use retakes_sdk::Bombsite;

new_key_type! {
    /// Key for a bombsite announcement subscriber
    pub struct AnnounceKey;
}

/// Raised once per live round with the chosen site
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnnounceBombsiteEvent {
    pub site: Bombsite,
}

type Subscriber = Arc<dyn Fn(&AnnounceBombsiteEvent) + Send + Sync>;

static SUBSCRIBERS: LazyLock<RwLock<SlotMap<AnnounceKey, Subscriber>>> =
    LazyLock::new(|| RwLock::new(SlotMap::with_key()));

/// Subscribe to bombsite announcements
pub fn subscribe<F>(callback: F) -> AnnounceKey
where
    F: Fn(&AnnounceBombsiteEvent) + Send + Sync + 'static,
{
    SUBSCRIBERS.write().insert(Arc::new(callback))
}

pub fn unsubscribe(key: AnnounceKey) -> bool {
    SUBSCRIBERS.write().remove(key).is_some()
}

/// Deliver `event` to every subscriber right now
pub fn dispatch(event: &AnnounceBombsiteEvent) -> usize {
    let subscribers: Vec<Subscriber> = SUBSCRIBERS.read().values().cloned().collect();
    for subscriber in &subscribers {
        subscriber(event);
    }
    subscribers.len()
}

/// Queue delivery of `event` for the next frame
pub fn publish(event: AnnounceBombsiteEvent) {
    tracing::debug!("Announcing bombsite {}", event.site);
    if let Err(e) = retakes_core::queue_task(move || {
        dispatch(&event);
    }) {
        tracing::error!("Failed to queue bombsite announcement: {}", e);
    }
}
