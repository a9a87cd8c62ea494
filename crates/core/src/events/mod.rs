//! Game Event System
//!
//! Subscribe to and handle game events (round_start, player_ping, etc.)
//!
//! # Architecture
//!
//! ```text
//! native bridge → rust_plugin_fire_event(name, json) → pre/post dispatch → Rust callbacks
//! ```
//!
//! # Example
//!
//! ```ignore
//! use retakes_core::events::typed::{register_typed_event, EventPlayerPing};
//! use retakes_core::events::HookResult;
//!
//! register_typed_event::<EventPlayerPing, _>(true, |ping, _info| {
//!     tracing::info!("Ping at {} {} {}", ping.x, ping.y, ping.z);
//!     HookResult::Continue
//! });
//! ```

mod manager;
mod raw;
pub mod typed;
mod types;

pub use manager::{
    fire_event_post, fire_event_pre, register_event, unregister_event, EventManager, EVENTS,
};
pub use raw::GameEventRef;
pub use types::{EventCallback, EventInfo, HookResult};

pub use typed::{
    register_typed_event, EventBombDefused, EventBombPlanted, EventPlayerPing, EventRoundEnd,
    EventRoundFreezeEnd, EventRoundPoststart, EventRoundPrestart, EventRoundStart, GameEvent,
};
