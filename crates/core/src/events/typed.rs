//! Typed game event structures
//!
//! Strongly-typed views over the round, bomb and ping events.

use super::raw::GameEventRef;

/// Trait for typed game events
pub trait GameEvent: Sized {
    /// The event name (e.g., "round_start")
    const NAME: &'static str;

    /// Create from a raw event reference
    fn from_raw(event: &GameEventRef) -> Self;
}

/// Round pre-start event (before players respawn)
#[derive(Debug, Clone)]
pub struct EventRoundPrestart;

impl GameEvent for EventRoundPrestart {
    const NAME: &'static str = "round_prestart";

    fn from_raw(_event: &GameEventRef) -> Self {
        Self
    }
}

/// Round start event
#[derive(Debug, Clone)]
pub struct EventRoundStart {
    /// Time limit for the round
    pub timelimit: i32,
    /// Frag limit for the round
    pub fraglimit: i32,
    /// Round objective
    pub objective: String,
}

impl GameEvent for EventRoundStart {
    const NAME: &'static str = "round_start";

    fn from_raw(event: &GameEventRef) -> Self {
        Self {
            timelimit: event.get_int("timelimit", 0),
            fraglimit: event.get_int("fraglimit", 0),
            objective: event.get_string("objective", ""),
        }
    }
}

/// Round post-start event (players spawned)
#[derive(Debug, Clone)]
pub struct EventRoundPoststart;

impl GameEvent for EventRoundPoststart {
    const NAME: &'static str = "round_poststart";

    fn from_raw(_event: &GameEventRef) -> Self {
        Self
    }
}

/// Round freeze end event (buy time ended)
#[derive(Debug, Clone)]
pub struct EventRoundFreezeEnd;

impl GameEvent for EventRoundFreezeEnd {
    const NAME: &'static str = "round_freeze_end";

    fn from_raw(_event: &GameEventRef) -> Self {
        Self
    }
}

/// Round end event
#[derive(Debug, Clone)]
pub struct EventRoundEnd {
    /// Winning team
    pub winner: i32,
    /// Reason for round end
    pub reason: i32,
    /// Legacy message (deprecated)
    pub message: String,
}

impl GameEvent for EventRoundEnd {
    const NAME: &'static str = "round_end";

    fn from_raw(event: &GameEventRef) -> Self {
        Self {
            winner: event.get_int("winner", 0),
            reason: event.get_int("reason", 0),
            message: event.get_string("message", ""),
        }
    }
}

/// Bomb planted event
#[derive(Debug, Clone)]
pub struct EventBombPlanted {
    /// User ID of the player who planted
    pub userid: i32,
    /// Site entity index
    pub site: i32,
}

impl GameEvent for EventBombPlanted {
    const NAME: &'static str = "bomb_planted";

    fn from_raw(event: &GameEventRef) -> Self {
        Self {
            userid: event.get_int("userid", -1),
            site: event.get_int("site", 0),
        }
    }
}

/// Bomb defused event
#[derive(Debug, Clone)]
pub struct EventBombDefused {
    /// User ID of the player who defused
    pub userid: i32,
    /// Site entity index
    pub site: i32,
}

impl GameEvent for EventBombDefused {
    const NAME: &'static str = "bomb_defused";

    fn from_raw(event: &GameEventRef) -> Self {
        Self {
            userid: event.get_int("userid", -1),
            site: event.get_int("site", 0),
        }
    }
}

/// Player ping event (map marker placed with the ping wheel)
#[derive(Debug, Clone)]
pub struct EventPlayerPing {
    /// User ID of the pinging player
    pub userid: i32,
    /// Entity the ping landed on, if any
    pub entityid: i32,
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub urgent: bool,
}

impl GameEvent for EventPlayerPing {
    const NAME: &'static str = "player_ping";

    fn from_raw(event: &GameEventRef) -> Self {
        Self {
            userid: event.get_int("userid", -1),
            entityid: event.get_int("entityid", -1),
            x: event.get_float("x", 0.0),
            y: event.get_float("y", 0.0),
            z: event.get_float("z", 0.0),
            urgent: event.get_bool("urgent", false),
        }
    }
}

/// Helper function to register a typed event handler
pub fn register_typed_event<E, F>(post: bool, callback: F)
where
    E: GameEvent,
    F: Fn(E, &mut super::EventInfo) -> super::HookResult + Send + Sync + 'static,
{
    super::register_event(E::NAME, post, move |event, info| {
        let typed = E::from_raw(event);
        callback(typed, info)
    });
}
