//! Player controller and pawn snapshots

use retakes_sdk::{RawPlayer, Vector};

/// Maximum number of player slots (CS2 default)
pub const MAX_PLAYERS: usize = 64;

/// Team numbers as reported by the engine
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Team {
    #[default]
    None = 0,
    Spectator = 1,
    Terrorist = 2,
    CounterTerrorist = 3,
}

impl From<i32> for Team {
    fn from(value: i32) -> Self {
        match value {
            1 => Self::Spectator,
            2 => Self::Terrorist,
            3 => Self::CounterTerrorist,
            _ => Self::None,
        }
    }
}

/// The physical player entity: position and life state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerPawn {
    origin: Vector,
}

impl PlayerPawn {
    /// Create a pawn snapshot at `origin`
    pub fn new(origin: Vector) -> Self {
        Self { origin }
    }

    /// World position of the pawn
    pub fn origin(&self) -> Vector {
        self.origin
    }
}

/// Snapshot of a player controller
///
/// The pawn is only present while it exists and is alive.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerController {
    slot: i32,
    user_id: i32,
    steam_id: u64,
    name: String,
    connected: bool,
    team: Team,
    pawn: Option<PlayerPawn>,
}

impl PlayerController {
    /// Create a connected controller without a pawn
    pub fn new(slot: i32, steam_id: u64, name: impl Into<String>) -> Self {
        Self {
            slot,
            user_id: slot,
            steam_id,
            name: name.into(),
            connected: true,
            team: Team::None,
            pawn: None,
        }
    }

    /// Attach a live pawn at `origin`
    pub fn with_pawn(mut self, origin: Vector) -> Self {
        self.pawn = Some(PlayerPawn::new(origin));
        self
    }

    /// Build a snapshot from the bridge's record
    pub fn from_raw(raw: &RawPlayer) -> Self {
        let len = raw
            .name
            .iter()
            .position(|&b| b == 0)
            .unwrap_or(raw.name.len());

        Self {
            slot: raw.slot,
            user_id: raw.user_id,
            steam_id: raw.steam_id,
            name: String::from_utf8_lossy(&raw.name[..len]).into_owned(),
            connected: raw.connected,
            team: Team::from(raw.team),
            pawn: raw.pawn_alive.then(|| PlayerPawn::new(raw.origin)),
        }
    }

    /// Player slot (0-63)
    pub fn slot(&self) -> i32 {
        self.slot
    }

    /// User ID as used in game events
    pub fn user_id(&self) -> i32 {
        self.user_id
    }

    /// SteamID64 (0 for bots)
    pub fn steam_id(&self) -> u64 {
        self.steam_id
    }

    /// Player name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Check if the player is fully connected
    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn is_bot(&self) -> bool {
        self.steam_id == 0
    }

    pub fn team(&self) -> Team {
        self.team
    }

    /// Get the player pawn if it exists and is alive
    pub fn pawn(&self) -> Option<PlayerPawn> {
        self.pawn
    }

    /// Check if the player's pawn is currently alive
    pub fn is_alive(&self) -> bool {
        self.pawn.is_some()
    }

    /// Print a message to this player's chat
    pub fn print_to_chat(&self, message: &str) {
        crate::commands::print::print_to_chat(self.slot, message);
    }

    /// Print a message to this player's console
    pub fn print_to_console(&self, message: &str) {
        crate::commands::print::print_to_console(self.slot, message);
    }
}

// ============================================================================
// Player Access Utilities
// ============================================================================

/// Get a player controller by slot index
///
/// Returns `None` for an out-of-range slot, an empty slot, or before the
/// engine is initialized.
pub fn get_player_controller(slot: i32) -> Option<PlayerController> {
    if slot < 0 || slot >= MAX_PLAYERS as i32 {
        return None;
    }

    let raw = retakes_engine::try_engine()?.get_player(slot)?;
    Some(PlayerController::from_raw(&raw))
}

/// Get a player controller by userid
///
/// The userid from game events encodes the slot in the lower byte.
pub fn get_player_controller_by_userid(userid: i32) -> Option<PlayerController> {
    if userid < 0 {
        return None;
    }
    get_player_controller(userid & 0xFF)
}

/// Get all connected player controllers
pub fn get_players() -> impl Iterator<Item = PlayerController> {
    (0..MAX_PLAYERS as i32)
        .filter_map(get_player_controller)
        .filter(PlayerController::is_connected)
}

/// Find a connected player by SteamID64
pub fn find_player_by_steamid(steam_id: u64) -> Option<PlayerController> {
    get_players().find(|controller| controller.steam_id() == steam_id)
}

/// Get the number of connected players
pub fn player_count() -> usize {
    get_players().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_player(name: &str, alive: bool) -> RawPlayer {
        let mut raw = RawPlayer {
            slot: 4,
            user_id: 260,
            steam_id: 76561198000000042,
            connected: true,
            team: 3,
            pawn_alive: alive,
            origin: Vector::new(1.0, 2.0, 3.0),
            ..RawPlayer::default()
        };
        raw.name[..name.len()].copy_from_slice(name.as_bytes());
        raw
    }

    #[test]
    fn test_from_raw() {
        let controller = PlayerController::from_raw(&raw_player("operator", true));

        assert_eq!(controller.slot(), 4);
        assert_eq!(controller.user_id(), 260);
        assert_eq!(controller.name(), "operator");
        assert_eq!(controller.team(), Team::CounterTerrorist);
        assert!(controller.is_connected());
        assert!(!controller.is_bot());
        assert_eq!(
            controller.pawn().map(|pawn| pawn.origin()),
            Some(Vector::new(1.0, 2.0, 3.0))
        );
    }

    #[test]
    fn test_dead_player_has_no_pawn() {
        let controller = PlayerController::from_raw(&raw_player("ghost", false));
        assert!(controller.pawn().is_none());
        assert!(!controller.is_alive());
    }

    #[test]
    fn test_team_from_i32() {
        assert_eq!(Team::from(2), Team::Terrorist);
        assert_eq!(Team::from(1), Team::Spectator);
        assert_eq!(Team::from(42), Team::None);
    }

    #[test]
    fn test_lookup_out_of_range() {
        assert!(get_player_controller(-1).is_none());
        assert!(get_player_controller(MAX_PLAYERS as i32).is_none());
        assert!(get_player_controller_by_userid(-5).is_none());
    }
}
