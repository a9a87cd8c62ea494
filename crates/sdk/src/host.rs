//! Types exchanged with the native bridge
//!
//! The bridge owns every engine-facing call. It hands the plugin a table of
//! function pointers on load and answers player queries with [`RawPlayer`]
//! snapshots. All types here are `#[repr(C)]` and mirrored in the generated
//! C header.

use std::ffi::{c_char, c_int};

use crate::vector::Vector;

/// Maximum length of a player name including the null terminator
pub const MAX_PLAYER_NAME_LENGTH: usize = 128;

/// Snapshot of one player controller and its pawn
#[repr(C)]
#[derive(Clone, Copy)]
pub struct RawPlayer {
    /// Player slot (0-63)
    pub slot: c_int,
    /// User ID as used in game events
    pub user_id: c_int,
    /// SteamID64 (0 for bots)
    pub steam_id: u64,
    /// Null-terminated UTF-8 name
    pub name: [u8; MAX_PLAYER_NAME_LENGTH],
    /// Fully connected
    pub connected: bool,
    /// Team number (0 none, 1 spectator, 2 T, 3 CT)
    pub team: c_int,
    /// Pawn exists and is alive
    pub pawn_alive: bool,
    /// Pawn origin, only meaningful when `pawn_alive` is set
    pub origin: Vector,
}

impl Default for RawPlayer {
    fn default() -> Self {
        Self {
            slot: -1,
            user_id: -1,
            steam_id: 0,
            name: [0; MAX_PLAYER_NAME_LENGTH],
            connected: false,
            team: 0,
            pawn_alive: false,
            origin: Vector::ZERO,
        }
    }
}

/// Address range of a loaded game library
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RawModule {
    /// Lowest mapped address
    pub base: usize,
    /// Mapped size in bytes
    pub size: usize,
}

/// Queue a command on the server console (`mp_warmup_start`, `map de_dust2`, ...)
pub type ServerCommandFn = unsafe extern "C" fn(command: *const c_char);

/// Print a message to one client (destination values match `HUD_PRINT*`)
pub type ClientPrintFn = unsafe extern "C" fn(slot: c_int, destination: c_int, message: *const c_char);

/// Whether the game rules are currently in the warmup period
pub type IsWarmupPeriodFn = unsafe extern "C" fn() -> bool;

/// Fill `out` with the player in `slot`; returns false for an empty slot
pub type GetPlayerFn = unsafe extern "C" fn(slot: c_int, out: *mut RawPlayer) -> bool;

/// Fill `out` with the span of a game library by gamedata name ("server",
/// "engine2", ...); returns false when it is not loaded
pub type GetModuleFn = unsafe extern "C" fn(library: *const c_char, out: *mut RawModule) -> bool;

/// Function table handed to the plugin on load
#[repr(C)]
#[derive(Clone, Copy, Default)]
pub struct HostFunctions {
    pub server_command: Option<ServerCommandFn>,
    pub client_print: Option<ClientPrintFn>,
    pub is_warmup_period: Option<IsWarmupPeriodFn>,
    pub get_player: Option<GetPlayerFn>,
    pub get_module: Option<GetModuleFn>,
}

/// Native barrier toggle located in the server module by signature.
///
/// `remove == false` activates the volume spanned by `min`/`max`;
/// `remove == true` clears every active volume regardless of the corners.
pub type BarrierToggleFn = unsafe extern "C" fn(remove: bool, min: Vector, max: Vector, unused: f32);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_raw_player_default() {
        let player = RawPlayer::default();
        assert_eq!(player.slot, -1);
        assert!(!player.connected);
        assert!(!player.pawn_alive);
        assert!(player.name.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_host_functions_default_is_empty() {
        let host = HostFunctions::default();
        assert!(host.server_command.is_none());
        assert!(host.client_print.is_none());
        assert!(host.is_warmup_period.is_none());
        assert!(host.get_player.is_none());
        assert!(host.get_module.is_none());
    }
}
