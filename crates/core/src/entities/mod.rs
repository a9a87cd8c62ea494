//! Player snapshots
//!
//! The native bridge answers player queries with [`RawPlayer`] records; this
//! module turns them into owned [`PlayerController`] values with an optional
//! [`PlayerPawn`]. Snapshots are taken on demand and never cached, so a
//! handler always sees the player as the engine reports them right now.
//!
//! ```ignore
//! use retakes_core::entities::{get_player_controller, get_players};
//!
//! if let Some(controller) = get_player_controller(0) {
//!     if let Some(pawn) = controller.pawn() {
//!         tracing::info!("{} stands at {}", controller.name(), pawn.origin());
//!     }
//! }
//!
//! for controller in get_players() {
//!     tracing::info!("{} ({})", controller.name(), controller.steam_id());
//! }
//! ```
//!
//! [`RawPlayer`]: retakes_sdk::RawPlayer

pub mod player;

pub use player::{
    find_player_by_steamid, get_player_controller, get_player_controller_by_userid, get_players,
    player_count, PlayerController, PlayerPawn, Team, MAX_PLAYERS,
};
