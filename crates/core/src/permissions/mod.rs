//! Permission registry
//!
//! Flags use the CounterStrikeSharp format `@domain/flag`; `@domain/root`
//! grants every flag in its domain. The registry only stores what it is told:
//! the native bridge pushes grants on load and when admins connect.
//!
//! ```ignore
//! use retakes_core::permissions::{add_permissions, player_has_permission, flags};
//!
//! add_permissions(76561198012345678, &[flags::ROOT]);
//!
//! if player_has_permission(&controller, flags::ROOT) {
//!     // allowed
//! }
//! ```

mod registry;
mod types;

use crate::entities::PlayerController;

pub use types::{extract_domain, flags, parse_flag_list, PermissionData, PERMISSION_PREFIX};

pub use registry::{
    add_permissions, clear_all, clear_permissions, get_permissions, has_any_permission,
    has_permission, is_registered, remove_permissions, set_permissions,
};

/// Check if a player controller has a specific permission
pub fn player_has_permission(player: &PlayerController, permission: &str) -> bool {
    has_permission(player.steam_id(), permission)
}

/// Check if a player controller has any of the given permissions
pub fn player_has_any_permission(player: &PlayerController, permissions: &[&str]) -> bool {
    has_any_permission(player.steam_id(), permissions)
}

/// Grant flags from a bridge-supplied list (`"@css/root,@css/ban"`)
///
/// Returns the number of flags parsed.
pub fn grant_from_list(steam_id: u64, flag_list: &str) -> usize {
    let parsed = parse_flag_list(flag_list);
    add_permissions(steam_id, &parsed);
    tracing::debug!("Granted {} flag(s) to {}", parsed.len(), steam_id);
    parsed.len()
}
