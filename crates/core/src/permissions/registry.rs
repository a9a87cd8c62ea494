//! Permission registry keyed by SteamID64

use std::collections::HashSet;
use std::sync::LazyLock;

use dashmap::DashMap;

use super::types::PermissionData;

/// Global permission registry keyed by SteamID64
static REGISTRY: LazyLock<DashMap<u64, PermissionData>> = LazyLock::new(DashMap::new);

/// Add permission(s) to a player, creating the entry if needed
pub fn add_permissions<S: AsRef<str>>(steam_id: u64, permissions: &[S]) {
    REGISTRY.entry(steam_id).or_default().add(permissions);
}

/// Remove permission(s) from a player
///
/// The entry is dropped once it holds no flags.
pub fn remove_permissions<S: AsRef<str>>(steam_id: u64, permissions: &[S]) {
    if let Some(mut data) = REGISTRY.get_mut(&steam_id) {
        data.remove(permissions);
    }
    REGISTRY.remove_if(&steam_id, |_, data| data.is_empty());
}

/// Replace all permissions for a player
pub fn set_permissions<S: AsRef<str>>(steam_id: u64, permissions: &[S]) {
    let mut data = PermissionData::new();
    data.add(permissions);
    REGISTRY.insert(steam_id, data);
}

/// Remove the player from the registry
pub fn clear_permissions(steam_id: u64) {
    REGISTRY.remove(&steam_id);
}

/// Remove every player from the registry
pub fn clear_all() {
    REGISTRY.clear();
}

/// Check if a player has a specific permission
pub fn has_permission(steam_id: u64, permission: &str) -> bool {
    REGISTRY
        .get(&steam_id)
        .map(|data| data.has(permission))
        .unwrap_or(false)
}

/// Check if a player has any of the given permissions
pub fn has_any_permission(steam_id: u64, permissions: &[&str]) -> bool {
    REGISTRY
        .get(&steam_id)
        .map(|data| data.has_any(permissions))
        .unwrap_or(false)
}

/// All flags held by a player
pub fn get_permissions(steam_id: u64) -> HashSet<String> {
    REGISTRY
        .get(&steam_id)
        .map(|data| data.permissions.clone())
        .unwrap_or_default()
}

/// Whether the player has any flags registered
pub fn is_registered(steam_id: u64) -> bool {
    REGISTRY.contains_key(&steam_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    // Distinct SteamIDs per test; the registry is global
    const ADMIN: u64 = 76561198000001001;
    const PLAYER: u64 = 76561198000001002;

    #[test]
    fn test_grant_and_query() {
        add_permissions(ADMIN, &["@css/root"]);

        assert!(has_permission(ADMIN, "@css/root"));
        assert!(has_any_permission(ADMIN, &["@css/ban", "@x/y"]));
        assert!(!has_permission(PLAYER, "@css/root"));
        assert!(get_permissions(ADMIN).contains("@css/root"));

        clear_permissions(ADMIN);
        assert!(!is_registered(ADMIN));
    }

    #[test]
    fn test_remove_drops_empty_entry() {
        let steam_id = 76561198000001003;
        set_permissions(steam_id, &["@css/generic".to_string()]);
        assert!(is_registered(steam_id));

        remove_permissions(steam_id, &["@css/generic"]);
        assert!(!is_registered(steam_id));
    }
}
