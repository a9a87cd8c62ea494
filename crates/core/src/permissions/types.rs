//! Permission flags held by one player

use std::collections::HashSet;

/// Permission prefix character for user flags
pub const PERMISSION_PREFIX: char = '@';

/// Flags granted to a single player
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermissionData {
    /// Set of permission strings (e.g., "@css/root")
    pub permissions: HashSet<String>,
}

impl PermissionData {
    /// Create empty permission data
    pub fn new() -> Self {
        Self::default()
    }

    /// Add permissions; entries without the `@` prefix are ignored
    pub fn add<S: AsRef<str>>(&mut self, permissions: &[S]) {
        for perm in permissions {
            let perm = perm.as_ref().trim();
            if perm.starts_with(PERMISSION_PREFIX) {
                self.permissions.insert(perm.to_string());
            } else if !perm.is_empty() {
                tracing::warn!("Ignoring malformed permission flag '{}'", perm);
            }
        }
    }

    /// Remove permissions from this data
    pub fn remove<S: AsRef<str>>(&mut self, permissions: &[S]) {
        for perm in permissions {
            self.permissions.remove(perm.as_ref().trim());
        }
    }

    /// Check if has a specific permission
    ///
    /// `@domain/root` and `@domain/*` grant every `@domain/...` flag.
    pub fn has(&self, permission: &str) -> bool {
        if self.permissions.contains(permission) {
            return true;
        }

        extract_domain(permission).is_some_and(|domain| {
            self.permissions.contains(&format!("@{}/root", domain))
                || self.permissions.contains(&format!("@{}/*", domain))
        })
    }

    /// Check if has any of the given permissions
    pub fn has_any(&self, permissions: &[&str]) -> bool {
        permissions.iter().any(|p| self.has(p))
    }

    /// Check if empty (no permissions)
    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

/// Extract domain from permission string
///
/// `@domain/flag` -> `Some("domain")`
pub fn extract_domain(permission: &str) -> Option<&str> {
    permission
        .strip_prefix(PERMISSION_PREFIX)?
        .split_once('/')
        .map(|(domain, _)| domain)
        .filter(|domain| !domain.is_empty())
}

/// Split a flag list as sent by the bridge: `"@css/root, @css/ban"` or
/// space separated
pub fn parse_flag_list(flags: &str) -> Vec<&str> {
    flags
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|flag| !flag.is_empty())
        .collect()
}

/// Built-in permission flags (CounterStrikeSharp compatible)
pub mod flags {
    /// Root admin - grants all @css/* permissions
    pub const ROOT: &str = "@css/root";
    /// Generic admin permission
    pub const GENERIC: &str = "@css/generic";
    /// Change map
    pub const CHANGEMAP: &str = "@css/changemap";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_domain() {
        assert_eq!(extract_domain("@css/root"), Some("css"));
        assert_eq!(extract_domain("@retakes/editor"), Some("retakes"));
        assert_eq!(extract_domain("@css"), None);
        assert_eq!(extract_domain("@/x"), None);
        assert_eq!(extract_domain("css/root"), None);
    }

    #[test]
    fn test_root_flag_covers_domain() {
        let mut data = PermissionData::new();
        data.add(&[flags::ROOT]);

        assert!(data.has(flags::ROOT));
        assert!(data.has(flags::CHANGEMAP));
        assert!(!data.has("@other/perm"));
    }

    #[test]
    fn test_generic_is_not_root() {
        let mut data = PermissionData::new();
        data.add(&[flags::GENERIC]);

        assert!(data.has(flags::GENERIC));
        assert!(!data.has(flags::ROOT));
        assert!(!data.has_any(&[flags::ROOT, flags::CHANGEMAP]));
    }

    #[test]
    fn test_add_remove_and_malformed() {
        let mut data = PermissionData::new();
        data.add(&["@retakes/*", "not-a-flag", ""]);
        assert_eq!(data.permissions.len(), 1);
        assert!(data.has("@retakes/editor"));

        data.remove(&["@retakes/*"]);
        assert!(data.is_empty());
    }

    #[test]
    fn test_parse_flag_list() {
        assert_eq!(
            parse_flag_list("@css/root, @css/ban  @css/kick"),
            vec!["@css/root", "@css/ban", "@css/kick"]
        );
        assert!(parse_flag_list(" , ").is_empty());
    }
}
