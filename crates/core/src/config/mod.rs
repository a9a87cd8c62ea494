//! Configuration system
//!
//! Trait-based TOML configuration:
//! - Type-safe config structs via serde
//! - Default config written on first load
//! - Manual reload
//!
//! # Example
//!
//! ```ignore
//! use serde::{Deserialize, Serialize};
//! use retakes_core::PluginConfig;
//!
//! #[derive(Default, Serialize, Deserialize)]
//! pub struct MyPluginConfig {
//!     pub enabled: bool,
//! }
//!
//! impl PluginConfig for MyPluginConfig {
//!     const PLUGIN_NAME: &'static str = "my_plugin";
//! }
//!
//! let config = MyPluginConfig::load().unwrap_or_default();
//! ```

mod loader;

use std::path::Path;

use serde::{de::DeserializeOwned, Deserialize, Serialize};

pub use loader::{
    configs_dir, configs_dir_in, core_config_path, data_dir, gamedata_path, plugin_config_path,
    plugin_config_path_in,
};

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),

    /// The engine has not reported a data directory yet
    #[error("Config directory not available - engine not initialized")]
    NoConfigDirectory,
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Trait for plugin configuration types.
///
/// Configs are stored at
/// `<dataDir>/configs/plugins/{PLUGIN_NAME}/{PLUGIN_NAME}.toml`.
/// The `*_in` variants take the data directory explicitly.
pub trait PluginConfig: Default + Serialize + DeserializeOwned + Send + Sync {
    /// The plugin name used for config file path resolution.
    const PLUGIN_NAME: &'static str;

    /// Load config from file, creating default if missing.
    fn load() -> ConfigResult<Self> {
        Self::load_in(&loader::data_dir()?)
    }

    /// Load config under an explicit data directory
    fn load_in(data_dir: &Path) -> ConfigResult<Self> {
        let path = plugin_config_path_in(data_dir, Self::PLUGIN_NAME);
        let config = loader::load_or_create(&path)?;
        tracing::debug!("Loaded config for {}", Self::PLUGIN_NAME);
        Ok(config)
    }

    /// Save config to file.
    fn save(&self) -> ConfigResult<()> {
        self.save_in(&loader::data_dir()?)
    }

    /// Save config under an explicit data directory
    fn save_in(&self, data_dir: &Path) -> ConfigResult<()> {
        loader::write(&plugin_config_path_in(data_dir, Self::PLUGIN_NAME), self)
    }

    /// Reload config from file.
    ///
    /// On error `self` is left unchanged.
    fn reload(&mut self) -> ConfigResult<()> {
        self.reload_in(&loader::data_dir()?)
    }

    /// Reload config under an explicit data directory
    fn reload_in(&mut self, data_dir: &Path) -> ConfigResult<()> {
        *self = loader::read(&plugin_config_path_in(data_dir, Self::PLUGIN_NAME))?;
        tracing::debug!("Reloaded config for {}", Self::PLUGIN_NAME);
        Ok(())
    }
}

/// Core framework configuration.
///
/// Loaded from `<dataDir>/configs/core.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    pub fn load() -> ConfigResult<Self> {
        loader::load_or_create(&core_config_path()?)
    }

    /// Load core config under an explicit data directory
    pub fn load_in(data_dir: &Path) -> ConfigResult<Self> {
        loader::load_or_create(&configs_dir_in(data_dir).join("core.toml"))
    }

    /// Save core config to file.
    pub fn save(&self) -> ConfigResult<()> {
        loader::write(&core_config_path()?, self)
    }

    /// Default tracing filter directive for this config
    pub fn log_level(&self) -> &'static str {
        if self.debug {
            "debug"
        } else {
            "info"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    #[serde(default)]
    struct TestConfig {
        pub enabled: bool,
        pub delay: f32,
    }

    impl Default for TestConfig {
        fn default() -> Self {
            Self {
                enabled: false,
                delay: 3.0,
            }
        }
    }

    impl PluginConfig for TestConfig {
        const PLUGIN_NAME: &'static str = "test_plugin";
    }

    #[test]
    fn test_load_creates_default() {
        let dir = tempfile::tempdir().unwrap();

        let config = TestConfig::load_in(dir.path()).unwrap();
        assert_eq!(config, TestConfig::default());
        assert!(plugin_config_path_in(dir.path(), "test_plugin").exists());
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = TestConfig::load_in(dir.path()).unwrap();
        let edited = TestConfig {
            enabled: true,
            delay: 5.5,
        };
        edited.save_in(dir.path()).unwrap();

        config.reload_in(dir.path()).unwrap();
        assert_eq!(config, edited);
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = plugin_config_path_in(dir.path(), "test_plugin");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "enabled = true\n").unwrap();

        let config = TestConfig::load_in(dir.path()).unwrap();
        assert!(config.enabled);
        assert_eq!(config.delay, 3.0);
    }

    #[test]
    fn test_bad_toml_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = plugin_config_path_in(dir.path(), "test_plugin");
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "enabled = [").unwrap();

        assert!(matches!(
            TestConfig::load_in(dir.path()),
            Err(ConfigError::ParseError(_))
        ));
    }

    #[test]
    fn test_core_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = CoreConfig::load_in(dir.path()).unwrap();
        assert_eq!(config.version, 1);
        assert_eq!(config.log_level(), "info");

        let debug = CoreConfig {
            version: 2,
            debug: true,
        };
        let toml_str = toml::to_string_pretty(&debug).unwrap();
        assert!(toml_str.contains("debug = true"));
        assert_eq!(debug.log_level(), "debug");
    }
}
