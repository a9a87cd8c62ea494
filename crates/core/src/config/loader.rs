//! Config path resolution and TOML file helpers
//!
//! Every path hangs off the plugin data directory the native bridge reports
//! on load.

use std::path::{Path, PathBuf};

use serde::{de::DeserializeOwned, Serialize};

use super::{ConfigError, ConfigResult};

/// Plugin data directory as reported by the engine
pub fn data_dir() -> ConfigResult<PathBuf> {
    retakes_engine::try_engine()
        .map(|engine| engine.data_dir().to_path_buf())
        .ok_or(ConfigError::NoConfigDirectory)
}

/// Base configs directory under `data_dir`
pub fn configs_dir_in(data_dir: &Path) -> PathBuf {
    data_dir.join("configs")
}

/// Returns the base configs directory.
///
/// Path: `<dataDir>/configs/`
pub fn configs_dir() -> ConfigResult<PathBuf> {
    Ok(configs_dir_in(&data_dir()?))
}

/// Path of a plugin's config file under `data_dir`
pub fn plugin_config_path_in(data_dir: &Path, plugin_name: &str) -> PathBuf {
    configs_dir_in(data_dir)
        .join("plugins")
        .join(plugin_name)
        .join(format!("{}.toml", plugin_name))
}

/// Returns the path for a plugin's config file.
///
/// Path: `<dataDir>/configs/plugins/{plugin_name}/{plugin_name}.toml`
pub fn plugin_config_path(plugin_name: &str) -> ConfigResult<PathBuf> {
    Ok(plugin_config_path_in(&data_dir()?, plugin_name))
}

/// Returns the core framework config path.
///
/// Path: `<dataDir>/configs/core.toml`
pub fn core_config_path() -> ConfigResult<PathBuf> {
    Ok(configs_dir()?.join("core.toml"))
}

/// Gamedata file path: `<dataDir>/gamedata/gamedata.json`
pub fn gamedata_path() -> ConfigResult<PathBuf> {
    Ok(data_dir()?.join("gamedata").join("gamedata.json"))
}

/// Read a TOML file, writing `T::default()` there first if it is missing
pub(crate) fn load_or_create<T>(path: &Path) -> ConfigResult<T>
where
    T: Default + Serialize + DeserializeOwned,
{
    if path.exists() {
        read(path)
    } else {
        let default = T::default();
        write(path, &default)?;
        tracing::info!("Created default config at {:?}", path);
        Ok(default)
    }
}

/// Read and parse a TOML file
pub(crate) fn read<T: DeserializeOwned>(path: &Path) -> ConfigResult<T> {
    let content = std::fs::read_to_string(path)?;
    let value = toml::from_str(&content)?;
    tracing::debug!("Loaded config from {:?}", path);
    Ok(value)
}

/// Serialize to TOML, creating parent directories
pub(crate) fn write<T: Serialize>(path: &Path, value: &T) -> ConfigResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = toml::to_string_pretty(value)?;
    std::fs::write(path, content)?;
    tracing::debug!("Saved config to {:?}", path);
    Ok(())
}
