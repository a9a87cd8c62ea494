//! Barrier plugin settings
//!
//! Stored at `<dataDir>/configs/plugins/retakes_barriers/retakes_barriers.toml`.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use retakes_core::PluginConfig;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrierSettings {
    /// Raise barriers at round start and clear them after freeze time
    pub is_barrier_enabled: bool,

    /// Seconds after freeze time ends before barriers drop
    pub barrier_remove_delay: f32,
}

impl Default for BarrierSettings {
    fn default() -> Self {
        Self {
            is_barrier_enabled: false,
            barrier_remove_delay: 3.0,
        }
    }
}

impl PluginConfig for BarrierSettings {
    const PLUGIN_NAME: &'static str = "retakes_barriers";
}

impl BarrierSettings {
    /// Removal delay; negative or non-finite values mean immediately
    pub fn remove_delay(&self) -> Duration {
        Duration::try_from_secs_f32(self.barrier_remove_delay).unwrap_or(Duration::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let settings: BarrierSettings = toml::from_str("").unwrap();
        assert!(!settings.is_barrier_enabled);
        assert_eq!(settings.remove_delay(), Duration::from_secs(3));
    }

    #[test]
    fn test_bad_delay_is_immediate() {
        let settings = BarrierSettings {
            is_barrier_enabled: true,
            barrier_remove_delay: -1.0,
        };
        assert_eq!(settings.remove_delay(), Duration::ZERO);
    }

    #[test]
    fn test_load_in_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let settings = BarrierSettings::load_in(dir.path()).unwrap();
        assert_eq!(settings, BarrierSettings::default());
        assert!(dir
            .path()
            .join("configs/plugins/retakes_barriers/retakes_barriers.toml")
            .exists());
    }
}
