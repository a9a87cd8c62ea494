//! Per-map barrier storage
//!
//! One store per map, backed by `<dataDir>/map_config/barriers/<map>.json`.
//! Every mutation sanitizes, saves and re-reads the file, so the in-memory
//! list always mirrors what the next map load will see.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::models::{Barrier, BarrierConfigData};

/// Errors from barrier file I/O
#[derive(Debug, Error)]
pub enum StoreError {
    /// Nothing has been loaded for this map yet
    #[error("barrier config for '{0}' has not been loaded")]
    Uninitialized(String),

    #[error("barrier config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse barrier config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result of [`BarrierStore::load`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// File read and parsed
    Loaded,
    /// File was missing; an empty one was written
    Created,
    /// File was missing and nothing was written
    Missing,
    /// File exists but could not be read; previous state kept
    Failed,
}

/// Result of [`BarrierStore::add_barrier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddOutcome {
    Added,
    Duplicate,
    /// Kept in memory but the file could not be written
    NotPersisted,
}

/// Result of [`BarrierStore::remove_barrier`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveOutcome {
    Removed,
    NotFound,
    /// Removed in memory but the file could not be written
    NotPersisted,
}

/// Directory holding every map's barrier file
pub fn barrier_dir(data_dir: &Path) -> PathBuf {
    data_dir.join("map_config").join("barriers")
}

/// Barrier geometry for a single map
#[derive(Debug)]
pub struct BarrierStore {
    map_name: String,
    path: PathBuf,
    data: Option<BarrierConfigData>,
}

impl BarrierStore {
    /// Create an unloaded store for `map_name` under `data_dir`
    pub fn new(data_dir: &Path, map_name: &str) -> Self {
        Self {
            map_name: map_name.to_string(),
            path: barrier_dir(data_dir).join(format!("{}.json", map_name)),
            data: None,
        }
    }

    pub fn map_name(&self) -> &str {
        &self.map_name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether this store belongs to `map_name` and holds a document
    pub fn is_loaded_for(&self, map_name: &str) -> bool {
        self.map_name == map_name && self.data.is_some()
    }

    /// Read the map's barrier file
    ///
    /// A missing file is bootstrapped with an empty document unless the load
    /// was requested by an operator (`via_command`), in which case nothing is
    /// written and the current state is kept.
    #[tracing::instrument(skip(self), fields(map = %self.map_name))]
    pub fn load(&mut self, via_command: bool) -> LoadOutcome {
        tracing::debug!("Loading barriers from {:?}", self.path);

        if !self.path.exists() {
            tracing::warn!("No barrier config found for map {}", self.map_name);
            if via_command {
                return LoadOutcome::Missing;
            }

            self.data = Some(BarrierConfigData::default());
            if let Err(e) = self.save() {
                tracing::error!("Failed to write empty barrier config: {}", e);
            }
            return LoadOutcome::Created;
        }

        match self.read() {
            Ok(data) => {
                tracing::info!(
                    "Loaded {} barrier(s) for {}",
                    data.barriers.len(),
                    self.map_name
                );
                self.data = Some(data);
                LoadOutcome::Loaded
            }
            Err(e) => {
                tracing::error!("Failed to load barrier config {:?}: {}", self.path, e);
                LoadOutcome::Failed
            }
        }
    }

    /// Independent copy of the current barrier list
    pub fn barriers_snapshot(&self) -> Result<Vec<Barrier>, StoreError> {
        self.data
            .as_ref()
            .map(|data| data.barriers.clone())
            .ok_or_else(|| StoreError::Uninitialized(self.map_name.clone()))
    }

    /// Append a barrier unless an identical one exists
    pub fn add_barrier(&mut self, barrier: Barrier) -> AddOutcome {
        let data = self.data.get_or_insert_with(BarrierConfigData::default);

        if data.contains(&barrier) {
            tracing::warn!("Barrier already exists, avoiding duplication");
            return AddOutcome::Duplicate;
        }

        data.barriers.push(barrier);
        if let Err(e) = self.persist() {
            tracing::error!("Barrier added but not saved: {}", e);
            return AddOutcome::NotPersisted;
        }

        tracing::info!("Barrier added for bombsite {}", barrier.bombsite);
        AddOutcome::Added
    }

    /// Remove the first barrier identical to `barrier`
    pub fn remove_barrier(&mut self, barrier: &Barrier) -> RemoveOutcome {
        let data = self.data.get_or_insert_with(BarrierConfigData::default);

        let Some(index) = data.barriers.iter().position(|b| b == barrier) else {
            tracing::warn!("Barrier doesn't exist, nothing to remove");
            return RemoveOutcome::NotFound;
        };

        data.barriers.remove(index);
        if let Err(e) = self.persist() {
            tracing::error!("Barrier removed but not saved: {}", e);
            return RemoveOutcome::NotPersisted;
        }

        tracing::info!("Barrier removed for bombsite {}", barrier.bombsite);
        RemoveOutcome::Removed
    }

    /// Save, then re-read what was written
    fn persist(&mut self) -> Result<(), StoreError> {
        self.save()?;
        self.data = Some(self.read()?);
        Ok(())
    }

    fn read(&self) -> Result<BarrierConfigData, StoreError> {
        let content = std::fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&content)?)
    }

    fn save(&mut self) -> Result<(), StoreError> {
        let data = self
            .data
            .as_mut()
            .ok_or_else(|| StoreError::Uninitialized(self.map_name.clone()))?;

        let dropped = data.sanitize();
        if dropped > 0 {
            tracing::debug!("Dropped {} duplicate barrier(s) before saving", dropped);
        }

        let json = serde_json::to_string_pretty(data)?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)?;
        tracing::debug!("Barriers written to {:?}", self.path);
        Ok(())
    }
}
