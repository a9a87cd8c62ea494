//! Barrier activation
//!
//! Keeps a per-site index of the store's barriers and drives the blocking
//! volume controller. Nothing here fails outward: controller errors are
//! logged and the next barrier is still attempted.

use std::collections::HashMap;

use retakes_sdk::{Bombsite, Vector};

use crate::controller::BlockingVolumeController;
use crate::models::Barrier;
use crate::store::BarrierStore;

/// Site-indexed barriers plus the controller that raises them
pub struct BarrierManager {
    controller: Box<dyn BlockingVolumeController>,
    index: HashMap<Bombsite, Vec<Barrier>>,
}

impl BarrierManager {
    pub fn new(controller: Box<dyn BlockingVolumeController>) -> Self {
        Self {
            controller,
            index: Bombsite::ALL.into_iter().map(|site| (site, Vec::new())).collect(),
        }
    }

    pub fn is_available(&self) -> bool {
        self.controller.is_available()
    }

    /// Re-bucket every barrier in `store` by site
    pub fn rebuild_index(&mut self, store: &BarrierStore) {
        self.index.clear();
        for site in Bombsite::ALL {
            self.index.insert(site, Vec::new());
        }

        match store.barriers_snapshot() {
            Ok(barriers) => {
                for barrier in barriers {
                    self.index.entry(barrier.bombsite).or_default().push(barrier);
                }
                tracing::info!(
                    "Map barriers indexed: A={}, B={}",
                    self.barriers(Bombsite::A).len(),
                    self.barriers(Bombsite::B).len()
                );
            }
            Err(e) => tracing::warn!("No barriers configured: {}", e),
        }
    }

    /// Drop every indexed barrier
    pub fn clear_index(&mut self) {
        for barriers in self.index.values_mut() {
            barriers.clear();
        }
    }

    pub fn barriers(&self, site: Bombsite) -> &[Barrier] {
        self.index.get(&site).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Raise every barrier for `site`
    ///
    /// Returns how many were raised.
    pub fn spawn_barriers(&self, site: Bombsite) -> usize {
        if !self.controller.is_available() {
            tracing::warn!("Barrier spawn function not available");
            return 0;
        }

        let barriers = self.barriers(site);
        if barriers.is_empty() {
            tracing::debug!("No barriers configured for bombsite {}", site);
            return 0;
        }

        let mut spawned = 0;
        for barrier in barriers {
            match self.controller.activate(barrier.min_pos, barrier.max_pos) {
                Ok(()) => spawned += 1,
                Err(e) => tracing::error!("Failed to spawn barrier for {}: {}", site, e),
            }
        }
        tracing::debug!("Spawned {}/{} barrier(s) for {}", spawned, barriers.len(), site);
        spawned
    }

    /// Clear all active barriers
    pub fn remove_barriers(&self) {
        if !self.controller.is_available() {
            return;
        }

        match self.controller.clear() {
            Ok(()) => tracing::debug!("Barriers removed"),
            Err(e) => tracing::error!("Failed to remove barriers: {}", e),
        }
    }

    /// Closest barrier of `site` to `origin`, measured to its center
    pub fn nearest_barrier(&self, site: Bombsite, origin: Vector) -> Option<(Barrier, f32)> {
        self.barriers(site)
            .iter()
            .map(|barrier| (*barrier, origin.distance(&barrier.center())))
            .min_by(|a, b| a.1.total_cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use parking_lot::Mutex;

    use super::*;
    use crate::controller::ControllerError;
    use crate::store::BarrierStore;

    #[derive(Default)]
    struct Calls {
        activated: Vec<(Vector, Vector)>,
        cleared: usize,
    }

    struct FakeController {
        available: bool,
        fail_at: Option<usize>,
        calls: Arc<Mutex<Calls>>,
    }

    impl BlockingVolumeController for FakeController {
        fn is_available(&self) -> bool {
            self.available
        }

        fn activate(&self, min: Vector, max: Vector) -> Result<(), ControllerError> {
            let mut calls = self.calls.lock();
            calls.activated.push((min, max));
            if self.fail_at == Some(calls.activated.len() - 1) {
                return Err(ControllerError::Unavailable);
            }
            Ok(())
        }

        fn clear(&self) -> Result<(), ControllerError> {
            self.calls.lock().cleared += 1;
            Ok(())
        }
    }

    fn manager(available: bool, fail_at: Option<usize>) -> (BarrierManager, Arc<Mutex<Calls>>) {
        let calls = Arc::new(Mutex::new(Calls::default()));
        let controller = FakeController {
            available,
            fail_at,
            calls: calls.clone(),
        };
        (BarrierManager::new(Box::new(controller)), calls)
    }

    fn store_with(dir: &std::path::Path, barriers: &[Barrier]) -> BarrierStore {
        let mut store = BarrierStore::new(dir, "de_test");
        store.load(false);
        for barrier in barriers {
            store.add_barrier(*barrier);
        }
        store
    }

    fn box_at(x: f32, site: Bombsite) -> Barrier {
        Barrier::new(Vector::new(x - 10.0, -10.0, -10.0), Vector::new(x + 10.0, 10.0, 10.0), site)
    }

    #[test]
    fn test_index_by_site() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            dir.path(),
            &[box_at(0.0, Bombsite::A), box_at(50.0, Bombsite::B), box_at(90.0, Bombsite::A)],
        );
        let (mut manager, _) = manager(true, None);
        manager.rebuild_index(&store);

        assert_eq!(manager.barriers(Bombsite::A), &[box_at(0.0, Bombsite::A), box_at(90.0, Bombsite::A)]);
        assert_eq!(manager.barriers(Bombsite::B), &[box_at(50.0, Bombsite::B)]);
    }

    #[test]
    fn test_unloaded_store_gives_empty_index() {
        let dir = tempfile::tempdir().unwrap();
        let store = BarrierStore::new(dir.path(), "de_unloaded");
        let (mut manager, _) = manager(true, None);
        manager.rebuild_index(&store);

        assert!(manager.barriers(Bombsite::A).is_empty());
        assert!(manager.barriers(Bombsite::B).is_empty());
    }

    #[test]
    fn test_spawn_continues_after_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(
            dir.path(),
            &[box_at(0.0, Bombsite::A), box_at(100.0, Bombsite::A), box_at(200.0, Bombsite::A)],
        );
        let (mut manager, calls) = manager(true, Some(1));
        manager.rebuild_index(&store);

        assert_eq!(manager.spawn_barriers(Bombsite::A), 2);
        assert_eq!(calls.lock().activated.len(), 3);
        assert_eq!(manager.spawn_barriers(Bombsite::B), 0);
    }

    #[test]
    fn test_unavailable_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(dir.path(), &[box_at(0.0, Bombsite::A)]);
        let (mut manager, calls) = manager(false, None);
        manager.rebuild_index(&store);

        assert_eq!(manager.spawn_barriers(Bombsite::A), 0);
        manager.remove_barriers();
        assert!(calls.lock().activated.is_empty());
        assert_eq!(calls.lock().cleared, 0);
    }

    #[test]
    fn test_remove_is_one_clear() {
        let (manager, calls) = manager(true, None);
        manager.remove_barriers();
        manager.remove_barriers();
        assert_eq!(calls.lock().cleared, 2);
        assert!(calls.lock().activated.is_empty());
    }

    #[test]
    fn test_nearest_barrier() {
        let dir = tempfile::tempdir().unwrap();
        let store = store_with(dir.path(), &[box_at(0.0, Bombsite::A), box_at(1000.0, Bombsite::A)]);
        let (mut manager, _) = manager(true, None);
        manager.rebuild_index(&store);

        let (nearest, distance) = manager
            .nearest_barrier(Bombsite::A, Vector::new(10.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(nearest, box_at(0.0, Bombsite::A));
        assert_eq!(distance, 10.0);

        assert!(manager.nearest_barrier(Bombsite::B, Vector::ZERO).is_none());
    }
}
