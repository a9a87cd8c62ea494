//! Barrier plugin state
//!
//! [`BarrierPlugin`] owns the store for the current map, the activation
//! manager, the editor session and the round bookkeeping. Command, event and
//! timer glue in [`crate::runtime`] forwards into it; the editor and round
//! handlers live in their own modules as further `impl` blocks.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::SeedableRng;

use retakes_core::commands::CommandInfo;
use retakes_core::entities::PlayerController;
use retakes_core::permissions::{flags, player_has_permission};

use crate::controller::BlockingVolumeController;
use crate::editor::EditorSession;
use crate::manager::BarrierManager;
use crate::rounds::RoundState;
use crate::server::{GameServer, ScheduledTask, Scheduler};
use crate::settings::BarrierSettings;
use crate::store::{BarrierStore, LoadOutcome};

/// Chat prefix for every operator-facing message
pub const CHAT_PREFIX: &str = "[Retakes]";

pub(crate) const NO_PERMISSION: &str = "You do not have permission to use this command.";

pub(crate) fn prefixed(message: &str) -> String {
    format!("{} {}", CHAT_PREFIX, message)
}

pub struct BarrierPlugin {
    pub(crate) data_dir: PathBuf,
    pub(crate) settings: BarrierSettings,
    pub(crate) store: Option<BarrierStore>,
    pub(crate) manager: BarrierManager,
    pub(crate) session: EditorSession,
    pub(crate) rounds: RoundState,
    pub(crate) server: Box<dyn GameServer>,
    pub(crate) scheduler: Box<dyn Scheduler>,
    pub(crate) rng: StdRng,
}

impl BarrierPlugin {
    pub fn new(
        data_dir: impl Into<PathBuf>,
        settings: BarrierSettings,
        controller: Box<dyn BlockingVolumeController>,
        server: Box<dyn GameServer>,
        scheduler: Box<dyn Scheduler>,
    ) -> Self {
        Self {
            data_dir: data_dir.into(),
            settings,
            store: None,
            manager: BarrierManager::new(controller),
            session: EditorSession::default(),
            rounds: RoundState::default(),
            server,
            scheduler,
            rng: StdRng::seed_from_u64(rand::random()),
        }
    }

    /// Replace the bombsite RNG
    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn settings(&self) -> &BarrierSettings {
        &self.settings
    }

    pub fn set_settings(&mut self, settings: BarrierSettings) {
        self.settings = settings;
    }

    pub fn store(&self) -> Option<&BarrierStore> {
        self.store.as_ref()
    }

    pub fn manager(&self) -> &BarrierManager {
        &self.manager
    }

    pub fn session(&self) -> &EditorSession {
        &self.session
    }

    pub fn rounds(&self) -> &RoundState {
        &self.rounds
    }

    /// Load the new map's barriers and reset per-map state
    #[tracing::instrument(skip(self))]
    pub fn on_map_start(&mut self, map_name: &str) -> LoadOutcome {
        let mut store = BarrierStore::new(&self.data_dir, map_name);
        let outcome = store.load(false);
        self.manager.rebuild_index(&store);
        self.store = Some(store);

        // Map timers were dropped with the old map
        self.session = EditorSession::default();
        self.rounds = RoundState::default();
        outcome
    }

    pub fn on_map_end(&mut self) {
        self.store = None;
        self.manager.clear_index();
        self.session = EditorSession::default();
        self.rounds.pending_removal = None;
    }

    /// Run a task that came due on the scheduler
    pub fn run_scheduled(&mut self, task: ScheduledTask) {
        tracing::debug!("Running scheduled {:?}", task);
        match task {
            ScheduledTask::RemoveBarriers { round } => self.run_delayed_removal(round),
            ScheduledTask::RestartMap => self.restart_map(),
            ScheduledTask::ShowBarriers => self.run_preview_spawn(),
        }
    }

    /// Rebuild the site index from the current store
    pub(crate) fn reindex(&mut self) {
        match &self.store {
            Some(store) => self.manager.rebuild_index(store),
            None => self.manager.clear_index(),
        }
    }

    /// Store for the current map, created and loaded on first use
    pub(crate) fn current_store(&mut self) -> Option<&mut BarrierStore> {
        if self.store.is_none() {
            self.attach_store()?.load(false);
        }
        self.store.as_mut()
    }

    /// Store for the current map, created on first use but never loaded
    pub(crate) fn attach_store(&mut self) -> Option<&mut BarrierStore> {
        if self.store.is_none() {
            let map_name = self.server.map_name()?;
            self.store = Some(BarrierStore::new(&self.data_dir, &map_name));
        }
        self.store.as_mut()
    }

    /// Gate for operator commands
    ///
    /// The server console is ignored silently; players without root are told
    /// so. Returns the player allowed to proceed.
    pub(crate) fn authorize<'a>(
        &self,
        player: Option<&'a PlayerController>,
        info: &CommandInfo,
    ) -> Option<&'a PlayerController> {
        let player = player.filter(|p| p.is_connected())?;
        if !player_has_permission(player, flags::ROOT) {
            info.reply(&prefixed(NO_PERMISSION));
            return None;
        }
        Some(player)
    }

    fn restart_map(&self) {
        match self.server.map_name() {
            Some(map_name) => self.server.execute(&format!("map {}", map_name)),
            None => tracing::warn!("No current map to restart"),
        }
    }
}
