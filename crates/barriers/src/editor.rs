//! Live barrier editing
//!
//! An operator enters edit mode for one site, marks two opposite corners with
//! the ping wheel to create a barrier, removes the nearest barrier by standing
//! next to it, and leaves edit mode with a map restart. Preview mode raises a
//! site's barriers during an endless warmup without editing anything.

use std::time::Duration;

use retakes_core::commands::{CommandInfo, CommandResult};
use retakes_core::entities::PlayerController;
use retakes_core::permissions::{flags, player_has_permission};
use retakes_sdk::{Bombsite, Vector};

use crate::models::Barrier;
use crate::plugin::{prefixed, BarrierPlugin};
use crate::server::ScheduledTask;
use crate::store::{AddOutcome, LoadOutcome, RemoveOutcome};

/// Largest distance from a barrier's center that `removebarrier` accepts
pub const REMOVE_RADIUS: f32 = 500.0;

/// Delay before a restart or preview spawn
const FOLLOW_UP_DELAY: Duration = Duration::from_secs(1);

const FREEZE_WARMUP: [&str; 3] = ["mp_warmup_pausetimer 1", "mp_warmuptime 999999", "mp_warmup_start"];
const RESUME_WARMUP: [&str; 2] = ["mp_warmup_pausetimer 0", "mp_warmup_end"];

/// Editor state shared by every operator
///
/// A second operator entering edit mode takes over the session.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EditorSession {
    pub editing_site: Option<Bombsite>,
    pub first_point: Option<Vector>,
    pub is_editing: bool,
    pub previewing_site: Option<Bombsite>,
}

/// Result of marking a point in edit mode
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointMark {
    /// Waiting for the opposite corner
    First(Vector),
    /// Both corners marked
    Completed(Barrier),
}

impl EditorSession {
    pub fn begin_editing(&mut self, site: Bombsite) {
        self.editing_site = Some(site);
        self.first_point = None;
        self.is_editing = true;
    }

    pub fn finish_editing(&mut self) {
        self.editing_site = None;
        self.first_point = None;
        self.is_editing = false;
    }

    /// Record a corner; `None` outside edit mode
    pub fn mark_point(&mut self, point: Vector) -> Option<PointMark> {
        let site = self.editing_site.filter(|_| self.is_editing)?;
        match self.first_point.take() {
            Some(first) => Some(PointMark::Completed(Barrier::new(first, point, site))),
            None => {
                self.first_point = Some(point);
                Some(PointMark::First(point))
            }
        }
    }
}

/// Site argument at index 1, replying with usage or an error when absent
pub(crate) fn site_arg(info: &CommandInfo, usage: &str) -> Option<Bombsite> {
    if info.arg_count() < 2 {
        info.reply(&prefixed(&format!("Usage: {}", usage)));
        return None;
    }

    match info.arg(1).parse() {
        Ok(site) => Some(site),
        Err(_) => {
            info.reply(&prefixed("You must specify a bombsite [A / B]."));
            None
        }
    }
}

impl BarrierPlugin {
    fn run_all(&self, commands: &[&str]) {
        for command in commands {
            self.server.execute(command);
        }
    }

    /// `editbarriers [A/B]`
    pub fn cmd_edit_barriers(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        let Some(site) = site_arg(info, "!editbarriers [A/B]") else {
            return CommandResult::Handled;
        };

        self.session.begin_editing(site);
        self.run_all(&FREEZE_WARMUP);

        info.reply(&prefixed(&format!("Barrier editing mode enabled for bombsite {}.", site)));
        info.reply(&prefixed("Use ping (default: X key) to mark two points for a barrier."));
        info.reply(&prefixed("Use !removebarrier near a barrier to delete it."));
        info.reply(&prefixed("Use !testbarrier to test the current barriers."));
        info.reply(&prefixed("Use !donebarriers when finished."));

        tracing::info!("{} is editing barriers for bombsite {}", player.name(), site);
        CommandResult::Handled
    }

    /// A player placed a ping marker at `point`
    pub fn on_player_ping(&mut self, player: Option<&PlayerController>, point: Vector) {
        if !self.session.is_editing {
            return;
        }
        let Some(player) = player.filter(|p| p.is_connected()) else {
            return;
        };
        if !player_has_permission(player, flags::ROOT) {
            return;
        }

        let barrier = match self.session.mark_point(point) {
            Some(PointMark::First(first)) => {
                self.server.print_to_chat(
                    player.slot(),
                    &prefixed("First point set. Ping the opposite corner to create the barrier."),
                );
                tracing::debug!("First barrier point set: {}", first);
                return;
            }
            Some(PointMark::Completed(barrier)) => barrier,
            None => return,
        };

        let Some(outcome) = self.current_store().map(|store| store.add_barrier(barrier)) else {
            tracing::warn!("No map loaded, cannot add barrier");
            self.server.print_to_chat(player.slot(), &prefixed("No map loaded."));
            return;
        };

        let message = match outcome {
            AddOutcome::Added => {
                self.reindex();
                tracing::info!("{} added barrier at bombsite {}", player.name(), barrier.bombsite);
                "Barrier added successfully!"
            }
            AddOutcome::Duplicate => "Error adding barrier (duplicate?)",
            AddOutcome::NotPersisted => {
                self.reindex();
                "Barrier added but could not be saved."
            }
        };
        self.server.print_to_chat(player.slot(), &prefixed(message));
    }

    /// `removebarrier`
    pub fn cmd_remove_barrier(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        let Some(site) = self.session.editing_site else {
            info.reply(&prefixed("You must be in barrier editing mode."));
            return CommandResult::Handled;
        };
        let Some(pawn) = player.pawn() else {
            info.reply(&prefixed("You must be alive to remove a barrier."));
            return CommandResult::Handled;
        };

        if self.manager.barriers(site).is_empty() {
            info.reply(&prefixed("No barriers found."));
            return CommandResult::Handled;
        }

        let nearest = self
            .manager
            .nearest_barrier(site, pawn.origin())
            .filter(|(_, distance)| *distance <= REMOVE_RADIUS);
        let Some((barrier, distance)) = nearest else {
            info.reply(&prefixed(&format!("No barriers found within {} units.", REMOVE_RADIUS)));
            return CommandResult::Handled;
        };

        let outcome = match self.current_store() {
            Some(store) => store.remove_barrier(&barrier),
            None => RemoveOutcome::NotFound,
        };

        match outcome {
            RemoveOutcome::Removed => {
                self.reindex();
                info.reply(&prefixed("Barrier removed successfully!"));
                tracing::info!(
                    "{} removed barrier at bombsite {} ({:.0} units away)",
                    player.name(),
                    site,
                    distance
                );
            }
            RemoveOutcome::NotPersisted => {
                self.reindex();
                info.reply(&prefixed("Barrier removed but could not be saved."));
            }
            RemoveOutcome::NotFound => info.reply(&prefixed("Error removing barrier")),
        }
        CommandResult::Handled
    }

    /// `testbarrier`
    pub fn cmd_test_barrier(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        let Some(site) = self.session.editing_site else {
            info.reply(&prefixed("You must be in barrier editing mode."));
            return CommandResult::Handled;
        };

        info.reply(&prefixed(&format!("Testing barriers for bombsite {}...", site)));
        self.manager.spawn_barriers(site);
        tracing::info!("{} tested barriers for bombsite {}", player.name(), site);
        CommandResult::Handled
    }

    /// `donebarriers`
    pub fn cmd_done_barriers(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };

        self.session.finish_editing();
        self.run_all(&RESUME_WARMUP);

        info.reply(&prefixed("Exited barrier editing mode."));
        info.reply(&prefixed("Restarting map..."));
        self.scheduler.schedule(FOLLOW_UP_DELAY, ScheduledTask::RestartMap);

        tracing::info!("{} exited barrier editing mode", player.name());
        CommandResult::Handled
    }

    /// `showbarriers [A/B]`
    pub fn cmd_show_barriers(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        let Some(site) = site_arg(info, "!showbarriers [A/B]") else {
            return CommandResult::Handled;
        };

        self.session.previewing_site = Some(site);
        self.run_all(&FREEZE_WARMUP);
        self.scheduler.schedule(FOLLOW_UP_DELAY, ScheduledTask::ShowBarriers);

        info.reply(&prefixed(&format!("Showing barriers for bombsite {}.", site)));
        info.reply(&prefixed("Use !hidebarriers to exit."));
        tracing::info!("{} is viewing barriers for bombsite {}", player.name(), site);
        CommandResult::Handled
    }

    /// `hidebarriers`
    pub fn cmd_hide_barriers(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };

        self.session.previewing_site = None;
        self.manager.remove_barriers();
        self.run_all(&RESUME_WARMUP);

        info.reply(&prefixed("Exited barrier viewing mode."));
        tracing::info!("{} exited barrier viewing mode", player.name());
        CommandResult::Handled
    }

    /// `reloadbarriers`: re-read the map's file without bootstrapping it
    pub fn cmd_reload_barriers(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        // Reload only reads; a missing file stays missing
        let Some(store) = self.attach_store() else {
            info.reply(&prefixed("No map loaded."));
            return CommandResult::Handled;
        };

        let outcome = store.load(true);
        self.reindex();

        let message = match outcome {
            LoadOutcome::Loaded | LoadOutcome::Created => format!(
                "Barriers reloaded: {} on A, {} on B.",
                self.manager.barriers(Bombsite::A).len(),
                self.manager.barriers(Bombsite::B).len()
            ),
            LoadOutcome::Missing => "No barrier config found for this map.".to_string(),
            LoadOutcome::Failed => "Barrier config could not be read, keeping current barriers.".to_string(),
        };
        info.reply(&prefixed(&message));
        tracing::info!("{} reloaded barriers ({:?})", player.name(), outcome);
        CommandResult::Handled
    }

    /// Delayed spawn queued by `showbarriers`
    pub(crate) fn run_preview_spawn(&mut self) {
        if let Some(site) = self.session.previewing_site {
            self.manager.spawn_barriers(site);
            tracing::info!("Barriers displayed for bombsite {}", site);
        }
    }
}
