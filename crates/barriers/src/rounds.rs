//! Round lifecycle
//!
//! Barriers go up at round start for the chosen site and come down a fixed
//! delay after freeze time, or immediately when the round ends. Edit mode
//! suspends all of this; preview mode re-raises its site every warmup round.

use rand::Rng;

use retakes_core::commands::{CommandInfo, CommandResult};
use retakes_core::entities::PlayerController;
use retakes_core::timers::TimerKey;
use retakes_sdk::Bombsite;

use crate::announce::AnnounceBombsiteEvent;
use crate::editor::site_arg;
use crate::plugin::{prefixed, BarrierPlugin};
use crate::server::ScheduledTask;

/// Per-map round bookkeeping
#[derive(Debug, Clone, Default)]
pub struct RoundState {
    /// Live rounds started on this map
    pub round: u32,
    /// Site of the current live round
    pub current_site: Option<Bombsite>,
    /// Operator override for the site pick
    pub forced_site: Option<Bombsite>,
    /// Removal timer armed at freeze end
    pub pending_removal: Option<TimerKey>,
}

impl BarrierPlugin {
    fn cancel_pending_removal(&mut self) {
        if let Some(key) = self.rounds.pending_removal.take() {
            if self.scheduler.cancel(key) {
                tracing::debug!("Cancelled pending barrier removal");
            }
        }
    }

    fn pick_site(&mut self) -> Bombsite {
        if let Some(site) = self.rounds.forced_site {
            return site;
        }
        if self.rng.random_bool(0.5) {
            Bombsite::A
        } else {
            Bombsite::B
        }
    }

    pub fn on_round_prestart(&mut self) {
        if self.server.is_warmup() {
            tracing::debug!("Warmup round, skipping pre-start");
            return;
        }
        self.rounds.round += 1;
        tracing::debug!("Round {} pre-start", self.rounds.round);
    }

    /// Returns the site chosen for a live round
    pub fn on_round_start(&mut self) -> Option<Bombsite> {
        self.cancel_pending_removal();

        if self.server.is_warmup() {
            if let Some(site) = self.session.previewing_site {
                self.manager.spawn_barriers(site);
                tracing::debug!("Re-showing barriers for bombsite {}", site);
            }
            return None;
        }

        if self.session.is_editing {
            tracing::debug!("Barrier editing mode active, skipping round logic");
            return None;
        }

        let site = self.pick_site();
        self.rounds.current_site = Some(site);

        if self.settings.is_barrier_enabled {
            let spawned = self.manager.spawn_barriers(site);
            tracing::info!("Spawned {} barrier(s) for bombsite {}", spawned, site);
        }

        self.server.announce(AnnounceBombsiteEvent { site });
        tracing::info!("Round started on bombsite {}", site);
        Some(site)
    }

    pub fn on_round_poststart(&self) {
        tracing::debug!("Round post-start");
    }

    pub fn on_round_freeze_end(&mut self) {
        if self.server.is_warmup() {
            tracing::debug!("Warmup round, skipping freeze end");
            return;
        }
        if !self.settings.is_barrier_enabled {
            return;
        }

        self.cancel_pending_removal();
        let delay = self.settings.remove_delay();
        let round = self.rounds.round;
        let key = self
            .scheduler
            .schedule(delay, ScheduledTask::RemoveBarriers { round });
        self.rounds.pending_removal = Some(key);
        tracing::debug!("Barriers drop in {:?}", delay);
    }

    pub fn on_round_end(&mut self, winner: i32) {
        self.cancel_pending_removal();

        // Preview and test spawns are cleared too, whatever the settings say
        self.manager.remove_barriers();
        tracing::debug!("Barriers cleaned up at round end");
        tracing::info!("Round ended. Winner: {}", winner);
    }

    pub fn on_bomb_planted(&self, site: i32) {
        tracing::info!("Bomb planted (site entity {})", site);
    }

    pub fn on_bomb_defused(&self, userid: i32) {
        tracing::info!("Bomb defused by userid {}", userid);
    }

    /// Freeze-end removal coming due
    pub(crate) fn run_delayed_removal(&mut self, round: u32) {
        if round != self.rounds.round {
            tracing::debug!("Ignoring removal from round {} in round {}", round, self.rounds.round);
            return;
        }
        self.rounds.pending_removal = None;
        self.manager.remove_barriers();
        tracing::info!("Barriers removed after freeze time");
    }

    /// `forcebombsite [A/B]`
    pub fn cmd_force_bombsite(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };
        let Some(site) = site_arg(info, "!forcebombsite [A/B]") else {
            return CommandResult::Handled;
        };

        self.rounds.forced_site = Some(site);
        info.reply(&prefixed(&format!("Bombsite {} forced for upcoming rounds.", site)));
        tracing::info!("{} forced bombsite {}", player.name(), site);
        CommandResult::Handled
    }

    /// `forcebombsitestop`
    pub fn cmd_force_bombsite_stop(
        &mut self,
        player: Option<&PlayerController>,
        info: &CommandInfo,
    ) -> CommandResult {
        let Some(player) = self.authorize(player, info) else {
            return CommandResult::Handled;
        };

        self.rounds.forced_site = None;
        info.reply(&prefixed("Bombsite selection is random again."));
        tracing::info!("{} cleared the forced bombsite", player.name());
        CommandResult::Handled
    }
}
