//! Host-facing seams
//!
//! [`GameServer`] covers what the barrier plugin asks of the running server;
//! [`Scheduler`] covers delayed work. The live implementations go through the
//! engine globals and the core timer registry.

use std::time::Duration;

use retakes_core::commands::print;
use retakes_core::timers::{self, TimerFlags, TimerKey};
use retakes_engine::try_engine;

use crate::announce::{self, AnnounceBombsiteEvent};

/// Server operations used by the editor and round handlers
pub trait GameServer: Send {
    /// Run a server console command
    fn execute(&self, command: &str);

    fn is_warmup(&self) -> bool;

    fn map_name(&self) -> Option<String>;

    /// Chat message to one player
    fn print_to_chat(&self, slot: i32, message: &str);

    /// Broadcast the site chosen for this round
    fn announce(&self, event: AnnounceBombsiteEvent);
}

/// Work deferred by the barrier plugin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduledTask {
    /// Drop barriers after freeze time; ignored once `round` is over
    RemoveBarriers { round: u32 },
    /// Reload the current map after leaving edit mode
    RestartMap,
    /// Raise the previewed site's barriers
    ShowBarriers,
}

/// Timer source for [`ScheduledTask`]s
pub trait Scheduler: Send {
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TimerKey;

    /// Returns `false` if the task already ran or was cancelled
    fn cancel(&mut self, key: TimerKey) -> bool;
}

/// [`GameServer`] backed by the native bridge
pub struct LiveServer;

impl GameServer for LiveServer {
    fn execute(&self, command: &str) {
        match try_engine() {
            Some(engine) => engine.server_command(command),
            None => tracing::warn!("Engine not initialized, dropping command '{}'", command),
        }
    }

    fn is_warmup(&self) -> bool {
        try_engine().is_some_and(|engine| engine.is_warmup_period())
    }

    fn map_name(&self) -> Option<String> {
        try_engine().and_then(|engine| engine.map_name())
    }

    fn print_to_chat(&self, slot: i32, message: &str) {
        print::print_to_chat(slot, message);
    }

    fn announce(&self, event: AnnounceBombsiteEvent) {
        announce::publish(event);
    }
}

/// [`Scheduler`] backed by core timers
///
/// Due tasks are handed to `dispatch` from the game frame. Timers are
/// map-scoped and vanish on map change.
pub struct LiveScheduler {
    dispatch: fn(ScheduledTask),
}

impl LiveScheduler {
    pub fn new(dispatch: fn(ScheduledTask)) -> Self {
        Self { dispatch }
    }
}

impl Scheduler for LiveScheduler {
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TimerKey {
        let dispatch = self.dispatch;
        let key = timers::add_timer_with_flags(delay, TimerFlags::STOP_ON_MAPCHANGE, move || {
            dispatch(task)
        });
        tracing::debug!("Scheduled {:?} in {:?}", task, delay);
        key
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        timers::remove_timer(key)
    }
}
