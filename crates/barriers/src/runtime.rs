//! Live wiring
//!
//! Holds the single [`BarrierPlugin`] behind a mutex and connects it to the
//! core command, event, listener and timer registries. Every entry point
//! locks the plugin for the duration of one handler.

use std::path::Path;

use parking_lot::Mutex;

use retakes_core::commands::{CommandInfo, CommandResult};
use retakes_core::entities::{get_player_controller_by_userid, PlayerController};
use retakes_core::events::{
    register_typed_event, unregister_event, EventBombDefused, EventBombPlanted, EventPlayerPing,
    EventRoundEnd, EventRoundFreezeEnd, EventRoundPoststart, EventRoundPrestart, EventRoundStart,
    GameEvent, HookResult,
};
use retakes_core::listeners::{on_map_end, on_map_start, remove_listener, ListenerKey};
use retakes_core::{console_command, PluginConfig};
use retakes_sdk::Vector;

use crate::controller::NativeBarrierController;
use crate::plugin::BarrierPlugin;
use crate::server::{GameServer, LiveScheduler, LiveServer, ScheduledTask};
use crate::settings::BarrierSettings;

static PLUGIN: Mutex<Option<BarrierPlugin>> = parking_lot::const_mutex(None);
static LISTENERS: Mutex<Vec<ListenerKey>> = parking_lot::const_mutex(Vec::new());

const EVENT_NAMES: [&str; 8] = [
    EventRoundPrestart::NAME,
    EventRoundStart::NAME,
    EventRoundPoststart::NAME,
    EventRoundFreezeEnd::NAME,
    EventRoundEnd::NAME,
    EventBombPlanted::NAME,
    EventBombDefused::NAME,
    EventPlayerPing::NAME,
];

/// Run `f` against the live plugin
///
/// Returns `None` when the plugin is not loaded, or when called re-entrantly
/// from inside another handler.
pub fn with_plugin<R>(f: impl FnOnce(&mut BarrierPlugin) -> R) -> Option<R> {
    let Some(mut guard) = PLUGIN.try_lock() else {
        tracing::warn!("Barrier plugin busy, dropping re-entrant call");
        return None;
    };
    guard.as_mut().map(f)
}

pub fn is_loaded() -> bool {
    PLUGIN.lock().is_some()
}

fn load_settings() -> BarrierSettings {
    BarrierSettings::load().unwrap_or_else(|e| {
        tracing::warn!("Using default barrier settings: {}", e);
        BarrierSettings::default()
    })
}

/// Build the plugin and register every hook
#[tracing::instrument(skip_all)]
pub fn load(data_dir: &Path) {
    if is_loaded() {
        tracing::warn!("Barrier plugin already loaded");
        return;
    }

    let settings = load_settings();
    tracing::info!(
        "Barriers {} (remove delay {}s)",
        if settings.is_barrier_enabled { "enabled" } else { "disabled" },
        settings.barrier_remove_delay
    );

    let server = LiveServer;
    let current_map = server.map_name();
    let mut plugin = BarrierPlugin::new(
        data_dir,
        settings,
        Box::new(NativeBarrierController::resolve()),
        Box::new(server),
        Box::new(LiveScheduler::new(run_scheduled)),
    );

    // Late load: a map is already running
    if let Some(map_name) = current_map {
        plugin.on_map_start(&map_name);
    }

    *PLUGIN.lock() = Some(plugin);

    register_commands();
    register_events();
    register_listeners();
    tracing::info!("Barrier plugin loaded");
}

/// Unregister everything and clear any active barriers
pub fn unload() {
    for unregister in COMMAND_UNREGISTERS {
        unregister();
    }
    for name in EVENT_NAMES {
        unregister_event(name);
    }
    for key in LISTENERS.lock().drain(..) {
        remove_listener(key);
    }

    if let Some(plugin) = PLUGIN.lock().take() {
        plugin.manager().remove_barriers();
    }
    tracing::info!("Barrier plugin unloaded");
}

fn run_scheduled(task: ScheduledTask) {
    with_plugin(|plugin| plugin.run_scheduled(task));
}

fn run_command(
    handler: impl FnOnce(&mut BarrierPlugin) -> CommandResult,
) -> CommandResult {
    with_plugin(handler).unwrap_or(CommandResult::Continue)
}

#[console_command("css_editbarriers", "Edit barriers for a bombsite")]
fn cmd_edit_barriers(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_edit_barriers(player, info))
}

#[console_command("css_removebarrier", "Remove the nearest barrier")]
fn cmd_remove_barrier(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_remove_barrier(player, info))
}

#[console_command("css_testbarrier", "Spawn the edited site's barriers")]
fn cmd_test_barrier(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_test_barrier(player, info))
}

#[console_command("css_donebarriers", "Leave barrier edit mode and restart the map")]
fn cmd_done_barriers(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_done_barriers(player, info))
}

#[console_command("css_showbarriers", "Preview barriers for a bombsite")]
fn cmd_show_barriers(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_show_barriers(player, info))
}

#[console_command("css_hidebarriers", "Stop previewing barriers")]
fn cmd_hide_barriers(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_hide_barriers(player, info))
}

#[console_command("css_reloadbarriers", "Reload this map's barrier file")]
fn cmd_reload_barriers(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_reload_barriers(player, info))
}

#[console_command("css_forcebombsite", "Force the bombsite for upcoming rounds")]
fn cmd_force_bombsite(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_force_bombsite(player, info))
}

#[console_command("css_forcebombsitestop", "Return to random bombsite selection")]
fn cmd_force_bombsite_stop(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
    run_command(|plugin| plugin.cmd_force_bombsite_stop(player, info))
}

const COMMAND_REGISTERS: [fn() -> Option<retakes_core::CommandKey>; 9] = [
    cmd_edit_barriers_register,
    cmd_remove_barrier_register,
    cmd_test_barrier_register,
    cmd_done_barriers_register,
    cmd_show_barriers_register,
    cmd_hide_barriers_register,
    cmd_reload_barriers_register,
    cmd_force_bombsite_register,
    cmd_force_bombsite_stop_register,
];

const COMMAND_UNREGISTERS: [fn() -> bool; 9] = [
    cmd_edit_barriers_unregister,
    cmd_remove_barrier_unregister,
    cmd_test_barrier_unregister,
    cmd_done_barriers_unregister,
    cmd_show_barriers_unregister,
    cmd_hide_barriers_unregister,
    cmd_reload_barriers_unregister,
    cmd_force_bombsite_unregister,
    cmd_force_bombsite_stop_unregister,
];

fn register_commands() {
    let registered = COMMAND_REGISTERS
        .iter()
        .filter(|register| register().is_some())
        .count();
    tracing::debug!("Registered {} barrier command(s)", registered);
}

fn register_events() {
    register_typed_event::<EventRoundPrestart, _>(true, |_, _| {
        with_plugin(|plugin| plugin.on_round_prestart());
        HookResult::Continue
    });
    register_typed_event::<EventRoundStart, _>(true, |_, _| {
        with_plugin(|plugin| plugin.on_round_start());
        HookResult::Continue
    });
    register_typed_event::<EventRoundPoststart, _>(true, |_, _| {
        with_plugin(|plugin| plugin.on_round_poststart());
        HookResult::Continue
    });
    register_typed_event::<EventRoundFreezeEnd, _>(true, |_, _| {
        with_plugin(|plugin| plugin.on_round_freeze_end());
        HookResult::Continue
    });
    register_typed_event::<EventRoundEnd, _>(true, |event, _| {
        with_plugin(|plugin| plugin.on_round_end(event.winner));
        HookResult::Continue
    });
    register_typed_event::<EventBombPlanted, _>(true, |event, _| {
        with_plugin(|plugin| plugin.on_bomb_planted(event.site));
        HookResult::Continue
    });
    register_typed_event::<EventBombDefused, _>(true, |event, _| {
        with_plugin(|plugin| plugin.on_bomb_defused(event.userid));
        HookResult::Continue
    });
    register_typed_event::<EventPlayerPing, _>(true, |ping, _| {
        let player = get_player_controller_by_userid(ping.userid);
        let point = Vector::new(ping.x, ping.y, ping.z);
        with_plugin(|plugin| plugin.on_player_ping(player.as_ref(), point));
        HookResult::Continue
    });
}

fn register_listeners() {
    let start = on_map_start(|map_name| {
        let settings = load_settings();
        with_plugin(|plugin| {
            plugin.set_settings(settings);
            plugin.on_map_start(map_name);
        });
    });
    let end = on_map_end(|| {
        with_plugin(|plugin| plugin.on_map_end());
    });
    LISTENERS.lock().extend([start, end]);
}
