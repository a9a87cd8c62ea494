//! End-to-end barrier editing and round flow against in-memory fakes

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::SeedableRng;
use slotmap::SlotMap;

use retakes_barriers::{
    AnnounceBombsiteEvent, Barrier, BarrierPlugin, BarrierSettings, BarrierStore,
    BlockingVolumeController, ControllerError, EditorSession, GameServer, ScheduledTask, Scheduler,
};
use retakes_core::commands::{CommandContext, CommandInfo};
use retakes_core::entities::PlayerController;
use retakes_core::permissions::{add_permissions, flags};
use retakes_core::timers::TimerKey;
use retakes_sdk::{Bombsite, Vector};

const MAP: &str = "de_mirage";

#[derive(Debug, Clone, Copy, PartialEq)]
enum VolumeCall {
    Activate(Vector, Vector),
    Clear,
}

struct FakeController(Arc<Mutex<Vec<VolumeCall>>>);

impl BlockingVolumeController for FakeController {
    fn is_available(&self) -> bool {
        true
    }

    fn activate(&self, min: Vector, max: Vector) -> Result<(), ControllerError> {
        self.0.lock().push(VolumeCall::Activate(min, max));
        Ok(())
    }

    fn clear(&self) -> Result<(), ControllerError> {
        self.0.lock().push(VolumeCall::Clear);
        Ok(())
    }
}

#[derive(Default)]
struct ServerLog {
    commands: Vec<String>,
    chat: Vec<(i32, String)>,
    announced: Vec<Bombsite>,
}

struct FakeServer {
    log: Arc<Mutex<ServerLog>>,
    warmup: Arc<AtomicBool>,
}

impl GameServer for FakeServer {
    fn execute(&self, command: &str) {
        self.log.lock().commands.push(command.to_string());
    }

    fn is_warmup(&self) -> bool {
        self.warmup.load(Ordering::SeqCst)
    }

    fn map_name(&self) -> Option<String> {
        Some(MAP.to_string())
    }

    fn print_to_chat(&self, slot: i32, message: &str) {
        self.log.lock().chat.push((slot, message.to_string()));
    }

    fn announce(&self, event: AnnounceBombsiteEvent) {
        self.log.lock().announced.push(event.site);
    }
}

type Scheduled = Arc<Mutex<SlotMap<TimerKey, (Duration, ScheduledTask)>>>;

struct FakeScheduler(Scheduled);

impl Scheduler for FakeScheduler {
    fn schedule(&mut self, delay: Duration, task: ScheduledTask) -> TimerKey {
        self.0.lock().insert((delay, task))
    }

    fn cancel(&mut self, key: TimerKey) -> bool {
        self.0.lock().remove(key).is_some()
    }
}

struct Harness {
    plugin: BarrierPlugin,
    volumes: Arc<Mutex<Vec<VolumeCall>>>,
    log: Arc<Mutex<ServerLog>>,
    warmup: Arc<AtomicBool>,
    scheduled: Scheduled,
    _dir: tempfile::TempDir,
}

impl Harness {
    fn new(enabled: bool) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let volumes = Arc::new(Mutex::new(Vec::new()));
        let log = Arc::new(Mutex::new(ServerLog::default()));
        let warmup = Arc::new(AtomicBool::new(false));
        let scheduled: Scheduled = Arc::new(Mutex::new(SlotMap::with_key()));

        let settings = BarrierSettings {
            is_barrier_enabled: enabled,
            ..BarrierSettings::default()
        };
        let mut plugin = BarrierPlugin::new(
            dir.path(),
            settings,
            Box::new(FakeController(volumes.clone())),
            Box::new(FakeServer {
                log: log.clone(),
                warmup: warmup.clone(),
            }),
            Box::new(FakeScheduler(scheduled.clone())),
        )
        .with_rng(StdRng::seed_from_u64(7));
        plugin.on_map_start(MAP);

        Self {
            plugin,
            volumes,
            log,
            warmup,
            scheduled,
            _dir: dir,
        }
    }

    fn dir(&self) -> &Path {
        self._dir.path()
    }

    fn take_scheduled(&self) -> Vec<(Duration, ScheduledTask)> {
        self.scheduled.lock().drain().map(|(_, entry)| entry).collect()
    }

    fn chat(&self) -> Vec<String> {
        self.log.lock().chat.iter().map(|(_, m)| m.clone()).collect()
    }

    fn clears(&self) -> usize {
        self.volumes
            .lock()
            .iter()
            .filter(|call| **call == VolumeCall::Clear)
            .count()
    }

    fn activations(&self) -> usize {
        self.volumes
            .lock()
            .iter()
            .filter(|call| **call != VolumeCall::Clear)
            .count()
    }
}

fn admin(steam_id: u64) -> PlayerController {
    add_permissions(steam_id, &[flags::ROOT]);
    PlayerController::new(1, steam_id, "admin")
}

fn command(line: &str, player: &PlayerController) -> CommandInfo {
    CommandInfo::from_line(line, Some(player.clone()), CommandContext::ChatPublic)
}

fn box_at(x: f32, site: Bombsite) -> Barrier {
    Barrier::new(Vector::new(x - 50.0, -50.0, -50.0), Vector::new(x + 50.0, 50.0, 50.0), site)
}

#[test]
fn two_pings_create_a_barrier_once() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100001);

    let info = command("editbarriers a", &player);
    h.plugin.cmd_edit_barriers(Some(&player), &info);
    assert_eq!(h.plugin.session().editing_site, Some(Bombsite::A));
    assert!(info.replies()[0].contains("Barrier editing mode enabled for bombsite A."));
    assert_eq!(
        h.log.lock().commands,
        vec!["mp_warmup_pausetimer 1", "mp_warmuptime 999999", "mp_warmup_start"]
    );

    let p1 = Vector::new(100.0, 200.0, 0.0);
    let p2 = Vector::new(300.0, 400.0, 128.0);

    h.plugin.on_player_ping(Some(&player), p1);
    h.plugin.on_player_ping(Some(&player), p2);
    h.plugin.on_player_ping(Some(&player), p1);
    h.plugin.on_player_ping(Some(&player), p2);

    assert_eq!(
        h.chat(),
        vec![
            "[Retakes] First point set. Ping the opposite corner to create the barrier.",
            "[Retakes] Barrier added successfully!",
            "[Retakes] First point set. Ping the opposite corner to create the barrier.",
            "[Retakes] Error adding barrier (duplicate?)",
        ]
    );

    let expected = Barrier::new(p1, p2, Bombsite::A);
    assert_eq!(h.plugin.store().unwrap().barriers_snapshot().unwrap(), vec![expected]);
    assert_eq!(h.plugin.manager().barriers(Bombsite::A), &[expected]);
    assert!(h.plugin.manager().barriers(Bombsite::B).is_empty());
    assert!(h.plugin.session().is_editing);
    assert_eq!(h.plugin.session().first_point, None);

    // A fresh store for the same map reads back what was saved
    let mut reread = BarrierStore::new(h.dir(), MAP);
    reread.load(true);
    assert_eq!(reread.barriers_snapshot().unwrap(), vec![expected]);
}

#[test]
fn pings_outside_edit_mode_or_without_root_are_ignored() {
    let mut h = Harness::new(false);
    let admin = admin(76561198000100002);
    let guest = PlayerController::new(2, 76561198000100003, "guest");

    h.plugin.on_player_ping(Some(&admin), Vector::ZERO);
    assert!(h.chat().is_empty());

    h.plugin.cmd_edit_barriers(Some(&admin), &command("editbarriers B", &admin));
    h.plugin.on_player_ping(Some(&guest), Vector::ZERO);
    h.plugin.on_player_ping(None, Vector::ZERO);
    assert!(h.chat().is_empty());
    assert_eq!(h.plugin.session().first_point, None);
}

#[test]
fn commands_require_root() {
    let mut h = Harness::new(false);
    let guest = PlayerController::new(3, 76561198000100004, "guest");

    let info = command("editbarriers A", &guest);
    h.plugin.cmd_edit_barriers(Some(&guest), &info);
    assert_eq!(
        info.replies(),
        vec!["[Retakes] You do not have permission to use this command."]
    );
    assert!(!h.plugin.session().is_editing);
    assert!(h.log.lock().commands.is_empty());

    // Server console is ignored without a reply
    let console = CommandInfo::from_line("css_editbarriers A", None, CommandContext::ServerConsole);
    h.plugin.cmd_edit_barriers(None, &console);
    assert!(console.replies().is_empty());
    assert!(!h.plugin.session().is_editing);
}

#[test]
fn bad_site_arguments() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100005);

    let missing = command("editbarriers", &player);
    h.plugin.cmd_edit_barriers(Some(&player), &missing);
    assert_eq!(missing.replies(), vec!["[Retakes] Usage: !editbarriers [A/B]"]);

    let wrong = command("showbarriers C", &player);
    h.plugin.cmd_show_barriers(Some(&player), &wrong);
    assert_eq!(wrong.replies(), vec!["[Retakes] You must specify a bombsite [A / B]."]);

    assert_eq!(h.plugin.session(), &EditorSession::default());
}

#[test]
fn remove_nearest_within_radius() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100006);
    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));

    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).min_pos);
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).max_pos);
    h.plugin.on_player_ping(Some(&player), box_at(1000.0, Bombsite::A).min_pos);
    h.plugin.on_player_ping(Some(&player), box_at(1000.0, Bombsite::A).max_pos);
    assert_eq!(h.plugin.manager().barriers(Bombsite::A).len(), 2);

    let far = player.clone().with_pawn(Vector::new(10000.0, 0.0, 0.0));
    let info = command("removebarrier", &far);
    h.plugin.cmd_remove_barrier(Some(&far), &info);
    assert_eq!(info.replies(), vec!["[Retakes] No barriers found within 500 units."]);
    assert_eq!(h.plugin.manager().barriers(Bombsite::A).len(), 2);

    let near = player.clone().with_pawn(Vector::new(10.0, 0.0, 0.0));
    let info = command("removebarrier", &near);
    h.plugin.cmd_remove_barrier(Some(&near), &info);
    assert_eq!(info.replies(), vec!["[Retakes] Barrier removed successfully!"]);
    assert_eq!(h.plugin.manager().barriers(Bombsite::A), &[box_at(1000.0, Bombsite::A)]);
    assert_eq!(
        h.plugin.store().unwrap().barriers_snapshot().unwrap(),
        vec![box_at(1000.0, Bombsite::A)]
    );
}

#[test]
fn remove_needs_edit_mode_and_a_pawn() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100007);

    let info = command("removebarrier", &player);
    h.plugin.cmd_remove_barrier(Some(&player), &info);
    assert_eq!(info.replies(), vec!["[Retakes] You must be in barrier editing mode."]);

    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));
    let info = command("removebarrier", &player);
    h.plugin.cmd_remove_barrier(Some(&player), &info);
    assert_eq!(info.replies(), vec!["[Retakes] You must be alive to remove a barrier."]);
}

#[test]
fn editing_suspends_round_flow() {
    let mut h = Harness::new(true);
    let player = admin(76561198000100008);
    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));

    h.plugin.on_round_prestart();
    assert_eq!(h.plugin.on_round_start(), None);
    assert_eq!(h.activations(), 0);
    assert!(h.log.lock().announced.is_empty());
}

#[test]
fn live_round_spawns_announces_and_drops_after_freeze() {
    let mut h = Harness::new(true);
    let player = admin(76561198000100009);

    // Author one barrier per site, then leave edit mode
    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers B", &player));
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::B).min_pos);
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::B).max_pos);
    h.plugin.cmd_done_barriers(Some(&player), &command("donebarriers", &player));
    h.take_scheduled();

    h.plugin
        .cmd_force_bombsite(Some(&player), &command("forcebombsite b", &player));
    h.plugin.on_round_prestart();
    assert_eq!(h.plugin.on_round_start(), Some(Bombsite::B));
    assert_eq!(h.activations(), 1);
    assert_eq!(h.log.lock().announced, vec![Bombsite::B]);

    h.plugin.on_round_freeze_end();
    let scheduled = h.take_scheduled();
    assert_eq!(
        scheduled,
        vec![(Duration::from_secs(3), ScheduledTask::RemoveBarriers { round: 1 })]
    );

    h.plugin.run_scheduled(scheduled[0].1);
    assert_eq!(h.clears(), 1);
}

#[test]
fn stale_removal_is_ignored() {
    let mut h = Harness::new(true);

    h.plugin.on_round_prestart();
    h.plugin.on_round_start();
    h.plugin.on_round_freeze_end();
    let stale = h.take_scheduled()[0].1;

    h.plugin.on_round_end(2);
    assert_eq!(h.clears(), 1);

    h.plugin.on_round_prestart();
    h.plugin.on_round_start();
    h.plugin.run_scheduled(stale);
    assert_eq!(h.clears(), 1);
}

#[test]
fn round_end_cancels_pending_removal() {
    let mut h = Harness::new(true);

    h.plugin.on_round_prestart();
    h.plugin.on_round_start();
    h.plugin.on_round_freeze_end();
    assert_eq!(h.scheduled.lock().len(), 1);

    h.plugin.on_round_end(3);
    assert!(h.scheduled.lock().is_empty());
    assert_eq!(h.plugin.rounds().pending_removal, None);
}

#[test]
fn disabled_barriers_still_announce() {
    let mut h = Harness::new(false);

    h.plugin.on_round_prestart();
    let site = h.plugin.on_round_start().unwrap();
    h.plugin.on_round_freeze_end();
    h.plugin.on_round_end(2);

    assert_eq!(h.log.lock().announced, vec![site]);
    assert_eq!(h.activations(), 0);
    assert_eq!(h.clears(), 1);
    assert!(h.scheduled.lock().is_empty());
}

#[test]
fn round_end_clears_preview_barriers_when_disabled() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100013);

    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).min_pos);
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).max_pos);
    h.plugin.cmd_test_barrier(Some(&player), &command("testbarrier", &player));
    h.plugin.cmd_done_barriers(Some(&player), &command("donebarriers", &player));
    h.plugin.cmd_show_barriers(Some(&player), &command("showbarriers A", &player));
    h.take_scheduled();
    h.plugin.run_scheduled(ScheduledTask::ShowBarriers);
    assert_eq!(h.activations(), 2);
    let before = h.clears();

    h.plugin.on_round_end(2);
    assert_eq!(h.clears(), before + 1);
}

#[test]
fn done_restarts_the_map() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100010);
    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));
    h.log.lock().commands.clear();

    let info = command("donebarriers", &player);
    h.plugin.cmd_done_barriers(Some(&player), &info);
    assert!(!h.plugin.session().is_editing);
    assert_eq!(h.plugin.session().editing_site, None);
    assert_eq!(
        info.replies(),
        vec!["[Retakes] Exited barrier editing mode.", "[Retakes] Restarting map..."]
    );

    let scheduled = h.take_scheduled();
    assert_eq!(scheduled, vec![(Duration::from_secs(1), ScheduledTask::RestartMap)]);
    h.plugin.run_scheduled(ScheduledTask::RestartMap);
    assert_eq!(
        h.log.lock().commands,
        vec!["mp_warmup_pausetimer 0", "mp_warmup_end", "map de_mirage"]
    );
}

#[test]
fn preview_shows_and_hides() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100011);

    h.plugin.cmd_edit_barriers(Some(&player), &command("editbarriers A", &player));
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).min_pos);
    h.plugin.on_player_ping(Some(&player), box_at(0.0, Bombsite::A).max_pos);
    h.plugin.cmd_done_barriers(Some(&player), &command("donebarriers", &player));
    h.take_scheduled();

    h.plugin.cmd_show_barriers(Some(&player), &command("showbarriers A", &player));
    assert_eq!(h.plugin.session().previewing_site, Some(Bombsite::A));
    let scheduled = h.take_scheduled();
    assert_eq!(scheduled, vec![(Duration::from_secs(1), ScheduledTask::ShowBarriers)]);

    h.plugin.run_scheduled(ScheduledTask::ShowBarriers);
    assert_eq!(h.activations(), 1);

    // Each warmup round re-raises the previewed site
    h.warmup.store(true, Ordering::SeqCst);
    assert_eq!(h.plugin.on_round_start(), None);
    assert_eq!(h.activations(), 2);

    let info = command("hidebarriers", &player);
    h.plugin.cmd_hide_barriers(Some(&player), &info);
    assert_eq!(h.plugin.session().previewing_site, None);
    assert_eq!(h.clears(), 1);
    assert_eq!(info.replies(), vec!["[Retakes] Exited barrier viewing mode."]);

    // Spawn queued before hiding does nothing
    h.plugin.run_scheduled(ScheduledTask::ShowBarriers);
    assert_eq!(h.activations(), 2);
}

#[test]
fn reload_reports_missing_file() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100012);

    std::fs::remove_file(h.plugin.store().unwrap().path()).unwrap();
    let info = command("reloadbarriers", &player);
    h.plugin.cmd_reload_barriers(Some(&player), &info);
    assert_eq!(
        info.replies(),
        vec!["[Retakes] No barrier config found for this map."]
    );
    assert!(!h.plugin.store().unwrap().path().exists());
}

#[test]
fn reload_after_map_end_never_writes() {
    let mut h = Harness::new(false);
    let player = admin(76561198000100014);

    let path = h.plugin.store().unwrap().path().to_path_buf();
    std::fs::remove_file(&path).unwrap();
    h.plugin.on_map_end();
    assert!(h.plugin.store().is_none());

    let info = command("reloadbarriers", &player);
    h.plugin.cmd_reload_barriers(Some(&player), &info);
    assert_eq!(
        info.replies(),
        vec!["[Retakes] No barrier config found for this map."]
    );
    assert!(!path.exists());
    assert_eq!(h.plugin.store().unwrap().map_name(), MAP);
}
