//! C-compatible exports called by the native bridge

use std::borrow::Cow;
use std::ffi::{c_char, c_int, CStr};

use tracing::instrument;
use tracing_subscriber::EnvFilter;

use retakes_core::commands::{self, chat};
use retakes_core::events::{fire_event_post, fire_event_pre, EventInfo, GameEventRef, HookResult};
use retakes_core::{config, gamedata, hooks, listeners, permissions, CoreConfig};
use retakes_engine::{init_engine, load_host, try_engine};
use retakes_sdk::HostFunctions;

// Plugin metadata - static strings with null terminators for C compatibility
static AUTHOR: &[u8] = b"dollan\0";
static NAME: &[u8] = b"RetakesBarriers\0";
static DESCRIPTION: &[u8] = b"Bombsite barriers for retake rounds\0";
static URL: &[u8] = b"https://github.com/dollannn/cs2-retakes-barriers\0";
static LICENSE: &[u8] = b"MIT\0";
static VERSION: &[u8] = concat!(env!("CARGO_PKG_VERSION"), "\0").as_bytes();
static LOG_TAG: &[u8] = b"RETAKES\0";

/// Borrow a C string, `None` for null
///
/// # Safety
/// `ptr` must be null or a valid null-terminated string
unsafe fn c_str<'a>(ptr: *const c_char) -> Option<Cow<'a, str>> {
    if ptr.is_null() {
        None
    } else {
        Some(CStr::from_ptr(ptr).to_string_lossy())
    }
}

/// Install the fmt subscriber; `RUST_LOG` wins over the core config level
fn init_logging(config: &CoreConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(config.log_level()));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Called when the bridge loads the plugin
///
/// # Safety
/// - `host` must point to a valid `HostFunctions` table
/// - `data_dir` must be a valid null-terminated UTF-8 path
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
pub unsafe extern "C" fn rust_plugin_load(
    host: *const HostFunctions,
    data_dir: *const c_char,
    error: *mut c_char,
    maxlen: usize,
) -> bool {
    let globals = match load_host(host, data_dir) {
        Ok(g) => g,
        Err(e) => {
            write_error(error, maxlen, &format!("Host error: {}", e));
            return false;
        }
    };

    if let Err(e) = init_engine(globals) {
        write_error(error, maxlen, e);
        return false;
    }

    let core_config = CoreConfig::load().unwrap_or_default();
    init_logging(&core_config);
    tracing::info!("Retakes loading...");

    match config::gamedata_path() {
        Ok(path) if path.exists() => match gamedata::init_gamedata(&path) {
            Ok(()) => tracing::info!("Loaded gamedata from {:?}", path),
            Err(e) => tracing::warn!("Ignoring gamedata {:?}: {}", path, e),
        },
        Ok(path) => tracing::debug!("No gamedata at {:?}, using built-in signatures", path),
        Err(e) => tracing::warn!("Gamedata path unavailable: {}", e),
    }

    match try_engine() {
        Some(engine) => retakes_barriers::runtime::load(engine.data_dir()),
        None => {
            write_error(error, maxlen, "Engine not initialized");
            return false;
        }
    }

    tracing::info!("Retakes loaded on thread {:?}", std::thread::current().id());
    true
}

/// Called when the bridge unloads the plugin
///
/// # Safety
/// - `error` must be a valid pointer to a buffer of at least `maxlen` bytes, or null
#[no_mangle]
#[instrument(skip_all)]
pub unsafe extern "C" fn rust_plugin_unload(error: *mut c_char, maxlen: usize) -> bool {
    tracing::info!("Retakes unloading...");

    match std::panic::catch_unwind(crate::shutdown) {
        Ok(()) => true,
        Err(_) => {
            write_error(error, maxlen, "Panic during shutdown");
            false
        }
    }
}

// Metadata exports - static strings for the bridge to display

#[no_mangle]
pub extern "C" fn rust_get_author() -> *const c_char {
    AUTHOR.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_name() -> *const c_char {
    NAME.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_description() -> *const c_char {
    DESCRIPTION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_url() -> *const c_char {
    URL.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_license() -> *const c_char {
    LICENSE.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_version() -> *const c_char {
    VERSION.as_ptr() as *const c_char
}

#[no_mangle]
pub extern "C" fn rust_get_log_tag() -> *const c_char {
    LOG_TAG.as_ptr() as *const c_char
}

/// Called every server frame
#[no_mangle]
pub extern "C" fn rust_on_game_frame(simulating: bool, first_tick: bool, last_tick: bool) {
    hooks::on_game_frame(simulating, first_tick, last_tick);
}

/// Called when a map starts
///
/// # Safety
/// - `map_name` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_on_map_start(map_name: *const c_char) {
    if let Some(name) = c_str(map_name) {
        listeners::fire_map_start(&name);
    }
}

/// Called when a map ends
#[no_mangle]
pub extern "C" fn rust_on_map_end() {
    listeners::fire_map_end();
}

/// Called for every hooked game event
///
/// `payload` is the event's keys as a JSON object. Returns the `HookResult`
/// of the pre hooks; post dispatch always returns `Continue`.
///
/// # Safety
/// - `name` must be a valid null-terminated C string
/// - `payload` must be a valid null-terminated C string or null
#[no_mangle]
pub unsafe extern "C" fn rust_fire_event(
    name: *const c_char,
    payload: *const c_char,
    post: bool,
) -> c_int {
    let Some(name) = c_str(name) else {
        return HookResult::Continue as c_int;
    };
    let payload = c_str(payload).unwrap_or_default();

    let event = match GameEventRef::from_json(&*name, &payload) {
        Ok(event) => event,
        Err(e) => {
            tracing::warn!("Bad payload for event '{}': {}", name, e);
            return HookResult::Continue as c_int;
        }
    };

    let mut info = EventInfo::new(false);
    if post {
        fire_event_post(&event, &mut info);
        HookResult::Continue as c_int
    } else {
        fire_event_pre(&event, &mut info) as c_int
    }
}

/// Called for console commands; `slot` is -1 for the server console
///
/// # Safety
/// - `line` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_on_console_command(slot: c_int, line: *const c_char) -> c_int {
    match c_str(line) {
        Some(line) => commands::on_console_command(slot, &line) as c_int,
        None => 0,
    }
}

/// Called for every chat line; returns `true` to hide the line
///
/// # Safety
/// - `message` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_on_client_say(slot: c_int, message: *const c_char) -> bool {
    c_str(message).is_some_and(|message| chat::on_client_say(slot, &message).suppress())
}

/// Grant admin flags (`"@css/root,@css/generic"`) to a SteamID64
///
/// Returns the number of flags granted.
///
/// # Safety
/// - `flags` must be a valid null-terminated C string
#[no_mangle]
pub unsafe extern "C" fn rust_grant_permissions(steam_id: u64, flags: *const c_char) -> c_int {
    match c_str(flags) {
        Some(flags) => permissions::grant_from_list(steam_id, &flags) as c_int,
        None => 0,
    }
}

/// Drop every flag held by a SteamID64
#[no_mangle]
pub extern "C" fn rust_clear_permissions(steam_id: u64) {
    permissions::clear_permissions(steam_id);
}

/// Helper to write an error message to a C buffer
///
/// # Safety
/// - `error` must be a valid pointer or null
/// - `maxlen` must accurately reflect the buffer size
unsafe fn write_error(error: *mut c_char, maxlen: usize, msg: &str) {
    tracing::error!("{}", msg);
    if !error.is_null() && maxlen > 0 {
        let bytes = msg.as_bytes();
        let len = bytes.len().min(maxlen - 1);
        std::ptr::copy_nonoverlapping(bytes.as_ptr(), error as *mut u8, len);
        *error.add(len) = 0;
    }
}
