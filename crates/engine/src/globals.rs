//! Global engine state storage
//!
//! The host function table is acquired once during plugin load and stored
//! here. Access is thread-safe via OnceLock; the current map name sits behind
//! an RwLock because it changes on every map load.

use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;
use std::thread::ThreadId;

use parking_lot::RwLock;

use retakes_sdk::{HostFunctions, RawModule, RawPlayer};

/// Global engine state containing the host function table
pub struct EngineGlobals {
    /// Function table handed over by the native bridge
    host: HostFunctions,

    /// Plugin data directory (configs, gamedata, map_config)
    data_dir: PathBuf,

    /// Name of the currently loaded map - set from the map start listener
    current_map: RwLock<Option<String>>,

    /// Main game thread ID for thread safety checks
    pub main_thread_id: ThreadId,
}

/// Global engine state storage
static ENGINE: OnceLock<EngineGlobals> = OnceLock::new();

/// Initialize engine globals
///
/// Called once during plugin load. Returns error if already initialized.
pub fn init_engine(globals: EngineGlobals) -> Result<(), &'static str> {
    ENGINE
        .set(globals)
        .map_err(|_| "Engine already initialized")
}

/// Get engine globals
///
/// # Panics
/// Panics if called before `init_engine`
pub fn engine() -> &'static EngineGlobals {
    ENGINE.get().expect("Engine not initialized")
}

/// Try to get engine globals without panicking
pub fn try_engine() -> Option<&'static EngineGlobals> {
    ENGINE.get()
}

/// Check if engine is initialized
pub fn is_engine_initialized() -> bool {
    ENGINE.get().is_some()
}

/// Check if current thread is the main game thread
pub fn is_main_thread() -> bool {
    ENGINE
        .get()
        .map(|g| std::thread::current().id() == g.main_thread_id)
        .unwrap_or(false)
}

impl EngineGlobals {
    /// Create new EngineGlobals
    ///
    /// The calling thread is recorded as the main game thread.
    pub fn new(host: HostFunctions, data_dir: PathBuf) -> Self {
        Self {
            host,
            data_dir,
            current_map: RwLock::new(None),
            main_thread_id: std::thread::current().id(),
        }
    }

    /// Plugin data directory
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Name of the current map, if one is loaded
    pub fn map_name(&self) -> Option<String> {
        self.current_map.read().clone()
    }

    /// Record the current map name
    ///
    /// Called from the map start listener
    pub fn set_map_name(&self, name: &str) {
        *self.current_map.write() = Some(name.to_string());
        tracing::debug!("Current map set: {}", name);
    }

    /// Forget the current map name
    ///
    /// Called when the map unloads
    pub fn clear_map_name(&self) {
        *self.current_map.write() = None;
    }

    /// Queue a command on the server console
    pub fn server_command(&self, command: &str) {
        let Some(server_command) = self.host.server_command else {
            tracing::warn!("server_command unavailable, dropping '{}'", command);
            return;
        };

        match CString::new(command) {
            // SAFETY: the bridge guarantees the pointer for the plugin lifetime
            Ok(c_command) => unsafe { server_command(c_command.as_ptr()) },
            Err(_) => tracing::warn!("Server command contains a null byte: {:?}", command),
        }
    }

    /// Print a message to a single client
    ///
    /// Returns false when the host cannot print (function missing or bad message).
    pub fn client_print(&self, slot: i32, destination: i32, message: &str) -> bool {
        let Some(client_print) = self.host.client_print else {
            return false;
        };

        match CString::new(message) {
            Ok(c_message) => {
                // SAFETY: the bridge guarantees the pointer for the plugin lifetime
                unsafe { client_print(slot, destination, c_message.as_ptr()) };
                true
            }
            Err(_) => {
                tracing::warn!("Client message contains a null byte: {:?}", message);
                false
            }
        }
    }

    /// Whether the game rules report the warmup period
    ///
    /// Defaults to false when the host cannot answer.
    pub fn is_warmup_period(&self) -> bool {
        self.host
            .is_warmup_period
            // SAFETY: the bridge guarantees the pointer for the plugin lifetime
            .map(|is_warmup| unsafe { is_warmup() })
            .unwrap_or(false)
    }

    /// Fetch a snapshot of the player in `slot`
    pub fn get_player(&self, slot: i32) -> Option<RawPlayer> {
        let get_player = self.host.get_player?;
        let mut raw = RawPlayer::default();

        // SAFETY: `raw` is a valid, writable RawPlayer for the duration of the call
        if unsafe { get_player(slot, &mut raw) } {
            Some(raw)
        } else {
            None
        }
    }

    /// Span of a loaded game library, by gamedata library name
    pub fn get_module(&self, library: &str) -> Option<RawModule> {
        let get_module = self.host.get_module?;
        let c_library = CString::new(library).ok()?;
        let mut raw = RawModule::default();

        // SAFETY: `raw` is a valid, writable RawModule for the duration of the call
        if unsafe { get_module(c_library.as_ptr(), &mut raw) } {
            Some(raw)
        } else {
            None
        }
    }

    /// Whether the bridge can report library spans
    pub fn has_module_lookup(&self) -> bool {
        self.host.get_module.is_some()
    }
}
