//! Retakes map barriers
//!
//! Invisible blocking volumes that keep players off a bombsite until freeze
//! time is over. Barriers are authored per map with an in-game editor and
//! stored as JSON under `<dataDir>/map_config/barriers/`.
//!
//! # Layout
//!
//! - [`store`] - per-map barrier file with deduplication
//! - [`controller`] / [`manager`] - site index and the native toggle routine
//! - [`editor`] - operator commands and ping-driven corner marking
//! - [`rounds`] - spawn at round start, removal after freeze time
//! - [`runtime`] - the live plugin instance and its registrations

pub mod announce;
pub mod controller;
pub mod editor;
pub mod manager;
pub mod models;
pub mod plugin;
pub mod rounds;
pub mod runtime;
pub mod server;
pub mod settings;
pub mod store;

pub use announce::{AnnounceBombsiteEvent, AnnounceKey};
pub use controller::{BlockingVolumeController, ControllerError, NativeBarrierController};
pub use editor::{EditorSession, PointMark, REMOVE_RADIUS};
pub use manager::BarrierManager;
pub use models::{Barrier, BarrierConfigData};
pub use plugin::{BarrierPlugin, CHAT_PREFIX};
pub use rounds::RoundState;
pub use server::{GameServer, ScheduledTask, Scheduler};
pub use settings::BarrierSettings;
pub use store::{AddOutcome, BarrierStore, LoadOutcome, RemoveOutcome, StoreError};
