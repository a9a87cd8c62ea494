//! Frame hooks
//!
//! The native bridge calls into the plugin once per server frame; everything
//! time-based (queued tasks, timers, frame callbacks) is driven from here.

pub mod gameframe;

pub use gameframe::{
    frame_count, last_frame_time_ns, on_game_frame, register_gameframe_callback,
    unregister_gameframe_callback, GameFrameKey,
};
