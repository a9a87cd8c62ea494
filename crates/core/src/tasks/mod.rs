//! Task queue system for main thread execution
//!
//! Work queued here runs at the start of the next game frame, outside whatever
//! lock the caller currently holds.

pub mod queue;

pub use queue::*;
