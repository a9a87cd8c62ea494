//! Console and Chat Command System
//!
//! Provides unified command handling for both console and chat commands.
//!
//! # Architecture
//!
//! ```text
//! bridge console hook → dispatch_console_command ┐
//!                                                ├→ CommandManager → Rust callbacks
//! bridge say hook     → chat::on_client_say      ┘
//! ```
//!
//! # Prefixes
//!
//! - Commands with `css_` or `csr_` prefix are also reachable from chat
//! - Example: `css_editbarriers` can be called as `!editbarriers` or `/editbarriers`
//!
//! # Example
//!
//! ```ignore
//! use retakes_core::commands::{register_command, CommandResult};
//!
//! register_command("css_ping", "Respond with pong", |_player, info| {
//!     info.reply("Pong!");
//!     CommandResult::Handled
//! });
//! ```

pub mod chat;
mod info;
mod manager;
pub mod print;

pub use info::{tokenize, CommandCallback, CommandContext, CommandInfo, CommandResult};
pub use manager::{
    dispatch_chat_command, dispatch_console_command, register_command, register_command_ex,
    register_server_command, unregister_command, CommandKey, CommandManager, COMMANDS, CSS_PREFIX,
    DEFAULT_PREFIX,
};

/// Dispatch a console command typed by the player in `slot`
///
/// A negative slot means the server console.
pub fn on_console_command(slot: i32, line: &str) -> CommandResult {
    let player = if slot >= 0 {
        crate::entities::get_player_controller(slot)
    } else {
        None
    };
    dispatch_console_command(line, player)
}
