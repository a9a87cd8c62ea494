//! Chat command handling
//!
//! The native bridge forwards every chat line with the sender's slot. Lines
//! starting with a trigger character are parsed as commands:
//! `!editbarriers A` runs publicly, `/editbarriers A` hides the chat line.

use super::info::{tokenize, CommandResult};
use super::manager::{dispatch_chat_command, COMMANDS};
use crate::entities::{self, PlayerController};

/// Public chat trigger (message shown in chat)
pub const PUBLIC_TRIGGER: char = '!';

/// Silent chat trigger (message hidden from chat)
pub const SILENT_TRIGGER: char = '/';

/// What happened to a chat line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatOutcome {
    /// Ordinary chat, or a trigger followed by an unknown command
    NotCommand,
    /// A command ran; `silent` lines should be hidden from chat
    Command { silent: bool, result: CommandResult },
}

impl ChatOutcome {
    /// Whether the bridge should suppress the chat line
    pub fn suppress(&self) -> bool {
        matches!(self, Self::Command { silent: true, .. })
    }
}

/// Check if a message starts with a chat trigger
///
/// Returns (is_silent, command_text) if a trigger is found
fn check_chat_trigger(message: &str) -> Option<(bool, &str)> {
    if let Some(rest) = message.strip_prefix(PUBLIC_TRIGGER) {
        Some((false, rest))
    } else {
        message.strip_prefix(SILENT_TRIGGER).map(|rest| (true, rest))
    }
}

/// Handle a chat line from a known player
pub fn handle_chat_message(player: PlayerController, message: &str) -> ChatOutcome {
    let message = message.trim();
    let Some((is_silent, command_text)) = check_chat_trigger(message) else {
        return ChatOutcome::NotCommand;
    };

    let Some(command_name) = tokenize(command_text).into_iter().next() else {
        return ChatOutcome::NotCommand;
    };

    if COMMANDS.read().find_chat_command(&command_name).is_none() {
        return ChatOutcome::NotCommand;
    }

    let result = dispatch_chat_command(command_text, player, is_silent);
    tracing::trace!("Chat command '{}' result: {:?}", command_name, result);

    ChatOutcome::Command {
        silent: is_silent,
        result,
    }
}

/// Handle a chat line from the bridge
///
/// Lines from empty or unknown slots are ignored.
pub fn on_client_say(slot: i32, message: &str) -> ChatOutcome {
    match entities::get_player_controller(slot) {
        Some(player) => handle_chat_message(player, message),
        None => ChatOutcome::NotCommand,
    }
}
