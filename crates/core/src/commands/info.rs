//! Command information types

use std::sync::Arc;

use parking_lot::Mutex;

use super::print::{self, HudDestination};
use crate::entities::PlayerController;

/// Context from which a command was called
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandContext {
    /// Called from server console (no player)
    ServerConsole,
    /// Called from client console
    ClientConsole,
    /// Called from public chat (!cmd)
    ChatPublic,
    /// Called from silent chat (/cmd)
    ChatSilent,
}

impl CommandContext {
    /// Returns true if command was triggered from chat
    pub fn is_chat(&self) -> bool {
        matches!(self, Self::ChatPublic | Self::ChatSilent)
    }

    /// Returns true if command was triggered from console
    pub fn is_console(&self) -> bool {
        matches!(self, Self::ServerConsole | Self::ClientConsole)
    }

    /// Returns true if this is a silent chat command (should not show in chat)
    pub fn is_silent(&self) -> bool {
        matches!(self, Self::ChatSilent)
    }
}

/// Result of command execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
#[repr(u8)]
pub enum CommandResult {
    /// Continue processing, allow other handlers
    #[default]
    Continue = 0,
    /// Command was handled, stop processing
    Handled = 1,
    /// Block the command entirely (prevent original behavior)
    Block = 2,
}

/// Information about a command invocation
pub struct CommandInfo {
    /// Raw command arguments (index 0 is the command name)
    args: Vec<String>,

    /// Player who executed command (None if server console)
    player: Option<PlayerController>,

    /// Context of command invocation
    context: CommandContext,

    /// Every reply sent through this invocation, in order
    replies: Mutex<Vec<String>>,
}

impl CommandInfo {
    /// Create new CommandInfo
    pub fn new(
        args: Vec<String>,
        player: Option<PlayerController>,
        context: CommandContext,
    ) -> Self {
        Self {
            args,
            player,
            context,
            replies: Mutex::new(Vec::new()),
        }
    }

    /// Build an invocation from a command line (`css_editbarriers A`)
    pub fn from_line(line: &str, player: Option<PlayerController>, context: CommandContext) -> Self {
        Self::new(tokenize(line), player, context)
    }

    /// Get the number of arguments (including command name at index 0)
    pub fn arg_count(&self) -> usize {
        self.args.len()
    }

    /// Get argument by index (0 = command name)
    ///
    /// Returns empty string if index is out of bounds.
    pub fn arg(&self, index: usize) -> &str {
        self.args.get(index).map(|s| s.as_str()).unwrap_or("")
    }

    /// Get the command name (alias for arg(0))
    pub fn command_name(&self) -> &str {
        self.arg(0)
    }

    /// Get all arguments after command name as a single string
    pub fn arg_string(&self) -> String {
        self.args.get(1..).map(|rest| rest.join(" ")).unwrap_or_default()
    }

    /// Get all arguments as a slice
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Get the player who executed the command (None for server console)
    pub fn player(&self) -> Option<&PlayerController> {
        self.player.as_ref()
    }

    /// Get the calling context
    pub fn context(&self) -> CommandContext {
        self.context
    }

    /// Get player slot (-1 for server console)
    pub fn player_slot(&self) -> i32 {
        self.player.as_ref().map(|p| p.slot()).unwrap_or(-1)
    }

    /// Reply to the command (routes to console or chat based on context)
    pub fn reply(&self, message: &str) {
        self.replies.lock().push(message.to_string());

        match (self.context, &self.player) {
            (CommandContext::ServerConsole, _) | (_, None) => {
                tracing::info!("[Reply] {}", message);
            }
            (CommandContext::ClientConsole, Some(player)) => {
                print::client_print(player.slot(), HudDestination::Console, message);
            }
            (CommandContext::ChatPublic | CommandContext::ChatSilent, Some(player)) => {
                print::client_print(player.slot(), HudDestination::Talk, message);
            }
        }
    }

    /// Reply with formatted message
    pub fn reply_fmt(&self, args: std::fmt::Arguments<'_>) {
        self.reply(&args.to_string());
    }

    /// Replies sent so far
    pub fn replies(&self) -> Vec<String> {
        self.replies.lock().clone()
    }
}

/// Split a command line into arguments, keeping double-quoted runs together
pub fn tokenize(line: &str) -> Vec<String> {
    let mut args = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => {
                if in_quotes {
                    args.push(std::mem::take(&mut current));
                }
                in_quotes = !in_quotes;
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    args.push(std::mem::take(&mut current));
                }
            }
            c => current.push(c),
        }
    }

    if !current.is_empty() {
        args.push(current);
    }
    args
}

/// Command callback
pub type CommandCallback =
    Arc<dyn Fn(Option<&PlayerController>, &CommandInfo) -> CommandResult + Send + Sync>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_context() {
        assert!(CommandContext::ChatPublic.is_chat());
        assert!(CommandContext::ChatSilent.is_chat());
        assert!(!CommandContext::ServerConsole.is_chat());

        assert!(CommandContext::ServerConsole.is_console());
        assert!(CommandContext::ClientConsole.is_console());
        assert!(!CommandContext::ChatPublic.is_console());

        assert!(CommandContext::ChatSilent.is_silent());
        assert!(!CommandContext::ChatPublic.is_silent());
    }

    #[test]
    fn test_command_info() {
        let info = CommandInfo::from_line(
            "css_editbarriers  A extra",
            None,
            CommandContext::ServerConsole,
        );

        assert_eq!(info.arg_count(), 3);
        assert_eq!(info.command_name(), "css_editbarriers");
        assert_eq!(info.arg(1), "A");
        assert_eq!(info.arg(999), "");
        assert_eq!(info.arg_string(), "A extra");
        assert_eq!(info.player_slot(), -1);
        assert!(info.player().is_none());
    }

    #[test]
    fn test_tokenize_quotes() {
        assert_eq!(
            tokenize(r#"say "hello there" now"#),
            vec!["say", "hello there", "now"]
        );
        assert_eq!(tokenize("   "), Vec::<String>::new());
        assert_eq!(tokenize(r#"cmd """#), vec!["cmd", ""]);
    }

    #[test]
    fn test_replies_recorded() {
        let player = PlayerController::new(2, 76561198000000001, "op");
        let info = CommandInfo::from_line("css_testbarrier", Some(player), CommandContext::ChatPublic);

        info.reply("first");
        info.reply_fmt(format_args!("second {}", 2));

        assert_eq!(info.replies(), vec!["first", "second 2"]);
        assert_eq!(info.player_slot(), 2);
    }
}
