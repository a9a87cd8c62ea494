//! Command manager - registration and dispatch

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use slotmap::{new_key_type, SlotMap};

use super::info::{CommandCallback, CommandContext, CommandInfo, CommandResult};
use crate::entities::PlayerController;

new_key_type! {
    /// Handle for a registered command
    pub struct CommandKey;
}

/// Default command prefix
pub const DEFAULT_PREFIX: &str = "csr_";

/// CounterStrikeSharp compatibility prefix
pub const CSS_PREFIX: &str = "css_";

/// Registered command information
struct CommandEntry {
    /// Full command name (e.g., "css_editbarriers")
    name: String,
    /// Short name without prefix (e.g., "editbarriers")
    short_name: String,
    /// Command description
    description: String,
    callback: CommandCallback,
    /// Whether this is server-only
    server_only: bool,
    /// Required permission (e.g., "@css/root")
    required_permission: Option<String>,
}

/// Global command manager
pub struct CommandManager {
    /// Commands indexed by key
    commands: SlotMap<CommandKey, CommandEntry>,

    /// Lookup by full command name (lowercase)
    by_name: HashMap<String, CommandKey>,

    /// Lookup by short name for chat commands (lowercase)
    by_short_name: HashMap<String, CommandKey>,
}

/// A command resolved for execution, detached from the registry lock
struct PreparedCommand {
    callback: CommandCallback,
    server_only: bool,
    required_permission: Option<String>,
}

/// Strip a known prefix from a lowercase command name
fn short_name_of(name_lower: &str) -> &str {
    name_lower
        .strip_prefix(DEFAULT_PREFIX)
        .or_else(|| name_lower.strip_prefix(CSS_PREFIX))
        .unwrap_or(name_lower)
}

impl CommandManager {
    fn new() -> Self {
        Self {
            commands: SlotMap::with_key(),
            by_name: HashMap::new(),
            by_short_name: HashMap::new(),
        }
    }

    /// Register a command
    fn register(
        &mut self,
        name: &str,
        description: &str,
        server_only: bool,
        required_permission: Option<String>,
        callback: CommandCallback,
    ) -> Option<CommandKey> {
        let name_lower = name.to_lowercase();

        if self.by_name.contains_key(&name_lower) {
            tracing::warn!("Command '{}' already registered", name);
            return None;
        }

        let short_name = short_name_of(&name_lower).to_string();

        let entry = CommandEntry {
            name: name.to_string(),
            short_name: short_name.clone(),
            description: description.to_string(),
            callback,
            server_only,
            required_permission,
        };

        let key = self.commands.insert(entry);

        // Only register short name if it's different from the full name
        if short_name != name_lower {
            self.by_short_name.insert(short_name, key);
        }
        self.by_name.insert(name_lower, key);

        tracing::debug!("Registered command: {}", name);
        Some(key)
    }

    /// Unregister a command by key
    fn unregister(&mut self, key: CommandKey) -> bool {
        let Some(entry) = self.commands.remove(key) else {
            return false;
        };

        self.by_name.remove(&entry.name.to_lowercase());
        if self.by_short_name.get(&entry.short_name) == Some(&key) {
            self.by_short_name.remove(&entry.short_name);
        }
        tracing::debug!("Unregistered command: {}", entry.name);
        true
    }

    /// Find command by full name
    pub fn find_by_name(&self, name: &str) -> Option<CommandKey> {
        self.by_name.get(&name.to_lowercase()).copied()
    }

    /// Find command by short name (for chat commands)
    pub fn find_by_short_name(&self, name: &str) -> Option<CommandKey> {
        self.by_short_name.get(&name.to_lowercase()).copied()
    }

    /// Find a chat command: short name first, then each known prefix
    pub fn find_chat_command(&self, short_name: &str) -> Option<CommandKey> {
        self.find_by_short_name(short_name)
            .or_else(|| self.find_by_name(&format!("{}{}", DEFAULT_PREFIX, short_name)))
            .or_else(|| self.find_by_name(&format!("{}{}", CSS_PREFIX, short_name)))
    }

    fn prepare(&self, key: CommandKey) -> Option<PreparedCommand> {
        self.commands.get(key).map(|entry| PreparedCommand {
            callback: entry.callback.clone(),
            server_only: entry.server_only,
            required_permission: entry.required_permission.clone(),
        })
    }

    /// Get command description
    pub fn get_description(&self, key: CommandKey) -> Option<&str> {
        self.commands.get(key).map(|e| e.description.as_str())
    }

    /// Get command name
    pub fn get_name(&self, key: CommandKey) -> Option<&str> {
        self.commands.get(key).map(|e| e.name.as_str())
    }

    /// Iterate over all registered commands
    pub fn iter(&self) -> impl Iterator<Item = (CommandKey, &str, &str)> {
        self.commands
            .iter()
            .map(|(key, entry)| (key, entry.name.as_str(), entry.description.as_str()))
    }

    /// Get total number of registered commands
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    /// Check if command manager has no registered commands
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

impl PreparedCommand {
    /// Check restrictions, then run the callback
    fn execute(&self, info: &CommandInfo) -> CommandResult {
        let player = info.player();

        if self.server_only && player.is_some() {
            info.reply("This command can only be executed from the server console.");
            return CommandResult::Handled;
        }

        // Server console always has permission
        if let (Some(permission), Some(p)) = (&self.required_permission, player) {
            if !crate::permissions::player_has_permission(p, permission) {
                info.reply(&format!(
                    "You don't have permission to use this command. Required: {}",
                    permission
                ));
                return CommandResult::Handled;
            }
        }

        (self.callback)(player, info)
    }
}

/// Global command manager instance
pub static COMMANDS: LazyLock<RwLock<CommandManager>> =
    LazyLock::new(|| RwLock::new(CommandManager::new()));

/// Register a command
///
/// `css_`/`csr_` prefixed names are also reachable from chat as `!name` and
/// `/name`.
///
/// # Returns
/// A key to manage the command, or None if the name is taken
pub fn register_command<F>(name: &str, description: &str, callback: F) -> Option<CommandKey>
where
    F: Fn(Option<&PlayerController>, &CommandInfo) -> CommandResult + Send + Sync + 'static,
{
    COMMANDS
        .write()
        .register(name, description, false, None, Arc::new(callback))
}

/// Register a command with an optional required permission
///
/// Called by the `#[console_command]` macro.
pub fn register_command_ex<F>(
    name: &str,
    description: &str,
    permission: Option<&str>,
    callback: F,
) -> Option<CommandKey>
where
    F: Fn(Option<&PlayerController>, &CommandInfo) -> CommandResult + Send + Sync + 'static,
{
    COMMANDS.write().register(
        name,
        description,
        false,
        permission.map(|s| s.to_string()),
        Arc::new(callback),
    )
}

/// Register a server-only command
///
/// Server-only commands can only be executed from the server console,
/// not by players in-game.
pub fn register_server_command<F>(name: &str, description: &str, callback: F) -> Option<CommandKey>
where
    F: Fn(Option<&PlayerController>, &CommandInfo) -> CommandResult + Send + Sync + 'static,
{
    COMMANDS
        .write()
        .register(name, description, true, None, Arc::new(callback))
}

/// Unregister a command
pub fn unregister_command(key: CommandKey) -> bool {
    COMMANDS.write().unregister(key)
}

/// Dispatch a console command line
///
/// `player` is None for the server console.
pub fn dispatch_console_command(line: &str, player: Option<PlayerController>) -> CommandResult {
    let context = if player.is_some() {
        CommandContext::ClientConsole
    } else {
        CommandContext::ServerConsole
    };

    let info = CommandInfo::from_line(line, player, context);

    let prepared = {
        let manager = COMMANDS.read();
        manager
            .find_by_name(info.command_name())
            .and_then(|key| manager.prepare(key))
    };

    match prepared {
        Some(command) => command.execute(&info),
        None => CommandResult::Continue,
    }
}

/// Dispatch a chat command (trigger already stripped)
///
/// `text` is the command and its arguments, e.g. `editbarriers A`.
pub fn dispatch_chat_command(
    text: &str,
    player: PlayerController,
    is_silent: bool,
) -> CommandResult {
    let context = if is_silent {
        CommandContext::ChatSilent
    } else {
        CommandContext::ChatPublic
    };

    let info = CommandInfo::from_line(text, Some(player), context);

    let prepared = {
        let manager = COMMANDS.read();
        manager
            .find_chat_command(info.command_name())
            .and_then(|key| manager.prepare(key))
    };

    match prepared {
        Some(command) => command.execute(&info),
        None => CommandResult::Continue,
    }
}
