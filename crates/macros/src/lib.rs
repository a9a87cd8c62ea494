//! Retakes proc macros
//!
//! - `#[console_command]` - Register console/chat commands
//!
//! # Example
//!
//! ```ignore
//! use retakes_macros::console_command;
//!
//! #[console_command("css_showbarriers", "Preview barriers", permission = "@css/root")]
//! fn cmd_show(player: Option<&PlayerController>, info: &CommandInfo) -> CommandResult {
//!     info.reply("Showing barriers");
//!     CommandResult::Handled
//! }
//!
//! // Generated:
//! // - cmd_show() - The command handler
//! // - cmd_show_register() - Register the command
//! // - cmd_show_unregister() - Unregister the command
//! ```

mod console_command;

use proc_macro::TokenStream;
use syn::{parse_macro_input, ItemFn};

/// Attribute macro for console command registration
///
/// Marks a function as a console/chat command and generates helper functions
/// for registration and unregistration.
///
/// # Arguments
///
/// - First argument: Command name (e.g., `"css_editbarriers"`)
/// - Second argument: Command description
/// - Optional: `permission = "@domain/flag"` - checked by the command manager
///   before the handler runs
///
/// # Generated Code
///
/// - The original function with the handler signature
/// - `{name}_register()` - Register the command with the system
/// - `{name}_unregister()` - Unregister the command
/// - A static holding the registered key
#[proc_macro_attribute]
pub fn console_command(attr: TokenStream, item: TokenStream) -> TokenStream {
    let args = parse_macro_input!(attr as console_command::ConsoleCommandArgs);
    let func = parse_macro_input!(item as ItemFn);
    console_command::generate_console_command(args, func).into()
}
