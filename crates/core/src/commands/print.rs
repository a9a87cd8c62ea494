//! Client print functionality for sending messages to players
//!
//! Messages go through the host's `client_print`. Without a host (or when the
//! host lacks the function) they are written to the server log instead.

/// Print destination for client messages
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HudDestination {
    /// HUD notification area
    Notify = 1,
    /// Client console
    Console = 2,
    /// Chat area
    Talk = 3,
    /// Center of screen
    Center = 4,
}

/// Print a message to the player in `slot`
///
/// Returns false when the message only reached the server log.
pub fn client_print(slot: i32, dest: HudDestination, message: &str) -> bool {
    let printed = retakes_engine::try_engine()
        .map(|engine| engine.client_print(slot, dest as i32, message))
        .unwrap_or(false);

    if !printed {
        tracing::info!("[ClientPrint {}] {}", slot, message);
    }
    printed
}

/// Print a message to a player's console
pub fn print_to_console(slot: i32, message: &str) {
    client_print(slot, HudDestination::Console, message);
}

/// Print a message to a player's chat
pub fn print_to_chat(slot: i32, message: &str) {
    client_print(slot, HudDestination::Talk, message);
}
