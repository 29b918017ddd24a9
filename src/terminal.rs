//! Terminal restoration around interactive prompts.
//!
//! dialoguer hides the cursor while a prompt is active; an interrupt or a
//! panic in the middle of one would otherwise leave it hidden.

use crossterm::{cursor, execute};
use std::io::{self, Write};

/// Exit status used when the user interrupts with Ctrl-C.
pub const INTERRUPTED_EXIT_CODE: i32 = 130;

/// Show the cursor again on stderr (where prompts are drawn).
pub fn restore_cursor() {
    let mut stderr = io::stderr();
    let _ = execute!(stderr, cursor::Show);
    let _ = stderr.flush();
}

/// Install a Ctrl-C handler that restores the cursor and exits with
/// [`INTERRUPTED_EXIT_CODE`]. Call this once at startup.
pub fn install_interrupt_handler() -> Result<(), ctrlc::Error> {
    ctrlc::set_handler(|| {
        restore_cursor();
        eprintln!();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    })
}

/// Install a panic hook that restores the cursor before printing the panic
/// message. Call this once at startup.
pub fn install_panic_hook() {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore_cursor();
        default_hook(info);
    }));
}
