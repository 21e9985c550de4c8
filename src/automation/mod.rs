//! Everything that acts on behalf of the user.
//!
//! This module provides:
//! - Stuck-prompt correction
//! - Keystroke injection for typing words
//! - The background polling loop
//! - Command dispatch and the global hotkey

pub mod commands;
pub mod correction;
pub mod hotkey;
pub mod input;
pub mod runner;

pub use commands::{Command, Dispatcher};
pub use hotkey::spawn_hotkey_listener;
pub use input::SendInputKeyboard;
pub use runner::PollingLoop;
