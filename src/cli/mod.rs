//! Handles Command Line Interface (CLI) related functionalities.
//!
//! Includes defining commands, handling user interaction (prompts, menus),
//! input validation, and managing application state relevant to the UI.

mod commands;

pub use commands::*;
