//! Application layer managing form state and session workflows.
//!
//! The controller holds the recipient form state machine; the session state
//! adds the terminal-only concerns around it.

pub mod controller;
pub mod state;

pub use controller::*;
pub use state::*;
