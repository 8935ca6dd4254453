//! Presentation layer handling terminal UI and user input.
//!
//! Renders the two step views with ratatui and turns crossterm key and
//! mouse events into calls on the session state.

pub mod ui;
pub mod input;

pub use ui::*;
pub use input::*;
