//! Infrastructure layer providing external service integrations.
//!
//! Submission sinks and file logging live here.

pub mod persistence;
pub mod logging;

pub use persistence::*;
pub use logging::*;
