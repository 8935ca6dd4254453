//! Recipient details form
//!
//! A two-step terminal form that collects a recipient's bank account and
//! contact details, with inline validation and a simulated account-name lookup.

pub mod domain;
pub mod application;
pub mod infrastructure;
pub mod presentation;
pub mod config;

pub use domain::*;
pub use application::*;
