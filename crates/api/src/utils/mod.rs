//! Shared helpers for the command and HTTP layers

pub mod command_helpers;
pub mod health;
pub mod logging;
