//! Core logic layer
//!
//! Command parsing, the DevMode session and the host that owns the state it
//! edits. Nothing here does terminal I/O.

pub mod app_core;
pub mod command;
pub mod devmode;
pub mod error;
pub mod outcome;

pub use app_core::AppCore;
