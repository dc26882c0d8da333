//! CLI command handlers

pub mod commands;

pub use commands::{apply, find, headers};
