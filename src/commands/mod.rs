//! Command implementations for the CLI

pub mod history;
pub mod list;
pub mod show;
pub mod tags;
