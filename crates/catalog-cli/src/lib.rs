//! CLI library components for the catalog transcoder.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod summary;
