//! CLI library components for the workbench auto-mapper.

pub mod commands;
pub mod logging;
pub mod summary;
