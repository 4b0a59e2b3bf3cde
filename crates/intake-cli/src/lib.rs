//! CLI library components for the intake wizard.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod profiles;
pub mod submitter;
pub mod summary;
