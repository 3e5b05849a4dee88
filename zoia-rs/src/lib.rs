//! zoia CLI library
//!
//! Command-line front end for the `zoia-patch` slot assignment engine.

pub mod cli;
pub mod commands;
pub mod utils;
