//! Command line interface

pub mod commands;
pub mod display;
pub mod generate;

pub use commands::{CliArgs, Commands};
