//! CLI module

pub mod args;

pub use args::{BenchArgs, Cli, Commands, HarvestArgs, VerifyArgs};
