//! Utility modules for certbench
//!
//! This module contains error types, progress indicators, and other utilities.

pub mod error;
pub mod progress;

pub use error::{BenchError, CertFileError, ConfigError, HarvestError, Result, ToolkitError};
