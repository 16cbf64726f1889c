//! Certificate file operations module
//!
//! Reads harvested certificate files and verifies them against a root
//! CA bundle.

pub mod chain_verify;
pub mod reader;

pub use chain_verify::{verify_chain_of_trust, ChainStep, ChainValidationResult, TrustFailure};
pub use reader::{detect_format_from_bytes, read_certificates, DetectedFormat};
