//! Custom error types for certbench
//!
//! This module defines domain-specific error types using `thiserror` for
//! the failure modes of certificate harvesting, benchmarking and chain
//! verification.

use thiserror::Error;

/// Top-level error type for the certbench application
#[derive(Error, Debug)]
pub enum ToolkitError {
    #[error("Harvest error: {0}")]
    Harvest(#[from] HarvestError),

    #[error("Benchmark error: {0}")]
    Bench(#[from] BenchError),

    #[error("Certificate file error: {0}")]
    CertFile(#[from] CertFileError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors raised while harvesting a certificate chain from a host
#[derive(Error, Debug)]
pub enum HarvestError {
    #[error("Invalid host name: {host}")]
    InvalidHost { host: String },

    #[error("Failed to connect to {host}:{port}: {message}")]
    Connection {
        host: String,
        port: u16,
        message: String,
    },

    #[error("Connection to {host}:{port} timed out")]
    Timeout { host: String, port: u16 },

    #[error("TLS handshake with {host} failed: {message}")]
    Handshake { host: String, message: String },

    #[error("No certificates presented by {host}")]
    EmptyChain { host: String },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Client setup failed: {message}")]
    ClientSetup { message: String },
}

/// Errors raised by the benchmark harness
#[derive(Error, Debug)]
pub enum BenchError {
    #[error("Required tool not found: {tool}")]
    ToolMissing { tool: String },

    #[error("Failed to run {tool}: {message}")]
    Spawn { tool: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },
}

/// Certificate file reading and chain verification errors
#[derive(Error, Debug)]
pub enum CertFileError {
    #[error("Failed to read {path}: {message}")]
    FileReadError { path: String, message: String },

    #[error("Unsupported certificate format: {format}")]
    UnsupportedFormat { format: String },

    #[error("Failed to parse certificate: {message}")]
    ParseError { message: String },
}

/// Configuration loading errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Failed to parse configuration: {message}")]
    ParseError { message: String },

    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Result type alias using ToolkitError
pub type Result<T> = std::result::Result<T, ToolkitError>;
