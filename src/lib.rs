//! certbench library
//!
//! Two pipelines for studying TLS deployments and cipher performance:
//! - Certificate harvesting: capture the chain a host presents, split it
//!   into leaf and intermediates, and recover missing intermediates
//!   through the leaf's AIA "CA Issuers" URLs
//! - Benchmarking: run `openssl speed` over a set of algorithms for a
//!   number of trials and reduce the raw logs into a CSV and medians
//!
//! Harvested files can be checked against a root bundle with
//! [`cert_ops::verify_chain_of_trust`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use certbench::harvest::{Harvester, HttpIssuerFetcher, TlsChainSource};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     let timeout = Duration::from_secs(10);
//!     let source = TlsChainSource::new(timeout, timeout).unwrap();
//!     let fetcher = HttpIssuerFetcher::new(timeout).unwrap();
//!     let report = Harvester::new(source, fetcher, 443, ".")
//!         .run(&["www.google.com".to_string()])
//!         .await;
//!     println!("{} saved", report.saved());
//! }
//! ```

pub mod bench;
pub mod cert_ops;
pub mod cli;
pub mod commands;
pub mod config;
pub mod harvest;
pub mod output;
pub mod utils;

pub use config::Settings;
pub use utils::error::{Result, ToolkitError};
