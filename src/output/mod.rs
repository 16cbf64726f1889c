//! Output formatting module
//!
//! Provides terminal output with colors and tables, and JSON export.

pub mod json;
pub mod tables;
pub mod terminal;

pub use json::print_json;
pub use tables::{format_table, print_median_table};
pub use terminal::{
    print_bench_summary, print_chain_result, print_harvest_summary, print_host_outcome,
};
