//! Command implementations

pub mod bench;
pub mod harvest;
pub mod verify;

pub use bench::{run_bench, run_summarize};
pub use harvest::run_harvest;
pub use verify::{combine_exit_codes, run_verify, VerifyExit};
