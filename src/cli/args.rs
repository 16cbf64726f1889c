//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "certbench")]
#[command(version)]
#[command(about = "Harvest TLS certificate chains and benchmark OpenSSL ciphers", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (default: config/default.toml when present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Capture certificate chains from TLS hosts
    Harvest(HarvestArgs),

    /// Run the OpenSSL speed benchmark harness
    Bench(BenchArgs),

    /// Re-summarize the logs of an earlier benchmark run
    Summarize {
        /// Benchmark run directory (bench-YYYYmmdd-HHMMSS)
        #[arg(value_name = "DIR")]
        dir: PathBuf,

        /// Trials per algorithm (default: highest trial found in the logs)
        #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
        trials: Option<u32>,
    },

    /// Verify harvested certificates against a root CA bundle
    Verify(VerifyArgs),
}

#[derive(Args, Debug)]
pub struct HarvestArgs {
    /// Hosts to connect to (default: hosts from configuration)
    #[arg(value_name = "HOST")]
    pub hosts: Vec<String>,

    /// TLS port
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory for the PEM files
    #[arg(long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Print the harvest report as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Debug)]
pub struct BenchArgs {
    /// Seconds per speed measurement
    #[arg(short, long)]
    pub seconds: Option<u64>,

    /// Trials per algorithm
    #[arg(short, long)]
    pub trials: Option<u32>,

    /// Add a multi-core pass using all logical cores
    #[arg(short, long)]
    pub multi: bool,

    /// Parent directory for the timestamped run directory
    #[arg(long, value_name = "DIR")]
    pub output_root: Option<PathBuf>,

    /// OpenSSL binary to benchmark
    #[arg(long, value_name = "PATH")]
    pub openssl: Option<String>,
}

#[derive(Args, Debug)]
pub struct VerifyArgs {
    /// Leaf certificate to verify
    #[arg(long, value_name = "FILE", conflicts_with = "batch")]
    pub target: Option<PathBuf>,

    /// Verify several leaf certificates
    #[arg(long, value_name = "FILE", num_args = 1..)]
    pub batch: Vec<PathBuf>,

    /// Intermediate certificate(s) in PEM
    #[arg(long, value_name = "FILE")]
    pub intermediate: Option<PathBuf>,

    /// Root CA bundle in PEM
    #[arg(long, value_name = "FILE", default_value = "ca-certificates.crt")]
    pub roots: PathBuf,
}

impl VerifyArgs {
    /// Files to verify, in command-line order
    pub fn targets(&self) -> Vec<PathBuf> {
        if !self.batch.is_empty() {
            self.batch.clone()
        } else {
            self.target.iter().cloned().collect()
        }
    }
}
