//! Benchmark harness
//!
//! Drives `openssl speed` over the configured algorithms for a number of
//! trials, keeps every raw log, and reduces the logs to `summary.csv`
//! plus a table of per-(algorithm, metric, size) medians.

pub mod algorithm;
pub mod env;
pub mod parse;
pub mod provider;
pub mod runner;
pub mod summary;

pub use algorithm::{AlgorithmKind, AlgorithmSpec, Metric};
pub use provider::LegacySupport;
pub use runner::{CommandRunner, OpensslCommand, ToolOutput};
pub use summary::{Estimate, MedianRow, SummaryRow};

use crate::config::BenchSettings;
use crate::utils::progress::{create_spinner, print_fail, print_pass, print_warning};
use crate::utils::BenchError;
use chrono::Local;
use runner::{require_tool, run_speed, write_skipped_log, SpeedPlan};
use std::path::{Path, PathBuf};

/// Outcome of benchmarking one algorithm in one pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunStatus {
    /// Trials ran; `succeeded` of them exited cleanly
    Completed { succeeded: u32, trials: u32 },
    /// Not run at all
    Skipped { reason: String },
}

/// One algorithm pass and where its log went
#[derive(Debug, Clone)]
pub struct AlgorithmRun {
    pub label: String,
    pub log_path: PathBuf,
    pub status: RunStatus,
}

/// Everything a benchmark run produced
#[derive(Debug, Clone)]
pub struct BenchReport {
    pub run_dir: PathBuf,
    pub legacy: LegacySupport,
    pub runs: Vec<AlgorithmRun>,
    pub rows: Vec<SummaryRow>,
    pub medians: Vec<MedianRow>,
}

/// Log label of an algorithm in the multi-core pass
pub fn multi_label(name: &str) -> String {
    format!("{}_multi", name)
}

fn log_path(dir: &Path, label: &str) -> PathBuf {
    dir.join(format!("{}.log", label))
}

/// Benchmark harness bound to a tool runner
pub struct BenchHarness<'a> {
    settings: BenchSettings,
    runner: &'a dyn CommandRunner,
    cores: usize,
}

impl<'a> BenchHarness<'a> {
    pub fn new(settings: BenchSettings, runner: &'a dyn CommandRunner) -> Self {
        Self {
            settings,
            runner,
            cores: env::logical_cores(),
        }
    }

    /// Override the detected core count
    pub fn with_cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    /// Run into a fresh timestamped directory under `output_root`
    pub fn run(&self) -> Result<BenchReport, BenchError> {
        let version = require_tool(self.runner)?;
        tracing::info!("benchmarking {}", version);

        let dir = self.settings.output_root.join(format!(
            "bench-{}",
            Local::now().format("%Y%m%d-%H%M%S")
        ));
        std::fs::create_dir_all(&dir).map_err(|e| BenchError::Write {
            path: dir.display().to_string(),
            message: e.to_string(),
        })?;

        self.run_in(&dir)
    }

    /// Run into an existing directory
    pub fn run_in(&self, dir: &Path) -> Result<BenchReport, BenchError> {
        env::capture_environment(self.runner, &dir.join("env.txt"))?;

        let legacy = provider::detect_legacy_support(self.runner);
        if legacy.skip_legacy() {
            print_warning("Legacy provider unavailable; legacy ciphers will be skipped");
        }

        let mut plan = SpeedPlan {
            seconds: self.settings.seconds,
            trials: self.settings.trials,
            provider_args: legacy.provider_args(),
            multi: None,
        };

        let mut runs = Vec::new();
        for algorithm in &self.settings.algorithms {
            runs.push(self.run_algorithm(algorithm, &algorithm.name, &plan, legacy, dir)?);
        }

        if self.settings.multi {
            if self.cores > 1 {
                plan.multi = Some(self.cores);
                for algorithm in self.settings.algorithms.iter().filter(|a| a.multi) {
                    let label = multi_label(&algorithm.name);
                    runs.push(self.run_algorithm(algorithm, &label, &plan, legacy, dir)?);
                }
            } else {
                print_warning("Multi-core pass skipped: only one core detected");
            }
        }

        let (rows, medians) = summarize_run_dir(dir, &self.settings)?;

        Ok(BenchReport {
            run_dir: dir.to_path_buf(),
            legacy,
            runs,
            rows,
            medians,
        })
    }

    fn run_algorithm(
        &self,
        algorithm: &AlgorithmSpec,
        label: &str,
        plan: &SpeedPlan,
        legacy: LegacySupport,
        dir: &Path,
    ) -> Result<AlgorithmRun, BenchError> {
        let log_path = log_path(dir, label);

        if algorithm.legacy && legacy.skip_legacy() {
            write_skipped_log(algorithm, &log_path)?;
            print_warning(&format!("{}: skipped (legacy provider unavailable)", label));
            return Ok(AlgorithmRun {
                label: label.to_string(),
                log_path,
                status: RunStatus::Skipped {
                    reason: "legacy provider unavailable".to_string(),
                },
            });
        }

        let spinner = create_spinner(&format!(
            "Benchmarking {} ({} x {}s)...",
            label, plan.trials, plan.seconds
        ));
        let succeeded = run_speed(self.runner, algorithm, plan, &log_path);
        spinner.finish_and_clear();
        let succeeded = succeeded?;

        let message = format!("{}: {}/{} trials", label, succeeded, plan.trials);
        if succeeded == plan.trials {
            print_pass(&message);
        } else {
            print_fail(&message);
        }

        Ok(AlgorithmRun {
            label: label.to_string(),
            log_path,
            status: RunStatus::Completed {
                succeeded,
                trials: plan.trials,
            },
        })
    }
}

/// Highest trial delimiter found in the run directory's logs.
///
/// `None` when no log of a configured algorithm has any trial in it,
/// e.g. every algorithm was skipped or the logs are gone.
pub fn recorded_trials(dir: &Path, settings: &BenchSettings) -> Option<u32> {
    settings
        .algorithms
        .iter()
        .flat_map(|a| [a.name.clone(), multi_label(&a.name)])
        .filter_map(|label| std::fs::read_to_string(log_path(dir, &label)).ok())
        .filter_map(|log| summary::split_trials(&log).keys().next_back().copied())
        .max()
}

/// Parse every log in a run directory and write `summary.csv`.
///
/// Each configured algorithm contributes `trials` rows per metric even
/// when its log is missing; `<name>_multi.log` is included when present.
pub fn summarize_run_dir(
    dir: &Path,
    settings: &BenchSettings,
) -> Result<(Vec<SummaryRow>, Vec<MedianRow>), BenchError> {
    let mut rows = Vec::new();

    for algorithm in &settings.algorithms {
        let metrics = algorithm.metrics(settings.block_size);
        rows.extend(summary::summarize_log_file(
            &log_path(dir, &algorithm.name),
            &algorithm.name,
            &metrics,
            settings.trials,
        ));
    }

    for algorithm in &settings.algorithms {
        let label = multi_label(&algorithm.name);
        let path = log_path(dir, &label);
        if path.exists() {
            let metrics = algorithm.metrics(settings.block_size);
            rows.extend(summary::summarize_log_file(
                &path,
                &label,
                &metrics,
                settings.trials,
            ));
        }
    }

    summary::write_summary_csv(&dir.join("summary.csv"), &rows)?;
    let medians = summary::aggregate_medians(&rows);
    Ok((rows, medians))
}
