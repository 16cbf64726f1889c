//! Bench and summarize command implementations

use crate::bench::{
    recorded_trials, summarize_run_dir, BenchHarness, BenchReport, MedianRow, OpensslCommand,
    SummaryRow,
};
use crate::config::BenchSettings;
use crate::output::{print_bench_summary, print_median_table};
use crate::utils::progress::{print_header, print_info};
use crate::utils::{BenchError, Result};
use std::path::Path;

/// Run the benchmark harness with the real OpenSSL binary
pub fn run_bench(settings: &BenchSettings) -> Result<BenchReport> {
    let runner = OpensslCommand::new(settings.openssl.clone());

    print_header(&format!(
        "Benchmarking {} algorithm(s), {} trial(s) x {}s",
        settings.algorithms.len(),
        settings.trials,
        settings.seconds
    ));

    let report = BenchHarness::new(settings.clone(), &runner).run()?;
    print_bench_summary(&report);
    print_info(&format!(
        "Summary written to {}",
        report.run_dir.join("summary.csv").display()
    ));
    Ok(report)
}

/// Re-parse the logs of an existing run directory.
///
/// The trial count is `trials` when given, otherwise the highest trial
/// recorded in the logs, falling back to the configured count.
pub fn run_summarize(
    dir: &Path,
    settings: &BenchSettings,
    trials: Option<u32>,
) -> Result<(Vec<SummaryRow>, Vec<MedianRow>)> {
    if !dir.is_dir() {
        return Err(BenchError::Read {
            path: dir.display().to_string(),
            message: "not a directory".to_string(),
        }
        .into());
    }

    let trials = trials
        .or_else(|| recorded_trials(dir, settings))
        .unwrap_or(settings.trials);
    tracing::info!("summarizing {} with {} trial(s)", dir.display(), trials);
    let settings = BenchSettings {
        trials,
        ..settings.clone()
    };

    let (rows, medians) = summarize_run_dir(dir, &settings)?;
    print_header(&format!("Summary of {} ({} trial(s))", dir.display(), trials));
    print_info(&format!(
        "{} row(s) written to {}",
        rows.len(),
        dir.join("summary.csv").display()
    ));
    println!();
    print_median_table(&medians);
    Ok((rows, medians))
}
