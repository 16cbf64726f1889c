//! Trial logs, summary rows and median reduction

use crate::bench::algorithm::Metric;
use crate::bench::parse::{parse_dsa_ops, parse_mb_s};
use crate::utils::BenchError;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::Path;

/// Text written for a missing estimate
pub const NOT_AVAILABLE: &str = "not available";

/// Header line of `summary.csv`
pub const CSV_HEADER: &str = "algorithm,metric,size_or_key,trial,estimate";

/// Delimiter line that opens trial `n` in a log
pub fn trial_delimiter(trial: u32) -> String {
    format!("=== trial {} ===", trial)
}

fn parse_delimiter(line: &str) -> Option<u32> {
    line.trim()
        .strip_prefix("=== trial ")?
        .strip_suffix(" ===")?
        .trim()
        .parse()
        .ok()
}

/// A single trial's numeric estimate
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Estimate {
    Value(f64),
    NotAvailable,
}

impl Estimate {
    pub fn value(&self) -> Option<f64> {
        match self {
            Estimate::Value(v) => Some(*v),
            Estimate::NotAvailable => None,
        }
    }
}

impl From<Option<f64>> for Estimate {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Estimate::NotAvailable, Estimate::Value)
    }
}

impl fmt::Display for Estimate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Estimate::Value(v) => write!(f, "{:.3}", v),
            Estimate::NotAvailable => write!(f, "{}", NOT_AVAILABLE),
        }
    }
}

/// One line of `summary.csv`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub algorithm: String,
    pub metric: String,
    pub size_or_key: String,
    pub trial: u32,
    pub estimate: Estimate,
}

impl SummaryRow {
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{}",
            self.algorithm, self.metric, self.size_or_key, self.trial, self.estimate
        )
    }
}

/// Split a trial log into segments keyed by trial index
pub fn split_trials(log: &str) -> BTreeMap<u32, String> {
    let mut segments = BTreeMap::new();
    let mut current: Option<u32> = None;

    for line in log.lines() {
        if let Some(trial) = parse_delimiter(line) {
            current = Some(trial);
            segments.entry(trial).or_insert_with(String::new);
            continue;
        }
        if let Some(trial) = current {
            let segment = segments.entry(trial).or_insert_with(String::new);
            segment.push_str(line);
            segment.push('\n');
        }
    }

    segments
}

fn estimate_for(segment: &str, metric: &Metric) -> Estimate {
    match metric {
        Metric::Throughput { block_size } => parse_mb_s(segment, *block_size).into(),
        Metric::Operations {
            op, row_keyword, ..
        } => parse_dsa_ops(segment, op, row_keyword).into(),
    }
}

/// Parse every expected trial of a log into summary rows.
///
/// Always yields `trials` rows per metric; a missing log, a missing
/// trial segment, or a segment without a match gives `NotAvailable`.
pub fn summarize_log_trials(
    log: Option<&str>,
    algorithm: &str,
    metrics: &[Metric],
    trials: u32,
) -> Vec<SummaryRow> {
    let segments = log.map(split_trials).unwrap_or_default();
    let mut rows = Vec::with_capacity(metrics.len() * trials as usize);

    for metric in metrics {
        for trial in 1..=trials {
            let estimate = segments
                .get(&trial)
                .map_or(Estimate::NotAvailable, |segment| estimate_for(segment, metric));
            rows.push(SummaryRow {
                algorithm: algorithm.to_string(),
                metric: metric.label(),
                size_or_key: metric.size_or_key(),
                trial,
                estimate,
            });
        }
    }

    rows
}

/// Read a log file and summarize it; an unreadable or absent file counts as empty
pub fn summarize_log_file(
    path: &Path,
    algorithm: &str,
    metrics: &[Metric],
    trials: u32,
) -> Vec<SummaryRow> {
    let log = match std::fs::read_to_string(path) {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::debug!("no log at {}: {}", path.display(), e);
            None
        }
    };
    summarize_log_trials(log.as_deref(), algorithm, metrics, trials)
}

/// Write rows to `summary.csv`
pub fn write_summary_csv(path: &Path, rows: &[SummaryRow]) -> Result<(), BenchError> {
    let mut out = String::from(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&row.to_csv_line());
        out.push('\n');
    }

    std::fs::write(path, out).map_err(|e| BenchError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Median of the available values, or `None` when there are none
pub fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

/// Median over the trials of one (algorithm, metric, size) group
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MedianRow {
    pub algorithm: String,
    pub metric: String,
    pub size_or_key: String,
    /// Trials with a numeric estimate
    pub available: usize,
    pub trials: usize,
    pub median: Option<f64>,
}

impl MedianRow {
    pub fn median_display(&self) -> String {
        Estimate::from(self.median).to_string()
    }
}

/// Group rows by (algorithm, metric, size_or_key) in first-seen order
/// and take the median of each group, ignoring unavailable estimates.
pub fn aggregate_medians(rows: &[SummaryRow]) -> Vec<MedianRow> {
    let mut order: Vec<(String, String, String)> = Vec::new();
    let mut groups: HashMap<(String, String, String), Vec<Estimate>> = HashMap::new();

    for row in rows {
        let key = (
            row.algorithm.clone(),
            row.metric.clone(),
            row.size_or_key.clone(),
        );
        groups
            .entry(key.clone())
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(row.estimate);
    }

    order
        .into_iter()
        .map(|key| {
            let estimates = groups.remove(&key).unwrap_or_default();
            let values: Vec<f64> = estimates.iter().filter_map(Estimate::value).collect();
            let (algorithm, metric, size_or_key) = key;
            MedianRow {
                algorithm,
                metric,
                size_or_key,
                available: values.len(),
                trials: estimates.len(),
                median: median(&values),
            }
        })
        .collect()
}
