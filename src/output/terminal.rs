//! Terminal output for harvest, benchmark and verify results

use crate::bench::{BenchReport, RunStatus};
use crate::cert_ops::ChainValidationResult;
use crate::harvest::{AiaOutcome, HarvestReport, HostOutcome, HostStatus};
use crate::utils::progress::{print_detail, print_fail, print_header, print_info, print_pass};
use console::style;

/// Print one host's result as soon as it is known
pub fn print_host_outcome(outcome: &HostOutcome) {
    let artifacts = match &outcome.status {
        HostStatus::Saved(artifacts) => artifacts,
        HostStatus::Failed { reason } => {
            print_fail(&format!("{}: {}", style(&outcome.host).bold(), reason));
            return;
        }
    };

    let source = match &artifacts.aia {
        AiaOutcome::Skipped => "from handshake".to_string(),
        AiaOutcome::Attempted { fetched, .. } if !fetched.is_empty() => "via AIA".to_string(),
        AiaOutcome::Attempted { urls, .. } if urls.is_empty() => {
            "none found, no AIA URL".to_string()
        }
        AiaOutcome::Attempted { .. } => "none found".to_string(),
    };

    print_pass(&format!(
        "{}: leaf + {} intermediate(s) ({})",
        style(&outcome.host).bold(),
        artifacts.intermediates,
        source
    ));

    for (i, cert) in artifacts.certificates.iter().enumerate() {
        let label = if i == 0 {
            "leaf".to_string()
        } else {
            format!("[{}]", i)
        };
        print_detail(&label, &cert.subject);
        if cert.is_self_issued() {
            print_detail("issuer", &format!("{} {}", cert.issuer, style("(self-issued)").yellow()));
        } else {
            print_detail("issuer", &cert.issuer);
        }
        print_detail("sha256", &cert.fingerprint_sha256);
    }
    print_detail(
        "files",
        &format!(
            "{}, {}, {}",
            artifacts.chain_path.display(),
            artifacts.leaf_path.display(),
            artifacts.intermediate_path.display()
        ),
    );
}

/// Totals line at the end of a harvest
pub fn print_harvest_summary(report: &HarvestReport) {
    print_header("Summary");
    println!(
        "  {} hosts: {} saved, {} failed",
        report.outcomes.len(),
        style(report.saved()).green(),
        if report.failed() > 0 {
            style(report.failed()).red()
        } else {
            style(report.failed()).dim()
        }
    );
}

/// Run directory, per-algorithm status and the median table
pub fn print_bench_summary(report: &BenchReport) {
    print_header("Results");
    print_info(&format!("Run directory: {}", report.run_dir.display()));
    print_info(&format!("Legacy ciphers: {}", report.legacy));

    let skipped: Vec<&str> = report
        .runs
        .iter()
        .filter(|r| matches!(r.status, RunStatus::Skipped { .. }))
        .map(|r| r.label.as_str())
        .collect();
    if !skipped.is_empty() {
        print_info(&format!("Skipped: {}", skipped.join(", ")));
    }

    println!();
    super::tables::print_median_table(&report.medians);
}

/// Verification result for one target file
pub fn print_chain_result(target: &str, result: &ChainValidationResult, verbose: bool) {
    if result.is_valid {
        println!("[{}] {} Certificate verified", target, style("✓").green());
    } else {
        let reason = result
            .failure
            .map(|f| f.to_string())
            .unwrap_or_else(|| "unknown error".to_string());
        println!(
            "[{}] {} Verification failed: {}",
            target,
            style("✗").red(),
            reason
        );
    }

    if verbose {
        for step in &result.steps {
            let icon = if step.passed {
                style("✓").green()
            } else {
                style("✗").red()
            };
            print!("    {} {}", icon, step.description);
            if let Some(details) = &step.details {
                print!(" {}", style(format!("({})", details)).dim());
            }
            println!();
        }
        println!("    {} {}", style("path:").dim(), result.path.join(" -> "));
    }
}
