//! Verify command implementation

use crate::cert_ops::{read_certificates, verify_chain_of_trust, TrustFailure};
use crate::cli::VerifyArgs;
use crate::harvest::pem_split::pem_blocks;
use crate::output::print_chain_result;
use crate::utils::progress::print_fail;
use crate::utils::CertFileError;
use console::style;
use std::path::Path;

/// Outcome of verifying one target, as an exit status bit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyExit {
    Verified = 0,
    Failed = 1,
    Unreadable = 2,
}

impl VerifyExit {
    pub fn code(self) -> i32 {
        self as i32
    }
}

/// Read an intermediates file, treating a comment-only file as empty.
///
/// The harvester writes a single marker comment when a host had no
/// intermediates.
pub fn read_intermediates(path: &Path) -> Result<Vec<Vec<u8>>, CertFileError> {
    let data = std::fs::read(path).map_err(|e| CertFileError::FileReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if let Ok(text) = std::str::from_utf8(&data) {
        let comments_only = text
            .lines()
            .map(str::trim)
            .all(|line| line.is_empty() || line.starts_with('#'));
        if comments_only && pem_blocks(text).is_empty() {
            tracing::debug!("{}: no intermediates listed", path.display());
            return Ok(Vec::new());
        }
    }

    read_certificates(path)
}

/// Combine per-target outcomes into a process exit code.
///
/// Codes are OR-ed, so a batch with both a failed and an unreadable
/// target exits 3.
pub fn combine_exit_codes(outcomes: impl IntoIterator<Item = VerifyExit>) -> i32 {
    outcomes
        .into_iter()
        .fold(VerifyExit::Verified.code(), |rc, outcome| rc | outcome.code())
}

/// Verify every target and return the process exit code
pub fn run_verify(args: &VerifyArgs, verbose: bool) -> i32 {
    let targets = args.targets();
    if targets.is_empty() {
        println!("Provide --target <file> or use --batch <file1> <file2> ...");
        return VerifyExit::Unreadable.code();
    }

    let roots = match read_certificates(&args.roots) {
        Ok(roots) => roots,
        Err(e) => {
            print_fail(&format!(
                "Could not read root bundle '{}': {}",
                args.roots.display(),
                e
            ));
            return VerifyExit::Unreadable.code();
        }
    };

    let intermediates = match &args.intermediate {
        Some(path) => match read_intermediates(path) {
            Ok(certs) => certs,
            Err(e) => {
                print_fail(&format!(
                    "Could not read intermediate cert(s) '{}': {}",
                    path.display(),
                    e
                ));
                return VerifyExit::Unreadable.code();
            }
        },
        None => Vec::new(),
    };

    tracing::info!(
        "{} root(s), {} intermediate(s) loaded",
        roots.len(),
        intermediates.len()
    );

    combine_exit_codes(
        targets
            .iter()
            .map(|target| verify_one(target, &intermediates, &roots, verbose)),
    )
}

fn verify_one(
    target: &Path,
    intermediates: &[Vec<u8>],
    roots: &[Vec<u8>],
    verbose: bool,
) -> VerifyExit {
    let label = target.display().to_string();

    let leaf = match read_certificates(target) {
        Ok(certs) => certs.into_iter().next(),
        Err(e) => {
            println!("[{}] {} Could not read: {}", label, style("✗").red(), e);
            return VerifyExit::Unreadable;
        }
    };
    let Some(leaf) = leaf else {
        println!("[{}] {} Could not read: no certificate", label, style("✗").red());
        return VerifyExit::Unreadable;
    };

    let result = match verify_chain_of_trust(&leaf, intermediates, roots) {
        Ok(result) => result,
        Err(e) => {
            println!("[{}] {} Could not read: {}", label, style("✗").red(), e);
            return VerifyExit::Unreadable;
        }
    };

    print_chain_result(&label, &result, verbose);

    if result.is_valid {
        VerifyExit::Verified
    } else {
        if result.failure == Some(TrustFailure::UnableToGetLocalIssuer) {
            println!(
                "  Hint: Ensure all required intermediate certs are included via --intermediate."
            );
        }
        VerifyExit::Failed
    }
}
