//! Certificate chain-of-trust verification
//!
//! Builds a path from a target certificate up to a root taken from a
//! trusted bundle. Each hop needs an issuer/subject name match and a
//! valid signature; every certificate on the path must be within its
//! validity period. Revocation and name constraints are not checked.

use crate::utils::CertFileError;
use x509_parser::prelude::*;

/// Longest path tried before giving up
const MAX_DEPTH: usize = 10;

/// Why a chain did not verify, worded like OpenSSL's verify errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustFailure {
    UnableToGetLocalIssuer,
    SelfSigned,
    SelfSignedInChain,
    Expired,
    NotYetValid,
    ChainTooLong,
}

impl std::fmt::Display for TrustFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let text = match self {
            TrustFailure::UnableToGetLocalIssuer => "unable to get local issuer certificate",
            TrustFailure::SelfSigned => "self-signed certificate",
            TrustFailure::SelfSignedInChain => "self-signed certificate in certificate chain",
            TrustFailure::Expired => "certificate has expired",
            TrustFailure::NotYetValid => "certificate is not yet valid",
            TrustFailure::ChainTooLong => "certificate chain too long",
        };
        write!(f, "{}", text)
    }
}

/// Result of chain validation
#[derive(Debug)]
pub struct ChainValidationResult {
    /// Whether the target verified against the trusted roots
    pub is_valid: bool,
    /// Individual step results
    pub steps: Vec<ChainStep>,
    /// Subjects from target to anchor (or as far as the path got)
    pub path: Vec<String>,
    pub failure: Option<TrustFailure>,
}

impl ChainValidationResult {
    fn failed(steps: Vec<ChainStep>, path: Vec<String>, failure: TrustFailure) -> Self {
        Self {
            is_valid: false,
            steps,
            path,
            failure: Some(failure),
        }
    }
}

/// A single step in chain validation
#[derive(Debug)]
pub struct ChainStep {
    pub description: String,
    pub passed: bool,
    pub details: Option<String>,
}

fn depth_label(depth: usize) -> String {
    if depth == 0 {
        "Target".to_string()
    } else {
        format!("Intermediate #{}", depth)
    }
}

fn parse_all(ders: &[Vec<u8>]) -> Vec<X509Certificate<'_>> {
    ders.iter()
        .enumerate()
        .filter_map(|(i, der)| match X509Certificate::from_der(der) {
            Ok((_, cert)) => Some(cert),
            Err(e) => {
                tracing::debug!("skipping unparsable certificate #{}: {}", i, e);
                None
            }
        })
        .collect()
}

fn validity_failure(cert: &X509Certificate<'_>) -> Option<TrustFailure> {
    let now = ASN1Time::now();
    let validity = cert.validity();
    if now < validity.not_before {
        Some(TrustFailure::NotYetValid)
    } else if now > validity.not_after {
        Some(TrustFailure::Expired)
    } else {
        None
    }
}

fn find_issuer(child: &X509Certificate<'_>, candidates: &[X509Certificate<'_>]) -> Option<usize> {
    candidates.iter().position(|candidate| {
        child.issuer() == candidate.subject()
            && child.verify_signature(Some(candidate.public_key())).is_ok()
    })
}

fn is_self_signed(cert: &X509Certificate<'_>) -> bool {
    cert.subject() == cert.issuer() && cert.verify_signature(None).is_ok()
}

/// Verify `target` against `roots`, using `intermediates` to build the path.
pub fn verify_chain_of_trust(
    target: &[u8],
    intermediates: &[Vec<u8>],
    roots: &[Vec<u8>],
) -> Result<ChainValidationResult, CertFileError> {
    let (_, leaf) = X509Certificate::from_der(target).map_err(|e| CertFileError::ParseError {
        message: format!("target certificate: {}", e),
    })?;
    let intermediates = parse_all(intermediates);
    let roots = parse_all(roots);

    let mut steps = Vec::new();
    let mut path = vec![leaf.subject().to_string()];
    let mut used = vec![false; intermediates.len()];
    let mut current = &leaf;

    for depth in 0..MAX_DEPTH {
        let label = depth_label(depth);

        if let Some(failure) = validity_failure(current) {
            steps.push(ChainStep {
                description: format!("{} certificate is within validity period", label),
                passed: false,
                details: Some(failure.to_string()),
            });
            return Ok(ChainValidationResult::failed(steps, path, failure));
        }
        steps.push(ChainStep {
            description: format!("{} certificate is within validity period", label),
            passed: true,
            details: None,
        });

        if let Some(index) = find_issuer(current, &roots) {
            let root = &roots[index];
            steps.push(ChainStep {
                description: format!("{} certificate is signed by a trusted root", label),
                passed: true,
                details: Some(root.subject().to_string()),
            });
            if root.subject() != current.subject() {
                path.push(root.subject().to_string());
            }
            if let Some(failure) = validity_failure(root) {
                steps.push(ChainStep {
                    description: "Root certificate is within validity period".to_string(),
                    passed: false,
                    details: Some(failure.to_string()),
                });
                return Ok(ChainValidationResult::failed(steps, path, failure));
            }
            return Ok(ChainValidationResult {
                is_valid: true,
                steps,
                path,
                failure: None,
            });
        }

        if is_self_signed(current) {
            let failure = if depth == 0 {
                TrustFailure::SelfSigned
            } else {
                TrustFailure::SelfSignedInChain
            };
            steps.push(ChainStep {
                description: format!("{} certificate is anchored in the trusted roots", label),
                passed: false,
                details: Some(failure.to_string()),
            });
            return Ok(ChainValidationResult::failed(steps, path, failure));
        }

        let next = intermediates.iter().enumerate().position(|(i, candidate)| {
            !used[i]
                && current.issuer() == candidate.subject()
                && current
                    .verify_signature(Some(candidate.public_key()))
                    .is_ok()
        });

        match next {
            Some(index) => {
                used[index] = true;
                let issuer = &intermediates[index];
                steps.push(ChainStep {
                    description: format!("{} certificate is signed by an intermediate", label),
                    passed: true,
                    details: Some(issuer.subject().to_string()),
                });
                path.push(issuer.subject().to_string());
                current = issuer;
            }
            None => {
                steps.push(ChainStep {
                    description: format!("{} certificate issuer found", label),
                    passed: false,
                    details: Some(format!("Issuer: {}", current.issuer())),
                });
                return Ok(ChainValidationResult::failed(
                    steps,
                    path,
                    TrustFailure::UnableToGetLocalIssuer,
                ));
            }
        }
    }

    Ok(ChainValidationResult::failed(
        steps,
        path,
        TrustFailure::ChainTooLong,
    ))
}
