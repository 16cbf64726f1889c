//! Certificate chain harvesting
//!
//! For each host: capture the presented chain, write it out, split it
//! into leaf and intermediates, and recover intermediates through AIA
//! when the server sent none. Hosts are processed one at a time and a
//! failing host never stops the run.
//!
//! Intermediates are recorded as presented or fetched; nothing here
//! checks that they actually chain to the leaf (see `cert_ops`).

pub mod aia;
pub mod handshake;
pub mod pem_split;
pub mod sanitize;
pub mod summary;

pub use aia::{fetch_intermediates_via_aia_if_needed, AiaOutcome, HttpIssuerFetcher, IssuerFetcher};
pub use handshake::{ChainSource, TlsChainSource};
pub use pem_split::{extract_intermediates_from_chain, extract_leaf};
pub use sanitize::sanitize;
pub use summary::CertSubject;

use crate::utils::HarvestError;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// Written to the intermediates file when there is nothing to put in it
pub const NO_INTERMEDIATES_MARKER: &str = "# no intermediate certificates found\n";

/// Files written for one host
#[derive(Debug, Clone, Serialize)]
pub struct HostArtifacts {
    pub sanitized: String,
    pub chain_path: PathBuf,
    pub leaf_path: PathBuf,
    pub intermediate_path: PathBuf,
    /// Certificates presented in the handshake
    pub presented: usize,
    /// Intermediates written, whether presented or fetched
    pub intermediates: usize,
    pub aia: AiaOutcome,
    /// Leaf first, then intermediates
    pub certificates: Vec<CertSubject>,
}

/// Result of harvesting one host
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum HostStatus {
    Saved(HostArtifacts),
    Failed { reason: String },
}

#[derive(Debug, Clone, Serialize)]
pub struct HostOutcome {
    pub host: String,
    #[serde(flatten)]
    pub status: HostStatus,
}

impl HostOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self.status, HostStatus::Saved(_))
    }
}

/// Per-host outcomes of a harvest run, in host order
#[derive(Debug, Clone, Default, Serialize)]
pub struct HarvestReport {
    pub outcomes: Vec<HostOutcome>,
}

impl HarvestReport {
    pub fn saved(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_saved()).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.saved()
    }
}

/// Output file paths for a sanitized host token
pub fn artifact_paths(dir: &Path, sanitized: &str) -> (PathBuf, PathBuf, PathBuf) {
    (
        dir.join(format!("{}-chain.pem", sanitized)),
        dir.join(format!("{}.cert", sanitized)),
        dir.join(format!("{}-intermediate.pem", sanitized)),
    )
}

fn write_file(path: &Path, contents: &str) -> Result<(), HarvestError> {
    std::fs::write(path, contents).map_err(|e| HarvestError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}

/// Capture `host`'s chain and write it as PEM to `chain_path`.
///
/// Returns the chain text. Fails without writing when nothing was presented.
pub async fn save_leaf_and_chain<S: ChainSource>(
    source: &S,
    host: &str,
    port: u16,
    chain_path: &Path,
) -> Result<String, HarvestError> {
    let ders = source.capture(host, port).await?;
    if ders.is_empty() {
        return Err(HarvestError::EmptyChain {
            host: host.to_string(),
        });
    }

    let chain: String = ders.iter().map(|der| pem_split::der_to_pem(der)).collect();
    write_file(chain_path, &chain)?;
    tracing::info!("{}: {} certificate(s) -> {}", host, ders.len(), chain_path.display());
    Ok(chain)
}

/// Sequential chain harvester
pub struct Harvester<S, F> {
    source: S,
    fetcher: F,
    port: u16,
    output_dir: PathBuf,
    show_progress: bool,
}

impl<S: ChainSource, F: IssuerFetcher> Harvester<S, F> {
    pub fn new(source: S, fetcher: F, port: u16, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            fetcher,
            port,
            output_dir: output_dir.into(),
            show_progress: true,
        }
    }

    /// Suppress per-host terminal lines (JSON output)
    pub fn quiet(mut self) -> Self {
        self.show_progress = false;
        self
    }

    /// Harvest every host in order
    pub async fn run(&self, hosts: &[String]) -> HarvestReport {
        let mut report = HarvestReport::default();
        for host in hosts {
            let outcome = self.harvest_host(host).await;
            if self.show_progress {
                crate::output::print_host_outcome(&outcome);
            }
            report.outcomes.push(outcome);
        }
        report
    }

    /// Harvest a single host, folding any failure into the outcome
    pub async fn harvest_host(&self, host: &str) -> HostOutcome {
        let status = match self.try_harvest(host).await {
            Ok(artifacts) => HostStatus::Saved(artifacts),
            Err(e) => {
                tracing::warn!("{}: {}", host, e);
                HostStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };
        HostOutcome {
            host: host.to_string(),
            status,
        }
    }

    async fn try_harvest(&self, host: &str) -> Result<HostArtifacts, HarvestError> {
        let sanitized = sanitize(host);
        let (chain_path, leaf_path, intermediate_path) =
            artifact_paths(&self.output_dir, &sanitized);

        let chain = save_leaf_and_chain(&self.source, host, self.port, &chain_path).await?;
        let presented = pem_split::pem_blocks(&chain).len();

        let leaf = extract_leaf(&chain).ok_or_else(|| HarvestError::EmptyChain {
            host: host.to_string(),
        })?;
        write_file(&leaf_path, &leaf)?;

        let mut intermediates = extract_intermediates_from_chain(&chain);
        let aia = fetch_intermediates_via_aia_if_needed(&self.fetcher, &leaf, &intermediates).await;
        intermediates.extend(aia.fetched().iter().cloned());

        if intermediates.is_empty() {
            write_file(&intermediate_path, NO_INTERMEDIATES_MARKER)?;
        } else {
            write_file(&intermediate_path, &intermediates.concat())?;
        }

        let certificates = std::iter::once(&leaf)
            .chain(intermediates.iter())
            .filter_map(|block| CertSubject::from_pem(block))
            .collect();

        Ok(HostArtifacts {
            sanitized,
            chain_path,
            leaf_path,
            intermediate_path,
            presented,
            intermediates: intermediates.len(),
            aia,
            certificates,
        })
    }
}
