//! Intermediate recovery via Authority Information Access
//!
//! When a server sends only its leaf, the leaf's AIA extension usually
//! names a "CA Issuers" URL serving the issuing certificate.

use crate::harvest::pem_split::{der_to_pem, pem_blocks, pem_to_der};
use crate::utils::HarvestError;
use serde::Serialize;
use std::time::Duration;
use x509_parser::prelude::*;

/// id-ad-caIssuers
const CA_ISSUERS_OID: &str = "1.3.6.1.5.5.7.48.2";

/// Downloads the body behind a CA Issuers URL
#[allow(async_fn_in_trait)]
pub trait IssuerFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HarvestError>;
}

/// HTTP(S) fetcher backed by reqwest
pub struct HttpIssuerFetcher {
    client: reqwest::Client,
}

impl HttpIssuerFetcher {
    pub fn new(timeout: Duration) -> Result<Self, HarvestError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("certbench/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| HarvestError::ClientSetup {
                message: format!("HTTP client: {}", e),
            })?;
        Ok(Self { client })
    }
}

impl IssuerFetcher for HttpIssuerFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HarvestError> {
        let fetch_err = |e: reqwest::Error| HarvestError::Fetch {
            url: url.to_string(),
            message: e.to_string(),
        };

        let response = self
            .client
            .get(url)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(fetch_err)?;
        let bytes = response.bytes().await.map_err(fetch_err)?;
        Ok(bytes.to_vec())
    }
}

/// What the AIA fallback did for one host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum AiaOutcome {
    /// The server already sent intermediates
    Skipped,
    /// The leaf was inspected and its CA Issuers URLs fetched
    Attempted {
        urls: Vec<String>,
        /// PEM blocks recovered, in URL order
        #[serde(skip)]
        fetched: Vec<String>,
    },
}

impl AiaOutcome {
    pub fn was_attempted(&self) -> bool {
        matches!(self, AiaOutcome::Attempted { .. })
    }

    pub fn fetched(&self) -> &[String] {
        match self {
            AiaOutcome::Skipped => &[],
            AiaOutcome::Attempted { fetched, .. } => fetched,
        }
    }
}

/// CA Issuers URIs from a DER certificate's AIA extension
pub fn ca_issuer_urls(der: &[u8]) -> Vec<String> {
    let cert = match X509Certificate::from_der(der) {
        Ok((_, cert)) => cert,
        Err(e) => {
            tracing::warn!("cannot parse leaf for AIA lookup: {}", e);
            return Vec::new();
        }
    };

    let mut urls = Vec::new();
    for ext in cert.extensions() {
        if let ParsedExtension::AuthorityInfoAccess(aia) = ext.parsed_extension() {
            for desc in &aia.accessdescs {
                if desc.access_method.to_id_string() != CA_ISSUERS_OID {
                    continue;
                }
                if let GeneralName::URI(uri) = &desc.access_location {
                    urls.push(uri.to_string());
                }
            }
        }
    }
    urls
}

/// Turn a CA Issuers response into PEM certificate blocks.
///
/// PEM bodies keep their certificate blocks; DER bodies are converted
/// when they parse as a certificate. Anything else yields nothing.
pub fn normalize_issuer_response(body: &[u8]) -> Vec<String> {
    if let Ok(text) = std::str::from_utf8(body) {
        if text.contains("-----BEGIN CERTIFICATE-----") {
            return pem_blocks(text);
        }
    }

    match X509Certificate::from_der(body) {
        Ok(_) => vec![der_to_pem(body)],
        Err(e) => {
            tracing::debug!("issuer response is neither PEM nor a DER certificate: {}", e);
            Vec::new()
        }
    }
}

/// Recover intermediates from the leaf's AIA URLs when none were sent.
///
/// Returns `Skipped` without touching the network if `intermediates` is
/// non-empty. Fetch failures are logged and skipped.
pub async fn fetch_intermediates_via_aia_if_needed<F: IssuerFetcher>(
    fetcher: &F,
    leaf_pem: &str,
    intermediates: &[String],
) -> AiaOutcome {
    if !intermediates.is_empty() {
        return AiaOutcome::Skipped;
    }

    let urls = pem_to_der(leaf_pem)
        .map(|der| ca_issuer_urls(&der))
        .unwrap_or_default();
    if urls.is_empty() {
        tracing::info!("leaf has no CA Issuers URL");
    }

    let mut fetched = Vec::new();
    for url in &urls {
        match fetcher.fetch(url).await {
            Ok(body) => {
                let blocks = normalize_issuer_response(&body);
                tracing::info!("{}: recovered {} certificate(s)", url, blocks.len());
                fetched.extend(blocks);
            }
            Err(e) => tracing::debug!("skipping {}: {}", url, e),
        }
    }

    AiaOutcome::Attempted { urls, fetched }
}
