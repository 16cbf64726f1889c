mod common;

use certbench::harvest::aia::{ca_issuer_urls, normalize_issuer_response};
use certbench::harvest::pem_split::{der_to_pem, pem_blocks};
use certbench::harvest::{
    fetch_intermediates_via_aia_if_needed, AiaOutcome, ChainSource, Harvester, HostStatus,
    IssuerFetcher, NO_INTERMEDIATES_MARKER,
};
use certbench::utils::HarvestError;
use std::cell::RefCell;
use std::collections::HashMap;
use tempfile::TempDir;

const AIA_URL: &str = "http://ca.example.test/intermediate.der";

/// Serves canned chains instead of doing a handshake
#[derive(Default)]
struct FakeSource {
    chains: HashMap<String, Vec<Vec<u8>>>,
}

impl FakeSource {
    fn with(mut self, host: &str, chain: Vec<Vec<u8>>) -> Self {
        self.chains.insert(host.to_string(), chain);
        self
    }
}

impl ChainSource for FakeSource {
    async fn capture(&self, host: &str, port: u16) -> Result<Vec<Vec<u8>>, HarvestError> {
        self.chains
            .get(host)
            .cloned()
            .ok_or_else(|| HarvestError::Connection {
                host: host.to_string(),
                port,
                message: "connection refused".to_string(),
            })
    }
}

/// Serves canned CA Issuers bodies and records requests
#[derive(Default)]
struct FakeFetcher {
    bodies: HashMap<String, Vec<u8>>,
    requested: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn with(mut self, url: &str, body: Vec<u8>) -> Self {
        self.bodies.insert(url.to_string(), body);
        self
    }
}

impl IssuerFetcher for FakeFetcher {
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, HarvestError> {
        self.requested.borrow_mut().push(url.to_string());
        self.bodies.get(url).cloned().ok_or_else(|| HarvestError::Fetch {
            url: url.to_string(),
            message: "404 Not Found".to_string(),
        })
    }
}

fn read(path: &std::path::Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[tokio::test]
async fn test_presented_intermediates_skip_aia() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("full.example.test", Some(AIA_URL));
    let source = FakeSource::default().with(
        "full.example.test",
        vec![chain.leaf.clone(), chain.intermediate.clone()],
    );
    let harvester = Harvester::new(source, FakeFetcher::default(), 443, dir.path()).quiet();

    let outcome = harvester.harvest_host("full.example.test").await;
    let HostStatus::Saved(artifacts) = outcome.status else {
        panic!("host should have been saved");
    };

    assert_eq!(artifacts.sanitized, "full-example-test");
    assert_eq!(artifacts.presented, 2);
    assert_eq!(artifacts.intermediates, 1);
    assert_eq!(artifacts.aia, AiaOutcome::Skipped);
    assert_eq!(artifacts.certificates.len(), 2);
    assert!(artifacts.certificates[0].subject.contains("full.example.test"));

    let chain_text = read(&artifacts.chain_path);
    let leaf_text = read(&artifacts.leaf_path);
    let intermediate_text = read(&artifacts.intermediate_path);
    assert_eq!(pem_blocks(&leaf_text).len(), 1);
    assert_eq!(pem_blocks(&intermediate_text).len(), 1);
    assert_eq!(format!("{}{}", leaf_text, intermediate_text), chain_text);
    assert_eq!(leaf_text, der_to_pem(&chain.leaf));
}

#[tokio::test]
async fn test_leaf_only_recovers_intermediate_via_aia() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("leafonly.example.test", Some(AIA_URL));
    let source = FakeSource::default().with("leafonly.example.test", vec![chain.leaf.clone()]);
    let fetcher = FakeFetcher::default().with(AIA_URL, chain.intermediate.clone());
    let harvester = Harvester::new(source, fetcher, 443, dir.path()).quiet();

    let outcome = harvester.harvest_host("leafonly.example.test").await;
    let HostStatus::Saved(artifacts) = outcome.status else {
        panic!("host should have been saved");
    };

    assert_eq!(artifacts.presented, 1);
    assert_eq!(artifacts.intermediates, 1);
    match &artifacts.aia {
        AiaOutcome::Attempted { urls, fetched } => {
            assert_eq!(urls, &vec![AIA_URL.to_string()]);
            assert_eq!(fetched, &vec![der_to_pem(&chain.intermediate)]);
        }
        other => panic!("expected an AIA attempt, got {:?}", other),
    }

    let intermediate_text = read(&artifacts.intermediate_path);
    assert_eq!(intermediate_text, der_to_pem(&chain.intermediate));
    assert_eq!(pem_blocks(&read(&artifacts.chain_path)).len(), 1);
}

#[tokio::test]
async fn test_pem_issuer_body_is_accepted() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("pembody.example.test", Some(AIA_URL));
    let source = FakeSource::default().with("pembody.example.test", vec![chain.leaf.clone()]);
    let fetcher =
        FakeFetcher::default().with(AIA_URL, der_to_pem(&chain.intermediate).into_bytes());
    let harvester = Harvester::new(source, fetcher, 443, dir.path()).quiet();

    let outcome = harvester.harvest_host("pembody.example.test").await;
    let HostStatus::Saved(artifacts) = outcome.status else {
        panic!("host should have been saved");
    };
    assert_eq!(artifacts.intermediates, 1);
    assert_eq!(read(&artifacts.intermediate_path), der_to_pem(&chain.intermediate));
}

#[tokio::test]
async fn test_no_intermediates_writes_marker() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("noaia.example.test", None);
    let source = FakeSource::default().with("noaia.example.test", vec![chain.leaf.clone()]);
    let harvester = Harvester::new(source, FakeFetcher::default(), 443, dir.path()).quiet();

    let outcome = harvester.harvest_host("noaia.example.test").await;
    let HostStatus::Saved(artifacts) = outcome.status else {
        panic!("host should have been saved");
    };

    assert_eq!(artifacts.intermediates, 0);
    assert_eq!(
        artifacts.aia,
        AiaOutcome::Attempted {
            urls: Vec::new(),
            fetched: Vec::new()
        }
    );
    assert_eq!(read(&artifacts.intermediate_path), NO_INTERMEDIATES_MARKER);
    assert_eq!(read(&artifacts.leaf_path), read(&artifacts.chain_path));
}

#[tokio::test]
async fn test_failed_fetch_is_skipped() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("fetchfail.example.test", Some(AIA_URL));
    let source = FakeSource::default().with("fetchfail.example.test", vec![chain.leaf.clone()]);
    let harvester = Harvester::new(source, FakeFetcher::default(), 443, dir.path()).quiet();

    let outcome = harvester.harvest_host("fetchfail.example.test").await;
    let HostStatus::Saved(artifacts) = outcome.status else {
        panic!("a failed AIA fetch must not fail the host");
    };
    assert!(artifacts.aia.was_attempted());
    assert!(artifacts.aia.fetched().is_empty());
    assert_eq!(read(&artifacts.intermediate_path), NO_INTERMEDIATES_MARKER);
}

#[tokio::test]
async fn test_failing_host_does_not_stop_run() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("up.example.test", None);
    let source = FakeSource::default()
        .with("up.example.test", vec![chain.leaf.clone(), chain.intermediate.clone()])
        .with("empty.example.test", Vec::new());
    let harvester = Harvester::new(source, FakeFetcher::default(), 443, dir.path()).quiet();

    let hosts = vec![
        "down.example.test".to_string(),
        "empty.example.test".to_string(),
        "up.example.test".to_string(),
    ];
    let report = harvester.run(&hosts).await;

    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.saved(), 1);
    assert_eq!(report.failed(), 2);
    assert_eq!(report.outcomes[0].host, "down.example.test");
    assert!(matches!(
        &report.outcomes[0].status,
        HostStatus::Failed { reason } if reason.contains("connection refused")
    ));
    assert!(report.outcomes[2].is_saved());

    // nothing is written for a host that presented no certificates
    assert!(!dir.path().join("empty-example-test-chain.pem").exists());
    assert!(dir.path().join("up-example-test-chain.pem").exists());
}

#[tokio::test]
async fn test_report_serializes_to_json() {
    let dir = TempDir::new().unwrap();
    let chain = common::mint_chain("json.example.test", None);
    let source = FakeSource::default().with("json.example.test", vec![chain.leaf.clone()]);
    let harvester = Harvester::new(source, FakeFetcher::default(), 443, dir.path()).quiet();

    let report = harvester
        .run(&["json.example.test".to_string(), "gone.example.test".to_string()])
        .await;
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["outcomes"][0]["host"], "json.example.test");
    assert_eq!(value["outcomes"][0]["status"], "saved");
    assert_eq!(value["outcomes"][0]["aia"]["state"], "attempted");
    assert_eq!(value["outcomes"][1]["status"], "failed");
}

#[tokio::test]
async fn test_aia_only_consulted_without_intermediates() {
    let chain = common::mint_chain("direct.example.test", Some(AIA_URL));
    let fetcher = FakeFetcher::default().with(AIA_URL, chain.intermediate.clone());
    let leaf = der_to_pem(&chain.leaf);

    let presented = vec![der_to_pem(&chain.intermediate)];
    let outcome = fetch_intermediates_via_aia_if_needed(&fetcher, &leaf, &presented).await;
    assert_eq!(outcome, AiaOutcome::Skipped);
    assert!(fetcher.requested.borrow().is_empty());

    let outcome = fetch_intermediates_via_aia_if_needed(&fetcher, &leaf, &[]).await;
    assert_eq!(outcome.fetched().len(), 1);
    assert_eq!(*fetcher.requested.borrow(), vec![AIA_URL.to_string()]);
}

#[test]
fn test_ca_issuer_urls_from_minted_leaf() {
    let chain = common::mint_chain("urls.example.test", Some(AIA_URL));
    assert_eq!(ca_issuer_urls(&chain.leaf), vec![AIA_URL.to_string()]);

    let plain = common::mint_chain("plain.example.test", None);
    assert!(ca_issuer_urls(&plain.leaf).is_empty());
}

#[test]
fn test_normalize_issuer_response() {
    let chain = common::mint_chain("norm.example.test", None);
    assert_eq!(
        normalize_issuer_response(&chain.intermediate),
        vec![der_to_pem(&chain.intermediate)]
    );

    let bundle = format!("{}{}", der_to_pem(&chain.intermediate), der_to_pem(&chain.root));
    assert_eq!(normalize_issuer_response(bundle.as_bytes()).len(), 2);

    assert!(normalize_issuer_response(b"<html>not found</html>").is_empty());
}
