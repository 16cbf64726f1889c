//! Benchmark algorithm definitions

use serde::Deserialize;

/// How an algorithm's speed output is reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmKind {
    /// Bytes per second over a table of buffer sizes
    Throughput,
    /// Sign and verify operations per second
    Signature,
}

/// One algorithm to benchmark
#[derive(Debug, Clone, Deserialize)]
pub struct AlgorithmSpec {
    /// Name passed to `openssl speed`
    pub name: String,
    pub kind: AlgorithmKind,
    /// Benchmark through the EVP interface (`-evp <name>`)
    #[serde(default)]
    pub evp: bool,
    /// Needs the OpenSSL 3 legacy provider
    #[serde(default)]
    pub legacy: bool,
    /// Included in the multi-core pass
    #[serde(default)]
    pub multi: bool,
    /// Word identifying the result row of a signature benchmark
    #[serde(default)]
    pub row_keyword: Option<String>,
}

impl AlgorithmSpec {
    pub fn throughput(name: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AlgorithmKind::Throughput,
            evp: true,
            legacy: false,
            multi: false,
            row_keyword: None,
        }
    }

    pub fn signature(name: &str, row_keyword: &str) -> Self {
        Self {
            name: name.to_string(),
            kind: AlgorithmKind::Signature,
            evp: false,
            legacy: false,
            multi: false,
            row_keyword: Some(row_keyword.to_string()),
        }
    }

    pub fn legacy(mut self) -> Self {
        self.legacy = true;
        self
    }

    pub fn with_multi(mut self) -> Self {
        self.multi = true;
        self
    }

    /// Row keyword for signature output, falling back to the name
    /// without its trailing key size (`dsa2048` -> `dsa`).
    pub fn row_keyword(&self) -> &str {
        match &self.row_keyword {
            Some(keyword) => keyword,
            None => self.name.trim_end_matches(|c: char| c.is_ascii_digit()),
        }
    }

    /// Metrics extracted from each trial of this algorithm
    pub fn metrics(&self, block_size: u32) -> Vec<Metric> {
        match self.kind {
            AlgorithmKind::Throughput => vec![Metric::Throughput { block_size }],
            AlgorithmKind::Signature => vec![
                Metric::Operations {
                    op: "sign".to_string(),
                    row_keyword: self.row_keyword().to_string(),
                    key: self.name.clone(),
                },
                Metric::Operations {
                    op: "verify".to_string(),
                    row_keyword: self.row_keyword().to_string(),
                    key: self.name.clone(),
                },
            ],
        }
    }
}

/// A single number extracted from one trial's output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Metric {
    Throughput {
        block_size: u32,
    },
    Operations {
        op: String,
        row_keyword: String,
        key: String,
    },
}

impl Metric {
    pub fn label(&self) -> String {
        match self {
            Metric::Throughput { .. } => "MB/s".to_string(),
            Metric::Operations { op, .. } => format!("{}/s", op),
        }
    }

    pub fn size_or_key(&self) -> String {
        match self {
            Metric::Throughput { block_size } => format!("{}B", block_size),
            Metric::Operations { key, .. } => key.clone(),
        }
    }
}

/// The stock algorithm set
pub fn default_algorithms() -> Vec<AlgorithmSpec> {
    vec![
        AlgorithmSpec::throughput("aes-128-cbc").with_multi(),
        AlgorithmSpec::throughput("aes-256-gcm").with_multi(),
        AlgorithmSpec::throughput("chacha20-poly1305"),
        AlgorithmSpec::throughput("sha256").with_multi(),
        AlgorithmSpec::throughput("rc4").legacy(),
        AlgorithmSpec::throughput("bf-cbc").legacy(),
        AlgorithmSpec::signature("rsa2048", "rsa").with_multi(),
        AlgorithmSpec::signature("dsa2048", "dsa"),
        AlgorithmSpec::signature("ecdsap256", "ecdsa"),
    ]
}
