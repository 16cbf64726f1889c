//! Application settings configuration
//!
//! Host lists, timeouts, benchmark plan and algorithm set.

use crate::bench::algorithm::{default_algorithms, AlgorithmSpec};
use crate::utils::ConfigError;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Certificate harvesting settings
#[derive(Debug, Clone, Deserialize)]
pub struct HarvestSettings {
    #[serde(default = "default_hosts")]
    pub hosts: Vec<String>,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub handshake_timeout_secs: u64,
    #[serde(default = "default_timeout_secs")]
    pub fetch_timeout_secs: u64,
    #[serde(default = "default_dir")]
    pub output_dir: PathBuf,
}

fn default_hosts() -> Vec<String> {
    vec![
        "twitter.com".to_string(),
        "www.google.com".to_string(),
        "www.chula.ac.th".to_string(),
    ]
}

fn default_port() -> u16 {
    443
}

fn default_timeout_secs() -> u64 {
    10
}

fn default_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            hosts: default_hosts(),
            port: default_port(),
            connect_timeout_secs: default_timeout_secs(),
            handshake_timeout_secs: default_timeout_secs(),
            fetch_timeout_secs: default_timeout_secs(),
            output_dir: default_dir(),
        }
    }
}

impl HarvestSettings {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn handshake_timeout(&self) -> Duration {
        Duration::from_secs(self.handshake_timeout_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    /// Checked after command-line hosts have replaced the configured ones
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.hosts.iter().all(|host| host.trim().is_empty()) {
            return Err(ConfigError::InvalidValue {
                key: "harvest.hosts".to_string(),
                message: "at least one host is required".to_string(),
            });
        }
        Ok(())
    }
}

/// Benchmark harness settings
#[derive(Debug, Clone, Deserialize)]
pub struct BenchSettings {
    #[serde(default = "default_seconds")]
    pub seconds: u64,
    #[serde(default = "default_trials")]
    pub trials: u32,
    #[serde(default)]
    pub multi: bool,
    #[serde(default = "default_openssl")]
    pub openssl: String,
    #[serde(default = "default_dir")]
    pub output_root: PathBuf,
    #[serde(default = "default_block_size")]
    pub block_size: u32,
    #[serde(default = "default_algorithms")]
    pub algorithms: Vec<AlgorithmSpec>,
}

fn default_seconds() -> u64 {
    3
}

fn default_trials() -> u32 {
    3
}

fn default_openssl() -> String {
    "openssl".to_string()
}

fn default_block_size() -> u32 {
    16384
}

impl Default for BenchSettings {
    fn default() -> Self {
        Self {
            seconds: default_seconds(),
            trials: default_trials(),
            multi: false,
            openssl: default_openssl(),
            output_root: default_dir(),
            block_size: default_block_size(),
            algorithms: default_algorithms(),
        }
    }
}

impl BenchSettings {
    /// Reject values that would make a run meaningless
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.seconds == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bench.seconds".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.trials == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bench.trials".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        if self.block_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "bench.block_size".to_string(),
                message: "must be a positive byte count".to_string(),
            });
        }
        // names become log file names and summary.csv fields
        if let Some(algorithm) = self.algorithms.iter().find(|a| {
            a.name.is_empty() || a.name.contains(|c: char| c == ',' || c.is_whitespace())
        }) {
            return Err(ConfigError::InvalidValue {
                key: "bench.algorithms".to_string(),
                message: format!(
                    "'{}' is not a valid algorithm name (empty, comma or whitespace)",
                    algorithm.name
                ),
            });
        }
        Ok(())
    }
}

/// Application settings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub harvest: HarvestSettings,
    #[serde(default)]
    pub bench: BenchSettings,
}

impl Settings {
    /// Load settings from the default config file
    pub fn load_default() -> Result<Self, ConfigError> {
        let config_path = Path::new("config/default.toml");
        if config_path.exists() {
            Self::load_from_file(config_path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load settings from a specific file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;

        Self::from_toml(&content)
    }

    /// Parse settings from TOML text
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let settings: Settings = toml::from_str(content).map_err(|e| ConfigError::ParseError {
            message: e.to_string(),
        })?;
        settings.bench.validate()?;
        Ok(settings)
    }
}
