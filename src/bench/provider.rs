//! Legacy cipher availability
//!
//! OpenSSL 3 moved RC4, Blowfish and friends into the `legacy` provider,
//! which has to be loaded explicitly and may not be installed at all.

use crate::bench::runner::CommandRunner;

/// Whether legacy ciphers can be benchmarked, and how
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LegacySupport {
    /// Available without extra arguments (OpenSSL 1.x, LibreSSL)
    Builtin,
    /// Available once the legacy provider is loaded
    Provider,
    /// Cannot be fetched; legacy algorithms are skipped
    Unavailable,
}

impl LegacySupport {
    pub fn skip_legacy(&self) -> bool {
        *self == LegacySupport::Unavailable
    }

    /// Extra `openssl speed` arguments for legacy algorithms
    pub fn provider_args(&self) -> Vec<String> {
        match self {
            LegacySupport::Provider => ["-provider", "legacy", "-provider", "default"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            _ => Vec::new(),
        }
    }
}

impl std::fmt::Display for LegacySupport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LegacySupport::Builtin => write!(f, "built in"),
            LegacySupport::Provider => write!(f, "via legacy provider"),
            LegacySupport::Unavailable => write!(f, "unavailable"),
        }
    }
}

/// Library family and major version from `openssl version` output
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryVersion {
    pub family: String,
    pub major: u32,
}

/// Parse e.g. `OpenSSL 3.0.2 15 Mar 2022` or `LibreSSL 3.3.6`
pub fn parse_version(text: &str) -> Option<LibraryVersion> {
    let mut words = text.split_whitespace();
    let family = words.next()?.to_string();
    let major = words
        .next()?
        .split('.')
        .next()?
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()?;
    Some(LibraryVersion { family, major })
}

/// Decide how legacy ciphers can be reached with the invoked library
pub fn detect_legacy_support(runner: &dyn CommandRunner) -> LegacySupport {
    let version = runner
        .run(&["version".to_string()])
        .ok()
        .filter(|o| o.success)
        .and_then(|o| parse_version(&o.stdout));

    let Some(version) = version else {
        tracing::warn!("could not determine library version; skipping legacy ciphers");
        return LegacySupport::Unavailable;
    };

    if version.family != "OpenSSL" || version.major < 3 {
        tracing::debug!("{} {} ships legacy ciphers built in", version.family, version.major);
        return LegacySupport::Builtin;
    }

    let list_args: Vec<String> = [
        "list",
        "-cipher-algorithms",
        "-provider",
        "legacy",
        "-provider",
        "default",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();

    match runner.run(&list_args) {
        Ok(output) if output.success && output.stdout.to_uppercase().contains("RC4") => {
            LegacySupport::Provider
        }
        Ok(output) => {
            tracing::warn!("legacy provider unavailable: {}", output.stderr.trim());
            LegacySupport::Unavailable
        }
        Err(e) => {
            tracing::warn!("legacy provider check failed: {}", e);
            LegacySupport::Unavailable
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bench::runner::ToolOutput;
    use crate::utils::BenchError;

    struct Canned {
        version: &'static str,
        list: Option<&'static str>,
    }

    impl CommandRunner for Canned {
        fn tool(&self) -> &str {
            "openssl"
        }

        fn run(&self, args: &[String]) -> Result<ToolOutput, BenchError> {
            let text = if args[0] == "version" {
                Some(self.version)
            } else {
                self.list
            };
            Ok(match text {
                Some(stdout) => ToolOutput {
                    success: true,
                    stdout: stdout.to_string(),
                    stderr: String::new(),
                },
                None => ToolOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: "unable to load provider legacy".to_string(),
                },
            })
        }
    }

    #[test]
    fn test_parse_version() {
        assert_eq!(
            parse_version("OpenSSL 3.0.2 15 Mar 2022 (Library: OpenSSL 3.0.2 15 Mar 2022)"),
            Some(LibraryVersion {
                family: "OpenSSL".to_string(),
                major: 3
            })
        );
        assert_eq!(parse_version("OpenSSL 1.1.1w  11 Sep 2023").unwrap().major, 1);
        assert_eq!(parse_version("LibreSSL 3.3.6").unwrap().family, "LibreSSL");
        assert_eq!(parse_version(""), None);
    }

    #[test]
    fn test_openssl_1_is_builtin() {
        let runner = Canned {
            version: "OpenSSL 1.1.1w  11 Sep 2023",
            list: None,
        };
        assert_eq!(detect_legacy_support(&runner), LegacySupport::Builtin);
    }

    #[test]
    fn test_openssl_3_with_provider() {
        let runner = Canned {
            version: "OpenSSL 3.0.2 15 Mar 2022",
            list: Some("Provided:\n  { 1.2.840.113549.3.4, RC4 } @ legacy\n"),
        };
        let support = detect_legacy_support(&runner);
        assert_eq!(support, LegacySupport::Provider);
        assert_eq!(support.provider_args().len(), 4);
        assert!(!support.skip_legacy());
    }

    #[test]
    fn test_openssl_3_without_provider() {
        let runner = Canned {
            version: "OpenSSL 3.2.1 30 Jan 2024",
            list: None,
        };
        let support = detect_legacy_support(&runner);
        assert_eq!(support, LegacySupport::Unavailable);
        assert!(support.skip_legacy());
        assert!(support.provider_args().is_empty());
    }
}
