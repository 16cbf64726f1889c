//! Invoking the benchmark tool and recording trial logs

use crate::bench::algorithm::{AlgorithmKind, AlgorithmSpec};
use crate::bench::summary::trial_delimiter;
use crate::utils::BenchError;
use std::fs::File;
use std::io::{ErrorKind, Write};
use std::path::Path;
use std::process::Command;

/// Captured result of one tool invocation
#[derive(Debug, Clone, Default)]
pub struct ToolOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Something that can run the benchmark tool with arguments
pub trait CommandRunner {
    /// Name of the tool, for messages
    fn tool(&self) -> &str;

    /// Run the tool to completion and capture its output
    fn run(&self, args: &[String]) -> Result<ToolOutput, BenchError>;
}

/// Runs the `openssl` binary
pub struct OpensslCommand {
    binary: String,
}

impl OpensslCommand {
    pub fn new(binary: impl Into<String>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl CommandRunner for OpensslCommand {
    fn tool(&self) -> &str {
        &self.binary
    }

    fn run(&self, args: &[String]) -> Result<ToolOutput, BenchError> {
        let output = Command::new(&self.binary)
            .args(args)
            .output()
            .map_err(|e| {
                if e.kind() == ErrorKind::NotFound {
                    BenchError::ToolMissing {
                        tool: self.binary.clone(),
                    }
                } else {
                    BenchError::Spawn {
                        tool: self.binary.clone(),
                        message: e.to_string(),
                    }
                }
            })?;

        Ok(ToolOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

/// Fail fast when the tool cannot be executed at all
pub fn require_tool(runner: &dyn CommandRunner) -> Result<String, BenchError> {
    let output = runner.run(&["version".to_string()])?;
    if !output.success {
        return Err(BenchError::ToolMissing {
            tool: runner.tool().to_string(),
        });
    }
    Ok(output.stdout.trim().to_string())
}

/// Options shared by every trial of one benchmark pass
#[derive(Debug, Clone)]
pub struct SpeedPlan {
    pub seconds: u64,
    pub trials: u32,
    /// Extra arguments that load providers (`-provider legacy ...`)
    pub provider_args: Vec<String>,
    /// Process count for `-multi`, when running the multi-core pass
    pub multi: Option<usize>,
}

/// Arguments for one `openssl speed` invocation
pub fn speed_args(algorithm: &AlgorithmSpec, plan: &SpeedPlan) -> Vec<String> {
    let mut args = vec!["speed".to_string()];
    if algorithm.legacy {
        args.extend(plan.provider_args.iter().cloned());
    }
    args.push("-seconds".to_string());
    args.push(plan.seconds.to_string());
    if let Some(cores) = plan.multi {
        args.push("-multi".to_string());
        args.push(cores.to_string());
    }
    if algorithm.kind == AlgorithmKind::Throughput && algorithm.evp {
        args.push("-evp".to_string());
    }
    args.push(algorithm.name.clone());
    args
}

/// Run every trial of one algorithm, writing raw output to `log_path`.
///
/// Each trial is preceded by its delimiter line. A trial that fails to
/// start or exits non-zero is recorded in the log and the loop goes on.
/// Returns the number of trials whose invocation succeeded.
pub fn run_speed(
    runner: &dyn CommandRunner,
    algorithm: &AlgorithmSpec,
    plan: &SpeedPlan,
    log_path: &Path,
) -> Result<u32, BenchError> {
    let write_err = |e: std::io::Error| BenchError::Write {
        path: log_path.display().to_string(),
        message: e.to_string(),
    };

    let mut log = File::create(log_path).map_err(write_err)?;
    let args = speed_args(algorithm, plan);
    let mut succeeded = 0;

    for trial in 1..=plan.trials {
        tracing::info!(
            "{} trial {}/{}: {} {}",
            algorithm.name,
            trial,
            plan.trials,
            runner.tool(),
            args.join(" ")
        );
        writeln!(log, "{}", trial_delimiter(trial)).map_err(write_err)?;

        match runner.run(&args) {
            Ok(output) => {
                log.write_all(output.stdout.as_bytes()).map_err(write_err)?;
                log.write_all(output.stderr.as_bytes()).map_err(write_err)?;
                if output.success {
                    succeeded += 1;
                } else {
                    tracing::warn!("{} trial {} exited with an error", algorithm.name, trial);
                    writeln!(log, "# {} exited with an error", runner.tool()).map_err(write_err)?;
                }
            }
            Err(e) => {
                tracing::warn!("{} trial {} failed: {}", algorithm.name, trial, e);
                writeln!(log, "# {}", e).map_err(write_err)?;
            }
        }
    }

    Ok(succeeded)
}

/// Write the unavailability line for a skipped legacy algorithm
pub fn write_skipped_log(algorithm: &AlgorithmSpec, log_path: &Path) -> Result<(), BenchError> {
    std::fs::write(log_path, format!("{}\n", legacy_unavailable_message(&algorithm.name)))
        .map_err(|e| BenchError::Write {
            path: log_path.display().to_string(),
            message: e.to_string(),
        })
}

/// Message recorded for an algorithm skipped because of the legacy provider
pub fn legacy_unavailable_message(name: &str) -> String {
    format!("{}: not available (legacy provider could not be loaded)", name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct Scripted {
        outputs: RefCell<Vec<Result<ToolOutput, BenchError>>>,
        calls: RefCell<Vec<Vec<String>>>,
    }

    impl CommandRunner for Scripted {
        fn tool(&self) -> &str {
            "openssl"
        }

        fn run(&self, args: &[String]) -> Result<ToolOutput, BenchError> {
            self.calls.borrow_mut().push(args.to_vec());
            self.outputs.borrow_mut().remove(0)
        }
    }

    fn plan() -> SpeedPlan {
        SpeedPlan {
            seconds: 1,
            trials: 3,
            provider_args: vec![
                "-provider".to_string(),
                "legacy".to_string(),
                "-provider".to_string(),
                "default".to_string(),
            ],
            multi: None,
        }
    }

    #[test]
    fn test_speed_args_evp() {
        let args = speed_args(&AlgorithmSpec::throughput("aes-128-cbc"), &plan());
        assert_eq!(args, vec!["speed", "-seconds", "1", "-evp", "aes-128-cbc"]);
    }

    #[test]
    fn test_speed_args_legacy_multi() {
        let mut plan = plan();
        plan.multi = Some(4);
        let args = speed_args(&AlgorithmSpec::throughput("rc4").legacy(), &plan);
        assert_eq!(
            args,
            vec![
                "speed", "-provider", "legacy", "-provider", "default", "-seconds", "1",
                "-multi", "4", "-evp", "rc4"
            ]
        );
    }

    #[test]
    fn test_speed_args_signature() {
        let args = speed_args(&AlgorithmSpec::signature("dsa2048", "dsa"), &plan());
        assert_eq!(args, vec!["speed", "-seconds", "1", "dsa2048"]);
    }

    #[test]
    fn test_run_speed_records_every_trial() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("dsa2048.log");
        let runner = Scripted {
            outputs: RefCell::new(vec![
                Ok(ToolOutput {
                    success: true,
                    stdout: "first\n".to_string(),
                    stderr: String::new(),
                }),
                Ok(ToolOutput {
                    success: false,
                    stdout: String::new(),
                    stderr: "boom\n".to_string(),
                }),
                Err(BenchError::Spawn {
                    tool: "openssl".to_string(),
                    message: "interrupted".to_string(),
                }),
            ]),
            calls: RefCell::new(Vec::new()),
        };

        let succeeded = run_speed(
            &runner,
            &AlgorithmSpec::signature("dsa2048", "dsa"),
            &plan(),
            &log_path,
        )
        .unwrap();

        assert_eq!(succeeded, 1);
        assert_eq!(runner.calls.borrow().len(), 3);
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert!(log.starts_with("=== trial 1 ===\nfirst\n=== trial 2 ===\nboom\n"));
        assert!(log.contains("=== trial 3 ===\n# Failed to run openssl: interrupted"));
    }

    #[test]
    fn test_skipped_log_message() {
        let dir = tempfile::tempdir().unwrap();
        let log_path = dir.path().join("rc4.log");
        write_skipped_log(&AlgorithmSpec::throughput("rc4").legacy(), &log_path).unwrap();
        let log = std::fs::read_to_string(&log_path).unwrap();
        assert_eq!(
            log.trim_end(),
            "rc4: not available (legacy provider could not be loaded)"
        );
    }
}
