//! Environment capture for a benchmark run

use crate::bench::runner::CommandRunner;
use crate::utils::BenchError;
use chrono::Local;
use std::path::Path;
use std::process::Command;

const UNAVAILABLE: &str = "unavailable";

/// Logical cores visible to this process
pub fn logical_cores() -> usize {
    std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1)
}

/// First `model name` entry of a /proc/cpuinfo dump
pub fn cpu_model_from_cpuinfo(cpuinfo: &str) -> Option<String> {
    cpuinfo
        .lines()
        .find(|line| line.starts_with("model name") || line.starts_with("Model"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, model)| model.trim().to_string())
        .filter(|model| !model.is_empty())
}

fn cpu_model() -> Option<String> {
    if let Ok(cpuinfo) = std::fs::read_to_string("/proc/cpuinfo") {
        if let Some(model) = cpu_model_from_cpuinfo(&cpuinfo) {
            return Some(model);
        }
    }
    system_command("sysctl", &["-n", "machdep.cpu.brand_string"])
}

fn system_command(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!text.is_empty()).then_some(text)
}

/// Build the `env.txt` body
pub fn environment_report(runner: &dyn CommandRunner) -> String {
    let library = runner
        .run(&["version".to_string(), "-a".to_string()])
        .ok()
        .filter(|o| o.success)
        .map(|o| o.stdout.trim().to_string())
        .unwrap_or_else(|| UNAVAILABLE.to_string());

    let mut out = String::new();
    out.push_str(&format!("date: {}\n", Local::now().to_rfc3339()));
    out.push_str(&format!(
        "os: {} {}\n",
        std::env::consts::OS,
        std::env::consts::ARCH
    ));
    out.push_str(&format!(
        "uname: {}\n",
        system_command("uname", &["-a"]).unwrap_or_else(|| UNAVAILABLE.to_string())
    ));
    out.push_str(&format!(
        "cpu: {}\n",
        cpu_model().unwrap_or_else(|| UNAVAILABLE.to_string())
    ));
    out.push_str(&format!("logical cores: {}\n", logical_cores()));
    out.push_str(&format!("tool: {}\n", runner.tool()));
    out.push_str("library:\n");
    for line in library.lines() {
        out.push_str("  ");
        out.push_str(line);
        out.push('\n');
    }
    out
}

/// Write environment metadata to `path`
pub fn capture_environment(runner: &dyn CommandRunner, path: &Path) -> Result<(), BenchError> {
    std::fs::write(path, environment_report(runner)).map_err(|e| BenchError::Write {
        path: path.display().to_string(),
        message: e.to_string(),
    })
}
