//! certbench - TLS certificate harvesting and OpenSSL benchmarking

use certbench::cli::{Cli, Commands};
use certbench::commands;
use certbench::config::{load_settings, Settings};
use certbench::Result;
use clap::Parser;
use console::style;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() { 1 } else { 0 };
            std::process::exit(code);
        }
    };

    // A provider may already be installed; either way ring is available
    let _ = rustls::crypto::ring::default_provider().install_default();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if cli.no_color {
        console::set_colors_enabled(false);
    }

    match run(cli).await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            std::process::exit(1);
        }
    }
}

async fn run(cli: Cli) -> Result<i32> {
    let mut settings: Settings = load_settings(cli.config.as_deref())?;

    match cli.command {
        Commands::Harvest(args) => {
            let harvest = &mut settings.harvest;
            if !args.hosts.is_empty() {
                harvest.hosts = args.hosts;
            }
            if let Some(port) = args.port {
                harvest.port = port;
            }
            if let Some(dir) = args.output_dir {
                harvest.output_dir = dir;
            }
            commands::run_harvest(harvest, args.json).await?;
            Ok(0)
        }
        Commands::Bench(args) => {
            let bench = &mut settings.bench;
            if let Some(seconds) = args.seconds {
                bench.seconds = seconds;
            }
            if let Some(trials) = args.trials {
                bench.trials = trials;
            }
            if args.multi {
                bench.multi = true;
            }
            if let Some(root) = args.output_root {
                bench.output_root = root;
            }
            if let Some(openssl) = args.openssl {
                bench.openssl = openssl;
            }
            bench.validate()?;
            commands::run_bench(bench)?;
            Ok(0)
        }
        Commands::Summarize { dir, trials } => {
            commands::run_summarize(&dir, &settings.bench, trials)?;
            Ok(0)
        }
        Commands::Verify(args) => Ok(commands::run_verify(&args, cli.verbose)),
    }
}
