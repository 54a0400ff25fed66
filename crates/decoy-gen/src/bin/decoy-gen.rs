//! decoy-gen - generate mock and spy sources from type descriptors
//!
//! # Usage
//!
//! ```bash
//! decoy-gen generate
//! decoy-gen generate --config path/to/decoy-gen.toml
//! decoy-gen generate --json
//! ```
//!
//! Exits non-zero only on configuration or I/O failure. Rejected members are
//! reported but never fail the run.

#![cfg_attr(test, allow(clippy::unwrap_used))]

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use decoy_gen::{DEFAULT_CONFIG, GenConfig, GenerationReport};
use tracing_subscriber::EnvFilter;

const USAGE: &str = "usage: decoy-gen generate [--config <path>] [--json]";

struct Args {
    config: PathBuf,
    json: bool,
}

fn parse_args(args: &[String]) -> anyhow::Result<Option<Args>> {
    let mut iter = args.iter().skip(1);
    match iter.next().map(String::as_str) {
        Some("generate") => {}
        Some("-h" | "--help") | None => return Ok(None),
        Some(other) => bail!("unknown command: {other}"),
    }

    let mut parsed = Args {
        config: PathBuf::from(DEFAULT_CONFIG),
        json: false,
    };
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--config" | "-c" => {
                let path = iter.next().context("--config needs a path")?;
                parsed.config = PathBuf::from(path);
            }
            "--json" => parsed.json = true,
            other => bail!("unknown argument: {other}"),
        }
    }
    Ok(Some(parsed))
}

fn run(args: &Args) -> anyhow::Result<GenerationReport> {
    let config = GenConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let report = decoy_gen::run(&config).context("generation failed")?;
    Ok(report)
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .with_writer(std::io::stderr)
        .init();

    let argv: Vec<String> = std::env::args().collect();
    let args = match parse_args(&argv) {
        Ok(Some(args)) => args,
        Ok(None) => {
            println!("{USAGE}");
            return ExitCode::SUCCESS;
        }
        Err(e) => {
            eprintln!("error: {e}\n{USAGE}");
            return ExitCode::from(2);
        }
    };

    match run(&args) {
        Ok(report) => {
            if args.json {
                match serde_json::to_string_pretty(&report) {
                    Ok(json) => println!("{json}"),
                    Err(e) => {
                        eprintln!("error: {e}");
                        return ExitCode::FAILURE;
                    }
                }
            } else {
                for name in &report.generated {
                    println!("generated {name}");
                }
                for name in &report.skipped {
                    println!("skipped   {name}");
                }
                for reason in &report.rejected {
                    println!("rejected  {reason}");
                }
                println!("{report}");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::FAILURE
        }
    }
}
