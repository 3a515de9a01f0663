use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;

use core_util::{analyze, logging, Config, OutputFormat};

#[derive(Parser)]
#[command(name = "core-util", version)]
#[command(about = "Average per-core CPU utilization from an mpstat-style log", long_about = None)]
struct Cli {
    /// Path to the sampling log
    input: PathBuf,

    /// Output format: text or json
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// Increase log verbosity on stderr (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = Config {
        input: cli.input,
        format: cli.format,
        verbosity: cli.verbose,
    };
    logging::init(config.verbosity);
    tracing::debug!(?config, "starting");

    let report = analyze(&config.input)
        .with_context(|| format!("failed to analyze {}", config.input.display()))?;

    match config.format {
        OutputFormat::Text => println!("{}", report),
        OutputFormat::Json => println!("{}", report.to_json().context("failed to encode report")?),
    }

    Ok(())
}
