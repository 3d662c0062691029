mod cli;
mod config;

use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use labelkit_label::LabelPipeline;
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;
use crate::config::{SpecFileConfig, derive_label_options, load_config};

/// `RUST_LOG` wins when set; otherwise `-v` picks the level.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<ExitCode> {
    let args = Cli::parse();
    init_tracing(args.verbose);

    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => SpecFileConfig::default(),
    };
    let options = derive_label_options(&args, config);

    let pipeline = LabelPipeline::new(options).context("Invalid label options")?;
    let result = pipeline
        .run_and_render()
        .context("Label generation failed")?;

    // Warnings and file errors were already logged where they arose.
    eprintln!("{}", result.report);

    if result.if_scan_failed {
        return Ok(ExitCode::from(2));
    }
    if let Some(path_file_out) = &result.path_file_out {
        eprintln!("Labels written to {}", path_file_out.display());
    }
    if result.report.error_count() > 0 {
        return Ok(ExitCode::from(1));
    }
    Ok(ExitCode::SUCCESS)
}
