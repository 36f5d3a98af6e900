// Copyright (c) 2026 bad-antics
// Licensed under the MIT License. See LICENSE file in the project root.
// https://github.com/bad-antics/quakemetrics-rs

//! QuakeMetrics - Strong-Motion Record Processing Engine
//!
//! Thin CLI shell around the processing engine: loads a configuration,
//! runs one record directory through the pipeline, prints the digest.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use quakemetrics::{Config, Record, VERSION};

/// QuakeMetrics - Strong-Motion Record Processing Engine
#[derive(Parser, Debug)]
#[command(name = "quakemetrics")]
#[command(author = "QuakeMetrics Project")]
#[command(version = VERSION)]
#[command(about = "Baseline correction, Arias intensity, response and RotD spectra")]
struct Args {
    /// Directory containing the three channel files of one record
    record_dir: PathBuf,

    /// Configuration file path
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Extension of the record files, overrides the configuration
    #[arg(short, long)]
    extension: Option<String>,

    /// Print the record digest as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    debug: bool,

    /// Enable trace-level logging
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_file(args.debug)
        .with_line_number(args.debug)
        .with_ansi(true)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("QuakeMetrics v{}", VERSION);

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let mut config = Config::load_or_create(&config_path)?;
    if let Some(extension) = args.extension {
        config.file_extension = extension;
    }

    let record = Record::process(&args.record_dir, &config)?;
    for warning in &record.warnings {
        warn!("ingestion recovery: {:?}", warning);
    }

    let summary = record.summary();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        info!("record {} ({} samples at dt {:.4} s)", summary.name, summary.samples, summary.dt);
        for (role, channel) in summary.channels.iter() {
            info!(
                "  {}: {}  PGA {:.4} g{}{}",
                role,
                channel.source,
                channel.pga,
                channel
                    .significant_duration
                    .map(|d| format!("  D5-95 {d:.2} s"))
                    .unwrap_or_default(),
                channel
                    .dominant_frequency
                    .map(|f| format!("  f0 {f:.2} Hz"))
                    .unwrap_or_default(),
            );
        }
        if let Some(rotd) = &record.rotd {
            let peak = rotd
                .rotd100
                .iter()
                .cloned()
                .fold(f64::NEG_INFINITY, f64::max);
            info!("  RotD100 peak {:.4} g over {} azimuths", peak, rotd.psa_matrix.len());
        }
    }

    Ok(())
}
