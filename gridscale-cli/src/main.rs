mod config;
mod io;

use std::fs;
use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result, bail};
use clap::Parser;
use log::{info, warn};

use crate::config::CliConfig;
use crate::io::cli::Cli;

fn main() -> Result<()> {
    let args = Cli::parse();
    io::init_logger(args.log_level)?;

    let config = match &args.config_file {
        None => {
            warn!("no config file provided, using defaults (--config-file to override)");
            CliConfig::default()
        }
        Some(config_file) => {
            let file = File::open(config_file).with_context(|| {
                format!("could not open config file: {}", config_file.display())
            })?;
            let reader = BufReader::new(file);
            serde_json::from_reader(reader).context("incorrect config file format")?
        }
    };
    info!("successfully parsed CliConfig: {config:?}");

    // Business rule enforced at the caller boundary; the core transform
    // itself only requires a finite factor > 0.
    if !config.accepts(args.scale_factor) {
        bail!(
            "scale factor {} is outside the allowed range ({} to {})",
            args.scale_factor,
            config.min_factor,
            config.max_factor
        );
    }

    let collection = io::read_collection(&args.input_file)?;
    info!(
        "loaded {} features from {:?}",
        collection.features.len(),
        args.input_file
    );

    let scaled = gridscale::apply_scale_factor(&collection, args.scale_factor)?;

    if !args.output_folder.exists() {
        fs::create_dir_all(&args.output_folder).with_context(|| {
            format!(
                "could not create output folder: {}",
                args.output_folder.display()
            )
        })?;
    }

    let input_stem = args
        .input_file
        .file_stem()
        .and_then(|stem| stem.to_str())
        .context("input file has no usable file name")?;
    let output_path = args
        .output_folder
        .join(format!("{input_stem}_scaled.geojson"));

    io::write_collection(&scaled, &output_path, config.pretty_output)?;
    info!(
        "applied scale factor {} to {} features",
        args.scale_factor,
        scaled.features.len()
    );

    Ok(())
}
