//! # imcode Binary Entry Point
//!
//! Thin shell around the codec: parses flags, opens the requested streams,
//! and calls [`imcode::encode`] or [`imcode::decode`].

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use imcode::cli::Args;
use imcode::codec;
use imcode::common::config::{load_config, Mode, RunConfig, Settings};
use imcode::utils::logging::init_logger;

fn main() -> Result<()> {
    let args = Args::parse();

    let settings: Settings = match &args.config {
        Some(path) => load_config(path)?,
        None => Settings::default(),
    };
    let config = RunConfig::resolve(&args, settings)?;

    init_logger(config.log_level);

    run(&config)
}

fn run(config: &RunConfig) -> Result<()> {
    let cypher = config.cypher.open_read()?;

    let from = match config.mode {
        Mode::Capacity => {
            let capacity = codec::capacity_of(cypher).context("could not read cypher image")?;
            println!(
                "{}: {} bytes ({} meta pixels)",
                capacity.dimensions, capacity.max_bytes, capacity.meta_pixels
            );
            return Ok(());
        }
        _ => config
            .from
            .as_ref()
            .context("no input given")?
            .open_read()?,
    };
    let out = config.to.open_write();

    match config.mode {
        Mode::Decode => {
            let written = codec::decode(&config.codec, from, cypher, out).context("codec error")?;
            info!("Wrote {} bytes to {:?}", written, config.to);
        }
        _ => {
            codec::encode(&config.codec, from, cypher, out).context("codec error")?;
            info!("Wrote coded image to {:?}", config.to);
        }
    }

    Ok(())
}
