//! # Configuration
//!
//! Settings come from two places: an optional TOML file and the command
//! line. Both are merged exactly once into an immutable [`RunConfig`] that
//! the binary hands to the codec.
//!
//! ## File format
//!
//! ```toml
//! [log]
//! level = "info"
//!
//! [output]
//! format = "png"
//! ```
//!
//! Every section and key is optional.

use anyhow::{bail, Context, Result};
use log::LevelFilter;
use serde::{Deserialize, Serialize};
use std::fs;

use crate::cli::Args;
use crate::codec::{CodecConfig, OutputFormat};

use super::stream::Endpoint;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let settings: Settings = load_config("imcode.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content =
        fs::read_to_string(path).with_context(|| format!("could not read config {}", path))?;
    let config: T =
        toml::from_str(&content).with_context(|| format!("could not parse config {}", path))?;
    Ok(config)
}

/// Contents of the optional configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub log: LogConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Logging section.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogConfig {
    /// Base log level (`off`, `error`, `warn`, `info`, `debug`, `trace`)
    pub level: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Output image section.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// What a single invocation does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Encode,
    Decode,
    /// Report how many bytes the cypher can hold
    Capacity,
}

/// Fully resolved settings for one run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub mode: Mode,
    /// Payload (encode) or coded image (decode); unused for [`Mode::Capacity`]
    pub from: Option<Endpoint>,
    pub cypher: Endpoint,
    pub to: Endpoint,
    pub codec: CodecConfig,
    pub log_level: LevelFilter,
}

impl RunConfig {
    /// Merge command-line flags over file settings and validate the result.
    ///
    /// # Errors
    /// - A required input is missing
    /// - Both the input and the cypher ask for standard input
    /// - The configured log level is not recognised
    pub fn resolve(args: &Args, settings: Settings) -> Result<Self> {
        let mode = if args.capacity {
            Mode::Capacity
        } else if args.decode {
            Mode::Decode
        } else {
            Mode::Encode
        };

        let from = args.from.as_deref().map(Endpoint::parse);
        let cypher = Endpoint::parse(&args.cypher);
        let to = Endpoint::parse(&args.to);

        if mode != Mode::Capacity {
            match &from {
                None => bail!("--from is required to {}", mode_verb(mode)),
                Some(Endpoint::Std) if cypher == Endpoint::Std => {
                    bail!("only one of --from and --cypher can read standard input")
                }
                Some(_) => {}
            }
        }

        let base_level: LevelFilter = settings
            .log
            .level
            .parse()
            .with_context(|| format!("unknown log level {:?}", settings.log.level))?;
        let log_level = match args.verbose {
            0 => base_level,
            1 => base_level.max(LevelFilter::Info),
            _ => base_level.max(LevelFilter::Debug),
        };

        let format = args.format.unwrap_or(settings.output.format);

        Ok(Self {
            mode,
            from,
            cypher,
            to,
            codec: CodecConfig::default().with_output_format(format),
            log_level,
        })
    }
}

fn mode_verb(mode: Mode) -> &'static str {
    match mode {
        Mode::Encode => "encode",
        Mode::Decode => "decode",
        Mode::Capacity => "measure capacity",
    }
}
