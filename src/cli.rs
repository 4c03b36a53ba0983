//! # Command-Line Arguments
//!
//! ## Usage
//!
//! ```bash
//! # hide a file
//! imcode --from secret.bin --cypher cat.png --to coded.png
//!
//! # get it back
//! imcode --decode --from coded.png --cypher cat.png --to secret.bin
//!
//! # pipe the payload in and the image out
//! tar c docs | imcode --from - --cypher cat.png > coded.png
//!
//! # how much fits?
//! imcode --capacity --cypher cat.png
//! ```

use clap::{ArgAction, Parser};

use crate::codec::OutputFormat;

/// Hide a byte stream inside the pixels of an image, or recover it.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Decode the input instead of encoding it
    #[arg(short, long, conflicts_with = "capacity")]
    pub decode: bool,

    /// Path to input file ('-' for stdin)
    ///
    /// The payload when encoding, the coded image when decoding.
    #[arg(short, long, required_unless_present = "capacity")]
    pub from: Option<String>,

    /// Path to cypher image ('-' for stdin)
    #[arg(short, long)]
    pub cypher: String,

    /// Path to output file ('-' for stdout)
    #[arg(short, long, default_value = "-")]
    pub to: String,

    /// Print how many bytes the cypher image can hold and exit
    #[arg(long)]
    pub capacity: bool,

    /// Format of the coded image (defaults to the cypher's format)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Configuration file path (TOML)
    #[arg(long)]
    pub config: Option<String>,

    /// Log more (-v for info, -vv for debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}
