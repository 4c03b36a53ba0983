pub mod cli;
pub mod codec;
pub mod common;
pub mod utils;

pub use codec::{decode, encode, CodecConfig, CodecError};
