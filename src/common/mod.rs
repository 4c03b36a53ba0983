//! # Common Components
//!
//! Plumbing shared by the binary and the integration tests.
//!
//! ## Modules
//!
//! - [`config`]: Configuration file parsing and run settings
//! - [`stream`]: File and standard stream endpoints

pub mod config;
pub mod stream;
