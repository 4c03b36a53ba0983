//! # Stream Endpoints
//!
//! Inputs and outputs are either a file path or `-` for the standard
//! streams. Output files are created on first write (or flush), so a run
//! that fails before producing anything leaves no file behind.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{self, BufReader, Read, Write};
use std::path::PathBuf;

/// A place to read from or write to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Endpoint {
    /// Standard input or standard output
    Std,
    Path(PathBuf),
}

impl Endpoint {
    /// `-` means the standard stream, anything else is a path.
    pub fn parse(arg: &str) -> Self {
        if arg == "-" {
            Endpoint::Std
        } else {
            Endpoint::Path(PathBuf::from(arg))
        }
    }

    pub fn open_read(&self) -> Result<Box<dyn Read>> {
        match self {
            Endpoint::Std => Ok(Box::new(io::stdin().lock())),
            Endpoint::Path(path) => {
                let file = File::open(path)
                    .with_context(|| format!("error reading file {}", path.display()))?;
                Ok(Box::new(BufReader::new(file)))
            }
        }
    }

    pub fn open_write(&self) -> Box<dyn Write> {
        match self {
            Endpoint::Std => Box::new(io::stdout().lock()),
            Endpoint::Path(path) => Box::new(LazyFile::new(path.clone())),
        }
    }
}

/// File writer that only creates its file once there is something to do.
pub struct LazyFile {
    path: PathBuf,
    file: Option<File>,
}

impl LazyFile {
    pub fn new(path: PathBuf) -> Self {
        Self { path, file: None }
    }

    fn file(&mut self) -> io::Result<&mut File> {
        let file = match self.file.take() {
            Some(file) => file,
            None => File::create(&self.path).map_err(|e| {
                io::Error::new(
                    e.kind(),
                    format!("error opening file {}: {}", self.path.display(), e),
                )
            })?,
        };
        Ok(self.file.insert(file))
    }
}

impl Write for LazyFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.file()?.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.file()?.flush()
    }
}
