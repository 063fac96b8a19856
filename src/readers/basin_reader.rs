//! File ingestion for HURDAT2 basin files. Offers a buffered reader for the
//! common case and an optional memory-mapped path for large unified files.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use memmap2::Mmap;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::parsers::{Hurdat2Parser, ParseOutcome};
use crate::utils::constants::DEFAULT_BUFFER_SIZE;

pub struct BasinReader {
    use_mmap: bool,
}

impl BasinReader {
    pub fn new() -> Self {
        Self { use_mmap: false }
    }

    pub fn with_mmap(use_mmap: bool) -> Self {
        Self { use_mmap }
    }

    /// Read and parse one basin file into its row collections.
    pub fn read_basin(&self, path: &Path) -> Result<ParseOutcome> {
        let source_name = path.display().to_string();
        info!(file = %source_name, mmap = self.use_mmap, "reading basin file");

        let outcome = if self.use_mmap {
            self.read_mmap(path, &source_name)?
        } else {
            self.read_buffered(path, &source_name)?
        };

        info!(
            file = %source_name,
            storms = outcome.storms.len(),
            observations = outcome.observations.len(),
            anomalies = outcome.report.anomalies.len(),
            "basin file parsed"
        );
        Ok(outcome)
    }

    fn read_buffered(&self, path: &Path, source_name: &str) -> Result<ParseOutcome> {
        let file = File::open(path)?;
        let mut reader = BufReader::with_capacity(DEFAULT_BUFFER_SIZE, file);
        let mut contents = String::new();
        reader.read_to_string(&mut contents)?;

        Hurdat2Parser::new().parse_lines(contents.lines(), source_name)
    }

    fn read_mmap(&self, path: &Path, source_name: &str) -> Result<ParseOutcome> {
        let file = File::open(path)?;
        // Safety: the file is opened read-only and not mutated for the
        // lifetime of the map.
        let mmap = unsafe { Mmap::map(&file)? };
        let contents = std::str::from_utf8(&mmap).map_err(|e| {
            ProcessingError::InvalidFormat(format!("File is not valid UTF-8: {}", e))
        })?;

        Hurdat2Parser::new().parse_lines(contents.lines(), source_name)
    }
}

impl Default for BasinReader {
    fn default() -> Self {
        Self::new()
    }
}
