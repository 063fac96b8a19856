//! Parallel parsing of multiple basin files with a merged, order-stable
//! result.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::info;

use crate::error::{ProcessingError, Result};
use crate::parsers::ParseOutcome;
use crate::readers::BasinReader;
use crate::utils::progress::ProgressReporter;

pub struct ParallelProcessor {
    max_workers: usize,
    use_mmap: bool,
}

impl ParallelProcessor {
    pub fn new() -> Self {
        Self {
            max_workers: num_cpus::get(),
            use_mmap: false,
        }
    }

    pub fn with_max_workers(mut self, max_workers: usize) -> Self {
        self.max_workers = max_workers.max(1);
        self
    }

    pub fn with_mmap(mut self, use_mmap: bool) -> Self {
        self.use_mmap = use_mmap;
        self
    }

    /// Parse the given files in parallel and merge the outcomes in input
    /// order. Event ids are re-sequenced across the merged result so the
    /// surrogate key stays contiguous and deterministic regardless of which
    /// file finished first.
    pub fn process_files(
        &self,
        files: &[PathBuf],
        progress: Option<&ProgressReporter>,
    ) -> Result<ParseOutcome> {
        info!(
            files = files.len(),
            workers = self.max_workers,
            "processing basin files in parallel"
        );

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.max_workers)
            .build()
            .map_err(|e| ProcessingError::Config(format!("Failed to create thread pool: {}", e)))?;

        let completed = AtomicUsize::new(0);
        let outcomes: Vec<Result<ParseOutcome>> = pool.install(|| {
            files
                .par_iter()
                .map(|path| {
                    let outcome = BasinReader::with_mmap(self.use_mmap).read_basin(path);
                    let done = completed.fetch_add(1, Ordering::Relaxed) + 1;
                    if let Some(reporter) = progress {
                        reporter.set_message(&format!("Parsed {}", path.display()));
                        reporter.update(done as u64);
                    }
                    outcome
                })
                .collect()
        });

        let mut merged = ParseOutcome::default();
        for outcome in outcomes {
            let outcome = outcome?;
            merged.storms.extend(outcome.storms);
            merged.observations.extend(outcome.observations);
            merged.report.anomalies.extend(outcome.report.anomalies);
        }

        for (i, obs) in merged.observations.iter_mut().enumerate() {
            obs.event_id = (i + 1) as u64;
        }

        info!(
            storms = merged.storms.len(),
            observations = merged.observations.len(),
            "merged parallel results"
        );
        Ok(merged)
    }
}

impl Default for ParallelProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn basin_file(storm_id: &str, name: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "{},            {},      2,", storm_id, name).unwrap();
        writeln!(
            file,
            "20210827, 0000,  , TS, 16.4N,  78.7W,  35, 1006,"
        )
        .unwrap();
        writeln!(
            file,
            "20210827, 0600,  , TS, 16.8N,  79.6W,  40, 1004,"
        )
        .unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn test_merge_preserves_input_order() {
        let atlantic = basin_file("AL092021", "IDA");
        let pacific = basin_file("EP062021", "UNNAMED");
        let files = vec![
            atlantic.path().to_path_buf(),
            pacific.path().to_path_buf(),
        ];

        let merged = ParallelProcessor::new()
            .with_max_workers(2)
            .process_files(&files, None)
            .unwrap();

        assert_eq!(merged.storms.len(), 2);
        assert_eq!(merged.storms[0].storm_id, "AL092021");
        assert_eq!(merged.storms[1].storm_id, "EP062021");
        assert_eq!(merged.observations.len(), 4);
    }

    #[test]
    fn test_event_ids_resequenced_across_files() {
        let atlantic = basin_file("AL092021", "IDA");
        let pacific = basin_file("EP062021", "UNNAMED");
        let files = vec![
            atlantic.path().to_path_buf(),
            pacific.path().to_path_buf(),
        ];

        let merged = ParallelProcessor::new().process_files(&files, None).unwrap();
        let ids: Vec<u64> = merged.observations.iter().map(|o| o.event_id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_mmap_matches_buffered_merge() {
        let atlantic = basin_file("AL092021", "IDA");
        let pacific = basin_file("EP062021", "UNNAMED");
        let files = vec![
            atlantic.path().to_path_buf(),
            pacific.path().to_path_buf(),
        ];

        let buffered = ParallelProcessor::new().process_files(&files, None).unwrap();
        let mapped = ParallelProcessor::new()
            .with_mmap(true)
            .process_files(&files, None)
            .unwrap();
        assert_eq!(buffered, mapped);
    }

    #[test]
    fn test_missing_file_fails_run() {
        let files = vec![PathBuf::from("/nonexistent/basin.txt")];
        assert!(ParallelProcessor::new().process_files(&files, None).is_err());
    }
}
