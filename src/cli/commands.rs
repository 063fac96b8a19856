use std::path::{Path, PathBuf};

use tracing_subscriber::filter::LevelFilter;

use crate::cli::args::{Cli, Commands};
use crate::error::{ProcessingError, Result};
use crate::processors::{IntegrityChecker, ParallelProcessor};
use crate::readers::BasinReader;
use crate::utils::filename::{generate_points_filename, generate_storms_filename};
use crate::utils::progress::ProgressReporter;
use crate::writers::ParquetWriter;

pub async fn run(cli: Cli) -> Result<()> {
    let level = if cli.verbose {
        LevelFilter::DEBUG
    } else {
        LevelFilter::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    match cli.command {
        Commands::Process {
            input_file,
            output_dir,
            compression,
            validate_only,
            use_mmap,
            chunk_size,
            row_group_size,
        } => {
            println!("Processing HURDAT2 basin file...");
            println!("Input file: {}", input_file.display());

            let progress = ProgressReporter::new_spinner("Parsing basin file...", false);

            let reader = BasinReader::with_mmap(use_mmap);
            let outcome = reader.read_basin(&input_file)?;

            progress.finish_with_message(&format!(
                "Parsed {} storms, {} observations",
                outcome.storms.len(),
                outcome.observations.len()
            ));

            let checker = IntegrityChecker::new();
            let report = checker.check(&outcome);
            println!("\n{}", checker.generate_summary(&report));

            if validate_only {
                println!("Validation complete - no output files written");
                return Ok(());
            }

            let stem = file_stem(&input_file)?;
            write_tables(
                &outcome,
                &stem,
                output_dir,
                &compression,
                chunk_size,
                row_group_size,
            )?;

            println!("Processing complete!");
        }

        Commands::ProcessDirectory {
            input_dir,
            output_dir,
            compression,
            max_workers,
            use_mmap,
            chunk_size,
            row_group_size,
            file_pattern,
        } => {
            println!("Processing HURDAT2 basin directory...");
            println!("Input directory: {}", input_dir.display());
            println!("Workers: {}", max_workers);

            let files = collect_basin_files(&input_dir, &file_pattern)?;
            if files.is_empty() {
                return Err(ProcessingError::Config(format!(
                    "No matching .txt files in {}",
                    input_dir.display()
                )));
            }
            println!("Found {} basin files", files.len());

            let progress =
                ProgressReporter::new(files.len() as u64, "Parsing basin files...", false);

            let processor = ParallelProcessor::new()
                .with_max_workers(max_workers)
                .with_mmap(use_mmap);
            let outcome = processor.process_files(&files, Some(&progress))?;

            progress.finish_with_message(&format!(
                "Parsed {} storms, {} observations",
                outcome.storms.len(),
                outcome.observations.len()
            ));

            let checker = IntegrityChecker::new();
            let report = checker.check(&outcome);
            println!("\n{}", checker.generate_summary(&report));

            write_tables(
                &outcome,
                "hurdat2-unified",
                output_dir,
                &compression,
                chunk_size,
                row_group_size,
            )?;

            println!("Processing complete!");
        }

        Commands::Validate { input_file, json } => {
            let outcome = BasinReader::new().read_basin(&input_file)?;

            let checker = IntegrityChecker::new();
            let report = checker.check(&outcome);

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", checker.generate_summary(&report));
            }
        }

        Commands::Info { file, sample } => {
            println!("Analyzing Parquet file: {}", file.display());

            let writer = ParquetWriter::new();
            let file_info = writer.get_file_info(&file)?;
            println!("\n{}", file_info.summary());

            if sample > 0 {
                println!("\nSample Storms (showing up to {} rows):", sample);
                match writer.read_sample_storms(&file, sample) {
                    Ok(storms) => {
                        for (i, storm) in storms.iter().enumerate() {
                            println!(
                                "{}. {} {} ({}): {} observations, path={}",
                                i + 1,
                                storm.storm_id,
                                storm.name,
                                storm.year,
                                storm.num_observations,
                                if storm.has_path { "yes" } else { "none" }
                            );
                        }
                    }
                    Err(e) => println!("Error reading sample data: {}", e),
                }
            }
        }
    }

    Ok(())
}

fn write_tables(
    outcome: &crate::parsers::ParseOutcome,
    stem: &str,
    output_dir: Option<PathBuf>,
    compression: &str,
    chunk_size: usize,
    row_group_size: usize,
) -> Result<()> {
    let output_dir = output_dir.unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&output_dir)?;

    let storms_path = output_dir.join(generate_storms_filename(stem));
    let points_path = output_dir.join(generate_points_filename(stem));

    println!(
        "Writing {} storms and {} observations...",
        outcome.storms.len(),
        outcome.observations.len()
    );

    let writer = ParquetWriter::new()
        .with_compression(compression)?
        .with_row_group_size(row_group_size);
    writer.write_storms(&outcome.storms, &storms_path)?;
    writer.write_observations_batched(&outcome.observations, &points_path, chunk_size)?;

    for path in [&storms_path, &points_path] {
        if path.exists() {
            let info = writer.get_file_info(path)?;
            println!("\n{}\n{}", path.display(), info.summary());
        }
    }

    Ok(())
}

fn file_stem(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
        .ok_or_else(|| {
            ProcessingError::Config(format!("Cannot derive file stem from {}", path.display()))
        })
}

/// Collect .txt files matching the optional name pattern, sorted by name so
/// merged output is deterministic.
fn collect_basin_files(input_dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    let mut files: Vec<PathBuf> = std::fs::read_dir(input_dir)?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension().and_then(|e| e.to_str()) == Some("txt")
                && (pattern.is_empty()
                    || path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.contains(pattern)))
        })
        .collect();

    files.sort();
    Ok(files)
}
