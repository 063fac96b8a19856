use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::utils::constants::{DEFAULT_CHUNK_SIZE, DEFAULT_ROW_GROUP_SIZE};

#[derive(Parser)]
#[command(name = "hurdat2-processor")]
#[command(about = "HURDAT2 hurricane database processor")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Process one HURDAT2 basin file into storms and track-points tables
    Process {
        #[arg(short, long, help = "Input HURDAT2 text file")]
        input_file: PathBuf,

        #[arg(
            short,
            long,
            help = "Output directory [default: current directory]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value = "false")]
        validate_only: bool,

        #[arg(long, default_value = "false", help = "Memory-map the input file")]
        use_mmap: bool,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE)]
        row_group_size: usize,
    },

    /// Process all basin files in a directory into one unified dataset
    ProcessDirectory {
        #[arg(short, long, help = "Input directory containing HURDAT2 text files")]
        input_dir: PathBuf,

        #[arg(
            short,
            long,
            help = "Output directory [default: current directory]"
        )]
        output_dir: Option<PathBuf>,

        #[arg(short, long, default_value = "snappy")]
        compression: String,

        #[arg(long, default_value_t = num_cpus::get())]
        max_workers: usize,

        #[arg(long, default_value = "false", help = "Memory-map input files")]
        use_mmap: bool,

        #[arg(long, default_value_t = DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,

        #[arg(long, default_value_t = DEFAULT_ROW_GROUP_SIZE)]
        row_group_size: usize,

        #[arg(
            long,
            help = "Filter to specific file pattern (e.g., 'hurdat2-atl')",
            default_value = ""
        )]
        file_pattern: String,
    },

    /// Validate a basin file and report anomalies without writing output
    Validate {
        #[arg(short, long, help = "Input HURDAT2 text file")]
        input_file: PathBuf,

        #[arg(long, default_value = "false", help = "Emit the report as JSON")]
        json: bool,
    },

    /// Display information about a generated Parquet file
    Info {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(short, long, default_value = "10")]
        sample: usize,
    },
}
