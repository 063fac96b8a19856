pub mod integrity_checker;
pub mod parallel_processor;
pub mod path_builder;

pub use integrity_checker::{IntegrityChecker, IntegrityReport};
pub use parallel_processor::ParallelProcessor;
pub use path_builder::PathBuilder;
