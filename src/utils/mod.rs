pub mod constants;
pub mod coordinates;
pub mod filename;
pub mod progress;

pub use constants::*;
pub use coordinates::{parse_latitude, parse_longitude};
pub use filename::{generate_points_filename, generate_storms_filename};
pub use progress::ProgressReporter;
