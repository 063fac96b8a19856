pub mod fields;
pub mod hurdat2;

pub use hurdat2::{Anomaly, Hurdat2Parser, ParseOutcome, ParseReport};
