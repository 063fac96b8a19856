pub mod codes;
pub mod geometry;
pub mod observation;
pub mod storm;

pub use codes::{CodeLookup, RecordIdentifier, StormStatus};
pub use geometry::{Coord, PathGeometry};
pub use observation::{Observation, WindRadii};
pub use storm::Storm;
