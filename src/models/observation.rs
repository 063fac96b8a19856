use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::codes::{RecordIdentifier, StormStatus};

/// Maximum extent of winds at a given threshold, per quadrant, in nautical
/// miles. Sentinel values in the source map to `None`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindRadii {
    pub ne: Option<i32>,
    pub se: Option<i32>,
    pub sw: Option<i32>,
    pub nw: Option<i32>,
}

/// One timestamped position/intensity reading within a storm's life,
/// occurring every ~6 hours in the source files.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Observation {
    /// Surrogate key: 1-based position in file order, deterministic across
    /// re-parses of identical input.
    pub event_id: u64,
    /// Foreign key to the owning [`Storm`](crate::models::Storm).
    pub storm_id: String,
    /// Combined date + time of the reading, UTC.
    pub timestamp: NaiveDateTime,
    pub record_identifier: Option<RecordIdentifier>,
    pub status: Option<StormStatus>,

    #[validate(range(min = -90.0, max = 90.0))]
    pub latitude: f64,

    #[validate(range(min = -180.0, max = 180.0))]
    pub longitude: f64,

    /// Maximum sustained wind in knots.
    pub max_wind: Option<i32>,
    /// Minimum central pressure in millibars.
    pub min_pressure: Option<i32>,
    pub radii_34kt: WindRadii,
    pub radii_50kt: WindRadii,
    pub radii_64kt: WindRadii,
}
