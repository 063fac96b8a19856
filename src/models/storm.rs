use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::models::geometry::PathGeometry;

/// One named/numbered tropical cyclone system, built from a HURDAT2 header
/// line and finalized once its observation block has been consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Storm {
    /// Natural key from the source file: basin + cyclone number + year,
    /// e.g. `AL092021`.
    pub storm_id: String,
    pub basin: String,
    pub cyclone_number: String,
    pub year: u16,
    /// Storm name, `UNNAMED` for unnamed systems.
    pub name: String,
    /// Declared observation count from the header line; validated against the
    /// actual block length by the parser.
    pub num_observations: u32,
    /// Timestamp of the first successfully parsed observation.
    pub start_time: Option<NaiveDateTime>,
    /// Derived path geometry; `None` when no observation parsed cleanly.
    pub path_geo: Option<PathGeometry>,
}

impl Storm {
    /// Build a storm from validated header fields. The caller guarantees
    /// `storm_id` is 8 characters with a 2-letter basin prefix.
    pub fn from_header(storm_id: &str, name: &str, num_observations: u32, year: u16) -> Self {
        Self {
            storm_id: storm_id.to_string(),
            basin: storm_id[0..2].to_string(),
            cyclone_number: storm_id[2..4].to_string(),
            year,
            name: name.to_string(),
            num_observations,
            start_time: None,
            path_geo: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_header() {
        let storm = Storm::from_header("AL092021", "IDA", 19, 2021);
        assert_eq!(storm.storm_id, "AL092021");
        assert_eq!(storm.basin, "AL");
        assert_eq!(storm.cyclone_number, "09");
        assert_eq!(storm.year, 2021);
        assert_eq!(storm.name, "IDA");
        assert_eq!(storm.num_observations, 19);
        assert!(storm.start_time.is_none());
        assert!(storm.path_geo.is_none());
    }
}
