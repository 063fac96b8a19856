use serde::{Deserialize, Serialize};

/// Outcome of resolving a raw source code against its vocabulary.
///
/// `KnownInvalid` covers codes that appear in the published files but have no
/// documented meaning (all found in the pacific-basin dataset); they map to
/// null without a warning. `Unknown` is anything else and is surfaced as a
/// warning by the parser.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeLookup<T> {
    Known(T),
    KnownInvalid,
    Unknown,
}

/// Record identifier marking a special event within a storm track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordIdentifier {
    /// Closest approach to a coast, not followed by a landfall
    ClosestApproach,
    /// Genesis
    Genesis,
    /// An intensity peak in terms of both pressure and wind
    IntensityPeak,
    /// Landfall (center of system crossing a coastline)
    Landfall,
    /// Minimum central pressure
    MinimumPressure,
    /// Additional detail on intensity when rapid changes are underway
    RapidChange,
    /// Change in status of the system
    StatusChange,
    /// Additional detail on the track (position) of the cyclone
    TrackDetail,
    /// Maximum sustained wind speed
    MaxWind,
}

impl RecordIdentifier {
    pub fn lookup(code: &str) -> CodeLookup<Self> {
        match code {
            "C" => CodeLookup::Known(Self::ClosestApproach),
            "G" => CodeLookup::Known(Self::Genesis),
            "I" => CodeLookup::Known(Self::IntensityPeak),
            "L" => CodeLookup::Known(Self::Landfall),
            "P" => CodeLookup::Known(Self::MinimumPressure),
            "R" => CodeLookup::Known(Self::RapidChange),
            "S" => CodeLookup::Known(Self::StatusChange),
            "T" => CodeLookup::Known(Self::TrackDetail),
            "W" => CodeLookup::Known(Self::MaxWind),
            _ => CodeLookup::Unknown,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::ClosestApproach => "C",
            Self::Genesis => "G",
            Self::IntensityPeak => "I",
            Self::Landfall => "L",
            Self::MinimumPressure => "P",
            Self::RapidChange => "R",
            Self::StatusChange => "S",
            Self::TrackDetail => "T",
            Self::MaxWind => "W",
        }
    }
}

/// Storm classification at the time of an observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StormStatus {
    /// Tropical cyclone of tropical depression intensity (<34 knots)
    TropicalDepression,
    /// Tropical cyclone of tropical storm intensity (34-63 knots)
    TropicalStorm,
    /// Tropical cyclone of hurricane intensity (>=64 knots)
    Hurricane,
    /// Extratropical cyclone of any intensity
    Extratropical,
    /// Subtropical cyclone of subtropical depression intensity (<34 knots)
    SubtropicalDepression,
    /// Subtropical cyclone of subtropical storm intensity (>=34 knots)
    SubtropicalStorm,
    /// A low that is neither tropical, subtropical, nor extratropical
    Low,
    /// A tropical wave
    TropicalWave,
    /// Disturbance of any intensity
    Disturbance,
}

impl StormStatus {
    /// Resolve a raw status code. The four invalid codes found in the
    /// pacific-basin file (ET, TY, ST, PT) map to `KnownInvalid`.
    pub fn lookup(code: &str) -> CodeLookup<Self> {
        match code {
            "TD" => CodeLookup::Known(Self::TropicalDepression),
            "TS" => CodeLookup::Known(Self::TropicalStorm),
            "HU" => CodeLookup::Known(Self::Hurricane),
            "EX" => CodeLookup::Known(Self::Extratropical),
            "SD" => CodeLookup::Known(Self::SubtropicalDepression),
            "SS" => CodeLookup::Known(Self::SubtropicalStorm),
            "LO" => CodeLookup::Known(Self::Low),
            "WV" => CodeLookup::Known(Self::TropicalWave),
            "DB" => CodeLookup::Known(Self::Disturbance),
            "ET" | "TY" | "ST" | "PT" => CodeLookup::KnownInvalid,
            _ => CodeLookup::Unknown,
        }
    }

    pub fn as_code(&self) -> &'static str {
        match self {
            Self::TropicalDepression => "TD",
            Self::TropicalStorm => "TS",
            Self::Hurricane => "HU",
            Self::Extratropical => "EX",
            Self::SubtropicalDepression => "SD",
            Self::SubtropicalStorm => "SS",
            Self::Low => "LO",
            Self::TropicalWave => "WV",
            Self::Disturbance => "DB",
        }
    }
}
