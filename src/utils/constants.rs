/// Sentinel values denoting "not recorded" in the source files
pub const SENTINEL_WIND: i32 = -99;
pub const SENTINEL_PRESSURE: i32 = -999;
pub const SENTINEL_RADII: i32 = -999;

/// Line shapes: a header line carries id, name, count and a trailing empty
/// field; observation lines carry at least date through pressure
pub const HEADER_FIELD_COUNT: usize = 4;
pub const MIN_OBSERVATION_FIELDS: usize = 8;
pub const STORM_ID_LEN: usize = 8;

/// Observation field positions
pub const FIELD_DATE: usize = 0;
pub const FIELD_TIME: usize = 1;
pub const FIELD_RECORD_IDENTIFIER: usize = 2;
pub const FIELD_STATUS: usize = 3;
pub const FIELD_LATITUDE: usize = 4;
pub const FIELD_LONGITUDE: usize = 5;
pub const FIELD_MAX_WIND: usize = 6;
pub const FIELD_MIN_PRESSURE: usize = 7;
pub const FIELD_RADII_START: usize = 8;

/// Processing defaults
pub const DEFAULT_CHUNK_SIZE: usize = 1000;
pub const DEFAULT_ROW_GROUP_SIZE: usize = 10000;
pub const DEFAULT_BUFFER_SIZE: usize = 8192 * 16; // 128KB
