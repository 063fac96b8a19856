//! The HURDAT2 parser: converts the two-record-type text format into Storm
//! and Observation row collections plus a structured anomaly report.
//!
//! Classification is structural: lines are split on commas and routed by
//! field count (header shape vs. observation shape), never by value
//! inference. The parser performs no I/O; see
//! [`BasinReader`](crate::readers::BasinReader) for file ingestion.

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{ProcessingError, Result};
use crate::models::{CodeLookup, Coord, Observation, RecordIdentifier, Storm, StormStatus, WindRadii};
use crate::parsers::fields;
use crate::processors::PathBuilder;
use crate::utils::constants::{
    FIELD_DATE, FIELD_LATITUDE, FIELD_LONGITUDE, FIELD_MAX_WIND, FIELD_MIN_PRESSURE,
    FIELD_RADII_START, FIELD_RECORD_IDENTIFIER, FIELD_STATUS, FIELD_TIME, HEADER_FIELD_COUNT,
    MIN_OBSERVATION_FIELDS, SENTINEL_PRESSURE, SENTINEL_RADII, SENTINEL_WIND, STORM_ID_LEN,
};
use crate::utils::coordinates::{parse_latitude, parse_longitude};

/// A data-quality event recorded during parsing. None of these abort the run;
/// they accumulate in the [`ParseReport`] for the caller to act on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Anomaly {
    /// Unrecognized header or line shape: the block is skipped up to the next
    /// recognizable header.
    SkippedBlock {
        first_line: usize,
        last_line: usize,
        reason: String,
    },
    /// Declared header count differs from the number of observations parsed.
    CountMismatch {
        storm_id: String,
        declared: u32,
        actual: u32,
    },
    /// Record-identifier code outside the known vocabulary.
    UnknownRecordIdentifier {
        storm_id: String,
        line: usize,
        code: String,
    },
    /// Status code outside both the known vocabulary and the known-invalid set.
    UnknownStatus {
        storm_id: String,
        line: usize,
        code: String,
    },
    /// A field in an observation line failed to parse.
    FieldParseError {
        storm_id: String,
        line: usize,
        field: String,
        detail: String,
    },
    /// Every observation in the storm's block failed parsing; the storm row
    /// persists with a null path.
    EmptyPath { storm_id: String },
}

/// Structured list of anomalies produced by one parse run.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ParseReport {
    pub anomalies: Vec<Anomaly>,
}

impl ParseReport {
    pub fn is_clean(&self) -> bool {
        self.anomalies.is_empty()
    }

    pub fn count_mismatches(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::CountMismatch { .. }))
    }

    pub fn skipped_blocks(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::SkippedBlock { .. }))
    }

    pub fn unknown_codes(&self) -> usize {
        self.count(|a| {
            matches!(
                a,
                Anomaly::UnknownRecordIdentifier { .. } | Anomaly::UnknownStatus { .. }
            )
        })
    }

    pub fn field_errors(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::FieldParseError { .. }))
    }

    pub fn empty_paths(&self) -> usize {
        self.count(|a| matches!(a, Anomaly::EmptyPath { .. }))
    }

    fn count(&self, pred: impl Fn(&Anomaly) -> bool) -> usize {
        self.anomalies.iter().filter(|a| pred(a)).count()
    }
}

/// The two row collections and the anomaly report from one parse run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseOutcome {
    pub storms: Vec<Storm>,
    pub observations: Vec<Observation>,
    pub report: ParseReport,
}

/// State of the storm block currently being consumed.
struct BlockState {
    storm: Storm,
    actual: u32,
    coords: Vec<Coord>,
}

/// Line range currently being skipped after a structural error.
struct SkipSpan {
    first_line: usize,
    last_line: usize,
    reason: String,
}

pub struct Hurdat2Parser;

impl Hurdat2Parser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a sequence of raw HURDAT2 lines from one basin file.
    ///
    /// `source_name` labels the input in the fatal no-valid-header error;
    /// it is typically the file path.
    pub fn parse_lines<'a, I>(&self, lines: I, source_name: &str) -> Result<ParseOutcome>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut outcome = ParseOutcome::default();
        let mut current: Option<BlockState> = None;
        let mut skip: Option<SkipSpan> = None;
        let mut next_event_id: u64 = 1;
        let mut saw_header = false;

        for (idx, raw) in lines.into_iter().enumerate() {
            let line_no = idx + 1;
            if raw.trim().is_empty() {
                continue;
            }

            let parts: Vec<&str> = raw.split(',').map(str::trim).collect();

            if parts.len() <= HEADER_FIELD_COUNT {
                // Header shape
                match parse_header(&parts) {
                    Ok((storm, declared)) => {
                        saw_header = true;
                        flush_skip(&mut skip, &mut outcome.report);
                        finalize_block(current.take(), &mut outcome);
                        debug!(storm_id = %storm.storm_id, declared, "storm header");
                        current = Some(BlockState {
                            storm,
                            actual: 0,
                            coords: Vec::with_capacity(declared as usize),
                        });
                    }
                    Err(reason) => {
                        warn!(line = line_no, %reason, "malformed header, skipping block");
                        finalize_block(current.take(), &mut outcome);
                        extend_skip(&mut skip, line_no, reason);
                    }
                }
            } else if parts.len() >= MIN_OBSERVATION_FIELDS {
                // Observation shape
                match current.as_mut() {
                    Some(block) => {
                        if let Some(obs) = parse_observation(
                            &parts,
                            line_no,
                            &block.storm.storm_id,
                            next_event_id,
                            &mut outcome.report,
                        ) {
                            block.actual += 1;
                            if block.storm.start_time.is_none() {
                                block.storm.start_time = Some(obs.timestamp);
                            }
                            block.coords.push(Coord {
                                latitude: obs.latitude,
                                longitude: obs.longitude,
                            });
                            outcome.observations.push(obs);
                            next_event_id += 1;
                        }
                    }
                    None => {
                        extend_skip(
                            &mut skip,
                            line_no,
                            "observation line outside any storm block".to_string(),
                        );
                    }
                }
            } else {
                warn!(
                    line = line_no,
                    fields = parts.len(),
                    "unrecognized line shape, skipping block"
                );
                finalize_block(current.take(), &mut outcome);
                extend_skip(
                    &mut skip,
                    line_no,
                    format!("unrecognized line shape ({} fields)", parts.len()),
                );
            }
        }

        flush_skip(&mut skip, &mut outcome.report);
        finalize_block(current.take(), &mut outcome);

        if !saw_header {
            return Err(ProcessingError::NoValidHeader {
                source_name: source_name.to_string(),
            });
        }

        Ok(outcome)
    }
}

impl Default for Hurdat2Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate a header-shaped line. Returns the reason on failure; the caller
/// treats that as fatal for the block.
fn parse_header(parts: &[&str]) -> std::result::Result<(Storm, u32), String> {
    // Published headers end with a trailing comma, so a fourth empty field is
    // expected; anything non-empty there is not a header.
    if parts.len() < 3 || (parts.len() == HEADER_FIELD_COUNT && !parts[3].is_empty()) {
        return Err(format!("wrong header field count ({})", parts.len()));
    }

    // Byte-wise check so a multi-byte id can never panic the slicing below.
    let storm_id = parts[0];
    let id_bytes = storm_id.as_bytes();
    if id_bytes.len() != STORM_ID_LEN
        || !id_bytes[..2].iter().all(|b| b.is_ascii_alphabetic())
        || !id_bytes[2..].iter().all(|b| b.is_ascii_digit())
    {
        return Err(format!("invalid storm id '{}'", storm_id));
    }

    let num_observations = parts[2]
        .parse::<u32>()
        .map_err(|_| format!("invalid observation count '{}'", parts[2]))?;

    // The digit check above guarantees this parses.
    let year = storm_id[4..8].parse::<u16>().unwrap_or_default();

    Ok((
        Storm::from_header(storm_id, parts[1], num_observations, year),
        num_observations,
    ))
}

/// Parse one observation line. Timestamp or coordinate failures drop the row
/// (recorded as anomalies); other field failures null the field and continue.
fn parse_observation(
    parts: &[&str],
    line: usize,
    storm_id: &str,
    event_id: u64,
    report: &mut ParseReport,
) -> Option<Observation> {
    let timestamp = match fields::parse_timestamp(parts[FIELD_DATE], parts[FIELD_TIME]) {
        Ok(ts) => ts,
        Err(e) => {
            field_error(report, storm_id, line, "timestamp", e.to_string());
            return None;
        }
    };

    let record_identifier = match parts[FIELD_RECORD_IDENTIFIER] {
        "" => None,
        code => match RecordIdentifier::lookup(code) {
            CodeLookup::Known(id) => Some(id),
            CodeLookup::KnownInvalid => {
                debug!(storm_id, line, code, "known-invalid record identifier mapped to null");
                None
            }
            CodeLookup::Unknown => {
                warn!(storm_id, line, code, "unknown record identifier");
                report.anomalies.push(Anomaly::UnknownRecordIdentifier {
                    storm_id: storm_id.to_string(),
                    line,
                    code: code.to_string(),
                });
                None
            }
        },
    };

    let status = match parts[FIELD_STATUS] {
        "" => None,
        code => match StormStatus::lookup(code) {
            CodeLookup::Known(status) => Some(status),
            CodeLookup::KnownInvalid => {
                debug!(storm_id, line, code, "known-invalid status code mapped to null");
                None
            }
            CodeLookup::Unknown => {
                warn!(storm_id, line, code, "unknown status code");
                report.anomalies.push(Anomaly::UnknownStatus {
                    storm_id: storm_id.to_string(),
                    line,
                    code: code.to_string(),
                });
                None
            }
        },
    };

    let latitude = match parse_latitude(parts[FIELD_LATITUDE]) {
        Ok(v) => v,
        Err(e) => {
            field_error(report, storm_id, line, "latitude", e.to_string());
            return None;
        }
    };

    let longitude = match parse_longitude(parts[FIELD_LONGITUDE]) {
        Ok(v) => v,
        Err(e) => {
            field_error(report, storm_id, line, "longitude", e.to_string());
            return None;
        }
    };

    let max_wind = numeric_field(parts, FIELD_MAX_WIND, SENTINEL_WIND, "max_wind", storm_id, line, report);
    let min_pressure = numeric_field(
        parts,
        FIELD_MIN_PRESSURE,
        SENTINEL_PRESSURE,
        "min_pressure",
        storm_id,
        line,
        report,
    );

    let mut radii = [WindRadii::default(); 3];
    for (threshold, slot) in radii.iter_mut().enumerate() {
        let base = FIELD_RADII_START + threshold * 4;
        slot.ne = numeric_field(parts, base, SENTINEL_RADII, "radii_ne", storm_id, line, report);
        slot.se = numeric_field(parts, base + 1, SENTINEL_RADII, "radii_se", storm_id, line, report);
        slot.sw = numeric_field(parts, base + 2, SENTINEL_RADII, "radii_sw", storm_id, line, report);
        slot.nw = numeric_field(parts, base + 3, SENTINEL_RADII, "radii_nw", storm_id, line, report);
    }

    let observation = Observation {
        event_id,
        storm_id: storm_id.to_string(),
        timestamp,
        record_identifier,
        status,
        latitude,
        longitude,
        max_wind,
        min_pressure,
        radii_34kt: radii[0],
        radii_50kt: radii[1],
        radii_64kt: radii[2],
    };

    if let Err(e) = validator::Validate::validate(&observation) {
        field_error(report, storm_id, line, "coordinates", e.to_string());
        return None;
    }

    Some(observation)
}

fn numeric_field(
    parts: &[&str],
    idx: usize,
    sentinel: i32,
    field: &str,
    storm_id: &str,
    line: usize,
    report: &mut ParseReport,
) -> Option<i32> {
    match fields::parse_numeric(parts.get(idx).copied(), sentinel) {
        Ok(value) => value,
        Err(e) => {
            field_error(report, storm_id, line, field, e.to_string());
            None
        }
    }
}

fn field_error(report: &mut ParseReport, storm_id: &str, line: usize, field: &str, detail: String) {
    warn!(storm_id, line, field, %detail, "field parse error");
    report.anomalies.push(Anomaly::FieldParseError {
        storm_id: storm_id.to_string(),
        line,
        field: field.to_string(),
        detail,
    });
}

/// Attach the path geometry to a finished block and check its declared count,
/// then emit the storm row.
fn finalize_block(block: Option<BlockState>, outcome: &mut ParseOutcome) {
    let Some(mut block) = block else {
        return;
    };

    block.storm.path_geo = PathBuilder::new().build(&block.coords);
    if block.storm.path_geo.is_none() {
        warn!(storm_id = %block.storm.storm_id, "no valid track points, storm has null path");
        outcome.report.anomalies.push(Anomaly::EmptyPath {
            storm_id: block.storm.storm_id.clone(),
        });
    }

    if block.actual != block.storm.num_observations {
        warn!(
            storm_id = %block.storm.storm_id,
            declared = block.storm.num_observations,
            actual = block.actual,
            "observation count mismatch"
        );
        outcome.report.anomalies.push(Anomaly::CountMismatch {
            storm_id: block.storm.storm_id.clone(),
            declared: block.storm.num_observations,
            actual: block.actual,
        });
    }

    outcome.storms.push(block.storm);
}

fn extend_skip(skip: &mut Option<SkipSpan>, line: usize, reason: String) {
    match skip {
        Some(span) => span.last_line = line,
        None => {
            *skip = Some(SkipSpan {
                first_line: line,
                last_line: line,
                reason,
            })
        }
    }
}

fn flush_skip(skip: &mut Option<SkipSpan>, report: &mut ParseReport) {
    if let Some(span) = skip.take() {
        report.anomalies.push(Anomaly::SkippedBlock {
            first_line: span.first_line,
            last_line: span.last_line,
            reason: span.reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PathGeometry;
    use pretty_assertions::assert_eq;

    const IDA_HEADER: &str = "AL092021,                IDA,      3,";

    fn obs_line(date: &str, time: &str, lat: &str, lon: &str) -> String {
        format!(
            "{}, {},  , HU, {}, {}, 130,  931,  130,  110,   80,  110,   70,   60,   40,   50,   45,   40,   30,   30,",
            date, time, lat, lon
        )
    }

    fn parse(lines: &[&str]) -> ParseOutcome {
        Hurdat2Parser::new().parse_lines(lines.iter().copied(), "test").unwrap()
    }

    #[test]
    fn test_header_emits_storm() {
        let line1 = obs_line("20210827", "0000", "16.4N", "78.7W");
        let line2 = obs_line("20210827", "0600", "16.8N", "79.6W");
        let line3 = obs_line("20210827", "1200", "17.2N", "80.4W");
        let outcome = parse(&[IDA_HEADER, line1.as_str(), line2.as_str(), line3.as_str()]);

        assert_eq!(outcome.storms.len(), 1);
        let storm = &outcome.storms[0];
        assert_eq!(storm.storm_id, "AL092021");
        assert_eq!(storm.name, "IDA");
        assert_eq!(storm.num_observations, 3);
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_observations_link_to_storm_in_order() {
        let line1 = obs_line("20210827", "0000", "16.4N", "78.7W");
        let line2 = obs_line("20210827", "0600", "16.8N", "79.6W");
        let line3 = obs_line("20210827", "1200", "17.2N", "80.4W");
        let outcome = parse(&[IDA_HEADER, line1.as_str(), line2.as_str(), line3.as_str()]);

        assert_eq!(outcome.observations.len(), 3);
        for (i, obs) in outcome.observations.iter().enumerate() {
            assert_eq!(obs.storm_id, "AL092021");
            assert_eq!(obs.event_id, (i + 1) as u64);
        }

        let storm = &outcome.storms[0];
        assert_eq!(storm.start_time, Some(outcome.observations[0].timestamp));
        match storm.path_geo.as_ref().unwrap() {
            PathGeometry::LineString(coords) => {
                assert_eq!(coords.len(), 3);
                assert_eq!(coords[0].latitude, 16.4);
                assert_eq!(coords[0].longitude, -78.7);
                assert_eq!(coords[2].latitude, 17.2);
            }
            other => panic!("expected line geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_sentinels_map_to_null() {
        let line = "20210827, 0000,  , HU, 16.4N, 78.7W, -99, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999, -999,";
        let header = "AL092021,                IDA,      1,";
        let outcome = parse(&[header, line]);

        let obs = &outcome.observations[0];
        assert_eq!(obs.max_wind, None);
        assert_eq!(obs.min_pressure, None);
        assert_eq!(obs.radii_34kt, WindRadii::default());
        assert_eq!(obs.radii_64kt, WindRadii::default());
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_missing_trailing_radii_fields() {
        // Older records stop after pressure
        let line = "19350829, 1200,  , HU, 24.8N, 80.8W, 160,  892,";
        let header = "AL031935,            UNNAMED,      1,";
        let outcome = parse(&[header, line]);

        assert_eq!(outcome.observations.len(), 1);
        let obs = &outcome.observations[0];
        assert_eq!(obs.max_wind, Some(160));
        assert_eq!(obs.min_pressure, Some(892));
        assert_eq!(obs.radii_34kt, WindRadii::default());
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_count_mismatch_single_warning() {
        let header = "AL092021,                IDA,      5,";
        let line1 = obs_line("20210827", "0000", "16.4N", "78.7W");
        let line2 = obs_line("20210827", "0600", "16.8N", "79.6W");
        let outcome = parse(&[header, line1.as_str(), line2.as_str()]);

        assert_eq!(outcome.storms.len(), 1);
        assert_eq!(outcome.observations.len(), 2);
        assert_eq!(outcome.report.count_mismatches(), 1);
        assert_eq!(
            outcome.report.anomalies,
            vec![Anomaly::CountMismatch {
                storm_id: "AL092021".to_string(),
                declared: 5,
                actual: 2,
            }]
        );
    }

    #[test]
    fn test_single_observation_point_geometry() {
        let header = "AL092021,                IDA,      1,";
        let line = obs_line("20210827", "0000", "16.4N", "78.7W");
        let outcome = parse(&[header, line.as_str()]);

        match outcome.storms[0].path_geo.as_ref().unwrap() {
            PathGeometry::Point(c) => {
                assert_eq!(c.latitude, 16.4);
                assert_eq!(c.longitude, -78.7);
            }
            other => panic!("expected point geometry, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_record_identifier_warns_and_nulls() {
        let line = "20210827, 0000, Q, HU, 16.4N, 78.7W, 130,  931,";
        let header = "AL092021,                IDA,      1,";
        let outcome = parse(&[header, line]);

        let obs = &outcome.observations[0];
        assert_eq!(obs.record_identifier, None);
        assert_eq!(outcome.report.unknown_codes(), 1);
    }

    #[test]
    fn test_pacific_invalid_status_nulls_silently() {
        let line = "19920716, 1200,  , TY, 16.4N, 137.2E, 85,  960,";
        let header = "EP061992,              UNNAMED,      1,";
        let outcome = parse(&[header, line]);

        assert_eq!(outcome.observations[0].status, None);
        assert!(outcome.report.is_clean());
    }

    #[test]
    fn test_bad_timestamp_drops_observation() {
        let good = obs_line("20210827", "0600", "16.8N", "79.6W");
        let bad = obs_line("2021xx27", "0000", "16.4N", "78.7W");
        let header = "AL092021,                IDA,      2,";
        let outcome = parse(&[header, bad.as_str(), good.as_str()]);

        assert_eq!(outcome.observations.len(), 1);
        assert_eq!(outcome.report.field_errors(), 1);
        // The dropped row also surfaces as a count mismatch
        assert_eq!(outcome.report.count_mismatches(), 1);
    }

    #[test]
    fn test_malformed_header_skips_block() {
        let header1 = "NOTANID!,              BOGUS,      2,";
        let orphan = obs_line("20210827", "0000", "16.4N", "78.7W");
        let header2 = "AL092021,                IDA,      1,";
        let line = obs_line("20210829", "1200", "28.0N", "90.0W");
        let outcome = parse(&[header1, orphan.as_str(), header2, line.as_str()]);

        assert_eq!(outcome.storms.len(), 1);
        assert_eq!(outcome.storms[0].storm_id, "AL092021");
        assert_eq!(outcome.report.skipped_blocks(), 1);
        match &outcome.report.anomalies[0] {
            Anomaly::SkippedBlock {
                first_line,
                last_line,
                ..
            } => {
                assert_eq!(*first_line, 1);
                assert_eq!(*last_line, 2);
            }
            other => panic!("expected skipped block, got {:?}", other),
        }
    }

    #[test]
    fn test_non_ascii_storm_id_skips_block() {
        // "aé12345" is 8 bytes but not 8 ASCII characters
        let header1 = "a\u{e9}12345,                BAD,      1,";
        let orphan = obs_line("20210827", "0000", "16.4N", "78.7W");
        let header2 = "AL092021,                IDA,      1,";
        let line = obs_line("20210829", "1200", "28.0N", "90.0W");
        let outcome = parse(&[header1, orphan.as_str(), header2, line.as_str()]);

        assert_eq!(outcome.storms.len(), 1);
        assert_eq!(outcome.storms[0].storm_id, "AL092021");
        assert_eq!(outcome.observations.len(), 1);
        assert_eq!(outcome.report.skipped_blocks(), 1);
    }

    #[test]
    fn test_no_valid_header_is_fatal() {
        let line = obs_line("20210827", "0000", "16.4N", "78.7W");
        let result = Hurdat2Parser::new().parse_lines([line.as_str()], "bogus.txt");
        assert!(matches!(
            result,
            Err(ProcessingError::NoValidHeader { .. })
        ));
    }

    #[test]
    fn test_reparse_is_identical() {
        let header = "AL092021,                IDA,      2,";
        let line1 = obs_line("20210827", "0000", "16.4N", "78.7W");
        let line2 = obs_line("20210827", "0600", "16.8N", "79.6W");
        let lines = [header, line1.as_str(), line2.as_str()];

        let first = parse(&lines);
        let second = parse(&lines);
        assert_eq!(first, second);
    }

    #[test]
    fn test_empty_path_records_anomaly() {
        let header = "AL092021,                IDA,      1,";
        let bad = obs_line("2021xx27", "0000", "16.4N", "78.7W");
        let outcome = parse(&[header, bad.as_str()]);

        assert_eq!(outcome.storms.len(), 1);
        assert!(outcome.storms[0].path_geo.is_none());
        assert_eq!(outcome.report.empty_paths(), 1);
    }
}
