//! Field-level parsing rules for HURDAT2 observation lines: fixed-format
//! timestamps and sentinel-coded numeric fields.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};

use crate::error::{ProcessingError, Result};

/// Combine the 8-digit YYYYMMDD date field and 4-digit HHMM time field into
/// one UTC timestamp. The widths are enforced up front since chrono accepts
/// 1-digit month/day/minute components that the fixed format never produces;
/// non-numeric input or out-of-calendar values fail.
pub fn parse_timestamp(date: &str, time: &str) -> Result<NaiveDateTime> {
    let date = date.trim();
    if date.len() != 8 || !date.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProcessingError::InvalidTimestamp(format!(
            "Invalid date field: '{}'",
            date
        )));
    }

    let time = time.trim();
    if time.len() != 4 || !time.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ProcessingError::InvalidTimestamp(format!(
            "Invalid time field: '{}'",
            time
        )));
    }

    let date = NaiveDate::parse_from_str(date, "%Y%m%d").map_err(|_| {
        ProcessingError::InvalidTimestamp(format!("Invalid date field: '{}'", date))
    })?;

    let time = NaiveTime::parse_from_str(time, "%H%M").map_err(|_| {
        ProcessingError::InvalidTimestamp(format!("Invalid time field: '{}'", time))
    })?;

    Ok(NaiveDateTime::new(date, time))
}

/// Parse a sentinel-coded integer field. The sentinel value and absent or
/// empty trailing fields (older records) map to `None`; anything else that
/// fails to parse is an error for the caller to flag.
pub fn parse_numeric(raw: Option<&str>, sentinel: i32) -> Result<Option<i32>> {
    let raw = match raw {
        Some(v) if !v.trim().is_empty() => v.trim(),
        _ => return Ok(None),
    };

    let value = raw
        .parse::<i32>()
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid numeric field: '{}'", raw)))?;

    if value == sentinel {
        Ok(None)
    } else {
        Ok(Some(value))
    }
}
