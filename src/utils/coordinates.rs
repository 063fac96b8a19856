use crate::error::{ProcessingError, Result};

/// Parse a hemisphere-suffixed latitude field, e.g. "28.0N" -> 28.0,
/// "18.4S" -> -18.4.
pub fn parse_latitude(value: &str) -> Result<f64> {
    parse_hemisphere(value, 'N', 'S')
}

/// Parse a hemisphere-suffixed longitude field, e.g. "66.1E" -> 66.1,
/// "94.8W" -> -94.8.
pub fn parse_longitude(value: &str) -> Result<f64> {
    parse_hemisphere(value, 'E', 'W')
}

/// Numeric magnitude plus trailing hemisphere letter; the negative hemisphere
/// flips the sign.
fn parse_hemisphere(value: &str, positive: char, negative: char) -> Result<f64> {
    let trimmed = value.trim();

    let (magnitude, hemisphere) = match trimmed.char_indices().last() {
        Some((idx, c)) if c == positive || c == negative => (&trimmed[..idx], c),
        _ => {
            return Err(ProcessingError::InvalidCoordinate(format!(
                "'{}' missing hemisphere suffix ({} or {})",
                value, positive, negative
            )))
        }
    };

    let degrees = magnitude.trim().parse::<f64>().map_err(|_| {
        ProcessingError::InvalidCoordinate(format!("Invalid coordinate magnitude: '{}'", value))
    })?;

    if hemisphere == negative {
        Ok(-degrees)
    } else {
        Ok(degrees)
    }
}
