use chrono::Local;

/// Default output filename for the storms table,
/// e.g. `hurdat2-atlantic-storms-240115.parquet`.
pub fn generate_storms_filename(stem: &str) -> String {
    format!("{}-storms-{}.parquet", stem, Local::now().format("%y%m%d"))
}

/// Default output filename for the track-points table.
pub fn generate_points_filename(stem: &str) -> String {
    format!("{}-points-{}.parquet", stem, Local::now().format("%y%m%d"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filenames_carry_stem_and_suffix() {
        let storms = generate_storms_filename("atlantic");
        assert!(storms.starts_with("atlantic-storms-"));
        assert!(storms.ends_with(".parquet"));

        let points = generate_points_filename("atlantic");
        assert!(points.starts_with("atlantic-points-"));
        assert!(points.ends_with(".parquet"));
    }
}
