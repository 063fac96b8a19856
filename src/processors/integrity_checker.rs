//! Post-parse integrity checks across the storm and observation tables.

use std::collections::HashSet;

use serde::Serialize;

use crate::parsers::{Anomaly, ParseOutcome};

/// Aggregated results of one integrity pass, serializable for the `validate
/// --json` output.
#[derive(Debug, Clone, Serialize)]
pub struct IntegrityReport {
    pub total_storms: usize,
    pub total_observations: usize,
    /// Storms whose block produced no usable track points.
    pub storms_without_path: usize,
    /// Observations whose storm_id matches no storm row. Should always be
    /// zero; a non-zero value indicates a parser defect.
    pub orphan_observations: usize,
    pub anomalies: Vec<Anomaly>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.orphan_observations == 0 && self.anomalies.is_empty()
    }
}

pub struct IntegrityChecker;

impl IntegrityChecker {
    pub fn new() -> Self {
        Self
    }

    pub fn check(&self, outcome: &ParseOutcome) -> IntegrityReport {
        let storm_ids: HashSet<&str> = outcome.storms.iter().map(|s| s.storm_id.as_str()).collect();

        let orphan_observations = outcome
            .observations
            .iter()
            .filter(|o| !storm_ids.contains(o.storm_id.as_str()))
            .count();

        let storms_without_path = outcome
            .storms
            .iter()
            .filter(|s| s.path_geo.is_none())
            .count();

        IntegrityReport {
            total_storms: outcome.storms.len(),
            total_observations: outcome.observations.len(),
            storms_without_path,
            orphan_observations,
            anomalies: outcome.report.anomalies.clone(),
        }
    }

    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();
        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Total storms: {}\n", report.total_storms));
        summary.push_str(&format!(
            "Total observations: {}\n",
            report.total_observations
        ));
        summary.push_str(&format!(
            "Storms without path: {}\n",
            report.storms_without_path
        ));
        summary.push_str(&format!(
            "Orphan observations: {}\n",
            report.orphan_observations
        ));
        summary.push_str(&format!("Anomalies: {}\n", report.anomalies.len()));

        if !report.anomalies.is_empty() {
            summary.push_str("\nFirst anomalies:\n");
            for anomaly in report.anomalies.iter().take(10) {
                summary.push_str(&format!("  - {:?}\n", anomaly));
            }
            if report.anomalies.len() > 10 {
                summary.push_str(&format!(
                    "  ... and {} more\n",
                    report.anomalies.len() - 10
                ));
            }
        }

        if report.is_clean() {
            summary.push_str("\nStatus: CLEAN\n");
        } else {
            summary.push_str("\nStatus: ANOMALIES DETECTED\n");
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::Hurdat2Parser;

    fn sample_outcome() -> ParseOutcome {
        let lines = [
            "AL092021,                IDA,      2,",
            "20210827, 0000,  , TS, 16.4N,  78.7W,  35, 1006,",
            "20210827, 0600,  , TS, 16.8N,  79.6W,  40, 1004,",
        ];
        Hurdat2Parser::new()
            .parse_lines(lines.iter().copied(), "test")
            .unwrap()
    }

    #[test]
    fn test_clean_outcome() {
        let outcome = sample_outcome();
        let report = IntegrityChecker::new().check(&outcome);

        assert_eq!(report.total_storms, 1);
        assert_eq!(report.total_observations, 2);
        assert_eq!(report.storms_without_path, 0);
        assert_eq!(report.orphan_observations, 0);
        assert!(report.is_clean());
    }

    #[test]
    fn test_summary_mentions_status() {
        let outcome = sample_outcome();
        let checker = IntegrityChecker::new();
        let summary = checker.generate_summary(&checker.check(&outcome));

        assert!(summary.contains("Total storms: 1"));
        assert!(summary.contains("Total observations: 2"));
        assert!(summary.contains("Status: CLEAN"));
    }

    #[test]
    fn test_anomalies_flow_into_report() {
        let lines = [
            "AL092021,                IDA,      5,",
            "20210827, 0000,  , TS, 16.4N,  78.7W,  35, 1006,",
        ];
        let outcome = Hurdat2Parser::new()
            .parse_lines(lines.iter().copied(), "test")
            .unwrap();

        let checker = IntegrityChecker::new();
        let report = checker.check(&outcome);
        assert!(!report.is_clean());
        assert_eq!(report.anomalies.len(), 1);

        let summary = checker.generate_summary(&report);
        assert!(summary.contains("Status: ANOMALIES DETECTED"));
        assert!(summary.contains("CountMismatch"));
    }
}
