//! Plain-text rendering for terminal output.

use std::fmt::Write as _;

use hotline_incident_models::{
    IncidentRecord, IncidentStatistics, IncidentStatus, IncidentType, LocationCount,
};
use serde::Serialize;

/// JSON shape of the `stats` command.
#[derive(Debug, Serialize)]
pub struct StatsReport {
    /// Bucket counts.
    pub statistics: IncidentStatistics,
    /// Per-location counts, busiest first.
    pub locations: Vec<LocationCount>,
}

/// Shortens `text` to at most `max` characters, marking the cut with `...`.
#[must_use]
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}

/// One row per incident under a header.
#[must_use]
pub fn incident_table(records: &[IncidentRecord]) -> String {
    let mut out = String::new();

    let _ = writeln!(
        out,
        "{:<26} {:<10} {:<11} {:<20} {:<20} DESCRIPTION",
        "DATE", "TYPE", "STATUS", "LOCATION", "REPORTER"
    );
    let _ = writeln!(out, "{}", "-".repeat(120));

    for record in records {
        let description = record.description.replace(['\r', '\n'], " ");
        let _ = writeln!(
            out,
            "{:<26} {:<10} {:<11} {:<20} {:<20} {}",
            truncate(&record.created_at, 26),
            truncate(&record.incident_type, 10),
            truncate(&record.status, 11),
            truncate(&record.location, 20),
            truncate(&record.reporter_name, 20),
            truncate(&description, 40),
        );
    }

    out
}

/// Status, type and location breakdown.
#[must_use]
pub fn statistics_report(stats: &IncidentStatistics, locations: &[LocationCount]) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "Total incidents: {}", stats.total);

    let _ = writeln!(out, "\nBy status:");
    for status in IncidentStatus::all() {
        let _ = writeln!(out, "  {:<12} {}", status.to_string(), stats.status_count(*status));
    }
    if stats.unmatched_status() > 0 {
        let _ = writeln!(out, "  {:<12} {}", "(other)", stats.unmatched_status());
    }

    let _ = writeln!(out, "\nBy type:");
    for incident_type in IncidentType::all() {
        let _ = writeln!(
            out,
            "  {:<12} {}",
            incident_type.to_string(),
            stats.type_count(*incident_type)
        );
    }
    if stats.unmatched_type() > 0 {
        let _ = writeln!(out, "  {:<12} {}", "(other)", stats.unmatched_type());
    }

    if !locations.is_empty() {
        let _ = writeln!(out, "\nBy location:");
        for entry in locations {
            let _ = writeln!(out, "  {:<24} {}", truncate(&entry.location, 24), entry.count);
        }
    }

    out
}
