#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Summary statistics over incident collections.
//!
//! Both reductions are single passes over an in-memory slice and never
//! fail. Status and type buckets match case-insensitively; unknown values
//! only count toward the total.

use std::collections::BTreeMap;

use hotline_incident_models::{IncidentRecord, IncidentStatistics, LocationCount};

/// Counts records per status and type bucket.
#[must_use]
pub fn calculate_statistics(records: &[IncidentRecord]) -> IncidentStatistics {
    let mut stats = IncidentStatistics::default();
    for record in records {
        stats.record(record);
    }
    stats
}

/// Incident counts per location, most incidents first (ties by name).
///
/// Locations are grouped ignoring case and surrounding whitespace; each
/// group is labelled with the first spelling seen. Records without a
/// location are left out.
#[must_use]
pub fn location_counts(records: &[IncidentRecord]) -> Vec<LocationCount> {
    let mut groups: BTreeMap<String, usize> = BTreeMap::new();
    let mut counts: Vec<LocationCount> = Vec::new();

    for record in records {
        let location = record.location.trim();
        if location.is_empty() {
            continue;
        }

        let index = *groups
            .entry(location.to_lowercase())
            .or_insert_with(|| {
                counts.push(LocationCount {
                    location: location.to_string(),
                    count: 0,
                });
                counts.len() - 1
            });
        counts[index].count += 1;
    }

    counts.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.location.cmp(&b.location))
    });
    counts
}
