#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Pure filtering over in-memory incident collections.
//!
//! An [`IncidentFilter`] combines three exact-match dimensions (type,
//! status, location) and a free-text search. Every active dimension must
//! match for a record to pass. Nothing here touches the disk or fails.

use std::collections::BTreeSet;

use hotline_incident_models::IncidentRecord;

/// Filter input meaning "do not constrain this dimension".
pub const NO_FILTER: &str = "[None]";

/// One exact-match filter dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum FilterValue {
    /// Every value passes.
    #[default]
    Any,
    /// Only values equal to this one, ignoring case, pass.
    Exactly(String),
}

impl FilterValue {
    /// Interprets a raw filter input. [`NO_FILTER`] and `None` mean
    /// [`Self::Any`]; anything else, including the empty string, is an
    /// exact match target.
    #[must_use]
    pub fn parse(raw: Option<&str>) -> Self {
        match raw {
            None | Some(NO_FILTER) => Self::Any,
            Some(value) => Self::Exactly(value.to_string()),
        }
    }

    /// Whether `value` passes this filter.
    #[must_use]
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Self::Any => true,
            Self::Exactly(target) => eq_ignore_case(value, target),
        }
    }
}

impl From<Option<&str>> for FilterValue {
    fn from(raw: Option<&str>) -> Self {
        Self::parse(raw)
    }
}

/// A conjunction of filters over [`IncidentRecord`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncidentFilter {
    /// Exact match on `incident_type`.
    pub incident_type: FilterValue,
    /// Exact match on `status`.
    pub status: FilterValue,
    /// Exact match on `location`.
    pub location: FilterValue,
    /// Case-insensitive substring over [`IncidentRecord::search_text`].
    /// `None` when the search box is empty or whitespace.
    pub search: Option<String>,
}

impl IncidentFilter {
    /// Builds a filter from raw UI inputs.
    ///
    /// Each of the first three arguments may be `None` or [`NO_FILTER`] to
    /// leave that dimension open. A `search` that is empty or only
    /// whitespace matches everything.
    #[must_use]
    pub fn from_inputs(
        incident_type: Option<&str>,
        status: Option<&str>,
        location: Option<&str>,
        search: Option<&str>,
    ) -> Self {
        let search = search
            .filter(|text| !text.trim().is_empty())
            .map(str::to_lowercase);

        Self {
            incident_type: FilterValue::parse(incident_type),
            status: FilterValue::parse(status),
            location: FilterValue::parse(location),
            search,
        }
    }

    /// Whether every dimension is open.
    #[must_use]
    pub fn is_unconstrained(&self) -> bool {
        self.incident_type == FilterValue::Any
            && self.status == FilterValue::Any
            && self.location == FilterValue::Any
            && self.search.is_none()
    }

    /// Whether `record` passes every active dimension.
    #[must_use]
    pub fn matches(&self, record: &IncidentRecord) -> bool {
        self.incident_type.matches(&record.incident_type)
            && self.status.matches(&record.status)
            && self.location.matches(&record.location)
            && self.search.as_deref().is_none_or(|needle| {
                record.search_text().to_lowercase().contains(needle)
            })
    }

    /// Returns the records that pass, in their original order.
    #[must_use]
    pub fn apply(&self, records: &[IncidentRecord]) -> Vec<IncidentRecord> {
        records
            .iter()
            .filter(|record| self.matches(record))
            .cloned()
            .collect()
    }
}

/// Distinct non-empty locations in first-seen order, compared ignoring
/// case. Used to populate a location filter.
#[must_use]
pub fn distinct_locations(records: &[IncidentRecord]) -> Vec<String> {
    let mut seen = Vec::new();
    let mut keys = BTreeSet::new();

    for record in records {
        let location = record.location.trim();
        if location.is_empty() {
            continue;
        }
        if keys.insert(location.to_lowercase()) {
            seen.push(location.to_string());
        }
    }

    seen
}

fn eq_ignore_case(a: &str, b: &str) -> bool {
    a.eq_ignore_ascii_case(b) || a.to_lowercase() == b.to_lowercase()
}
