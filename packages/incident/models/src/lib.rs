#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident report record types and the status/type taxonomy.
//!
//! An [`IncidentRecord`] keeps its `status` and `incident_type` as free text
//! exactly as they were submitted or read from disk. The known values are
//! modelled by [`IncidentStatus`] and [`IncidentType`], which are used to
//! bucket records for [`IncidentStatistics`] and to populate filter choices.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// `chrono` format string for [`IncidentRecord::created_at`]
/// (e.g. `"March 04, 2025 09:15 PM"`).
pub const CREATED_AT_FORMAT: &str = "%B %d, %Y %I:%M %p";

/// Alternate spelling of [`IncidentType::Medical`] offered by the report form.
pub const MEDICAL_EMERGENCY_LABEL: &str = "Medical Emergency";

/// Lifecycle status of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Default,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum IncidentStatus {
    /// Reported, nobody dispatched yet. The default for new reports.
    #[default]
    Pending,
    /// Responders are on the way or on site.
    Responding,
    /// Closed out.
    Resolved,
}

impl IncidentStatus {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Pending, Self::Responding, Self::Resolved]
    }

    /// Matches free-text status against the known statuses, ignoring case.
    ///
    /// Returns `None` for anything unrecognized (including empty text).
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(raw).ok()
    }
}

/// Category of a reported incident.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[strum(ascii_case_insensitive)]
pub enum IncidentType {
    /// Structure, vehicle, or grass fires
    Fire,
    /// Flooding and storm surge
    Flood,
    /// Road and workplace accidents
    Accident,
    /// Crimes in progress or just committed
    Crime,
    /// Medical emergencies
    Medical,
}

impl IncidentType {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[
            Self::Fire,
            Self::Flood,
            Self::Accident,
            Self::Crime,
            Self::Medical,
        ]
    }

    /// Matches free-text type against the known types, ignoring case.
    ///
    /// `"Medical Emergency"` is *not* recognized here: it only collapses into
    /// [`Self::Medical`] through [`normalize_incident_type`] at submission time.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::from_str(raw).ok()
    }
}

/// Maps the report form's `"Medical Emergency"` label to `"Medical"`.
///
/// Every other value is returned unchanged. Applied when a report is
/// submitted, never when records are read back, so older records written
/// with the long label keep it.
#[must_use]
pub fn normalize_incident_type(raw: &str) -> String {
    if raw == MEDICAL_EMERGENCY_LABEL {
        IncidentType::Medical.to_string()
    } else {
        raw.to_string()
    }
}

/// Returns the current local time formatted with [`CREATED_AT_FORMAT`].
#[must_use]
pub fn now_timestamp() -> String {
    chrono::Local::now().format(CREATED_AT_FORMAT).to_string()
}

/// A single incident report.
///
/// Field names on disk follow the historical file layout (`type`,
/// `reporter`, `contact`, `date`). Keys missing from stored data decode to
/// empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IncidentRecord {
    /// Free-text category, e.g. `"Fire"`.
    #[serde(rename = "type")]
    pub incident_type: String,
    /// Free-text location (barangay name in practice).
    pub location: String,
    /// Free-text, possibly multi-line description.
    pub description: String,
    /// Name of the person who filed the report.
    #[serde(rename = "reporter")]
    pub reporter_name: String,
    /// Contact number of the reporter.
    #[serde(rename = "contact")]
    pub reporter_contact: String,
    /// Free-text status, normally one of [`IncidentStatus`].
    pub status: String,
    /// Creation timestamp formatted with [`CREATED_AT_FORMAT`].
    #[serde(rename = "date")]
    pub created_at: String,
}

impl IncidentRecord {
    /// Creates a new report with status [`IncidentStatus::Pending`] and the
    /// current local time as `created_at`.
    #[must_use]
    pub fn new(
        incident_type: impl Into<String>,
        location: impl Into<String>,
        description: impl Into<String>,
        reporter_name: impl Into<String>,
        reporter_contact: impl Into<String>,
    ) -> Self {
        Self {
            incident_type: incident_type.into(),
            location: location.into(),
            description: description.into(),
            reporter_name: reporter_name.into(),
            reporter_contact: reporter_contact.into(),
            status: IncidentStatus::default().to_string(),
            created_at: now_timestamp(),
        }
    }

    /// Replaces the status.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = status.into();
        self
    }

    /// Replaces the creation timestamp.
    #[must_use]
    pub fn with_created_at(mut self, created_at: impl Into<String>) -> Self {
        self.created_at = created_at.into();
        self
    }

    /// The known status this record falls into, if any.
    #[must_use]
    pub fn status_bucket(&self) -> Option<IncidentStatus> {
        IncidentStatus::parse(&self.status)
    }

    /// The known type this record falls into, if any.
    #[must_use]
    pub fn type_bucket(&self) -> Option<IncidentType> {
        IncidentType::parse(&self.incident_type)
    }

    /// Concatenation of the fields covered by full-text search, in the
    /// order type, location, description, contact, reporter, status.
    #[must_use]
    pub fn search_text(&self) -> String {
        [
            self.incident_type.as_str(),
            self.location.as_str(),
            self.description.as_str(),
            self.reporter_contact.as_str(),
            self.reporter_name.as_str(),
            self.status.as_str(),
        ]
        .concat()
    }
}

/// Summary counts over a collection of [`IncidentRecord`]s.
///
/// Records whose status or type is unrecognized count toward `total` only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncidentStatistics {
    /// Number of records seen.
    pub total: u64,
    /// Records with status `Pending`.
    pub pending: u64,
    /// Records with status `Responding`.
    pub responding: u64,
    /// Records with status `Resolved`.
    pub resolved: u64,
    /// Records of type `Fire`.
    pub fire: u64,
    /// Records of type `Flood`.
    pub flood: u64,
    /// Records of type `Accident`.
    pub accident: u64,
    /// Records of type `Crime`.
    pub crime: u64,
    /// Records of type `Medical`.
    pub medical: u64,
}

impl IncidentStatistics {
    /// Counts one record into the total and its status/type buckets.
    pub fn record(&mut self, incident: &IncidentRecord) {
        self.total += 1;

        match incident.status_bucket() {
            Some(IncidentStatus::Pending) => self.pending += 1,
            Some(IncidentStatus::Responding) => self.responding += 1,
            Some(IncidentStatus::Resolved) => self.resolved += 1,
            None => {}
        }

        match incident.type_bucket() {
            Some(IncidentType::Fire) => self.fire += 1,
            Some(IncidentType::Flood) => self.flood += 1,
            Some(IncidentType::Accident) => self.accident += 1,
            Some(IncidentType::Crime) => self.crime += 1,
            Some(IncidentType::Medical) => self.medical += 1,
            None => {}
        }
    }

    /// Count for one status bucket.
    #[must_use]
    pub const fn status_count(&self, status: IncidentStatus) -> u64 {
        match status {
            IncidentStatus::Pending => self.pending,
            IncidentStatus::Responding => self.responding,
            IncidentStatus::Resolved => self.resolved,
        }
    }

    /// Count for one type bucket.
    #[must_use]
    pub const fn type_count(&self, incident_type: IncidentType) -> u64 {
        match incident_type {
            IncidentType::Fire => self.fire,
            IncidentType::Flood => self.flood,
            IncidentType::Accident => self.accident,
            IncidentType::Crime => self.crime,
            IncidentType::Medical => self.medical,
        }
    }

    /// Records whose status matched no bucket.
    #[must_use]
    pub const fn unmatched_status(&self) -> u64 {
        self.total
            .saturating_sub(self.pending)
            .saturating_sub(self.responding)
            .saturating_sub(self.resolved)
    }

    /// Records whose type matched no bucket.
    #[must_use]
    pub const fn unmatched_type(&self) -> u64 {
        self.total
            .saturating_sub(self.fire)
            .saturating_sub(self.flood)
            .saturating_sub(self.accident)
            .saturating_sub(self.crime)
            .saturating_sub(self.medical)
    }
}

/// Incident count for one location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocationCount {
    /// Location as spelled by the first record seen for it.
    pub location: String,
    /// Number of records at this location.
    pub count: u64,
}
