#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Incident reporting facade.
//!
//! [`IncidentService`] is what front ends talk to. It wraps an
//! [`IncidentRepository`] (file-backed in production, in-memory under test)
//! and adds report submission and filter choices on top.

pub mod report;
pub mod repository;
pub mod validation;

use hotline_incident_models::{IncidentRecord, normalize_incident_type};

pub use report::{ReportForm, SubmitError, ValidationError};
pub use repository::{FileIncidentRepository, IncidentRepository, MemoryIncidentRepository};
pub use validation::{NameValidator, PhoneNumberValidator, Validator};

/// Incident operations over a repository.
pub struct IncidentService<R> {
    repository: R,
    name_validator: Box<dyn Validator>,
    phone_validator: Box<dyn Validator>,
}

impl<R: IncidentRepository> IncidentService<R> {
    /// Service with the standard name and phone validators.
    #[must_use]
    pub fn new(repository: R) -> Self {
        Self::with_validators(
            repository,
            Box::new(NameValidator),
            Box::new(PhoneNumberValidator),
        )
    }

    /// Service with custom validators.
    #[must_use]
    pub fn with_validators(
        repository: R,
        name_validator: Box<dyn Validator>,
        phone_validator: Box<dyn Validator>,
    ) -> Self {
        Self {
            repository,
            name_validator,
            phone_validator,
        }
    }

    /// The wrapped repository.
    #[must_use]
    pub const fn repository(&self) -> &R {
        &self.repository
    }

    /// Every stored incident.
    #[must_use]
    pub fn all_incidents(&self) -> Vec<IncidentRecord> {
        self.repository.load_all()
    }

    /// Stored incidents passing the given filters.
    #[must_use]
    pub fn filtered(
        &self,
        incident_type: Option<&str>,
        status: Option<&str>,
        location: Option<&str>,
        search: Option<&str>,
    ) -> Vec<IncidentRecord> {
        self.repository
            .filtered(incident_type, status, location, search)
    }

    /// Stores a record as-is, without validation.
    #[must_use]
    pub fn save_incident(&self, record: &IncidentRecord) -> bool {
        self.repository.save(record)
    }

    /// Distinct locations among stored incidents, for a location filter.
    #[must_use]
    pub fn locations(&self) -> Vec<String> {
        hotline_query::distinct_locations(&self.repository.load_all())
    }

    /// Validates a report form, then stores it as a new `Pending` incident
    /// stamped with the current time.
    ///
    /// The `"Medical Emergency"` label is stored as `"Medical"`.
    ///
    /// # Errors
    ///
    /// * [`SubmitError::Invalid`] if a field fails validation
    /// * [`SubmitError::SaveFailed`] if the repository did not store it
    pub fn submit_report(&self, form: &ReportForm) -> Result<IncidentRecord, SubmitError> {
        form.validate(self.name_validator.as_ref(), self.phone_validator.as_ref())?;

        let record = IncidentRecord::new(
            normalize_incident_type(&form.incident_type),
            form.location.as_str(),
            form.description.as_str(),
            form.reporter.as_str(),
            form.contact.as_str(),
        );

        if !self.repository.save(&record) {
            return Err(SubmitError::SaveFailed);
        }

        log::info!(
            "Submitted {} report at {}",
            record.incident_type,
            record.location
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use hotline_incident_models::{IncidentStatus, IncidentType};

    use super::*;

    fn form(kind: &str) -> ReportForm {
        ReportForm {
            incident_type: kind.to_string(),
            location: "Downtown".to_string(),
            description: "Smoke from the second floor".to_string(),
            reporter: "Maria Santos".to_string(),
            contact: "0912-345-6789".to_string(),
        }
    }

    struct AcceptAll;

    impl Validator for AcceptAll {
        fn is_valid(&self, _input: &str) -> bool {
            true
        }

        fn error_message(&self) -> &str {
            ""
        }
    }

    #[test]
    fn submitted_report_is_stored_pending() {
        let service = IncidentService::new(MemoryIncidentRepository::new());

        let record = service.submit_report(&form("Fire")).unwrap();

        assert_eq!(record.status, IncidentStatus::Pending.to_string());
        assert_eq!(record.incident_type, "Fire");
        assert_eq!(record.reporter_contact, "0912-345-6789");
        assert!(!record.created_at.is_empty());
        assert_eq!(service.all_incidents(), vec![record]);
    }

    #[test]
    fn medical_emergency_is_stored_and_counted_as_medical() {
        let service = IncidentService::new(MemoryIncidentRepository::new());

        service.submit_report(&form("Medical Emergency")).unwrap();

        let stored = service.all_incidents();
        assert_eq!(stored[0].incident_type, "Medical");
        assert_eq!(
            hotline_analytics::calculate_statistics(&stored).type_count(IncidentType::Medical),
            1
        );
    }

    #[test]
    fn earlier_long_labels_are_not_rewritten() {
        let legacy = IncidentRecord::new(
            "Medical Emergency",
            "Downtown",
            "",
            "Maria Santos",
            "09123456789",
        );
        let service =
            IncidentService::new(MemoryIncidentRepository::with_records(vec![legacy]));

        let stats = hotline_analytics::calculate_statistics(&service.all_incidents());
        assert_eq!(stats.total, 1);
        assert_eq!(stats.medical, 0);
    }

    #[test]
    fn invalid_report_is_not_stored() {
        let service = IncidentService::new(MemoryIncidentRepository::new());
        let mut bad = form("Fire");
        bad.contact = "12345".to_string();

        assert!(matches!(
            service.submit_report(&bad),
            Err(SubmitError::Invalid(ValidationError::InvalidContact(_)))
        ));
        assert!(service.all_incidents().is_empty());
    }

    #[test]
    fn failed_save_is_reported() {
        let service = IncidentService::new(MemoryIncidentRepository::rejecting_writes());

        assert_eq!(
            service.submit_report(&form("Flood")),
            Err(SubmitError::SaveFailed)
        );
    }

    #[test]
    fn custom_validators_replace_defaults() {
        let service = IncidentService::with_validators(
            MemoryIncidentRepository::new(),
            Box::new(AcceptAll),
            Box::new(AcceptAll),
        );
        let mut odd = form("Crime");
        odd.reporter = "R2-D2".to_string();
        odd.contact = "n/a".to_string();

        assert!(service.submit_report(&odd).is_ok());
    }

    #[test]
    fn file_backed_service_persists_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("incident_report.jsonl");

        IncidentService::new(FileIncidentRepository::new(&path))
            .submit_report(&form("Fire"))
            .unwrap();

        let reopened = IncidentService::new(FileIncidentRepository::new(&path));
        let stored = reopened.all_incidents();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].location, "Downtown");
        assert_eq!(reopened.locations(), vec!["Downtown"]);
        assert_eq!(
            reopened
                .filtered(Some("fire"), None, Some("downtown"), Some("second"))
                .len(),
            1
        );
    }
}
