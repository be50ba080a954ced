//! Storage backends behind the incident facade.
//!
//! Callers see only [`IncidentRepository`]: failures never escape it. Reads
//! that fail come back empty and writes that fail return `false`, with the
//! cause logged.

use std::path::PathBuf;
use std::sync::{Mutex, PoisonError};

use hotline_incident_models::IncidentRecord;
use hotline_query::IncidentFilter;
use hotline_store::{RecordStore, StoreConfig};

/// Persistence for incident reports.
pub trait IncidentRepository: Send + Sync {
    /// Every stored record in storage order. The returned collection is an
    /// independent copy.
    fn load_all(&self) -> Vec<IncidentRecord>;

    /// Persists one record, returning whether it was stored.
    fn save(&self, record: &IncidentRecord) -> bool;

    /// Records passing the given filters, in storage order.
    ///
    /// See [`IncidentFilter::from_inputs`] for how each input is read.
    fn filtered(
        &self,
        incident_type: Option<&str>,
        status: Option<&str>,
        location: Option<&str>,
        search: Option<&str>,
    ) -> Vec<IncidentRecord> {
        IncidentFilter::from_inputs(incident_type, status, location, search).apply(&self.load_all())
    }
}

/// [`IncidentRepository`] backed by a file on disk.
#[derive(Debug, Clone)]
pub struct FileIncidentRepository {
    store: RecordStore<IncidentRecord>,
}

impl FileIncidentRepository {
    /// Repository over the file at `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            store: RecordStore::new(path),
        }
    }

    /// Repository over the configured incident file.
    #[must_use]
    pub fn from_config(config: &StoreConfig) -> Self {
        Self::new(config.incidents_path())
    }

    /// The underlying store.
    #[must_use]
    pub const fn store(&self) -> &RecordStore<IncidentRecord> {
        &self.store
    }
}

impl IncidentRepository for FileIncidentRepository {
    fn load_all(&self) -> Vec<IncidentRecord> {
        self.store.load_all().unwrap_or_else(|e| {
            log::error!("Failed to load incidents: {e}");
            Vec::new()
        })
    }

    fn save(&self, record: &IncidentRecord) -> bool {
        match self.store.append(record) {
            Ok(()) => true,
            Err(e) => {
                log::error!("Failed to save incident: {e}");
                false
            }
        }
    }
}

/// In-memory [`IncidentRepository`] for tests and previews.
#[derive(Debug, Default)]
pub struct MemoryIncidentRepository {
    records: Mutex<Vec<IncidentRecord>>,
    reject_writes: bool,
}

impl MemoryIncidentRepository {
    /// Empty repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-filled with `records`.
    #[must_use]
    pub fn with_records(records: Vec<IncidentRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            reject_writes: false,
        }
    }

    /// Repository whose [`IncidentRepository::save`] always fails, as if
    /// the backing file were not writable.
    #[must_use]
    pub fn rejecting_writes() -> Self {
        Self {
            records: Mutex::default(),
            reject_writes: true,
        }
    }
}

impl IncidentRepository for MemoryIncidentRepository {
    fn load_all(&self) -> Vec<IncidentRecord> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn save(&self, record: &IncidentRecord) -> bool {
        if self.reject_writes {
            log::error!("Failed to save incident: repository is read-only");
            return false;
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(record.clone());
        true
    }
}

#[cfg(test)]
mod tests {
    use hotline_query::NO_FILTER;

    use super::*;

    fn incident(kind: &str, status: &str) -> IncidentRecord {
        IncidentRecord::new(kind, "Downtown", "Smoke seen", "Juan Dela Cruz", "09123456789")
            .with_status(status)
    }

    fn exercise(repository: &dyn IncidentRepository) {
        assert!(repository.load_all().is_empty());
        assert!(
            repository
                .filtered(Some(NO_FILTER), Some(NO_FILTER), Some(NO_FILTER), Some(""))
                .is_empty()
        );

        let fire = incident("Fire", "Pending");
        let flood = incident("Flood", "Responding");
        assert!(repository.save(&fire));
        assert!(repository.save(&flood));

        assert_eq!(repository.load_all(), vec![fire.clone(), flood]);
        assert_eq!(
            repository.filtered(Some("Fire"), Some(NO_FILTER), Some(NO_FILTER), Some("")),
            vec![fire.clone()]
        );
        assert_eq!(
            repository.filtered(None, Some("Pending"), None, None),
            vec![fire]
        );
    }

    #[test]
    fn file_and_memory_variants_share_one_contract() {
        let dir = tempfile::tempdir().unwrap();
        exercise(&FileIncidentRepository::new(dir.path().join("incidents.jsonl")));
        exercise(&MemoryIncidentRepository::new());
    }

    #[test]
    fn loaded_collection_is_an_independent_copy() {
        let repository = MemoryIncidentRepository::with_records(vec![incident("Fire", "Pending")]);

        let mut copy = repository.load_all();
        copy[0].status = "Resolved".to_string();
        copy.clear();

        assert_eq!(repository.load_all()[0].status, "Pending");
    }

    #[test]
    fn unreadable_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        // Directory in place of the file.
        let repository = FileIncidentRepository::new(dir.path());

        assert!(repository.load_all().is_empty());
        assert!(!repository.save(&incident("Fire", "Pending")));
    }

    #[test]
    fn rejecting_memory_repository_stores_nothing() {
        let repository = MemoryIncidentRepository::rejecting_writes();

        assert!(!repository.save(&incident("Fire", "Pending")));
        assert!(repository.load_all().is_empty());
    }

    #[test]
    fn from_config_uses_incident_file() {
        let config = StoreConfig {
            data_dir: PathBuf::from("/srv/hotline"),
            ..StoreConfig::default()
        };
        assert_eq!(
            FileIncidentRepository::from_config(&config).store().path(),
            config.incidents_path()
        );
    }
}
