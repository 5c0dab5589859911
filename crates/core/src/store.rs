//! The patient document store.
//!
//! Admission documents are stored as JSON files in a sharded directory
//! structure under the configured patient data directory:
//!
//! ```text
//! records/
//!   <s1>/
//!     <s2>/
//!       <id>/
//!         record.json
//! ```
//!
//! where `s1` and `s2` are the first four hex characters of the record
//! identifier, keeping per-directory fan-out small as the collection grows.
//!
//! [`PatientStore`] is an explicitly constructed handle: it is opened once at
//! process startup from a [`CoreConfig`] and passed into whatever needs it
//! (HTTP state, CLI commands, tests). There is no global connection state.
//!
//! ## Uniqueness
//!
//! The admission number (`AN`) is unique across the collection. The store
//! enforces this with an explicit pre-check on insert and on updates that
//! change the AN; a violation surfaces as [`HprError::DuplicateAn`].
//!
//! ## Pure data operations
//!
//! This module contains **only** data operations. Response envelopes, status
//! codes, and HTTP concerns belong in `api-rest`.

use crate::config::CoreConfig;
use crate::error::{HprError, HprResult};
use crate::record::{PatientInput, PatientRecord};
use chrono::{NaiveDate, Utc};
use hpr_uuid::RecordId;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the document file inside each record directory.
pub const RECORD_FILE_NAME: &str = "record.json";

/// Optional query predicates for [`PatientStore::list`]. All provided
/// predicates must match (conjunction).
#[derive(Clone, Debug, Default)]
pub struct RecordFilter {
    /// Exact admission number.
    pub an: Option<String>,
    /// Case-insensitive substring of the patient name.
    pub name: Option<String>,
    /// Exact principal diagnosis code.
    pub pdx: Option<String>,
    /// Exact DRG code.
    pub drg: Option<String>,
    /// Admitted on or after this date.
    pub admitted_on_or_after: Option<NaiveDate>,
}

impl RecordFilter {
    /// True when every provided predicate matches the record.
    pub fn matches(&self, record: &PatientRecord) -> bool {
        if let Some(an) = &self.an {
            if &record.an != an {
                return false;
            }
        }
        if let Some(name) = &self.name {
            if !record
                .name
                .to_lowercase()
                .contains(&name.to_lowercase())
            {
                return false;
            }
        }
        if let Some(pdx) = &self.pdx {
            if record.pdx.as_deref() != Some(pdx.as_str()) {
                return false;
            }
        }
        if let Some(drg) = &self.drg {
            if record.drg.as_deref() != Some(drg.as_str()) {
                return false;
            }
        }
        if let Some(cutoff) = self.admitted_on_or_after {
            if record.dateadm < cutoff {
                return false;
            }
        }
        true
    }
}

/// Handle to the sharded patient document collection.
#[derive(Clone, Debug)]
pub struct PatientStore {
    records_dir: PathBuf,
}

impl PatientStore {
    /// Opens the store, creating the records directory if needed.
    ///
    /// Call once at startup and share the handle (`Arc` in server contexts).
    ///
    /// # Errors
    ///
    /// Returns [`HprError::StorageDirCreation`] if the records directory
    /// cannot be created.
    pub fn open(cfg: &CoreConfig) -> HprResult<Self> {
        let records_dir = cfg.records_dir();
        fs::create_dir_all(&records_dir).map_err(HprError::StorageDirCreation)?;
        Ok(Self { records_dir })
    }

    /// Inserts a new admission document.
    ///
    /// Validates the intake fields, enforces AN uniqueness, assigns the
    /// identifier and timestamps, derives the length of stay, and persists
    /// the document. If the write fails partway, the partially created
    /// record directory is removed.
    ///
    /// # Errors
    ///
    /// - [`HprError::Validation`] when required fields are missing/invalid
    /// - [`HprError::DuplicateAn`] when the AN is already taken
    /// - I/O and serialization errors from persisting the document
    pub fn insert(&self, input: PatientInput) -> HprResult<PatientRecord> {
        let record = PatientRecord::from_input(RecordId::new(), input, Utc::now())?;

        if self.fetch_by_an(&record.an)?.is_some() {
            return Err(HprError::DuplicateAn);
        }

        let record_dir = record.id.sharded_dir(&self.records_dir);
        fs::create_dir_all(&record_dir).map_err(HprError::RecordDirCreation)?;

        if let Err(insert_error) = write_document(&record_dir, &record) {
            return Err(match fs::remove_dir_all(&record_dir) {
                Ok(()) => insert_error,
                Err(cleanup_error) => HprError::CleanupAfterInsertFailed {
                    path: record_dir,
                    insert_error: Box::new(insert_error),
                    cleanup_error,
                },
            });
        }

        Ok(record)
    }

    /// Fetches a record by identifier. `Ok(None)` when absent.
    pub fn fetch(&self, id: &RecordId) -> HprResult<Option<PatientRecord>> {
        let path = id.sharded_dir(&self.records_dir).join(RECORD_FILE_NAME);
        if !path.is_file() {
            return Ok(None);
        }
        read_document(&path).map(Some)
    }

    /// Fetches a record by admission number. `Ok(None)` when absent.
    pub fn fetch_by_an(&self, an: &str) -> HprResult<Option<PatientRecord>> {
        let filter = RecordFilter {
            an: Some(an.to_owned()),
            ..Default::default()
        };
        Ok(self.list(&filter)?.into_iter().next())
    }

    /// Merges a partial document into an existing record.
    ///
    /// Returns `Ok(None)` when no record has the given identifier. When the
    /// patch changes the AN, uniqueness is re-checked against the rest of
    /// the collection.
    pub fn update(&self, id: &RecordId, input: PatientInput) -> HprResult<Option<PatientRecord>> {
        let Some(mut record) = self.fetch(id)? else {
            return Ok(None);
        };

        let previous_an = record.an.clone();
        record.apply(input, Utc::now())?;

        if record.an != previous_an {
            if let Some(existing) = self.fetch_by_an(&record.an)? {
                if existing.id != record.id {
                    return Err(HprError::DuplicateAn);
                }
            }
        }

        let record_dir = record.id.sharded_dir(&self.records_dir);
        write_document(&record_dir, &record)?;
        Ok(Some(record))
    }

    /// Deletes a record. Returns whether a document existed.
    pub fn delete(&self, id: &RecordId) -> HprResult<bool> {
        let record_dir = id.sharded_dir(&self.records_dir);
        if !record_dir.join(RECORD_FILE_NAME).is_file() {
            return Ok(false);
        }
        fs::remove_dir_all(&record_dir).map_err(HprError::FileDelete)?;
        Ok(true)
    }

    /// Lists every record matching the filter, ordered by creation instant
    /// (then identifier, for a stable tie-break).
    ///
    /// Documents that fail to parse are logged as warnings and skipped so
    /// one corrupt file cannot take down the whole listing.
    pub fn list(&self, filter: &RecordFilter) -> HprResult<Vec<PatientRecord>> {
        let mut records = Vec::new();

        let s1_iter = match fs::read_dir(&self.records_dir) {
            Ok(it) => it,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(records),
            Err(e) => return Err(HprError::FileRead(e)),
        };

        for s1 in s1_iter.flatten() {
            let s1_path = s1.path();
            if !s1_path.is_dir() {
                continue;
            }

            let s2_iter = match fs::read_dir(&s1_path) {
                Ok(it) => it,
                Err(_) => continue,
            };

            for s2 in s2_iter.flatten() {
                let s2_path = s2.path();
                if !s2_path.is_dir() {
                    continue;
                }

                let id_iter = match fs::read_dir(&s2_path) {
                    Ok(it) => it,
                    Err(_) => continue,
                };

                for id_ent in id_iter.flatten() {
                    let id_path = id_ent.path();
                    if !id_path.is_dir() {
                        continue;
                    }

                    let doc_path = id_path.join(RECORD_FILE_NAME);
                    if !doc_path.is_file() {
                        continue;
                    }

                    match read_document(&doc_path) {
                        Ok(record) => {
                            if filter.matches(&record) {
                                records.push(record);
                            }
                        }
                        Err(e) => {
                            tracing::warn!(
                                "failed to parse record document: {} - {}",
                                doc_path.display(),
                                e
                            );
                        }
                    }
                }
            }
        }

        records.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.id.to_string().cmp(&b.id.to_string()))
        });
        Ok(records)
    }
}

fn write_document(record_dir: &Path, record: &PatientRecord) -> HprResult<()> {
    let json = serde_json::to_string_pretty(record).map_err(HprError::Serialization)?;
    fs::write(record_dir.join(RECORD_FILE_NAME), json).map_err(HprError::FileWrite)
}

fn read_document(path: &Path) -> HprResult<PatientRecord> {
    let contents = fs::read_to_string(path).map_err(HprError::FileRead)?;
    serde_json::from_str(&contents).map_err(HprError::Deserialization)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn test_store() -> (PatientStore, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::new(temp_dir.path().to_path_buf());
        let store = PatientStore::open(&cfg).expect("open should succeed");
        (store, temp_dir)
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn admission(an: &str, name: &str) -> PatientInput {
        PatientInput {
            an: Some(an.to_owned()),
            name: Some(name.to_owned()),
            dob: Some(date(1975, 3, 12)),
            sex: Some("F".to_owned()),
            dateadm: Some(date(2024, 1, 20)),
            ..Default::default()
        }
    }

    #[test]
    fn insert_then_fetch_round_trips() {
        let (store, _dir) = test_store();

        let mut input = admission("AN000101", "Alice Carter");
        input.pdx = Some("I21.9".to_owned());
        input.rw = Some(1.5432);

        let created = store.insert(input).unwrap();
        let fetched = store.fetch(&created.id).unwrap().expect("record should exist");
        assert_eq!(fetched, created);

        let by_an = store
            .fetch_by_an("AN000101")
            .unwrap()
            .expect("record should be findable by AN");
        assert_eq!(by_an.id, created.id);
        assert_eq!(by_an.pdx.as_deref(), Some("I21.9"));
    }

    #[test]
    fn insert_rejects_duplicate_an() {
        let (store, _dir) = test_store();

        store.insert(admission("AN000101", "Alice Carter")).unwrap();
        let err = store
            .insert(admission("AN000101", "Bob Doyle"))
            .expect_err("duplicate AN should be rejected");
        assert!(matches!(err, HprError::DuplicateAn));

        let all = store.list(&RecordFilter::default()).unwrap();
        assert_eq!(all.len(), 1, "failed insert should not leave a document");
    }

    #[test]
    fn insert_rejects_invalid_input_without_writing() {
        let (store, _dir) = test_store();

        let err = store
            .insert(PatientInput::default())
            .expect_err("empty input should fail validation");
        assert!(matches!(err, HprError::Validation(_)));
        assert!(store.list(&RecordFilter::default()).unwrap().is_empty());
    }

    #[test]
    fn fetch_unknown_id_returns_none() {
        let (store, _dir) = test_store();
        assert!(store.fetch(&RecordId::new()).unwrap().is_none());
        assert!(store.fetch_by_an("AN999999").unwrap().is_none());
    }

    #[test]
    fn update_merges_and_persists() {
        let (store, _dir) = test_store();
        let created = store.insert(admission("AN000101", "Alice Carter")).unwrap();

        let patch = PatientInput {
            pdx: Some("J18.9".to_owned()),
            datedsc: Some(date(2024, 1, 24)),
            ..Default::default()
        };
        let updated = store
            .update(&created.id, patch)
            .unwrap()
            .expect("record should exist");

        assert_eq!(updated.pdx.as_deref(), Some("J18.9"));
        assert_eq!(updated.lengthofstay, Some(4), "LOS should be derived on save");

        let fetched = store.fetch(&created.id).unwrap().unwrap();
        assert_eq!(fetched, updated);
    }

    #[test]
    fn update_unknown_id_returns_none() {
        let (store, _dir) = test_store();
        let result = store.update(&RecordId::new(), PatientInput::default()).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn update_rejects_an_collision() {
        let (store, _dir) = test_store();
        store.insert(admission("AN000101", "Alice Carter")).unwrap();
        let second = store.insert(admission("AN000102", "Bob Doyle")).unwrap();

        let patch = PatientInput {
            an: Some("AN000101".to_owned()),
            ..Default::default()
        };
        let err = store
            .update(&second.id, patch)
            .expect_err("AN collision should be rejected");
        assert!(matches!(err, HprError::DuplicateAn));
    }

    #[test]
    fn update_keeping_own_an_is_allowed() {
        let (store, _dir) = test_store();
        let created = store.insert(admission("AN000101", "Alice Carter")).unwrap();

        let patch = PatientInput {
            an: Some("AN000101".to_owned()),
            name: Some("Alice B. Carter".to_owned()),
            ..Default::default()
        };
        let updated = store.update(&created.id, patch).unwrap().unwrap();
        assert_eq!(updated.name, "Alice B. Carter");
    }

    #[test]
    fn delete_removes_the_document() {
        let (store, _dir) = test_store();
        let created = store.insert(admission("AN000101", "Alice Carter")).unwrap();

        assert!(store.delete(&created.id).unwrap());
        assert!(store.fetch(&created.id).unwrap().is_none());
        assert!(!store.delete(&created.id).unwrap(), "second delete finds nothing");
    }

    #[test]
    fn list_applies_filters() {
        let (store, _dir) = test_store();

        let mut a = admission("AN000101", "Alice Carter");
        a.pdx = Some("I21.9".to_owned());
        a.drg = Some("280".to_owned());
        store.insert(a).unwrap();

        let mut b = admission("AN000102", "Bob Doyle");
        b.pdx = Some("J18.9".to_owned());
        b.dateadm = Some(date(2024, 2, 5));
        store.insert(b).unwrap();

        let all = store.list(&RecordFilter::default()).unwrap();
        assert_eq!(all.len(), 2);

        let by_an = RecordFilter {
            an: Some("AN000102".to_owned()),
            ..Default::default()
        };
        assert_eq!(store.list(&by_an).unwrap().len(), 1);

        let by_name = RecordFilter {
            name: Some("alice".to_owned()),
            ..Default::default()
        };
        let found = store.list(&by_name).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Alice Carter");

        let by_pdx = RecordFilter {
            pdx: Some("I21.9".to_owned()),
            ..Default::default()
        };
        assert_eq!(store.list(&by_pdx).unwrap().len(), 1);

        let by_drg = RecordFilter {
            drg: Some("280".to_owned()),
            ..Default::default()
        };
        assert_eq!(store.list(&by_drg).unwrap().len(), 1);

        let by_date = RecordFilter {
            admitted_on_or_after: Some(date(2024, 2, 1)),
            ..Default::default()
        };
        let recent = store.list(&by_date).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0].an, "AN000102");
    }

    #[test]
    fn list_skips_unparsable_documents() {
        let (store, dir) = test_store();
        store.insert(admission("AN000101", "Alice Carter")).unwrap();

        // Plant a corrupt document alongside the valid one.
        let rogue_id = RecordId::new();
        let rogue_dir = rogue_id.sharded_dir(&dir.path().join("records"));
        fs::create_dir_all(&rogue_dir).unwrap();
        fs::write(rogue_dir.join(RECORD_FILE_NAME), "{ not json").unwrap();

        let all = store.list(&RecordFilter::default()).unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].an, "AN000101");
    }

    #[test]
    fn list_on_missing_records_dir_is_empty() {
        let temp_dir = TempDir::new().unwrap();
        let store = PatientStore {
            records_dir: temp_dir.path().join("never-created"),
        };
        assert!(store.list(&RecordFilter::default()).unwrap().is_empty());
    }
}
