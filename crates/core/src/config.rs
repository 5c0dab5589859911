//! Core runtime configuration.
//!
//! This module defines configuration that should be resolved once at process
//! startup and then passed into core services. The intent is to avoid reading
//! process-wide environment variables during request handling, which can lead
//! to inconsistent behaviour in multi-threaded runtimes and test harnesses.

use std::path::{Path, PathBuf};

/// Default location of the patient data directory when `PATIENT_DATA_DIR`
/// is not set.
pub const DEFAULT_PATIENT_DATA_DIR: &str = "./patient_data";

/// Name of the records subdirectory under the patient data directory.
pub const RECORDS_DIR_NAME: &str = "records";

/// Core configuration resolved at startup.
#[derive(Clone, Debug)]
pub struct CoreConfig {
    patient_data_dir: PathBuf,
}

impl CoreConfig {
    /// Create a new `CoreConfig` rooted at the given patient data directory.
    pub fn new(patient_data_dir: PathBuf) -> Self {
        Self { patient_data_dir }
    }

    pub fn patient_data_dir(&self) -> &Path {
        &self.patient_data_dir
    }

    /// Directory that holds the sharded admission documents.
    pub fn records_dir(&self) -> PathBuf {
        self.patient_data_dir.join(RECORDS_DIR_NAME)
    }
}
