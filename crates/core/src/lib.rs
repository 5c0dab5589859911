//! # HPR Core
//!
//! Core business logic for the HPR patient record system.
//!
//! This crate contains pure data operations over admission documents:
//! - The `PatientRecord` model, intake validation, and status derivation
//! - The sharded JSON document store and query filters
//! - The statistics aggregator (counts, averages, DRG and department
//!   breakdowns)
//! - Report exporters (spreadsheet rows, paginated coding report)
//!
//! **No API concerns**: HTTP servers, response envelopes, and OpenAPI
//! documentation belong in `api-rest`.

#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod export;
pub mod record;
pub mod stats;
pub mod store;

pub use config::{CoreConfig, DEFAULT_PATIENT_DATA_DIR};
pub use error::{HprError, HprResult};
pub use hpr_uuid::RecordId;
pub use record::{PatientInput, PatientRecord, RecordStatus, Sex};
pub use stats::StatsReport;
pub use store::{PatientStore, RecordFilter};
