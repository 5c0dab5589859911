//! Record identifiers and sharded-path utilities.
//!
//! HPR stores patient admission documents under sharded directories derived
//! from the record identifier. To keep path derivation deterministic and
//! consistent across the codebase, identifiers use a *canonical*
//! representation: **32 lowercase hexadecimal characters** (no hyphens).
//!
//! This crate provides:
//! - [`RecordId`], a wrapper that *guarantees* the canonical format once
//!   constructed.
//! - The shared sharding logic that derives a document directory from an
//!   identifier.
//!
//! ## Canonical form
//! - Length: 32
//! - Characters: `0-9` and `a-f` only
//! - Example: `550e8400e29b41d4a716446655440000`
//!
//! This is the value produced by `Uuid::new_v4().simple().to_string()`.
//! Externally supplied identifiers (CLI or API path parameters) must already
//! be canonical; use [`RecordId::parse`] to validate them. Uppercase,
//! hyphenated, or otherwise non-canonical values are rejected.
//!
//! ## Sharded directory layout
//! For a canonical identifier `u`, documents live under:
//! `parent_dir/<u[0..2]>/<u[2..4]>/<u>/`
//!
//! Example:
//! `patient_data/records/55/0e/550e8400e29b41d4a716446655440000/`
//!
//! The two-level fan-out keeps individual directories small when the
//! collection grows to many records.

mod id;

pub use id::RecordId;

/// Error type for identifier operations.
#[derive(Debug, thiserror::Error)]
pub enum IdError {
    /// Invalid input provided
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type for identifier operations.
pub type IdResult<T> = Result<T, IdError>;
