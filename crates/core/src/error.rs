#[derive(Debug, thiserror::Error)]
pub enum HprError {
    #[error("Validation Error")]
    Validation(Vec<String>),
    #[error("AN (Admission Number) already exists")]
    DuplicateAn,
    #[error("failed to create storage directory: {0}")]
    StorageDirCreation(std::io::Error),
    #[error("failed to create record directory: {0}")]
    RecordDirCreation(std::io::Error),
    #[error("failed to write record document: {0}")]
    FileWrite(std::io::Error),
    #[error("failed to read record document: {0}")]
    FileRead(std::io::Error),
    #[error("failed to delete record directory: {0}")]
    FileDelete(std::io::Error),
    #[error("failed to serialize record: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize record: {0}")]
    Deserialization(serde_json::Error),
    #[error(
        "insert failed and cleanup also failed (path: {path}): insert={insert_error}; cleanup={cleanup_error}",
        path = path.display()
    )]
    CleanupAfterInsertFailed {
        path: std::path::PathBuf,
        #[source]
        insert_error: Box<HprError>,
        cleanup_error: std::io::Error,
    },
}

pub type HprResult<T> = std::result::Result<T, HprError>;
