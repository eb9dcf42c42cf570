use thiserror::Error;

/// The four failure classes a caller can observe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NotFound,
    InvalidArgument,
    OutOfRange,
    StorageUnavailable,
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Dataset not found: {0}")]
    DatasetNotFound(String),

    #[error("Resolution not found: {0}")]
    ResolutionNotFound(u32),

    #[error("Region not found: {0}")]
    RegionNotFound(String),

    #[error("Model {model_id} not found in region {region_id}")]
    ModelNotFound { region_id: String, model_id: i64 },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid page size: {0} (must be at least 1)")]
    InvalidPage(i64),

    #[error("Slice out of range: {0}")]
    OutOfRange(String),

    #[error("Corrupted region index: {0}")]
    CorruptIndex(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Dataset has been closed: {0}")]
    StoreClosed(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

impl StoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::DatasetNotFound(_)
            | StoreError::ResolutionNotFound(_)
            | StoreError::RegionNotFound(_)
            | StoreError::ModelNotFound { .. } => ErrorKind::NotFound,
            StoreError::InvalidArgument(_) | StoreError::InvalidPage(_) => {
                ErrorKind::InvalidArgument
            }
            StoreError::OutOfRange(_) => ErrorKind::OutOfRange,
            StoreError::CorruptIndex(_)
            | StoreError::StorageUnavailable(_)
            | StoreError::StoreClosed(_)
            | StoreError::Io(_)
            | StoreError::Json(_) => ErrorKind::StorageUnavailable,
        }
    }

    ///
    /// HTTP-shaped status code for this error, for callers that expose the
    /// store over a request/response boundary.
    ///
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::NotFound => 404,
            ErrorKind::InvalidArgument => 400,
            ErrorKind::OutOfRange => 500,
            ErrorKind::StorageUnavailable => 503,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(StoreError::RegionNotFound("87".to_string()), ErrorKind::NotFound, 404)]
    #[case(StoreError::ModelNotFound { region_id: "87".to_string(), model_id: 3 }, ErrorKind::NotFound, 404)]
    #[case(StoreError::ResolutionNotFound(2000), ErrorKind::NotFound, 404)]
    #[case(StoreError::InvalidPage(0), ErrorKind::InvalidArgument, 400)]
    #[case(StoreError::InvalidArgument("start > end".to_string()), ErrorKind::InvalidArgument, 400)]
    #[case(StoreError::OutOfRange("row 9".to_string()), ErrorKind::OutOfRange, 500)]
    #[case(StoreError::CorruptIndex("dup".to_string()), ErrorKind::StorageUnavailable, 503)]
    #[case(StoreError::StoreClosed("a/b".to_string()), ErrorKind::StorageUnavailable, 503)]
    fn test_error_kind_and_status(
        #[case] err: StoreError,
        #[case] kind: ErrorKind,
        #[case] status: u16,
    ) {
        assert_eq!(err.kind(), kind);
        assert_eq!(err.status_code(), status);
    }

    #[rstest]
    fn test_io_errors_are_storage_failures() {
        let err = StoreError::from(std::io::Error::other("disk gone"));
        assert_eq!(err.kind(), ErrorKind::StorageUnavailable);
    }

    #[rstest]
    fn test_model_not_found_message() {
        let err = StoreError::ModelNotFound {
            region_id: "87".to_string(),
            model_id: 42,
        };
        assert_eq!(err.to_string(), "Model 42 not found in region 87");
    }
}
