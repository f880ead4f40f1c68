use crate::codec::CodecError;
use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RecordError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Failed to persist record to '{}': {source}", .location.display())]
    PersistenceFailure {
        location: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to read record from '{}': {source}", .location.display())]
    StoreReadFailure {
        location: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode record at '{}': {source}", .location.display())]
    DecodeFailure {
        location: PathBuf,
        #[source]
        source: CodecError,
    },

    #[error("Failed to encode record: {0}")]
    EncodeFailure(#[source] CodecError),

    #[error("Type mismatch for field '{field}': {message}")]
    TypeMismatch { field: String, message: String },
}

pub type Result<T> = std::result::Result<T, RecordError>;

impl RecordError {
    /// True for failures that happened after the in-memory fields were
    /// already updated, i.e. memory is now ahead of the store.
    pub fn is_write_failure(&self) -> bool {
        matches!(
            self,
            RecordError::PersistenceFailure { .. } | RecordError::EncodeFailure(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_location() {
        let err = RecordError::PersistenceFailure {
            location: PathBuf::from("/tmp/rec.json"),
            source: io::Error::other("disk full"),
        };
        let message = err.to_string();
        assert!(message.contains("/tmp/rec.json"));
        assert!(message.contains("disk full"));
        assert!(err.is_write_failure());
    }

    #[test]
    fn test_read_failure_is_not_write_failure() {
        let err = RecordError::StoreReadFailure {
            location: PathBuf::from("/tmp/rec.json"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        };
        assert!(!err.is_write_failure());
        assert!(!RecordError::InvalidArgument("x".into()).is_write_failure());
    }
}
