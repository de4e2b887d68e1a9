//! Error type for table construction, growth and resize.

use crate::config::TableConfig;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum TableError {
    #[error("bucket count must be at least 1, got {requested}")]
    InvalidBucketCount { requested: usize },
    #[error(
        "max load factor must be finite and at least {}, got {value}",
        TableConfig::MIN_MAX_LOAD_FACTOR
    )]
    InvalidLoadFactor { value: f64 },
    #[error("allocation failed while {context}")]
    AllocationFailure { context: &'static str },
}

/// Coarse failure class, for callers that only care whether to fix their
/// arguments or back off and retry.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum ErrorKind {
    InvalidArgument,
    AllocationFailure,
}

impl TableError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            TableError::InvalidBucketCount { .. } | TableError::InvalidLoadFactor { .. } => {
                ErrorKind::InvalidArgument
            }
            TableError::AllocationFailure { .. } => ErrorKind::AllocationFailure,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_messages() {
        let e = TableError::InvalidBucketCount { requested: 0 };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(e.to_string(), "bucket count must be at least 1, got 0");

        let e = TableError::InvalidLoadFactor { value: -1.0 };
        assert_eq!(e.kind(), ErrorKind::InvalidArgument);
        assert_eq!(
            e.to_string(),
            "max load factor must be finite and at least 0.05, got -1"
        );

        let e = TableError::AllocationFailure {
            context: "allocating bucket array",
        };
        assert_eq!(e.kind(), ErrorKind::AllocationFailure);
        assert_eq!(
            e.to_string(),
            "allocation failed while allocating bucket array"
        );
    }
}
