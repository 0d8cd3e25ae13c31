//! Error types for the virtual memory manager.

use thiserror::Error;

/// Result alias for engine operations
pub type VmResult<T> = std::result::Result<T, VmError>;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VmError {
    /// Frame count of zero or less at construction
    #[error("invalid frame capacity: {0} (must be positive)")]
    InvalidCapacity(i64),

    /// Page size of zero or less at construction
    #[error("invalid page size: {0} (must be positive)")]
    InvalidPageSize(i64),

    /// Negative virtual address
    #[error("invalid virtual address: {0}")]
    InvalidAddress(i64),

    /// The LRU tracker named a page the page table does not consider resident
    #[error("replacement victim {0} is not a valid resident page")]
    InvalidVictim(u64),

    /// Every frame is occupied but the LRU tracker is empty
    #[error("all frames occupied but replacement queue is empty")]
    EmptyReplacementQueue,

    /// Fault handling succeeded but the page is still not resident
    #[error("page {0} still unmapped after fault handling")]
    UnresolvedFault(u64),

    /// Cross-structure check failed
    #[error("inconsistent state: {0}")]
    Inconsistent(String),
}

impl VmError {
    /// True for engine bugs, false for rejected input.
    pub fn is_consistency_error(&self) -> bool {
        match self {
            Self::InvalidCapacity(_) | Self::InvalidPageSize(_) | Self::InvalidAddress(_) => false,
            Self::InvalidVictim(_)
            | Self::EmptyReplacementQueue
            | Self::UnresolvedFault(_)
            | Self::Inconsistent(_) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_errors_are_not_consistency_errors() {
        assert!(!VmError::InvalidCapacity(0).is_consistency_error());
        assert!(!VmError::InvalidPageSize(-4).is_consistency_error());
        assert!(!VmError::InvalidAddress(-1).is_consistency_error());
    }

    #[test]
    fn test_engine_errors_are_consistency_errors() {
        assert!(VmError::InvalidVictim(3).is_consistency_error());
        assert!(VmError::EmptyReplacementQueue.is_consistency_error());
        assert!(VmError::UnresolvedFault(9).is_consistency_error());
        assert!(VmError::Inconsistent("x".into()).is_consistency_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            VmError::InvalidAddress(-5).to_string(),
            "invalid virtual address: -5"
        );
        assert!(VmError::InvalidVictim(7).to_string().contains("victim 7"));
    }
}
