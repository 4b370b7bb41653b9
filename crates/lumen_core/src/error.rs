//! # Store Error Types
//!
//! All errors that can occur in the storage core.

use thiserror::Error;

use crate::store::Key;

/// Errors that can occur in the storage core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The key's generation does not match its slot, or the key is the sentinel.
    #[error("stale or invalid key: {key}")]
    StaleOrInvalidKey {
        /// The key that failed to resolve.
        key: Key,
    },

    /// Every index representable with the configured key width is in use.
    #[error("index space exhausted: {max_slots} slots available with {index_bits}-bit indices")]
    IndexSpaceExhausted {
        /// Configured width of the key index.
        index_bits: u32,
        /// Number of distinct indices that width allows.
        max_slots: u32,
    },

    /// Growing a backing buffer failed.
    #[error("allocation failure: could not reserve {requested} elements of {element_size} bytes")]
    AllocationFailure {
        /// Total element capacity that was requested.
        requested: usize,
        /// Size of one element in bytes.
        element_size: usize,
    },

    /// Index past the logical end of an array.
    #[error("index {index} out of range for length {len}")]
    OutOfRange {
        /// The offending index.
        index: usize,
        /// Logical length at the time of access.
        len: usize,
    },

    /// Configuration could not be read, parsed or validated.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// An internal invariant was found broken by [`crate::SlotMap::validate`].
    #[error("store corrupted: {0}")]
    Corrupted(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = StoreError::OutOfRange { index: 7, len: 3 };
        assert_eq!(err.to_string(), "index 7 out of range for length 3");

        let err = StoreError::IndexSpaceExhausted {
            index_bits: 4,
            max_slots: 16,
        };
        assert!(err.to_string().contains("4-bit"));

        let err = StoreError::StaleOrInvalidKey { key: Key::new(3, 1) };
        assert_eq!(err.to_string(), "stale or invalid key: 3v1");
    }
}
