use thiserror::Error;

/// Errors reported by the fallible table operations.
///
/// Looking up or removing a key that is not stored is never an error; those
/// operations return `Option`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// An allocation for a new entry or a new bucket array could not be
    /// satisfied. The table is left exactly as it was before the call.
    #[error("failed to allocate {bytes} bytes for the hash table")]
    AllocationFailure {
        /// Size of the allocation that failed.
        bytes: usize,
    },
    /// The next bucket count does not fit in `usize`.
    #[error("hash table capacity overflow")]
    CapacityOverflow,
    /// A table was configured without a hash function for its keys.
    #[error("undefined hash function")]
    UndefinedHashFunction,
}
