use thiserror::Error;

/// Error types for `DynArray` operations
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum DynArrayError {
    /// Checked access with an index outside `[0, len)`
    #[error("Index out of range: index {index} is outside array of length {len}")]
    IndexOutOfRange {
        /// Index that was accessed
        index: isize,
        /// Current length of the array
        len: usize,
    },
    /// Requested capacity does not fit in a memory layout
    #[error("Capacity overflow: {requested} elements cannot be allocated")]
    CapacityOverflow {
        /// Number of slots requested
        requested: usize,
    },
    /// The global allocator returned null
    #[error("Allocation failed: {bytes} bytes with alignment {align}")]
    AllocFailed {
        /// Size of the failed allocation
        bytes: usize,
        /// Alignment of the failed allocation
        align: usize,
    },
}
