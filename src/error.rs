//! Error type for fallible [`DynArr`](crate::DynArr) operations.

use core::error::Error;
use core::fmt;

/// Errors reported by [`DynArr`](crate::DynArr).
///
/// Every operation that returns one of these leaves the array exactly as it was before the call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DynArrError {
    /// Storage for the requested capacity could not be obtained, either because the layout
    /// overflows [`DynArr::MAX_CAP`](crate::DynArr::MAX_CAP) or because the allocator returned null.
    AllocationFailure {
        /// Number of slots requested.
        capacity: usize,
    },
    /// An index outside the valid range for the operation.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Length of the array at the time of the call.
        len: usize,
    },
    /// An argument the operation cannot accept.
    InvalidArgument {
        /// What was wrong with it.
        reason: &'static str,
    },
}

impl fmt::Display for DynArrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AllocationFailure { capacity } => {
                write!(f, "allocation failed for a capacity of {capacity} elements")
            }
            Self::IndexOutOfRange { index, len } => {
                write!(f, "index {index} out of range for length {len}")
            }
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
        }
    }
}

impl Error for DynArrError {}
