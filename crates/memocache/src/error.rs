//! Error types for memocache

use std::fmt;

/// Result type alias for memocache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the boundary between a caller and the caches.
///
/// The cache structures themselves are total; these are only produced by the
/// helpers that validate caller input before touching a cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Range `[left, right]` is empty or reaches past the array
    InvalidRange {
        /// Left bound (inclusive)
        left: usize,
        /// Right bound (inclusive)
        right: usize,
        /// Array length at the time of the query
        len: usize,
    },

    /// Write index past the end of the array
    IndexOutOfBounds {
        /// Requested index
        index: usize,
        /// Array length
        len: usize,
    },

    /// Argument past the supported recursion depth
    ArgumentTooLarge {
        /// Requested argument
        n: u64,
        /// Largest accepted argument
        max: u64,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidRange { left, right, len } => write!(
                f,
                "Invalid range: [{}, {}] for array of length {}",
                left, right, len
            ),
            Error::IndexOutOfBounds { index, len } => write!(
                f,
                "Index out of bounds: {} (array length {})",
                index, len
            ),
            Error::ArgumentTooLarge { n, max } => {
                write!(f, "Argument too large: {} (max {})", n, max)
            }
        }
    }
}

impl std::error::Error for Error {}
