//! Error types for the fallible edges of the vector API
//!
//! Vector operations themselves are total. Errors only arise where a caller
//! hands in a buffer or a textual parameter that cannot be checked statically.

use thiserror::Error;

/// Core error type
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Buffer shorter than the vector it should fill
    #[error("Size mismatch: expected at least {expected} lanes, got {actual}")]
    SizeMismatch { expected: usize, actual: usize },

    /// Aligned load requested on a buffer that does not meet the alignment
    #[error("Misaligned buffer: address {address:#x} is not aligned to {required} bytes")]
    Misaligned { address: usize, required: usize },

    /// Invalid parameter provided to a function
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an error for a buffer that is too short
    pub fn size_mismatch(expected: usize, actual: usize) -> Self {
        Self::SizeMismatch { expected, actual }
    }

    /// Create an error for a pointer that misses the required alignment
    pub fn misaligned<T>(ptr: *const T, required: usize) -> Self {
        Self::Misaligned {
            address: ptr as usize,
            required,
        }
    }
}
