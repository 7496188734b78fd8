//! Error types for wire primitive reads.

use std::fmt;

/// Result type for wire primitive operations.
pub type WireResult<T> = Result<T, WireError>;

/// Errors that can occur while reading wire primitives.
///
/// Writes are append-only and cannot fail; only the read side (tests,
/// tooling, fuzzing) produces these.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum WireError {
    /// A varint ran past the 5-byte limit without terminating.
    VarIntTooLong,

    /// The buffer ended while a varint still had its continuation bit set.
    VarIntTruncated {
        /// Bytes consumed before the buffer ran out.
        read: usize,
    },
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VarIntTooLong => write!(f, "varint exceeds 5 bytes"),
            Self::VarIntTruncated { read } => {
                write!(f, "truncated varint: buffer ended after {read} bytes")
            }
        }
    }
}

impl std::error::Error for WireError {}
