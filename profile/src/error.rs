//! Resolution error taxonomy.

use std::fmt;

/// Shorthand for resolver results.
pub type ResolveResult<T> = Result<T, ResolveError>;

/// Why a profile could not be resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ResolveError {
    /// A profile key was constructed from an empty name.
    EmptyName,
    /// The upstream source has no record for the key.
    NotFound { key: String },
    /// The upstream source failed (network, parse).
    Upstream { message: String },
}

impl fmt::Display for ResolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "profile name must not be empty"),
            Self::NotFound { key } => write!(f, "no profile found for {key}"),
            Self::Upstream { message } => write!(f, "profile lookup failed: {message}"),
        }
    }
}

impl std::error::Error for ResolveError {}
