use std::error::Error;
use std::fmt;

use profile::ResolveError;

/// Errors from NPC construction and mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum NpcError {
    /// A flag value was rejected by the flag's validator.
    InvalidFlagValue {
        /// Key of the flag that rejected the value.
        flag: &'static str,
    },
    /// The builder was finished without a resolved profile.
    MissingProfile,
    /// The builder was finished without a spawn position.
    MissingPosition,
    /// An NPC with the same entity id is already registered.
    DuplicateEntityId {
        /// The conflicting entity id.
        entity_id: i32,
    },
    /// The builder's profile resolution step failed.
    ProfileResolution(ResolveError),
}

impl fmt::Display for NpcError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidFlagValue { flag } => {
                write!(f, "value rejected by flag {flag}")
            }
            Self::MissingProfile => write!(f, "npc builder has no profile"),
            Self::MissingPosition => write!(f, "npc builder has no position"),
            Self::DuplicateEntityId { entity_id } => {
                write!(f, "entity id {entity_id} is already registered")
            }
            Self::ProfileResolution(err) => {
                write!(f, "profile resolution failed: {err}")
            }
        }
    }
}

impl Error for NpcError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::ProfileResolution(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ResolveError> for NpcError {
    fn from(err: ResolveError) -> Self {
        Self::ProfileResolution(err)
    }
}

/// Convenience alias for fallible NPC operations.
pub type NpcResult<T> = Result<T, NpcError>;
