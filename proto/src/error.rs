//! Construction-time configuration errors.

use std::fmt;

/// Shorthand for packet-layer results.
pub type ProtoResult<T> = Result<T, ProtoError>;

/// Invalid configuration handed to the packet layer.
///
/// These fail at construction time. Encoding itself does not return errors:
/// an unencodable value at send time is a missing version mapping and
/// panics (see [`crate::Backend`]).
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ProtoError {
    /// A channel identifier or one of its segments was empty.
    EmptyChannel,
    /// A channel identifier contained a character outside the allowed set.
    InvalidChannelChar { id: String, ch: char },
}

impl fmt::Display for ProtoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyChannel => write!(f, "channel identifier must not be empty"),
            Self::InvalidChannelChar { id, ch } => {
                write!(f, "channel identifier {id:?} contains invalid character {ch:?}")
            }
        }
    }
}

impl std::error::Error for ProtoError {}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_error<E: std::error::Error>(_: &E) {}

    #[test]
    fn display_content() {
        assert_eq!(
            ProtoError::EmptyChannel.to_string(),
            "channel identifier must not be empty"
        );
        assert_eq!(
            ProtoError::InvalidChannelChar {
                id: "my channel".into(),
                ch: ' ',
            }
            .to_string(),
            "channel identifier \"my channel\" contains invalid character ' '"
        );
    }

    #[test]
    fn implements_error() {
        assert_error(&ProtoError::EmptyChannel);
    }
}
