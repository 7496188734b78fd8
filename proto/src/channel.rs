//! Plugin-message channel identifiers.

use std::fmt;

use crate::error::{ProtoError, ProtoResult};

const DEFAULT_NAMESPACE: &str = "minecraft";

fn valid_namespace_char(ch: char) -> bool {
    ch.is_ascii_lowercase() || ch.is_ascii_digit() || matches!(ch, '_' | '.' | '-')
}

fn valid_path_char(ch: char) -> bool {
    valid_namespace_char(ch) || ch == '/'
}

/// A validated `namespace:path` channel identifier.
///
/// Parsing accepts either a bare path (which gets the `minecraft` namespace)
/// or an explicit `namespace:path` pair. The raw input is kept verbatim for
/// the pre-namespacing wire format, where channel ids were free-form strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChannelId {
    source: String,
    namespace: String,
    path: String,
}

impl ChannelId {
    /// # Errors
    ///
    /// Returns [`ProtoError::EmptyChannel`] for an empty id or segment and
    /// [`ProtoError::InvalidChannelChar`] for characters outside the
    /// resource-location charset.
    pub fn parse(id: impl Into<String>) -> ProtoResult<Self> {
        let source = id.into();
        let (namespace, path) = match source.split_once(':') {
            Some((namespace, path)) => (namespace.to_owned(), path.to_owned()),
            None => (DEFAULT_NAMESPACE.to_owned(), source.clone()),
        };
        if namespace.is_empty() || path.is_empty() {
            return Err(ProtoError::EmptyChannel);
        }
        if let Some(ch) = namespace.chars().find(|&ch| !valid_namespace_char(ch)) {
            return Err(ProtoError::InvalidChannelChar {
                id: source,
                ch,
            });
        }
        if let Some(ch) = path.chars().find(|&ch| !valid_path_char(ch)) {
            return Err(ProtoError::InvalidChannelChar {
                id: source,
                ch,
            });
        }
        Ok(Self {
            source,
            namespace,
            path,
        })
    }

    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// The id exactly as it was handed to [`ChannelId::parse`], which is what
    /// the free-form legacy channel field carries.
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.namespace, self.path)
    }
}
