//! Protocol revision ordering.

use std::fmt;

/// A game protocol revision as (major, minor, patch).
///
/// Revisions order lexicographically, which matches how the protocol history
/// is numbered. The running server's revision is injected once at
/// construction time wherever version-dependent behavior is selected; there
/// is no ambient global version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ProtocolVersion {
    pub major: u8,
    pub minor: u8,
    pub patch: u8,
}

impl ProtocolVersion {
    /// First revision with double-precision spawn coordinates and the
    /// dedicated body-rotation packet.
    pub const V1_9: Self = Self::new(1, 9, 0);
    /// Namespaced resource identifiers (plugin channels, components).
    pub const V1_13: Self = Self::new(1, 13, 0);
    /// Entity pose metadata.
    pub const V1_14: Self = Self::new(1, 14, 0);
    /// Player-spawn metadata merged into the generic metadata packet.
    pub const V1_15: Self = Self::new(1, 15, 0);
    /// Equipment as a list of slot/item pairs.
    pub const V1_16: Self = Self::new(1, 16, 0);
    /// Entity destroy carries a varint id list.
    pub const V1_17: Self = Self::new(1, 17, 0);
    /// Player-info split into actions-bitset add and a dedicated remove packet.
    pub const V1_19_3: Self = Self::new(1, 19, 3);

    pub const V1_8: Self = Self::new(1, 8, 0);
    pub const V1_12: Self = Self::new(1, 12, 0);
    pub const V1_20: Self = Self::new(1, 20, 0);

    #[must_use]
    pub const fn new(major: u8, minor: u8, patch: u8) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }

    /// `true` when this revision is at or above the given one.
    #[must_use]
    pub const fn at_least(self, major: u8, minor: u8, patch: u8) -> bool {
        if self.major != major {
            return self.major > major;
        }
        if self.minor != minor {
            return self.minor > minor;
        }
        self.patch >= patch
    }
}

impl fmt::Display for ProtocolVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}
