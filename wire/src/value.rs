//! The finite set of payload kinds the protocol layer can serialize.

/// Discriminant of a [`WireValue`], used to look up per-kind type ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WireKind {
    Byte,
    VarInt,
    Float,
    Bool,
    Str,
    /// An enum encoded by ordinal (e.g. entity poses).
    EnumOrdinal,
    /// An optional chat component; absent means "no value", not empty text.
    OptComponent,
}

/// A typed wire payload.
///
/// The supported kinds are fixed and decided when a metadata factory or
/// packet layout is constructed. There is deliberately no catch-all variant:
/// a kind missing here means the protocol mapping is incomplete, which is a
/// bug to fix, not data to smuggle through.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub enum WireValue {
    Byte(u8),
    VarInt(i32),
    Float(f32),
    Bool(bool),
    Str(String),
    EnumOrdinal(u32),
    OptComponent(Option<String>),
}

impl WireValue {
    #[must_use]
    pub const fn kind(&self) -> WireKind {
        match self {
            Self::Byte(_) => WireKind::Byte,
            Self::VarInt(_) => WireKind::VarInt,
            Self::Float(_) => WireKind::Float,
            Self::Bool(_) => WireKind::Bool,
            Self::Str(_) => WireKind::Str,
            Self::EnumOrdinal(_) => WireKind::EnumOrdinal,
            Self::OptComponent(_) => WireKind::OptComponent,
        }
    }
}
