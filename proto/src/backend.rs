//! Backend strategy for metadata value type ids.

use wire::{ProtocolVersion, WireKind};

/// The per-kind metadata type-id table of the active server backend.
///
/// Which numeric type id a metadata value carries is backend data, not
/// protocol truth this crate owns: server implementations renumber the table
/// between revisions. The backend is selected once at startup and injected
/// into the [`crate::PacketFactory`]; a kind the backend cannot map is a
/// missing version mapping and fails fast.
#[derive(Debug, Clone, Copy)]
pub struct Backend {
    name: &'static str,
    type_id: fn(WireKind, ProtocolVersion) -> Option<u32>,
}

impl Backend {
    #[must_use]
    pub const fn new(
        name: &'static str,
        type_id: fn(WireKind, ProtocolVersion) -> Option<u32>,
    ) -> Self {
        Self { name, type_id }
    }

    /// Backend with the mainline type-id tables.
    #[must_use]
    pub const fn standard() -> Self {
        Self::new("standard", standard_type_id)
    }

    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Numeric type id for `kind` at `version`.
    ///
    /// # Panics
    ///
    /// Panics when the backend has no mapping for the kind. Encoding an
    /// unsupported semantic kind is a programming error to surface, not a
    /// runtime condition to recover from.
    #[must_use]
    pub fn type_id(&self, kind: WireKind, version: ProtocolVersion) -> u32 {
        match (self.type_id)(kind, version) {
            Some(id) => id,
            None => panic!(
                "backend {} has no type id for {kind:?} at {version}",
                self.name
            ),
        }
    }
}

/// Legacy table packs type ids into three header bits; the modern table is a
/// varint alongside the index.
fn standard_type_id(kind: WireKind, version: ProtocolVersion) -> Option<u32> {
    if version < ProtocolVersion::V1_9 {
        match kind {
            WireKind::Byte | WireKind::Bool => Some(0),
            WireKind::VarInt => Some(2),
            WireKind::Float => Some(3),
            WireKind::Str => Some(4),
            WireKind::EnumOrdinal | WireKind::OptComponent => None,
        }
    } else {
        match kind {
            WireKind::Byte => Some(0),
            WireKind::VarInt => Some(1),
            WireKind::Float => Some(2),
            WireKind::Str => Some(3),
            WireKind::OptComponent => Some(5),
            WireKind::Bool => Some(6),
            WireKind::EnumOrdinal => Some(18),
        }
    }
}
