//! Version-era layout variants, kept as data tables.
//!
//! Each operation whose byte layout changed over protocol history gets one
//! variant enum and one ascending table of `(first version, variant)` rows.
//! Selection is always "latest variant at or below the current version", so
//! the cross-version logic is auditable in one place instead of scattered
//! through the encoders.

use wire::ProtocolVersion;

/// Ascending `(first version, variant)` rows.
#[derive(Debug)]
pub struct LayoutTable<V: 'static> {
    rows: &'static [(ProtocolVersion, V)],
}

impl<V: Copy> LayoutTable<V> {
    #[must_use]
    pub const fn new(rows: &'static [(ProtocolVersion, V)]) -> Self {
        Self { rows }
    }

    /// Latest variant whose first version is at or below `version`.
    ///
    /// # Panics
    ///
    /// Panics when `version` predates every row. The tables all start at the
    /// oldest supported revision, so this is a missing-mapping bug.
    #[must_use]
    pub fn select(&self, version: ProtocolVersion) -> V {
        self.rows
            .iter()
            .rev()
            .find(|(first, _)| version >= *first)
            .map_or_else(
                || panic!("no layout variant at or below {version}"),
                |(_, variant)| *variant,
            )
    }
}

/// Spawn position encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnCoords {
    /// 1/32-block fixed-point ints.
    FixedPoint,
    /// Full doubles.
    Doubles,
}

/// Whether an empty metadata payload rides along with the spawn packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpawnMetadata {
    Inline,
    Separate,
}

/// Entity-destroy id list encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DestroyIds {
    /// Raw i32 count followed by raw i32 ids.
    IntArray,
    /// Varint count followed by varint ids.
    VarIntList,
}

/// Player-list packet family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerInfoLayout {
    /// One packet with a leading action enum.
    ActionEnum,
    /// Actions-bitset add packet plus a dedicated remove packet.
    Split,
}

/// Body-rotation carrier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyRotation {
    /// Entity-teleport packet with fixed-point position.
    Teleport,
    /// Dedicated entity-rotation packet.
    Rotation,
}

/// Equipment slot encoding era.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EquipmentLayout {
    /// i16 slot ordinal with the off-hand shift correction.
    Ordinal,
    /// Varint slot enum, one slot per packet.
    SingleSlot,
    /// List of (slot byte, item) pairs with a continuation bit.
    SlotList,
}

/// Metadata entry framing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetadataLayout {
    /// `(type << 5) | index` header byte, `0x7F` terminator.
    LegacyPacked,
    /// Index byte plus type varint, `0xFF` terminator.
    TypedVarInt,
}

/// Text component encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComponentFormat {
    Plain,
    Json,
}

/// Plugin-channel identifier encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelFormat {
    Plain,
    Namespaced,
}

pub static SPAWN_COORDS: LayoutTable<SpawnCoords> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, SpawnCoords::FixedPoint),
    (ProtocolVersion::V1_9, SpawnCoords::Doubles),
]);

pub static SPAWN_METADATA: LayoutTable<SpawnMetadata> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, SpawnMetadata::Inline),
    (ProtocolVersion::V1_15, SpawnMetadata::Separate),
]);

pub static DESTROY_IDS: LayoutTable<DestroyIds> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, DestroyIds::IntArray),
    (ProtocolVersion::V1_17, DestroyIds::VarIntList),
]);

pub static PLAYER_INFO: LayoutTable<PlayerInfoLayout> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, PlayerInfoLayout::ActionEnum),
    (ProtocolVersion::V1_19_3, PlayerInfoLayout::Split),
]);

pub static BODY_ROTATION: LayoutTable<BodyRotation> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, BodyRotation::Teleport),
    (ProtocolVersion::V1_9, BodyRotation::Rotation),
]);

pub static EQUIPMENT: LayoutTable<EquipmentLayout> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, EquipmentLayout::Ordinal),
    (ProtocolVersion::V1_9, EquipmentLayout::SingleSlot),
    (ProtocolVersion::V1_16, EquipmentLayout::SlotList),
]);

pub static METADATA: LayoutTable<MetadataLayout> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, MetadataLayout::LegacyPacked),
    (ProtocolVersion::V1_9, MetadataLayout::TypedVarInt),
]);

pub static COMPONENT: LayoutTable<ComponentFormat> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, ComponentFormat::Plain),
    (ProtocolVersion::V1_13, ComponentFormat::Json),
]);

pub static CHANNEL: LayoutTable<ChannelFormat> = LayoutTable::new(&[
    (ProtocolVersion::V1_8, ChannelFormat::Plain),
    (ProtocolVersion::V1_13, ChannelFormat::Namespaced),
]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_picks_latest_row_at_or_below() {
        assert_eq!(
            SPAWN_COORDS.select(ProtocolVersion::new(1, 8, 9)),
            SpawnCoords::FixedPoint
        );
        assert_eq!(
            SPAWN_COORDS.select(ProtocolVersion::V1_9),
            SpawnCoords::Doubles
        );
        assert_eq!(
            SPAWN_COORDS.select(ProtocolVersion::V1_20),
            SpawnCoords::Doubles
        );
    }

    #[test]
    fn player_info_splits_exactly_at_19_3() {
        assert_eq!(
            PLAYER_INFO.select(ProtocolVersion::new(1, 19, 2)),
            PlayerInfoLayout::ActionEnum
        );
        assert_eq!(
            PLAYER_INFO.select(ProtocolVersion::V1_19_3),
            PlayerInfoLayout::Split
        );
    }

    #[test]
    fn equipment_has_three_eras() {
        assert_eq!(
            EQUIPMENT.select(ProtocolVersion::V1_8),
            EquipmentLayout::Ordinal
        );
        assert_eq!(
            EQUIPMENT.select(ProtocolVersion::new(1, 12, 2)),
            EquipmentLayout::SingleSlot
        );
        assert_eq!(
            EQUIPMENT.select(ProtocolVersion::V1_16),
            EquipmentLayout::SlotList
        );
    }

    #[test]
    fn spawn_metadata_detaches_at_1_15() {
        assert_eq!(
            SPAWN_METADATA.select(ProtocolVersion::V1_14),
            SpawnMetadata::Inline
        );
        assert_eq!(
            SPAWN_METADATA.select(ProtocolVersion::V1_15),
            SpawnMetadata::Separate
        );
    }

    #[test]
    #[should_panic(expected = "no layout variant")]
    fn prehistoric_version_panics() {
        static TABLE: LayoutTable<DestroyIds> =
            LayoutTable::new(&[(ProtocolVersion::V1_9, DestroyIds::VarIntList)]);
        let _ = TABLE.select(ProtocolVersion::V1_8);
    }
}
