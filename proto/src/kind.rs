//! Abstract outbound packet kinds.

/// The packet types the NPC layer emits. Kinds are version-independent; the
/// body layout behind a kind is what shifts across revisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum PacketKind {
    SpawnPlayer,
    DestroyEntities,
    PlayerInfo,
    PlayerInfoRemove,
    EntityHeadLook,
    EntityRotation,
    EntityTeleport,
    EntityMetadata,
    EntityEquipment,
    EntityAnimation,
    CustomPayload,
}

impl PacketKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::SpawnPlayer => "spawn_player",
            Self::DestroyEntities => "destroy_entities",
            Self::PlayerInfo => "player_info",
            Self::PlayerInfoRemove => "player_info_remove",
            Self::EntityHeadLook => "entity_head_look",
            Self::EntityRotation => "entity_rotation",
            Self::EntityTeleport => "entity_teleport",
            Self::EntityMetadata => "entity_metadata",
            Self::EntityEquipment => "entity_equipment",
            Self::EntityAnimation => "entity_animation",
            Self::CustomPayload => "custom_payload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_snake_case() {
        assert_eq!(PacketKind::SpawnPlayer.name(), "spawn_player");
        assert_eq!(PacketKind::PlayerInfoRemove.name(), "player_info_remove");
    }
}
