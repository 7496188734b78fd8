//! Per-operation packet assembly.

use geom::Position;
use meta::{MetadataEntry, MetadataFactory};
use profile::ResolvedProfile;
use uuid::Uuid;
use wire::{PacketWriter, ProtocolVersion, WireValue};

use crate::animation::AnimationKind;
use crate::backend::Backend;
use crate::channel::ChannelId;
use crate::item::{ItemPayload, ItemSlot};
use crate::kind::PacketKind;
use crate::layout::{
    BodyRotation, ChannelFormat, ComponentFormat, DestroyIds, EquipmentLayout, MetadataLayout,
    PlayerInfoLayout, SpawnCoords, SpawnMetadata, BODY_ROTATION, CHANNEL, COMPONENT, DESTROY_IDS,
    EQUIPMENT, METADATA, PLAYER_INFO, SPAWN_COORDS, SPAWN_METADATA,
};
use crate::packet::{Frame, OutboundPacket};

const LEGACY_METADATA_END: u8 = 0x7F;
const MODERN_METADATA_END: u8 = 0xFF;

const INFO_ACTION_ADD: u32 = 0;
const INFO_ACTION_REMOVE: u32 = 4;

const INFO_BIT_ADD_PLAYER: u8 = 0x01;
const INFO_BIT_UPDATE_GAME_MODE: u8 = 0x04;
const INFO_BIT_UPDATE_LISTED: u8 = 0x08;
const INFO_BIT_UPDATE_LATENCY: u8 = 0x10;
const INFO_BIT_UPDATE_DISPLAY_NAME: u8 = 0x20;

const GAME_MODE_CREATIVE: u32 = 1;
const LATENCY_MS: u32 = 20;

fn write_uuid(writer: &mut PacketWriter, id: Uuid) {
    let bits = id.as_u128();
    #[allow(clippy::cast_possible_truncation)]
    writer.write_uuid_bits((bits >> 64) as u64, bits as u64);
}

fn json_text(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + 12);
    escaped.push_str("{\"text\":\"");
    for ch in text.chars() {
        match ch {
            '"' => escaped.push_str("\\\""),
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            '\t' => escaped.push_str("\\t"),
            ch if (ch as u32) < 0x20 => {
                escaped.push_str(&format!("\\u{:04x}", ch as u32));
            }
            ch => escaped.push(ch),
        }
    }
    escaped.push_str("\"}");
    escaped
}

/// Builds [`OutboundPacket`]s for one protocol version and backend.
///
/// One factory method per abstract operation. The version and backend are
/// fixed at construction, so every version decision funnels through the
/// layout tables exactly once per call.
#[derive(Debug, Clone, Copy)]
pub struct PacketFactory {
    version: ProtocolVersion,
    backend: Backend,
}

impl PacketFactory {
    #[must_use]
    pub const fn new(version: ProtocolVersion, backend: Backend) -> Self {
        Self { version, backend }
    }

    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.version
    }

    #[must_use]
    pub const fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Entity-spawn packet for the NPC at `position`.
    ///
    /// Legacy revisions carry fixed-point coordinates and an inline empty
    /// metadata payload; the real metadata follows as a separate packet once
    /// the entity exists client-side.
    #[must_use]
    pub fn spawn(&self, entity_id: i32, unique_id: Uuid, position: &Position) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(48);
        writer.write_var_i32(entity_id);
        write_uuid(&mut writer, unique_id);
        match SPAWN_COORDS.select(self.version) {
            SpawnCoords::FixedPoint => {
                writer.write_fixed_point(position.x());
                writer.write_fixed_point(position.y());
                writer.write_fixed_point(position.z());
            }
            SpawnCoords::Doubles => {
                writer.write_f64(position.x());
                writer.write_f64(position.y());
                writer.write_f64(position.z());
            }
        }
        writer.write_angle(position.yaw());
        writer.write_angle(position.pitch());
        if SPAWN_METADATA.select(self.version) == SpawnMetadata::Inline {
            self.write_metadata_entries(&mut writer, &[]);
        }
        OutboundPacket::single(PacketKind::SpawnPlayer, writer.into_bytes())
    }

    /// Removes the entity from the client's world.
    #[must_use]
    pub fn destroy(&self, entity_id: i32) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(8);
        match DESTROY_IDS.select(self.version) {
            DestroyIds::IntArray => {
                writer.write_i32(1);
                writer.write_i32(entity_id);
            }
            DestroyIds::VarIntList => {
                writer.write_var_u32(1);
                writer.write_var_i32(entity_id);
            }
        }
        OutboundPacket::single(PacketKind::DestroyEntities, writer.into_bytes())
    }

    /// Player-list add entry for the NPC's profile.
    ///
    /// Texture properties are copied onto the wire unconditionally; a missing
    /// one is how clients end up rendering the default skin.
    #[must_use]
    pub fn player_info_add(
        &self,
        profile: &ResolvedProfile,
        display_name: Option<&str>,
    ) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(128);
        match PLAYER_INFO.select(self.version) {
            PlayerInfoLayout::ActionEnum => {
                writer.write_var_u32(INFO_ACTION_ADD);
                writer.write_var_u32(1);
                write_uuid(&mut writer, profile.unique_id());
                self.write_profile_entry(&mut writer, profile);
                writer.write_var_u32(GAME_MODE_CREATIVE);
                writer.write_var_u32(LATENCY_MS);
                match display_name {
                    Some(name) => {
                        writer.write_bool(true);
                        self.write_component(&mut writer, name);
                    }
                    None => writer.write_bool(false),
                }
            }
            PlayerInfoLayout::Split => {
                let mut actions = INFO_BIT_ADD_PLAYER
                    | INFO_BIT_UPDATE_GAME_MODE
                    | INFO_BIT_UPDATE_LISTED
                    | INFO_BIT_UPDATE_LATENCY;
                if display_name.is_some() {
                    actions |= INFO_BIT_UPDATE_DISPLAY_NAME;
                }
                writer.write_u8(actions);
                writer.write_var_u32(1);
                write_uuid(&mut writer, profile.unique_id());
                self.write_profile_entry(&mut writer, profile);
                writer.write_var_u32(GAME_MODE_CREATIVE);
                writer.write_bool(true);
                writer.write_var_u32(LATENCY_MS);
                if let Some(name) = display_name {
                    self.write_component(&mut writer, name);
                }
            }
        }
        OutboundPacket::single(PacketKind::PlayerInfo, writer.into_bytes())
    }

    /// Player-list removal for the NPC's account id.
    #[must_use]
    pub fn player_info_remove(&self, unique_id: Uuid) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(24);
        match PLAYER_INFO.select(self.version) {
            PlayerInfoLayout::ActionEnum => {
                writer.write_var_u32(INFO_ACTION_REMOVE);
                writer.write_var_u32(1);
                write_uuid(&mut writer, unique_id);
                OutboundPacket::single(PacketKind::PlayerInfo, writer.into_bytes())
            }
            PlayerInfoLayout::Split => {
                writer.write_var_u32(1);
                write_uuid(&mut writer, unique_id);
                OutboundPacket::single(PacketKind::PlayerInfoRemove, writer.into_bytes())
            }
        }
    }

    /// Rotation as two frames: the body carrier first, then head look.
    ///
    /// Clients render head and body independently; sending only one leaves
    /// the other frozen at its previous angle.
    #[must_use]
    pub fn rotate(&self, entity_id: i32, position: &Position, yaw: f32, pitch: f32) -> OutboundPacket {
        let body = match BODY_ROTATION.select(self.version) {
            BodyRotation::Teleport => {
                let mut writer = PacketWriter::with_capacity(20);
                writer.write_var_i32(entity_id);
                writer.write_fixed_point(position.x());
                writer.write_fixed_point(position.y());
                writer.write_fixed_point(position.z());
                writer.write_angle(yaw);
                writer.write_angle(pitch);
                writer.write_bool(true);
                Frame {
                    kind: PacketKind::EntityTeleport,
                    body: writer.into_bytes(),
                }
            }
            BodyRotation::Rotation => {
                let mut writer = PacketWriter::with_capacity(8);
                writer.write_var_i32(entity_id);
                writer.write_angle(yaw);
                writer.write_angle(pitch);
                writer.write_bool(true);
                Frame {
                    kind: PacketKind::EntityRotation,
                    body: writer.into_bytes(),
                }
            }
        };

        let mut head = PacketWriter::with_capacity(6);
        head.write_var_i32(entity_id);
        head.write_angle(yaw);

        OutboundPacket::new(vec![
            body,
            Frame {
                kind: PacketKind::EntityHeadLook,
                body: head.into_bytes(),
            },
        ])
    }

    /// Plays an animation on the entity.
    #[must_use]
    pub fn animate(&self, entity_id: i32, kind: AnimationKind) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(6);
        writer.write_var_i32(entity_id);
        writer.write_u8(kind.ordinal());
        OutboundPacket::single(PacketKind::EntityAnimation, writer.into_bytes())
    }

    /// Equips one slot with a pre-encoded item payload.
    #[must_use]
    pub fn equip(&self, entity_id: i32, slot: ItemSlot, item: &ItemPayload) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(16 + item.as_bytes().len());
        writer.write_var_i32(entity_id);
        match EQUIPMENT.select(self.version) {
            EquipmentLayout::Ordinal => {
                writer.write_i16(slot.legacy_id());
            }
            EquipmentLayout::SingleSlot => {
                writer.write_var_u32(slot.ordinal());
            }
            EquipmentLayout::SlotList => {
                // single entry, so the continuation bit stays clear
                writer.write_u8(slot as u8);
            }
        }
        writer.write_bytes(item.as_bytes());
        OutboundPacket::single(PacketKind::EntityEquipment, writer.into_bytes())
    }

    /// Resolves `factory` against this version and serializes every
    /// available entry. Unavailable entries are dropped silently; an entry
    /// that does not apply to this revision has nothing to say on the wire.
    #[must_use]
    pub fn metadata<I>(
        &self,
        entity_id: i32,
        factory: &MetadataFactory<I>,
        input: &I,
    ) -> OutboundPacket {
        let entries = factory.create_all(input, self.version);
        let mut writer = PacketWriter::with_capacity(8 + entries.len() * 4);
        writer.write_var_i32(entity_id);
        self.write_metadata_entries(&mut writer, &entries);
        OutboundPacket::single(PacketKind::EntityMetadata, writer.into_bytes())
    }

    /// Plugin message on a custom channel.
    #[must_use]
    pub fn custom_payload(&self, channel: &ChannelId, payload: &[u8]) -> OutboundPacket {
        let mut writer = PacketWriter::with_capacity(8 + payload.len());
        match CHANNEL.select(self.version) {
            ChannelFormat::Plain => writer.write_str(channel.source()),
            ChannelFormat::Namespaced => writer.write_str(&channel.to_string()),
        }
        writer.write_bytes(payload);
        OutboundPacket::single(PacketKind::CustomPayload, writer.into_bytes())
    }

    fn write_profile_entry(&self, writer: &mut PacketWriter, profile: &ResolvedProfile) {
        writer.write_str(profile.name());
        #[allow(clippy::cast_possible_truncation)]
        writer.write_var_u32(profile.properties().len() as u32);
        for property in profile.properties() {
            writer.write_str(&property.name);
            writer.write_str(&property.value);
            match &property.signature {
                Some(signature) => {
                    writer.write_bool(true);
                    writer.write_str(signature);
                }
                None => writer.write_bool(false),
            }
        }
    }

    fn write_component(&self, writer: &mut PacketWriter, text: &str) {
        match COMPONENT.select(self.version) {
            ComponentFormat::Plain => writer.write_str(text),
            ComponentFormat::Json => writer.write_str(&json_text(text)),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn write_metadata_entries(&self, writer: &mut PacketWriter, entries: &[MetadataEntry]) {
        match METADATA.select(self.version) {
            MetadataLayout::LegacyPacked => {
                for entry in entries {
                    let type_id = self.backend.type_id(entry.value.kind(), self.version);
                    writer.write_u8((((type_id & 0x07) as u8) << 5) | (entry.index & 0x1F));
                    self.write_value(writer, &entry.value);
                }
                writer.write_u8(LEGACY_METADATA_END);
            }
            MetadataLayout::TypedVarInt => {
                for entry in entries {
                    writer.write_u8(entry.index);
                    writer.write_var_u32(self.backend.type_id(entry.value.kind(), self.version));
                    self.write_value(writer, &entry.value);
                }
                writer.write_u8(MODERN_METADATA_END);
            }
        }
    }

    fn write_value(&self, writer: &mut PacketWriter, value: &WireValue) {
        match value {
            WireValue::Byte(byte) => writer.write_u8(*byte),
            WireValue::VarInt(int) => writer.write_var_i32(*int),
            WireValue::Float(float) => writer.write_f32(*float),
            WireValue::Bool(flag) => writer.write_bool(*flag),
            WireValue::Str(text) => writer.write_str(text),
            WireValue::EnumOrdinal(ordinal) => writer.write_var_u32(*ordinal),
            WireValue::OptComponent(component) => match component {
                Some(text) => {
                    writer.write_bool(true);
                    self.write_component(writer, text);
                }
                None => writer.write_bool(false),
            },
            other => panic!("no value encoding for {other:?}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use meta::SNEAKING;
    use profile::ProfileProperty;
    use wire::read_var_u32;

    fn factory(version: ProtocolVersion) -> PacketFactory {
        PacketFactory::new(version, Backend::standard())
    }

    fn standing_at_origin() -> Position {
        Position::new(0.0, 64.0, 0.0, 0.0, 0.0, "world")
    }

    fn steve() -> ResolvedProfile {
        ResolvedProfile::new("steve", Uuid::from_u128(7))
            .unwrap()
            .with_property(ProfileProperty::signed("textures", "payload", "sig"))
    }

    #[test]
    fn modern_spawn_uses_doubles_without_inline_metadata() {
        let packet = factory(ProtocolVersion::V1_15).spawn(5, Uuid::from_u128(7), &standing_at_origin());
        let frames = packet.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].kind, PacketKind::SpawnPlayer);
        // varint id + uuid + three doubles + two angle bytes
        assert_eq!(frames[0].body.len(), 1 + 16 + 24 + 2);
    }

    #[test]
    fn legacy_spawn_is_fixed_point_with_empty_metadata() {
        let packet = factory(ProtocolVersion::V1_8).spawn(5, Uuid::from_u128(7), &standing_at_origin());
        let body = &packet.frames()[0].body;
        // varint id + uuid + three i32 + two angles + metadata terminator
        assert_eq!(body.len(), 1 + 16 + 12 + 2 + 1);
        assert_eq!(*body.last().unwrap(), LEGACY_METADATA_END);
        // y = 64 blocks = 2048 on the 1/32 grid
        assert_eq!(&body[21..25], &2048i32.to_be_bytes());
    }

    #[test]
    fn pre_merge_modern_spawn_carries_modern_terminator() {
        let packet = factory(ProtocolVersion::V1_14).spawn(5, Uuid::from_u128(7), &standing_at_origin());
        let body = &packet.frames()[0].body;
        assert_eq!(*body.last().unwrap(), MODERN_METADATA_END);
    }

    #[test]
    fn destroy_era_encodings() {
        let legacy = factory(ProtocolVersion::V1_16).destroy(300);
        let mut expected = 1i32.to_be_bytes().to_vec();
        expected.extend_from_slice(&300i32.to_be_bytes());
        assert_eq!(legacy.frames()[0].body, expected);

        let modern = factory(ProtocolVersion::V1_17).destroy(300);
        assert_eq!(modern.frames()[0].body, vec![0x01, 0xAC, 0x02]);
    }

    #[test]
    fn action_enum_info_carries_profile_and_constants() {
        let packet = factory(ProtocolVersion::V1_12).player_info_add(&steve(), None);
        let body = &packet.frames()[0].body;
        assert_eq!(packet.frames()[0].kind, PacketKind::PlayerInfo);
        assert_eq!(body[0], 0x00, "add action");
        assert_eq!(body[1], 0x01, "one entry");
        assert_eq!(&body[2..18], &Uuid::from_u128(7).as_u128().to_be_bytes());
        assert_eq!(body[18], 5, "name length");
        assert_eq!(&body[19..24], b"steve");
        assert_eq!(body[24], 1, "one property");
        // trailing: gamemode creative, latency, no display name
        assert_eq!(&body[body.len() - 3..], &[GAME_MODE_CREATIVE as u8, 20, 0]);
    }

    #[test]
    fn split_info_add_sets_action_bits() {
        let packet = factory(ProtocolVersion::V1_19_3).player_info_add(&steve(), None);
        let body = &packet.frames()[0].body;
        assert_eq!(packet.frames()[0].kind, PacketKind::PlayerInfo);
        assert_eq!(
            body[0],
            INFO_BIT_ADD_PLAYER
                | INFO_BIT_UPDATE_GAME_MODE
                | INFO_BIT_UPDATE_LISTED
                | INFO_BIT_UPDATE_LATENCY
        );

        let with_display = factory(ProtocolVersion::V1_19_3).player_info_add(&steve(), Some("Guide"));
        assert_eq!(
            with_display.frames()[0].body[0] & INFO_BIT_UPDATE_DISPLAY_NAME,
            INFO_BIT_UPDATE_DISPLAY_NAME
        );
    }

    #[test]
    fn info_remove_splits_into_its_own_packet() {
        let legacy = factory(ProtocolVersion::new(1, 19, 2)).player_info_remove(Uuid::from_u128(7));
        assert_eq!(legacy.frames()[0].kind, PacketKind::PlayerInfo);
        assert_eq!(legacy.frames()[0].body[0], 0x04, "remove action");

        let modern = factory(ProtocolVersion::V1_19_3).player_info_remove(Uuid::from_u128(7));
        assert_eq!(modern.frames()[0].kind, PacketKind::PlayerInfoRemove);
        assert_eq!(modern.frames()[0].body.len(), 1 + 16);
    }

    #[test]
    fn rotation_sends_body_then_head() {
        let position = standing_at_origin();
        let modern = factory(ProtocolVersion::V1_9).rotate(5, &position, 90.0, 0.0);
        let kinds: Vec<PacketKind> = modern.frames().iter().map(|f| f.kind).collect();
        assert_eq!(
            kinds,
            vec![PacketKind::EntityRotation, PacketKind::EntityHeadLook]
        );
        // yaw 90 degrees = angle byte 64
        assert_eq!(modern.frames()[0].body, vec![5, 64, 0, 1]);
        assert_eq!(modern.frames()[1].body, vec![5, 64]);

        let legacy = factory(ProtocolVersion::V1_8).rotate(5, &position, 90.0, 0.0);
        assert_eq!(legacy.frames()[0].kind, PacketKind::EntityTeleport);
        assert_eq!(legacy.frames()[0].body.len(), 1 + 12 + 2 + 1);
    }

    #[test]
    fn animation_is_id_plus_ordinal() {
        let packet = factory(ProtocolVersion::V1_20).animate(5, AnimationKind::SwingOffHand);
        assert_eq!(packet.frames()[0].body, vec![5, 3]);
    }

    #[test]
    fn equipment_three_eras() {
        let item = ItemPayload::new([0xAB]);

        let legacy = factory(ProtocolVersion::V1_8).equip(5, ItemSlot::Head, &item);
        assert_eq!(legacy.frames()[0].body, vec![5, 0x00, 0x04, 0xAB]);

        let single = factory(ProtocolVersion::V1_12).equip(5, ItemSlot::Head, &item);
        assert_eq!(single.frames()[0].body, vec![5, 0x05, 0xAB]);

        let list = factory(ProtocolVersion::V1_16).equip(5, ItemSlot::Head, &item);
        assert_eq!(list.frames()[0].body, vec![5, 0x05, 0xAB]);
    }

    #[test]
    fn off_hand_collapses_onto_the_held_slot_pre_1_9() {
        let packet = factory(ProtocolVersion::V1_8).equip(5, ItemSlot::OffHand, &ItemPayload::empty());
        assert_eq!(packet.frames()[0].body, vec![5, 0x00, 0x00]);
    }

    #[test]
    fn metadata_typed_varint_layout() {
        let packet = factory(ProtocolVersion::V1_12).metadata(5, &SNEAKING, &true);
        // entity id, index 0, type 0 (byte), value 0x02, terminator
        assert_eq!(
            packet.frames()[0].body,
            vec![5, 0x00, 0x00, 0x02, MODERN_METADATA_END]
        );
    }

    #[test]
    fn metadata_legacy_packed_layout() {
        let packet = factory(ProtocolVersion::V1_8).metadata(5, &SNEAKING, &true);
        // header (type 0 << 5 | index 0), value, terminator
        assert_eq!(
            packet.frames()[0].body,
            vec![5, 0x00, 0x02, LEGACY_METADATA_END]
        );
    }

    #[test]
    fn metadata_includes_pose_on_modern_versions() {
        let packet = factory(ProtocolVersion::V1_14).metadata(5, &SNEAKING, &true);
        // id, (0, byte, 0x02), (6, pose type 18, crouching ordinal 5), end
        assert_eq!(
            packet.frames()[0].body,
            vec![5, 0x00, 0x00, 0x02, 0x06, 18, 0x05, MODERN_METADATA_END]
        );
    }

    #[test]
    fn custom_payload_channel_formats() {
        let channel = ChannelId::parse("labymod3:main").unwrap();

        let modern = factory(ProtocolVersion::V1_13).custom_payload(&channel, &[0xEE]);
        let body = &modern.frames()[0].body;
        let (len, consumed) = read_var_u32(body).unwrap();
        assert_eq!(len, 13);
        assert_eq!(&body[consumed..consumed + 13], b"labymod3:main");
        assert_eq!(*body.last().unwrap(), 0xEE);

        let bare = ChannelId::parse("brand").unwrap();
        let legacy = factory(ProtocolVersion::V1_8).custom_payload(&bare, &[]);
        assert_eq!(legacy.frames()[0].body, [&[5u8][..], b"brand"].concat());
    }

    #[test]
    fn display_name_is_json_on_modern_versions() {
        let packet = factory(ProtocolVersion::V1_14).player_info_add(&steve(), Some("The \"Guide\""));
        let body = &packet.frames()[0].body;
        let needle = br#"{"text":"The \"Guide\""}"#;
        assert!(
            body.windows(needle.len()).any(|window| window == needle),
            "component JSON not found in body"
        );
    }
}
