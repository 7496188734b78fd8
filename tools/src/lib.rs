//! Introspection and debugging tools for the specter NPC library.
//!
//! This crate backs the `specter-tools` binary:
//!
//! - Print the layout variants a protocol version selects, as JSON
//! - Encode a sample packet for an operation and hex-dump its frames
//!
//! # Design Principles
//!
//! - **First-class tooling** - These tools are part of the product, not afterthoughts.
//! - **Human-readable output** - Make it easy to see what the encoder will put on the wire.

use anyhow::{bail, Context, Result};
use geom::Position;
use meta::{EntityStatus, EntityStatusSet, ENTITY_STATUS, SKIN_LAYERS, SNEAKING};
use profile::{ProfileProperty, ResolvedProfile};
use proto::layout::{
    BODY_ROTATION, CHANNEL, COMPONENT, DESTROY_IDS, EQUIPMENT, METADATA, PLAYER_INFO,
    SPAWN_COORDS, SPAWN_METADATA,
};
use proto::{
    AnimationKind, Backend, ChannelId, ItemPayload, ItemSlot, OutboundPacket, PacketFactory,
};
use serde::Serialize;
use uuid::Uuid;
use wire::ProtocolVersion;

/// Parses `1.19` or `1.19.3` into a [`ProtocolVersion`].
///
/// # Errors
///
/// Fails on anything that is not two or three dot-separated integers.
pub fn parse_version(text: &str) -> Result<ProtocolVersion> {
    let parts: Vec<&str> = text.split('.').collect();
    if parts.len() < 2 || parts.len() > 3 {
        bail!("version must look like 1.19 or 1.19.3, got {text:?}");
    }
    let mut numbers = [0u8; 3];
    for (slot, part) in numbers.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .with_context(|| format!("invalid version component {part:?} in {text:?}"))?;
    }
    Ok(ProtocolVersion::new(numbers[0], numbers[1], numbers[2]))
}

/// The layout variant every era table selects at one version.
#[derive(Debug, Serialize)]
pub struct LayoutMatrix {
    pub version: String,
    pub spawn_coords: String,
    pub spawn_metadata: String,
    pub destroy_ids: String,
    pub player_info: String,
    pub body_rotation: String,
    pub equipment: String,
    pub metadata: String,
    pub component: String,
    pub channel: String,
}

/// Resolves every layout table at `version`.
#[must_use]
pub fn layout_matrix(version: ProtocolVersion) -> LayoutMatrix {
    LayoutMatrix {
        version: version.to_string(),
        spawn_coords: format!("{:?}", SPAWN_COORDS.select(version)),
        spawn_metadata: format!("{:?}", SPAWN_METADATA.select(version)),
        destroy_ids: format!("{:?}", DESTROY_IDS.select(version)),
        player_info: format!("{:?}", PLAYER_INFO.select(version)),
        body_rotation: format!("{:?}", BODY_ROTATION.select(version)),
        equipment: format!("{:?}", EQUIPMENT.select(version)),
        metadata: format!("{:?}", METADATA.select(version)),
        component: format!("{:?}", COMPONENT.select(version)),
        channel: format!("{:?}", CHANNEL.select(version)),
    }
}

/// Operations the `packet` subcommand can encode a sample of.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SampleOperation {
    Spawn,
    Destroy,
    InfoAdd,
    InfoRemove,
    Rotate,
    Animate,
    Equip,
    Sneaking,
    SkinLayers,
    Status,
    Payload,
}

/// Encodes `operation` with fixed sample inputs at `version`.
///
/// # Errors
///
/// Fails when the sample channel id does not parse, which would be a bug
/// in the sample data rather than the encoder.
pub fn encode_sample(operation: SampleOperation, version: ProtocolVersion) -> Result<OutboundPacket> {
    let factory = PacketFactory::new(version, Backend::standard());
    let position = Position::new(120.5, 64.0, -33.25, 90.0, 0.0, "world");
    let unique_id = Uuid::from_u128(7);

    let packet = match operation {
        SampleOperation::Spawn => factory.spawn(42, unique_id, &position),
        SampleOperation::Destroy => factory.destroy(42),
        SampleOperation::InfoAdd => {
            let profile = ResolvedProfile::new("steve", unique_id)
                .context("sample profile")?
                .with_property(ProfileProperty::signed("textures", "dGV4dHVyZXM=", "c2ln"));
            factory.player_info_add(&profile, Some("Steve"))
        }
        SampleOperation::InfoRemove => factory.player_info_remove(unique_id),
        SampleOperation::Rotate => factory.rotate(42, &position, 45.0, -10.0),
        SampleOperation::Animate => factory.animate(42, AnimationKind::SwingMainArm),
        SampleOperation::Equip => {
            factory.equip(42, ItemSlot::MainHand, &ItemPayload::new(vec![0xAB, 0xCD]))
        }
        SampleOperation::Sneaking => factory.metadata(42, &SNEAKING, &true),
        SampleOperation::SkinLayers => factory.metadata(42, &SKIN_LAYERS, &true),
        SampleOperation::Status => {
            let set = EntityStatusSet::empty()
                .with(EntityStatus::OnFire)
                .with(EntityStatus::Glowing);
            factory.metadata(42, &ENTITY_STATUS, &set)
        }
        SampleOperation::Payload => {
            let channel = ChannelId::parse("specter:demo").context("sample channel")?;
            factory.custom_payload(&channel, b"hello")
        }
    };
    Ok(packet)
}

/// Classic offset + hex + ascii dump, sixteen bytes per row.
#[must_use]
pub fn hex_dump(bytes: &[u8]) -> String {
    let mut out = String::new();
    for (row, chunk) in bytes.chunks(16).enumerate() {
        let mut hex = String::new();
        let mut ascii = String::new();
        for byte in chunk {
            hex.push_str(&format!("{byte:02x} "));
            ascii.push(if byte.is_ascii_graphic() || *byte == b' ' {
                *byte as char
            } else {
                '.'
            });
        }
        out.push_str(&format!("{:08x}  {hex:<48} {ascii}\n", row * 16));
    }
    out
}
