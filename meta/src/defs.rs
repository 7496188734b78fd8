//! The factory instances the NPC layer writes through.

use wire::{ProtocolVersion, WireValue};

use crate::factory::MetadataFactory;
use crate::pose::EntityPose;
use crate::status::EntityStatusSet;

fn sneaking_byte(sneaking: &bool, _version: ProtocolVersion) -> Option<WireValue> {
    Some(WireValue::Byte(if *sneaking { 0x02 } else { 0x00 }))
}

fn sneaking_pose(sneaking: &bool, _version: ProtocolVersion) -> Option<WireValue> {
    let pose = if *sneaking {
        EntityPose::Crouching
    } else {
        EntityPose::Standing
    };
    Some(WireValue::EnumOrdinal(pose.ordinal()))
}

fn pose_available(version: ProtocolVersion) -> bool {
    version.at_least(1, 14, 0)
}

fn skin_layers_byte(all_visible: &bool, _version: ProtocolVersion) -> Option<WireValue> {
    Some(WireValue::Byte(if *all_visible { 0xFF } else { 0x00 }))
}

fn status_byte(statuses: &EntityStatusSet, _version: ProtocolVersion) -> Option<WireValue> {
    Some(WireValue::Byte(statuses.bits()))
}

static SNEAK_POSE: MetadataFactory<bool> =
    MetadataFactory::new(6, sneaking_pose).with_availability(pose_available);

/// Crouch flag in the base status byte, plus the pose slot on 1.14+.
pub static SNEAKING: MetadataFactory<bool> =
    MetadataFactory::new(0, sneaking_byte).with_related(&[&SNEAK_POSE]);

/// Displayed skin parts, written as all-on or all-off.
///
/// The slot started at index 10 and has drifted upward ever since; the shift
/// list records every revision that removed a slot below it.
pub static SKIN_LAYERS: MetadataFactory<bool> =
    MetadataFactory::new(10, skin_layers_byte).with_shift_minors(&[9, 9, 10, 14, 14, 15, 17]);

/// Combined entity status byte at slot 0.
pub static ENTITY_STATUS: MetadataFactory<EntityStatusSet> =
    MetadataFactory::new(0, status_byte);
