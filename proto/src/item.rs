//! Equipment slots and opaque item payloads.

/// The six equipment slots an NPC can carry items in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ItemSlot {
    MainHand = 0,
    OffHand = 1,
    Feet = 2,
    Legs = 3,
    Chest = 4,
    Head = 5,
}

impl ItemSlot {
    /// Slot enum position in the modern (1.9+) numbering.
    #[must_use]
    pub const fn ordinal(self) -> u32 {
        self as u32
    }

    /// Slot id in the pre-off-hand numbering.
    ///
    /// The old table has no off-hand entry, so every id above the held-item
    /// slot shifts down by one; off-hand itself collapses onto the held slot.
    #[must_use]
    pub const fn legacy_id(self) -> i16 {
        let id = self as i16;
        if id > 0 {
            id - 1
        } else {
            id
        }
    }
}

/// A pre-encoded item stack.
///
/// Item serialization belongs to the host server (NBT layout, registry ids);
/// this layer carries the finished bytes through to the equipment packet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ItemPayload {
    bytes: Vec<u8>,
}

impl ItemPayload {
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    /// The "no item" payload.
    #[must_use]
    pub const fn empty() -> Self {
        Self { bytes: Vec::new() }
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn legacy_ids_shift_past_the_held_slot() {
        assert_eq!(ItemSlot::MainHand.legacy_id(), 0);
        assert_eq!(ItemSlot::OffHand.legacy_id(), 0);
        assert_eq!(ItemSlot::Feet.legacy_id(), 1);
        assert_eq!(ItemSlot::Legs.legacy_id(), 2);
        assert_eq!(ItemSlot::Chest.legacy_id(), 3);
        assert_eq!(ItemSlot::Head.legacy_id(), 4);
    }

    #[test]
    fn modern_ordinals_are_sequential() {
        assert_eq!(ItemSlot::MainHand.ordinal(), 0);
        assert_eq!(ItemSlot::Head.ordinal(), 5);
    }

    #[test]
    fn empty_payload_has_no_bytes() {
        assert!(ItemPayload::empty().as_bytes().is_empty());
        assert_eq!(ItemPayload::new([0xFF, 0x00]).as_bytes(), &[0xFF, 0x00]);
    }
}
