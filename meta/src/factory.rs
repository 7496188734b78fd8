//! Version-aware metadata slot descriptors.

use wire::{ProtocolVersion, WireValue};

/// One concrete metadata slot write: effective index plus typed value.
#[derive(Debug, Clone, PartialEq)]
pub struct MetadataEntry {
    pub index: u8,
    pub value: WireValue,
}

/// Result of resolving a factory against a protocol version.
///
/// Either an available `(index, value)` pair or unavailable for that version.
/// The accessors panic on unavailable results: a caller that did not check
/// [`EntityMetadata::is_available`] has a missing version mapping, which is a
/// bug to surface, not a condition to recover from. Packet assembly uses
/// [`EntityMetadata::entry`] and skips unavailable results silently.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityMetadata {
    entry: Option<MetadataEntry>,
}

impl EntityMetadata {
    #[must_use]
    pub const fn unavailable() -> Self {
        Self { entry: None }
    }

    #[must_use]
    pub const fn available(index: u8, value: WireValue) -> Self {
        Self {
            entry: Some(MetadataEntry { index, value }),
        }
    }

    #[must_use]
    pub const fn is_available(&self) -> bool {
        self.entry.is_some()
    }

    /// Effective slot index.
    ///
    /// # Panics
    ///
    /// Panics if the metadata is unavailable for the resolved version.
    #[must_use]
    pub fn index(&self) -> u8 {
        match &self.entry {
            Some(entry) => entry.index,
            None => panic!("index read on unavailable entity metadata"),
        }
    }

    /// Resolved wire value.
    ///
    /// # Panics
    ///
    /// Panics if the metadata is unavailable for the resolved version.
    #[must_use]
    pub fn value(&self) -> &WireValue {
        match &self.entry {
            Some(entry) => &entry.value,
            None => panic!("value read on unavailable entity metadata"),
        }
    }

    #[must_use]
    pub const fn entry(&self) -> Option<&MetadataEntry> {
        self.entry.as_ref()
    }

    #[must_use]
    pub fn into_entry(self) -> Option<MetadataEntry> {
        self.entry
    }
}

fn always_available(_version: ProtocolVersion) -> bool {
    true
}

/// Immutable descriptor of one semantic entity attribute.
///
/// Holds the base slot index, the protocol minors at which that index shifts
/// up by one, an availability predicate, the input-to-wire-value converter,
/// and any related factories that must be written alongside this one.
/// Constructed once (usually as a `static`) and shared.
#[derive(Debug)]
pub struct MetadataFactory<I: 'static> {
    base_index: u8,
    shift_minors: &'static [u8],
    available: fn(ProtocolVersion) -> bool,
    convert: fn(&I, ProtocolVersion) -> Option<WireValue>,
    related: &'static [&'static MetadataFactory<I>],
}

impl<I> MetadataFactory<I> {
    #[must_use]
    pub const fn new(base_index: u8, convert: fn(&I, ProtocolVersion) -> Option<WireValue>) -> Self {
        Self {
            base_index,
            shift_minors: &[],
            available: always_available,
            convert,
            related: &[],
        }
    }

    /// Protocol minors at which the slot index shifts up by one. A minor may
    /// appear more than once when a revision removed several earlier slots.
    #[must_use]
    pub const fn with_shift_minors(mut self, shift_minors: &'static [u8]) -> Self {
        self.shift_minors = shift_minors;
        self
    }

    #[must_use]
    pub const fn with_availability(mut self, available: fn(ProtocolVersion) -> bool) -> Self {
        self.available = available;
        self
    }

    #[must_use]
    pub const fn with_related(mut self, related: &'static [&'static Self]) -> Self {
        self.related = related;
        self
    }

    #[must_use]
    pub const fn base_index(&self) -> u8 {
        self.base_index
    }

    #[must_use]
    pub const fn related(&self) -> &'static [&'static Self] {
        self.related
    }

    /// Effective slot index at `version`: base index plus one for every
    /// configured shift minor at or below the version's minor.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn index_at(&self, version: ProtocolVersion) -> u8 {
        let shifts = self
            .shift_minors
            .iter()
            .filter(|&&minor| version.minor >= minor)
            .count();
        self.base_index + shifts as u8
    }

    /// Resolves this factory (primary slot only) against a version.
    #[must_use]
    pub fn create(&self, input: &I, version: ProtocolVersion) -> EntityMetadata {
        if !(self.available)(version) {
            return EntityMetadata::unavailable();
        }
        let Some(value) = (self.convert)(input, version) else {
            return EntityMetadata::unavailable();
        };
        EntityMetadata::available(self.index_at(version), value)
    }

    /// Resolves the primary slot and every related factory with the same
    /// input, keeping only available entries in declaration order.
    #[must_use]
    pub fn create_all(&self, input: &I, version: ProtocolVersion) -> Vec<MetadataEntry> {
        let mut entries = Vec::with_capacity(1 + self.related.len());
        if let Some(entry) = self.create(input, version).into_entry() {
            entries.push(entry);
        }
        for related in self.related {
            if let Some(entry) = related.create(input, version).into_entry() {
                entries.push(entry);
            }
        }
        entries
    }
}
