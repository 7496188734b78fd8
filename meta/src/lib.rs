//! Entity metadata factories and status bitmasks for the specter NPC library.
//!
//! Entity metadata slots are the most version-sensitive part of the protocol:
//! slot indices are renumbered when earlier slots disappear, whole attributes
//! (like poses) only exist from a certain revision on, and one semantic
//! attribute can touch several slots at once. This crate captures all of that
//! as immutable [`MetadataFactory`] descriptors constructed once at startup.
//!
//! # Design Principles
//!
//! - **Pure data, pure functions** - A factory is a constant descriptor; `create` has no
//!   side effects and no I/O.
//! - **Index shifts as data** - Version-dependent renumbering is a list of shift revisions,
//!   not a conditional cascade.
//! - **Unavailable is explicit** - A factory that does not apply to a version says so;
//!   reading an unavailable entry is a programming error, not a silent default.
//!
//! # Example
//!
//! ```
//! use meta::SNEAKING;
//! use wire::{ProtocolVersion, WireValue};
//!
//! let created = SNEAKING.create(&true, ProtocolVersion::V1_8);
//! assert_eq!(created.index(), 0);
//! assert_eq!(created.value(), &WireValue::Byte(0x02));
//! ```

mod defs;
mod factory;
mod pose;
mod status;

pub use defs::{ENTITY_STATUS, SKIN_LAYERS, SNEAKING};
pub use factory::{EntityMetadata, MetadataEntry, MetadataFactory};
pub use pose::EntityPose;
pub use status::{EntityStatus, EntityStatusSet};
