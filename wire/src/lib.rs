//! Protocol versions, wire values and byte primitives for the specter NPC library.
//!
//! This crate is the lowest protocol layer: it knows how the game protocol
//! spells individual values (varints, length-prefixed strings, angle bytes,
//! fixed-point coordinates) and how protocol revisions are ordered, but
//! nothing about packets, entities or players.
//!
//! # Design Principles
//!
//! - **No unsafe code** - Safety is paramount.
//! - **Append-only writes** - [`PacketWriter`] cannot fail; malformed input is caught on reads.
//! - **Finite value kinds** - [`WireValue`] enumerates every payload kind the protocol layer
//!   supports, decided at construction time, never via runtime type inspection.
//! - **No domain knowledge** - Packet layouts and metadata semantics live in higher crates.
//!
//! # Example
//!
//! ```
//! use wire::{PacketWriter, ProtocolVersion};
//!
//! assert!(ProtocolVersion::V1_16.at_least(1, 9, 0));
//!
//! let mut writer = PacketWriter::new();
//! writer.write_var_u32(300);
//! assert_eq!(writer.into_bytes(), vec![0xAC, 0x02]);
//! ```

mod error;
mod value;
mod version;
mod writer;

pub use error::{WireError, WireResult};
pub use value::{WireKind, WireValue};
pub use version::ProtocolVersion;
pub use writer::{read_var_u32, var_u32_len, PacketWriter};
