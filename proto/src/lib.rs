//! Outbound packet assembly for the specter NPC library.
//!
//! Everything version-dependent about the wire format lives here: which
//! packet carries body rotation, how entity ids are listed in a destroy,
//! when the player-info packet split in two. Each of those decisions is a
//! row in a [`LayoutTable`] rather than a conditional in an encoder, and a
//! [`PacketFactory`] fixed to one version and backend walks the tables.
//!
//! # Design Principles
//!
//! - **Layouts are data** - one ascending table per era-dependent decision, selected by
//!   "latest variant at or below the version"; encoders never compare versions directly.
//! - **Build once, send many** - an [`OutboundPacket`] is finished bytes plus dispatch
//!   combinators; construction cost is paid once regardless of audience size.
//! - **Fire and forget** - the sink takes the frame and that is the end of it; the
//!   protocol has no acknowledgement, so neither does this layer.
//! - **Missing mappings fail fast** - an unencodable kind panics; a quiet fallback here
//!   is a ghost entity or a frozen rotation on a real client.
//!
//! # Example
//!
//! ```
//! use proto::{Backend, PacketFactory, PacketKind};
//! use geom::Position;
//! use uuid::Uuid;
//! use wire::ProtocolVersion;
//!
//! let factory = PacketFactory::new(ProtocolVersion::V1_17, Backend::standard());
//! let packet = factory.destroy(300);
//! assert_eq!(packet.frames()[0].kind, PacketKind::DestroyEntities);
//! assert_eq!(packet.frames()[0].body, vec![0x01, 0xAC, 0x02]);
//! # let _ = (Position::new(0.0, 0.0, 0.0, 0.0, 0.0, "w"), Uuid::nil());
//! ```

mod animation;
mod backend;
mod channel;
mod error;
mod factory;
mod item;
mod kind;
pub mod layout;
mod packet;

pub use animation::AnimationKind;
pub use backend::Backend;
pub use channel::ChannelId;
pub use error::{ProtoError, ProtoResult};
pub use factory::PacketFactory;
pub use item::{ItemPayload, ItemSlot};
pub use kind::PacketKind;
pub use layout::LayoutTable;
pub use packet::{Frame, OutboundPacket, PacketSink, PlayerId, RecordingSink};
