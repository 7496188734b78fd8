//! NPC aggregate, events, flags and scheduling for the specter NPC library.
//!
//! An [`Npc`] is a server-side fake player whose visibility is decided per
//! player: showing and hiding are transitions on a tracked set, each wrapped
//! in pre/post events, with the spawn packet trailing the player-info add by
//! [`SPAWN_DELAY_TICKS`]. The [`NpcContext`] bundles everything a transition
//! needs: packet factory, transport sink, event bus and scheduler.
//!
//! # Design Principles
//!
//! - **Per-player visibility** - there is no global "spawned" state; every player has their
//!   own tracked/untracked relation to every NPC.
//! - **Transitions over setters** - show and hide are multi-step protocols (event, info
//!   packet, delayed spawn), never a boolean flip.
//! - **Committed before cancellable** - the tracked-set change lands before the pre-event
//!   runs; cancelling stops packets, not membership.
//! - **Snapshot then send** - broadcast helpers copy the tracked set and iterate the copy,
//!   so handlers may mutate tracking freely.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use npc::{NpcBuilder, NpcContext, QueueScheduler, TaskScheduler};
//! use geom::Position;
//! use profile::ResolvedProfile;
//! use proto::{Backend, PacketKind, PacketSink, PlayerId, RecordingSink};
//! use uuid::Uuid;
//! use wire::ProtocolVersion;
//!
//! let sink = Arc::new(RecordingSink::new());
//! let scheduler = Arc::new(QueueScheduler::new());
//! let ctx = Arc::new(NpcContext::new(
//!     ProtocolVersion::V1_20,
//!     Backend::standard(),
//!     Arc::clone(&sink) as Arc<dyn PacketSink>,
//!     Arc::clone(&scheduler) as Arc<dyn TaskScheduler>,
//! ));
//!
//! let npc = NpcBuilder::new()
//!     .entity_id(42)
//!     .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
//!     .position(Position::new(0.5, 64.0, 0.5, 0.0, 0.0, "world"))
//!     .build(ctx)
//!     .unwrap();
//!
//! let player = PlayerId(Uuid::from_u128(1));
//! assert!(npc.force_track_player(player));
//! assert_eq!(sink.sent_kinds(), vec![PacketKind::PlayerInfo]);
//!
//! scheduler.tick_many(10);
//! assert_eq!(
//!     sink.sent_kinds(),
//!     vec![PacketKind::PlayerInfo, PacketKind::SpawnPlayer]
//! );
//! ```

mod error;
mod event;
mod flag;
mod npc;
mod registry;
mod rule;
mod scheduler;

pub use error::{NpcError, NpcResult};
pub use event::{EventBus, InteractHand, NpcEvent, NpcEventKind};
pub use flag::{
    FlagSet, NpcFlag, DISPLAY_NAME, HIT_WHEN_PLAYER_HITS, LOOK_AT_PLAYER,
    SNEAK_WHEN_PLAYER_SNEAKS,
};
pub use npc::{Npc, NpcBuilder, NpcContext, SPAWN_DELAY_TICKS};
pub use registry::NpcRegistry;
pub use rule::{NpcSettings, ProfileStrategy, TrackingRule};
pub use scheduler::{QueueScheduler, Task, TaskScheduler, TICK_MS};

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Position;
    use profile::ResolvedProfile;
    use proto::{Backend, PacketKind, PacketSink, PlayerId, RecordingSink};
    use std::sync::Arc;
    use uuid::Uuid;
    use wire::ProtocolVersion;

    #[test]
    fn doctest_example() {
        let sink = Arc::new(RecordingSink::new());
        let scheduler = Arc::new(QueueScheduler::new());
        let ctx = Arc::new(NpcContext::new(
            ProtocolVersion::V1_20,
            Backend::standard(),
            Arc::clone(&sink) as Arc<dyn PacketSink>,
            Arc::clone(&scheduler) as Arc<dyn TaskScheduler>,
        ));

        let npc = NpcBuilder::new()
            .entity_id(42)
            .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
            .position(Position::new(0.5, 64.0, 0.5, 0.0, 0.0, "world"))
            .build(ctx)
            .unwrap();

        let player = PlayerId(Uuid::from_u128(1));
        assert!(npc.force_track_player(player));
        assert_eq!(sink.sent_kinds(), vec![PacketKind::PlayerInfo]);

        scheduler.tick_many(10);
        assert_eq!(
            sink.sent_kinds(),
            vec![PacketKind::PlayerInfo, PacketKind::SpawnPlayer]
        );
    }
}
