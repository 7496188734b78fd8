//! Tracking and visibility engine for the specter NPC library.
//!
//! The [`TrackingController`] decides, per NPC and per player, whether the
//! NPC should currently exist on that player's client. It is driven by
//! movement-producing events rather than a timer: every move, sneak toggle,
//! left click and disconnect walks the registry and applies the gates in a
//! fixed order.
//!
//! # Design Principles
//!
//! - **Gate order is fixed** - world/chunk first, then squared distance, then imitation;
//!   a player in the wrong world costs no distance math.
//! - **Squared distances everywhere** - radii are squared once at build; the handlers never
//!   take a square root.
//! - **Transitions stay idempotent** - the gates call the NPC transitions freely; showing a
//!   player twice or hiding an untracked player is a no-op there, not here.
//! - **Hosts bring their worlds** - chunk load state and world identity come in through the
//!   [`WorldView`] and [`WorldIdMapper`] seams.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use geom::Position;
//! use npc::{NpcBuilder, NpcContext, NpcRegistry, QueueScheduler, TaskScheduler};
//! use profile::ResolvedProfile;
//! use proto::{Backend, PacketSink, PlayerId, RecordingSink};
//! use track::{TrackingControllerBuilder, SPAWN_DISTANCE};
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
//! let registry = Arc::new(NpcRegistry::new());
//!
//! let npc = NpcBuilder::new()
//!     .entity_id(1)
//!     .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
//!     .position(Position::new(0.0, 64.0, 0.0, 0.0, 0.0, "world"))
//!     .build_and_register(Arc::clone(&ctx), &registry)
//!     .unwrap();
//!
//! let controller = TrackingControllerBuilder::new()
//!     .flag(&SPAWN_DISTANCE, 50.0)
//!     .unwrap()
//!     .build(ctx, registry);
//!
//! let player = PlayerId(Uuid::from_u128(1));
//! let spawn = Position::new(100.0, 64.0, 0.0, 0.0, 0.0, "world");
//! let near = Position::new(30.0, 64.0, 0.0, 0.0, 0.0, "world");
//! controller.handle_move(player, &spawn, &near);
//! assert!(npc.is_tracking(player));
//! ```

mod controller;
mod world;

pub use controller::{
    TrackingController, TrackingControllerBuilder, IMITATE_DISTANCE, SPAWN_DISTANCE,
    TAB_REMOVAL_TICKS,
};
pub use world::{
    AlwaysLoaded, NameWorldMapper, NamespacedWorldMapper, StaticWorldView, WorldIdMapper,
    WorldRef, WorldView,
};

#[cfg(test)]
mod tests {
    use super::*;
    use geom::Position;
    use npc::{NpcBuilder, NpcContext, NpcRegistry, QueueScheduler, TaskScheduler};
    use profile::ResolvedProfile;
    use proto::{Backend, PacketSink, PlayerId, RecordingSink};
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
        let registry = Arc::new(NpcRegistry::new());

        let npc = NpcBuilder::new()
            .entity_id(1)
            .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
            .position(Position::new(0.0, 64.0, 0.0, 0.0, 0.0, "world"))
            .build_and_register(Arc::clone(&ctx), &registry)
            .unwrap();

        let controller = TrackingControllerBuilder::new()
            .flag(&SPAWN_DISTANCE, 50.0)
            .unwrap()
            .build(ctx, registry);

        let player = PlayerId(Uuid::from_u128(1));
        let spawn = Position::new(100.0, 64.0, 0.0, 0.0, 0.0, "world");
        let near = Position::new(30.0, 64.0, 0.0, 0.0, 0.0, "world");
        controller.handle_move(player, &spawn, &near);
        assert!(npc.is_tracking(player));
    }
}
