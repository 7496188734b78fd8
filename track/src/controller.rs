//! The per-server tracking controller and its gates.

use std::sync::Arc;

use geom::Position;
use meta::SNEAKING;
use npc::{
    FlagSet, Npc, NpcContext, NpcEvent, NpcEventKind, NpcFlag, NpcRegistry, NpcResult,
    HIT_WHEN_PLAYER_HITS, LOOK_AT_PLAYER, SNEAK_WHEN_PLAYER_SNEAKS,
};
use proto::{AnimationKind, PlayerId};
use wire::ProtocolVersion;

use crate::world::{AlwaysLoaded, WorldView};

fn non_negative(value: &f64) -> bool {
    *value >= 0.0
}

/// Blocks past this distance never see the NPC; the value is in blocks.
pub static SPAWN_DISTANCE: NpcFlag<f64> =
    NpcFlag::new("action_spawn_distance", 50.0).with_validator(non_negative);

/// Ticks after the spawn packet until the tab-list entry is removed again
/// on versions without the split player-info packets.
pub static TAB_REMOVAL_TICKS: NpcFlag<u32> = NpcFlag::new("action_tab_removal", 30);

/// Imitation (look, sneak, hit mirroring) only fires inside this radius.
pub static IMITATE_DISTANCE: NpcFlag<f64> =
    NpcFlag::new("action_imitate_distance", 20.0).with_validator(non_negative);

/// Step-by-step construction of a [`TrackingController`].
pub struct TrackingControllerBuilder {
    flags: FlagSet,
    world_view: Arc<dyn WorldView>,
}

impl std::fmt::Debug for TrackingControllerBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TrackingControllerBuilder").finish_non_exhaustive()
    }
}

impl Default for TrackingControllerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TrackingControllerBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            flags: FlagSet::new(),
            world_view: Arc::new(AlwaysLoaded),
        }
    }

    /// Overrides a controller flag, running the flag's validator.
    ///
    /// # Errors
    ///
    /// Returns [`npc::NpcError::InvalidFlagValue`] when the validator
    /// rejects the value.
    pub fn flag<T>(mut self, flag: &NpcFlag<T>, value: T) -> NpcResult<Self>
    where
        T: Send + Sync + 'static,
    {
        self.flags.set(flag, value)?;
        Ok(self)
    }

    /// Replaces the chunk-load oracle; defaults to [`AlwaysLoaded`].
    #[must_use]
    pub fn world_view(mut self, view: Arc<dyn WorldView>) -> Self {
        self.world_view = view;
        self
    }

    /// Finishes the controller against `ctx` and `registry`.
    ///
    /// Distances are squared once here; the movement handlers only ever
    /// compare squared values. On versions before the split player-info
    /// packets this also wires up the delayed tab-list cleanup.
    #[must_use]
    pub fn build(self, ctx: Arc<NpcContext>, registry: Arc<NpcRegistry>) -> TrackingController {
        ctx.link_registry(&registry);

        let spawn_distance = self.flags.get(&SPAWN_DISTANCE);
        let imitate_distance = self.flags.get(&IMITATE_DISTANCE);
        let tab_removal_ticks = self.flags.get(&TAB_REMOVAL_TICKS);

        if ctx.version() < ProtocolVersion::V1_19_3 && tab_removal_ticks > 0 {
            subscribe_tab_removal(&ctx, tab_removal_ticks);
        }

        TrackingController {
            ctx,
            registry,
            world_view: self.world_view,
            spawn_distance_sq: spawn_distance * spawn_distance,
            imitate_distance_sq: imitate_distance * imitate_distance,
            tab_removal_ticks,
        }
    }
}

fn subscribe_tab_removal(ctx: &Arc<NpcContext>, delay_ticks: u32) {
    let ctx_weak = Arc::downgrade(ctx);
    ctx.events().subscribe(move |event| {
        if event.kind() != NpcEventKind::PostShow {
            return;
        }
        let Some(ctx) = ctx_weak.upgrade() else {
            return;
        };
        let Some(registry) = ctx.registry() else {
            return;
        };
        let Some(npc) = registry.get(event.entity_id()) else {
            return;
        };
        let player = event.player();
        let unique_id = npc.profile().unique_id();
        let task_ctx = Arc::downgrade(&ctx);
        ctx.scheduler().run_after(
            delay_ticks,
            Box::new(move || {
                let Some(ctx) = task_ctx.upgrade() else {
                    return;
                };
                ctx.factory()
                    .player_info_remove(unique_id)
                    .send_to(ctx.sink(), player);
            }),
        );
    });
}

/// Per-server visibility engine.
///
/// Bound to player movement, sneak, left-click and disconnect events; each
/// handler walks the registry snapshot and applies the gates in order:
/// world/chunk first (no distance math for a player in the wrong world),
/// then squared distance against the spawn radius, then imitation for
/// players already tracking.
pub struct TrackingController {
    ctx: Arc<NpcContext>,
    registry: Arc<NpcRegistry>,
    world_view: Arc<dyn WorldView>,
    spawn_distance_sq: f64,
    imitate_distance_sq: f64,
    tab_removal_ticks: u32,
}

impl TrackingController {
    /// Squared spawn radius, in blocks squared.
    #[must_use]
    pub const fn spawn_distance_sq(&self) -> f64 {
        self.spawn_distance_sq
    }

    /// Squared imitation radius, in blocks squared.
    #[must_use]
    pub const fn imitate_distance_sq(&self) -> f64 {
        self.imitate_distance_sq
    }

    /// Tab-list cleanup delay in ticks; `0` disables the cleanup.
    #[must_use]
    pub const fn tab_removal_ticks(&self) -> u32 {
        self.tab_removal_ticks
    }

    /// The registry this controller walks.
    #[must_use]
    pub fn registry(&self) -> &Arc<NpcRegistry> {
        &self.registry
    }

    /// Reacts to a player moving from `from` to `to`.
    ///
    /// A move that changes nothing is ignored outright. Orientation-only
    /// moves still run the gates, since look imitation triggers on them.
    pub fn handle_move(&self, player: PlayerId, from: &Position, to: &Position) {
        if from.same_coords(to) && from.same_orientation(to) && from.same_world(to) {
            return;
        }
        let orientation_changed = !from.same_orientation(to);

        for npc in self.registry.npcs() {
            let npc_position = npc.position();

            if !npc_position.same_world(to)
                || !self
                    .world_view
                    .chunk_loaded(npc_position.world_id(), npc_position.chunk())
            {
                npc.stop_tracking_player(player);
                continue;
            }

            let distance_sq = npc_position.distance_sq(to);
            if distance_sq > self.spawn_distance_sq {
                npc.stop_tracking_player(player);
                continue;
            }
            npc.track_player(player);

            if orientation_changed
                && npc.is_tracking(player)
                && distance_sq <= self.imitate_distance_sq
                && npc.flag_value(&LOOK_AT_PLAYER)
            {
                npc.look_at_for(player, to);
            }
        }
    }

    /// Mirrors a sneak toggle onto nearby NPCs with the sneak flag set.
    pub fn handle_sneak(&self, player: PlayerId, position: &Position, sneaking: bool) {
        for npc in self.registry.npcs() {
            if self.imitation_applies(&npc, player, position)
                && npc.flag_value(&SNEAK_WHEN_PLAYER_SNEAKS)
            {
                npc.set_metadata_for(player, &SNEAKING, &sneaking);
            }
        }
    }

    /// Mirrors an arm swing onto nearby NPCs with the hit flag set.
    pub fn handle_left_click(&self, player: PlayerId, position: &Position) {
        for npc in self.registry.npcs() {
            if self.imitation_applies(&npc, player, position)
                && npc.flag_value(&HIT_WHEN_PLAYER_HITS)
            {
                npc.play_animation_for(player, AnimationKind::SwingMainArm);
            }
        }
    }

    /// Posts an attack event for the NPC `entity_id`, if registered.
    pub fn handle_npc_attack(&self, player: PlayerId, entity_id: i32) {
        if self.registry.get(entity_id).is_some() {
            let mut event = NpcEvent::attack(entity_id, player);
            self.ctx.events().post(&mut event);
        }
    }

    /// Posts an interact event for the NPC `entity_id`, if registered.
    pub fn handle_npc_interact(
        &self,
        player: PlayerId,
        entity_id: i32,
        hand: npc::InteractHand,
    ) {
        if self.registry.get(entity_id).is_some() {
            let mut event = NpcEvent::interact(entity_id, player, hand);
            self.ctx.events().post(&mut event);
        }
    }

    /// Hides every NPC from a disconnecting player, regardless of distance.
    pub fn handle_quit(&self, player: PlayerId) {
        log::debug!("player {:?} quit, clearing tracking", player.0);
        for npc in self.registry.npcs() {
            npc.stop_tracking_player(player);
        }
    }

    fn imitation_applies(&self, npc: &Npc, player: PlayerId, position: &Position) -> bool {
        let npc_position = npc.position();
        npc_position.same_world(position)
            && npc.is_tracking(player)
            && npc_position.distance_sq(position) <= self.imitate_distance_sq
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distances_are_squared_once() {
        let builder = TrackingControllerBuilder::new()
            .flag(&SPAWN_DISTANCE, 10.0)
            .unwrap()
            .flag(&IMITATE_DISTANCE, 4.0)
            .unwrap();
        assert!((builder.flags.get(&SPAWN_DISTANCE) - 10.0).abs() < f64::EPSILON);
        assert!((builder.flags.get(&IMITATE_DISTANCE) - 4.0).abs() < f64::EPSILON);
    }

    #[test]
    fn spawn_distance_rejects_negative_values() {
        let err = TrackingControllerBuilder::new()
            .flag(&SPAWN_DISTANCE, -1.0)
            .unwrap_err();
        assert_eq!(
            err,
            npc::NpcError::InvalidFlagValue {
                flag: "action_spawn_distance"
            }
        );
    }
}
