//! The NPC aggregate: per-player visibility, flags and broadcast helpers.

use std::collections::HashSet;
use std::sync::{Arc, Weak};

use geom::Position;
use parking_lot::RwLock;
use profile::{Profile, ProfileResolver, ResolvedProfile};
use proto::{
    AnimationKind, Backend, ChannelId, ItemPayload, ItemSlot, OutboundPacket, PacketFactory,
    PacketSink, PlayerId,
};
use uuid::Uuid;
use wire::ProtocolVersion;

use meta::MetadataFactory;

use crate::error::{NpcError, NpcResult};
use crate::event::{EventBus, NpcEvent};
use crate::flag::{FlagSet, NpcFlag, DISPLAY_NAME};
use crate::registry::NpcRegistry;
use crate::rule::NpcSettings;
use crate::scheduler::TaskScheduler;

/// Ticks between the player-info add and the spawn packet.
///
/// Clients ignore a spawn for a uuid they have not finished adding to the
/// tab list, so the spawn trails the info packet by half a second.
pub const SPAWN_DELAY_TICKS: u32 = 10;

/// Shared environment every NPC operates in.
///
/// One context per (version, backend, transport) combination; NPCs hold it
/// by `Arc` and go through it for encoding, dispatch, events and scheduling.
pub struct NpcContext {
    factory: PacketFactory,
    sink: Arc<dyn PacketSink>,
    events: EventBus,
    scheduler: Arc<dyn TaskScheduler>,
    registry: RwLock<Weak<NpcRegistry>>,
}

impl NpcContext {
    #[must_use]
    pub fn new(
        version: ProtocolVersion,
        backend: Backend,
        sink: Arc<dyn PacketSink>,
        scheduler: Arc<dyn TaskScheduler>,
    ) -> Self {
        Self {
            factory: PacketFactory::new(version, backend),
            sink,
            events: EventBus::new(),
            scheduler,
            registry: RwLock::new(Weak::new()),
        }
    }

    /// The protocol version every packet from this context targets.
    #[must_use]
    pub const fn version(&self) -> ProtocolVersion {
        self.factory.version()
    }

    /// The packet factory for this context's version and backend.
    #[must_use]
    pub const fn factory(&self) -> &PacketFactory {
        &self.factory
    }

    /// The transport frames are dispatched to.
    #[must_use]
    pub fn sink(&self) -> &dyn PacketSink {
        self.sink.as_ref()
    }

    /// The event bus lifecycle and interaction events are posted on.
    #[must_use]
    pub const fn events(&self) -> &EventBus {
        &self.events
    }

    /// The scheduler used for delayed spawns and background work.
    #[must_use]
    pub fn scheduler(&self) -> &Arc<dyn TaskScheduler> {
        &self.scheduler
    }

    /// Points this context at a registry so [`Npc::unlink`] can deregister.
    pub fn link_registry(&self, registry: &Arc<NpcRegistry>) {
        *self.registry.write() = Arc::downgrade(registry);
    }

    /// The linked registry, if one was set and is still alive.
    #[must_use]
    pub fn registry(&self) -> Option<Arc<NpcRegistry>> {
        self.registry.read().upgrade()
    }
}

/// A server-side fake player, visible per player rather than globally.
///
/// Visibility transitions are not atomic with respect to their events: the
/// tracked-set change is committed first, then the pre-event runs, and a
/// cancellation stops the packets but leaves the membership change in place.
/// Handlers observing `is_tracking` mid-transition see the new state.
pub struct Npc {
    entity_id: i32,
    profile: ResolvedProfile,
    position: RwLock<Position>,
    flags: RwLock<FlagSet>,
    settings: NpcSettings,
    included: RwLock<HashSet<PlayerId>>,
    tracked: RwLock<HashSet<PlayerId>>,
    ctx: Arc<NpcContext>,
    self_ref: Weak<Npc>,
}

impl std::fmt::Debug for Npc {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Npc")
            .field("entity_id", &self.entity_id)
            .finish_non_exhaustive()
    }
}

impl Npc {
    /// The entity id packets about this NPC carry.
    #[must_use]
    pub const fn entity_id(&self) -> i32 {
        self.entity_id
    }

    /// The resolved game profile (name, uuid, skin textures).
    #[must_use]
    pub const fn profile(&self) -> &ResolvedProfile {
        &self.profile
    }

    /// Snapshot of the current position.
    #[must_use]
    pub fn position(&self) -> Position {
        self.position.read().clone()
    }

    /// The shared context this NPC was built against.
    #[must_use]
    pub fn context(&self) -> &Arc<NpcContext> {
        &self.ctx
    }

    /// Construction-time settings.
    #[must_use]
    pub const fn settings(&self) -> &NpcSettings {
        &self.settings
    }

    /// Whether `player` currently sees this NPC.
    #[must_use]
    pub fn is_tracking(&self, player: PlayerId) -> bool {
        self.tracked.read().contains(&player)
    }

    /// Snapshot of every player currently seeing this NPC.
    #[must_use]
    pub fn tracked_players(&self) -> Vec<PlayerId> {
        self.tracked.read().iter().copied().collect()
    }

    /// Adds `player` to the include list consulted by
    /// [`TrackingRule::OnlyIncluded`](crate::rule::TrackingRule).
    pub fn include_player(&self, player: PlayerId) {
        self.included.write().insert(player);
    }

    /// Removes `player` from the include list. Does not hide the NPC.
    pub fn exclude_player(&self, player: PlayerId) {
        self.included.write().remove(&player);
    }

    /// Whether `player` is on the include list.
    #[must_use]
    pub fn is_included(&self, player: PlayerId) -> bool {
        self.included.read().contains(&player)
    }

    /// Reads a flag value, falling back to the flag's default.
    #[must_use]
    pub fn flag_value<T>(&self, flag: &NpcFlag<T>) -> T
    where
        T: Clone + Send + Sync + 'static,
    {
        self.flags.read().get(flag)
    }

    /// Sets a flag value.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::InvalidFlagValue`] when the flag's validator
    /// rejects the value.
    pub fn set_flag<T>(&self, flag: &NpcFlag<T>, value: T) -> NpcResult<()>
    where
        T: Send + Sync + 'static,
    {
        self.flags.write().set(flag, value)
    }

    /// Shows the NPC to `player` if the tracking rule allows it.
    ///
    /// Returns whether a show transition started.
    pub fn track_player(&self, player: PlayerId) -> bool {
        if !self.settings.rule.accepts(self, player) {
            return false;
        }
        self.force_track_player(player)
    }

    /// Shows the NPC to `player`, bypassing the tracking rule.
    ///
    /// The transition adds `player` to the tracked set, posts a cancellable
    /// pre-show event, sends the player-info add immediately and schedules
    /// the spawn packet [`SPAWN_DELAY_TICKS`] later. The delayed task checks
    /// the tracked set again at fire time, so a hide racing the delay
    /// suppresses the spawn. Returns `false` when `player` already tracked
    /// the NPC or a handler cancelled the show.
    pub fn force_track_player(&self, player: PlayerId) -> bool {
        if !self.tracked.write().insert(player) {
            return false;
        }

        let mut event = NpcEvent::pre_show(self.entity_id, player);
        self.ctx.events.post(&mut event);
        if event.is_cancelled() {
            log::debug!(
                "pre-show cancelled for entity {} and player {:?}",
                self.entity_id,
                player.0
            );
            return false;
        }

        let display_name = self.flag_value(&DISPLAY_NAME);
        let shown = self.settings.profile_strategy.profile_for(self, player);
        let shown_uuid = shown.unique_id();
        self.ctx
            .factory()
            .player_info_add(&shown, display_name.as_deref())
            .send_to(self.ctx.sink(), player);

        let weak = Weak::clone(&self.self_ref);
        self.ctx.scheduler().run_after(
            SPAWN_DELAY_TICKS,
            Box::new(move || {
                let Some(npc) = weak.upgrade() else {
                    return;
                };
                if !npc.is_tracking(player) {
                    return;
                }
                let position = npc.position();
                npc.ctx
                    .factory()
                    .spawn(npc.entity_id, shown_uuid, &position)
                    .send_to(npc.ctx.sink(), player);
                let mut event = NpcEvent::post_show(npc.entity_id, player);
                npc.ctx.events.post(&mut event);
            }),
        );
        true
    }

    /// Hides the NPC from `player`.
    ///
    /// Removes `player` from the tracked set, posts a cancellable pre-hide
    /// event, then sends the destroy and player-info remove. Returns `false`
    /// when `player` was not tracking or a handler cancelled the hide.
    pub fn stop_tracking_player(&self, player: PlayerId) -> bool {
        if !self.tracked.write().remove(&player) {
            return false;
        }

        let mut event = NpcEvent::pre_hide(self.entity_id, player);
        self.ctx.events.post(&mut event);
        if event.is_cancelled() {
            log::debug!(
                "pre-hide cancelled for entity {} and player {:?}",
                self.entity_id,
                player.0
            );
            return false;
        }

        let sink = self.ctx.sink();
        self.ctx.factory().destroy(self.entity_id).send_to(sink, player);
        self.ctx
            .factory()
            .player_info_remove(self.profile.unique_id())
            .send_to(sink, player);

        let mut event = NpcEvent::post_hide(self.entity_id, player);
        self.ctx.events.post(&mut event);
        true
    }

    /// Deregisters the NPC and hides it from every tracking player.
    ///
    /// The registry entry goes first so concurrent lookups stop handing the
    /// NPC out while the per-player hides run.
    pub fn unlink(&self) {
        if let Some(registry) = self.ctx.registry() {
            registry.remove(self.entity_id);
        }
        for player in self.tracked_players() {
            self.stop_tracking_player(player);
        }
    }

    /// Updates the stored position without sending anything.
    ///
    /// The new position is what late joiners spawn at; players already
    /// tracking keep their last-seen location until a rotation or respawn.
    pub fn teleport(&self, position: Position) {
        *self.position.write() = position;
    }

    /// Rotates the NPC for every tracking player and stores the orientation.
    pub fn rotate(&self, yaw: f32, pitch: f32) {
        let position = {
            let mut guard = self.position.write();
            *guard = guard.with_orientation(yaw, pitch);
            guard.clone()
        };
        self.broadcast(
            self.ctx
                .factory()
                .rotate(self.entity_id, &position, yaw, pitch),
        );
    }

    /// Rotates the NPC for a single player, leaving the stored orientation.
    pub fn rotate_for(&self, player: PlayerId, yaw: f32, pitch: f32) {
        let position = self.position();
        self.ctx
            .factory()
            .rotate(self.entity_id, &position, yaw, pitch)
            .send_to(self.ctx.sink(), player);
    }

    /// Turns the NPC to face `target` for every tracking player.
    pub fn look_at(&self, target: &Position) {
        let (yaw, pitch) = geom::look_at(&self.position(), target);
        self.rotate(yaw, pitch);
    }

    /// Turns the NPC to face `target` for a single player only.
    pub fn look_at_for(&self, player: PlayerId, target: &Position) {
        let (yaw, pitch) = geom::look_at(&self.position(), target);
        self.rotate_for(player, yaw, pitch);
    }

    /// Plays an animation for every tracking player.
    pub fn play_animation(&self, kind: AnimationKind) {
        self.broadcast(self.ctx.factory().animate(self.entity_id, kind));
    }

    /// Plays an animation for a single player.
    pub fn play_animation_for(&self, player: PlayerId, kind: AnimationKind) {
        self.ctx
            .factory()
            .animate(self.entity_id, kind)
            .send_to(self.ctx.sink(), player);
    }

    /// Equips an item for every tracking player.
    pub fn set_equipment(&self, slot: ItemSlot, item: &ItemPayload) {
        self.broadcast(self.ctx.factory().equip(self.entity_id, slot, item));
    }

    /// Applies a metadata value for every tracking player.
    pub fn set_metadata<I>(&self, factory: &MetadataFactory<I>, input: &I) {
        self.broadcast(self.ctx.factory().metadata(self.entity_id, factory, input));
    }

    /// Applies a metadata value for a single player.
    pub fn set_metadata_for<I>(&self, player: PlayerId, factory: &MetadataFactory<I>, input: &I) {
        self.ctx
            .factory()
            .metadata(self.entity_id, factory, input)
            .send_to(self.ctx.sink(), player);
    }

    /// Sends a plugin message to every tracking player.
    pub fn send_custom_payload(&self, channel: &ChannelId, payload: &[u8]) {
        self.broadcast(self.ctx.factory().custom_payload(channel, payload));
    }

    fn broadcast(&self, packet: OutboundPacket) {
        packet.send_to_each(self.ctx.sink(), self.tracked_players());
    }
}

/// Step-by-step construction of an [`Npc`].
#[derive(Default)]
pub struct NpcBuilder {
    entity_id: Option<i32>,
    profile: Option<ResolvedProfile>,
    position: Option<Position>,
    flags: FlagSet,
    settings: NpcSettings,
}

impl NpcBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fixes the entity id instead of deriving a random one.
    #[must_use]
    pub fn entity_id(mut self, entity_id: i32) -> Self {
        self.entity_id = Some(entity_id);
        self
    }

    /// The resolved profile the NPC appears as. Required.
    #[must_use]
    pub fn profile(mut self, profile: ResolvedProfile) -> Self {
        self.profile = Some(profile);
        self
    }

    /// Resolves `profile` through `resolver` and uses the result.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::ProfileResolution`] when the resolver fails.
    pub async fn resolve_profile(
        self,
        profile: &Profile,
        resolver: &dyn ProfileResolver,
    ) -> NpcResult<Self> {
        let resolved = resolver.resolve(profile).await?;
        Ok(self.profile(resolved))
    }

    /// The spawn position. Required.
    #[must_use]
    pub fn position(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    /// Pre-sets a flag value, running the flag's validator.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::InvalidFlagValue`] when the validator rejects
    /// the value.
    pub fn flag<T>(mut self, flag: &NpcFlag<T>, value: T) -> NpcResult<Self>
    where
        T: Send + Sync + 'static,
    {
        self.flags.set(flag, value)?;
        Ok(self)
    }

    /// Replaces the settings.
    #[must_use]
    pub fn settings(mut self, settings: NpcSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Finishes the NPC against `ctx`.
    ///
    /// # Errors
    ///
    /// Returns [`NpcError::MissingProfile`] or [`NpcError::MissingPosition`]
    /// when a required field is unset.
    pub fn build(self, ctx: Arc<NpcContext>) -> NpcResult<Arc<Npc>> {
        let profile = self.profile.ok_or(NpcError::MissingProfile)?;
        let position = self.position.ok_or(NpcError::MissingPosition)?;
        let entity_id = self.entity_id.unwrap_or_else(random_entity_id);

        Ok(Arc::new_cyclic(|weak| Npc {
            entity_id,
            profile,
            position: RwLock::new(position),
            flags: RwLock::new(self.flags),
            settings: self.settings,
            included: RwLock::new(HashSet::new()),
            tracked: RwLock::new(HashSet::new()),
            ctx,
            self_ref: Weak::clone(weak),
        }))
    }

    /// Finishes the NPC and registers it in one step.
    ///
    /// # Errors
    ///
    /// Builder errors as in [`NpcBuilder::build`], plus
    /// [`NpcError::DuplicateEntityId`] when the id is taken.
    pub fn build_and_register(
        self,
        ctx: Arc<NpcContext>,
        registry: &Arc<NpcRegistry>,
    ) -> NpcResult<Arc<Npc>> {
        ctx.link_registry(registry);
        let npc = self.build(ctx)?;
        registry.insert(Arc::clone(&npc))?;
        Ok(npc)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn random_entity_id() -> i32 {
    (Uuid::new_v4().as_u128() & 0x7FFF_FFFF) as i32
}
