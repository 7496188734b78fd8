//! Lifecycle and interaction events with an ordered, panic-isolating bus.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use parking_lot::RwLock;
use proto::PlayerId;

/// Which hand a player used to interact with an NPC.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InteractHand {
    MainHand,
    OffHand,
}

/// What happened to an NPC, from a single player's point of view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum NpcEventKind {
    /// The player was added to the tracked set; packets not yet sent.
    PreShow,
    /// The delayed spawn packet went out for this player.
    PostShow,
    /// The player is about to be removed from the tracked set.
    PreHide,
    /// The despawn packets went out for this player.
    PostHide,
    /// The player right-clicked the NPC.
    Interact {
        /// The hand the interaction came from.
        hand: InteractHand,
    },
    /// The player left-clicked the NPC.
    Attack,
}

/// A single event occurrence. Pre-transition events are cancellable.
#[derive(Debug, Clone)]
pub struct NpcEvent {
    entity_id: i32,
    player: PlayerId,
    kind: NpcEventKind,
    cancellable: bool,
    cancelled: bool,
}

impl NpcEvent {
    fn new(entity_id: i32, player: PlayerId, kind: NpcEventKind, cancellable: bool) -> Self {
        Self {
            entity_id,
            player,
            kind,
            cancellable,
            cancelled: false,
        }
    }

    #[must_use]
    pub fn pre_show(entity_id: i32, player: PlayerId) -> Self {
        Self::new(entity_id, player, NpcEventKind::PreShow, true)
    }

    #[must_use]
    pub fn post_show(entity_id: i32, player: PlayerId) -> Self {
        Self::new(entity_id, player, NpcEventKind::PostShow, false)
    }

    #[must_use]
    pub fn pre_hide(entity_id: i32, player: PlayerId) -> Self {
        Self::new(entity_id, player, NpcEventKind::PreHide, true)
    }

    #[must_use]
    pub fn post_hide(entity_id: i32, player: PlayerId) -> Self {
        Self::new(entity_id, player, NpcEventKind::PostHide, false)
    }

    #[must_use]
    pub fn interact(entity_id: i32, player: PlayerId, hand: InteractHand) -> Self {
        Self::new(entity_id, player, NpcEventKind::Interact { hand }, false)
    }

    #[must_use]
    pub fn attack(entity_id: i32, player: PlayerId) -> Self {
        Self::new(entity_id, player, NpcEventKind::Attack, false)
    }

    /// Entity id of the NPC the event concerns.
    #[must_use]
    pub const fn entity_id(&self) -> i32 {
        self.entity_id
    }

    /// The player this occurrence is scoped to.
    #[must_use]
    pub const fn player(&self) -> PlayerId {
        self.player
    }

    /// The event kind.
    #[must_use]
    pub const fn kind(&self) -> NpcEventKind {
        self.kind
    }

    /// Whether handlers may cancel this occurrence.
    #[must_use]
    pub const fn is_cancellable(&self) -> bool {
        self.cancellable
    }

    /// Whether a handler cancelled this occurrence.
    #[must_use]
    pub const fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    /// Marks the occurrence cancelled. Ignored on non-cancellable events.
    pub fn cancel(&mut self) {
        if self.cancellable {
            self.cancelled = true;
        }
    }
}

struct Subscription {
    order: i16,
    handler: Arc<dyn Fn(&mut NpcEvent) + Send + Sync>,
}

/// An ordered list of event handlers.
///
/// Posting runs every handler over a snapshot of the subscription list; a
/// handler cancelling the event does not stop later handlers from seeing it,
/// and a panicking handler is caught and logged so the rest still run.
#[derive(Default)]
pub struct EventBus {
    handlers: RwLock<Vec<Subscription>>,
}

impl EventBus {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes at order `0`.
    pub fn subscribe<F>(&self, handler: F)
    where
        F: Fn(&mut NpcEvent) + Send + Sync + 'static,
    {
        self.subscribe_ordered(0, handler);
    }

    /// Subscribes with an explicit order; lower orders run first, equal
    /// orders run in subscription order.
    pub fn subscribe_ordered<F>(&self, order: i16, handler: F)
    where
        F: Fn(&mut NpcEvent) + Send + Sync + 'static,
    {
        let subscription = Subscription {
            order,
            handler: Arc::new(handler),
        };
        let mut handlers = self.handlers.write();
        let at = handlers.partition_point(|existing| existing.order <= order);
        handlers.insert(at, subscription);
    }

    /// Runs every handler on `event`. The caller inspects
    /// [`NpcEvent::is_cancelled`] afterwards.
    pub fn post(&self, event: &mut NpcEvent) {
        let snapshot: Vec<Arc<dyn Fn(&mut NpcEvent) + Send + Sync>> = {
            let handlers = self.handlers.read();
            handlers.iter().map(|sub| Arc::clone(&sub.handler)).collect()
        };
        for handler in snapshot {
            if panic::catch_unwind(AssertUnwindSafe(|| handler(event))).is_err() {
                log::debug!(
                    "event handler panicked on {:?} for entity {}",
                    event.kind(),
                    event.entity_id()
                );
            }
        }
    }

    /// Number of subscribed handlers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.handlers.read().len()
    }

    /// Whether no handler is subscribed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.handlers.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use uuid::Uuid;

    fn player() -> PlayerId {
        PlayerId(Uuid::from_u128(1))
    }

    #[test]
    fn handlers_run_in_order() {
        let bus = EventBus::new();
        let seen = Arc::new(parking_lot::Mutex::new(Vec::new()));

        let log = Arc::clone(&seen);
        bus.subscribe_ordered(10, move |_| log.lock().push("late"));
        let log = Arc::clone(&seen);
        bus.subscribe_ordered(-10, move |_| log.lock().push("early"));
        let log = Arc::clone(&seen);
        bus.subscribe(move |_| log.lock().push("default"));

        let mut event = NpcEvent::attack(1, player());
        bus.post(&mut event);
        assert_eq!(*seen.lock(), vec!["early", "default", "late"]);
    }

    #[test]
    fn cancellation_does_not_stop_later_handlers() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|event| event.cancel());
        let counter = Arc::clone(&calls);
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut event = NpcEvent::pre_show(1, player());
        bus.post(&mut event);
        assert!(event.is_cancelled());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_ignored_on_non_cancellable() {
        let mut event = NpcEvent::post_show(1, player());
        assert!(!event.is_cancellable());
        event.cancel();
        assert!(!event.is_cancelled());
    }

    #[test]
    fn panicking_handler_does_not_poison_the_bus() {
        let bus = EventBus::new();
        let calls = Arc::new(AtomicUsize::new(0));

        bus.subscribe(|_| panic!("boom"));
        let counter = Arc::clone(&calls);
        bus.subscribe(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let mut event = NpcEvent::attack(1, player());
        bus.post(&mut event);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        bus.post(&mut NpcEvent::attack(2, player()));
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn interact_carries_the_hand() {
        let event = NpcEvent::interact(3, player(), InteractHand::OffHand);
        assert_eq!(
            event.kind(),
            NpcEventKind::Interact {
                hand: InteractHand::OffHand
            }
        );
    }
}
