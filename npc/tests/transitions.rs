use std::sync::Arc;

use geom::Position;
use npc::{
    Npc, NpcBuilder, NpcContext, NpcEventKind, NpcRegistry, QueueScheduler, TaskScheduler,
    SPAWN_DELAY_TICKS,
};
use parking_lot::Mutex;
use profile::ResolvedProfile;
use proto::{Backend, PacketKind, PacketSink, PlayerId, RecordingSink};
use uuid::Uuid;
use wire::ProtocolVersion;

struct Harness {
    sink: Arc<RecordingSink>,
    scheduler: Arc<QueueScheduler>,
    ctx: Arc<NpcContext>,
}

fn harness() -> Harness {
    let sink = Arc::new(RecordingSink::new());
    let scheduler = Arc::new(QueueScheduler::new());
    let ctx = Arc::new(NpcContext::new(
        ProtocolVersion::V1_20,
        Backend::standard(),
        Arc::clone(&sink) as Arc<dyn PacketSink>,
        Arc::clone(&scheduler) as Arc<dyn TaskScheduler>,
    ));
    Harness {
        sink,
        scheduler,
        ctx,
    }
}

fn spawn_npc(ctx: &Arc<NpcContext>, entity_id: i32) -> Arc<Npc> {
    NpcBuilder::new()
        .entity_id(entity_id)
        .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
        .position(Position::new(0.5, 64.0, 0.5, 0.0, 0.0, "world"))
        .build(Arc::clone(ctx))
        .unwrap()
}

fn player(n: u128) -> PlayerId {
    PlayerId(Uuid::from_u128(n))
}

fn record_events(ctx: &NpcContext) -> Arc<Mutex<Vec<NpcEventKind>>> {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    ctx.events().subscribe(move |event| log.lock().push(event.kind()));
    seen
}

#[test]
fn show_then_hide_runs_the_full_event_cycle() {
    let h = harness();
    let events = record_events(&h.ctx);
    let npc = spawn_npc(&h.ctx, 1);

    assert!(npc.force_track_player(player(1)));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);
    assert!(npc.stop_tracking_player(player(1)));

    assert_eq!(
        *events.lock(),
        vec![
            NpcEventKind::PreShow,
            NpcEventKind::PostShow,
            NpcEventKind::PreHide,
            NpcEventKind::PostHide,
        ]
    );
    assert_eq!(
        h.sink.sent_kinds(),
        vec![
            PacketKind::PlayerInfo,
            PacketKind::SpawnPlayer,
            PacketKind::DestroyEntities,
            PacketKind::PlayerInfoRemove,
        ]
    );
    assert!(!npc.is_tracking(player(1)));
}

#[test]
fn double_track_is_idempotent() {
    let h = harness();
    let events = record_events(&h.ctx);
    let npc = spawn_npc(&h.ctx, 1);

    assert!(npc.force_track_player(player(1)));
    assert!(!npc.force_track_player(player(1)));

    assert_eq!(*events.lock(), vec![NpcEventKind::PreShow]);
    assert_eq!(h.sink.sent_kinds(), vec![PacketKind::PlayerInfo]);
}

#[test]
fn hide_before_track_is_a_no_op() {
    let h = harness();
    let events = record_events(&h.ctx);
    let npc = spawn_npc(&h.ctx, 1);

    assert!(!npc.stop_tracking_player(player(1)));
    assert!(events.lock().is_empty());
    assert_eq!(h.sink.count(), 0);
}

#[test]
fn spawn_waits_the_full_delay() {
    let h = harness();
    let npc = spawn_npc(&h.ctx, 1);

    npc.force_track_player(player(1));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS - 1);
    assert_eq!(h.sink.sent_kinds(), vec![PacketKind::PlayerInfo]);

    h.scheduler.tick();
    assert_eq!(
        h.sink.sent_kinds(),
        vec![PacketKind::PlayerInfo, PacketKind::SpawnPlayer]
    );
}

#[test]
fn hide_during_the_delay_suppresses_the_spawn() {
    let h = harness();
    let events = record_events(&h.ctx);
    let npc = spawn_npc(&h.ctx, 1);

    npc.force_track_player(player(1));
    h.scheduler.tick_many(3);
    npc.stop_tracking_player(player(1));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);

    assert_eq!(
        h.sink.sent_kinds(),
        vec![
            PacketKind::PlayerInfo,
            PacketKind::DestroyEntities,
            PacketKind::PlayerInfoRemove,
        ]
    );
    assert!(!events.lock().contains(&NpcEventKind::PostShow));
}

#[test]
fn cancelled_pre_show_keeps_membership_but_sends_nothing() {
    let h = harness();
    h.ctx.events().subscribe(|event| {
        if event.kind() == NpcEventKind::PreShow {
            event.cancel();
        }
    });
    let npc = spawn_npc(&h.ctx, 1);

    assert!(!npc.force_track_player(player(1)));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);

    assert_eq!(h.sink.count(), 0);
    assert!(npc.is_tracking(player(1)), "membership commits before the event");
}

#[test]
fn cancelled_pre_hide_keeps_removal_but_sends_nothing() {
    let h = harness();
    let npc = spawn_npc(&h.ctx, 1);
    npc.force_track_player(player(1));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);
    h.sink.clear();

    h.ctx.events().subscribe(|event| {
        if event.kind() == NpcEventKind::PreHide {
            event.cancel();
        }
    });

    assert!(!npc.stop_tracking_player(player(1)));
    assert_eq!(h.sink.count(), 0);
    assert!(!npc.is_tracking(player(1)), "removal commits before the event");
}

#[test]
fn unlink_deregisters_then_hides_everyone() {
    let h = harness();
    let registry = Arc::new(NpcRegistry::new());
    let npc = NpcBuilder::new()
        .entity_id(9)
        .profile(ResolvedProfile::new("steve", Uuid::from_u128(7)).unwrap())
        .position(Position::new(0.5, 64.0, 0.5, 0.0, 0.0, "world"))
        .build_and_register(Arc::clone(&h.ctx), &registry)
        .unwrap();

    npc.force_track_player(player(1));
    npc.force_track_player(player(2));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);

    npc.unlink();

    assert!(registry.get(9).is_none());
    assert!(npc.tracked_players().is_empty());
    let destroys = h
        .sink
        .sent_kinds()
        .iter()
        .filter(|kind| **kind == PacketKind::DestroyEntities)
        .count();
    assert_eq!(destroys, 2);
}

#[test]
fn broadcast_reaches_only_tracking_players() {
    let h = harness();
    let npc = spawn_npc(&h.ctx, 1);
    npc.force_track_player(player(1));
    npc.force_track_player(player(2));
    h.scheduler.tick_many(SPAWN_DELAY_TICKS);
    h.sink.clear();

    npc.play_animation(proto::AnimationKind::SwingMainArm);

    let sent = h.sink.sent();
    assert_eq!(sent.len(), 2);
    assert!(sent.iter().all(|(_, frame)| frame.kind == PacketKind::EntityAnimation));
}

#[test]
fn registry_rejects_duplicate_entity_ids() {
    let h = harness();
    let registry = Arc::new(NpcRegistry::new());
    registry.insert(spawn_npc(&h.ctx, 3)).unwrap();
    let err = registry.insert(spawn_npc(&h.ctx, 3)).unwrap_err();
    assert_eq!(err, npc::NpcError::DuplicateEntityId { entity_id: 3 });
}
