use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use futures::executor::block_on;
use geom::Position;
use npc::{
    NpcBuilder, NpcContext, NpcRegistry, QueueScheduler, TaskScheduler, LOOK_AT_PLAYER,
    SNEAK_WHEN_PLAYER_SNEAKS,
};
use profile::{
    CachedResolver, Profile, ProfileProperty, ProfileResolver, ResolvedProfile, StaticResolver,
};
use proto::{Backend, PacketSink, PlayerId, RecordingSink};
use tools::parse_version;
use track::{
    StaticWorldView, TrackingControllerBuilder, WorldView, IMITATE_DISTANCE, SPAWN_DISTANCE,
};
use uuid::Uuid;

#[derive(Parser)]
#[command(
    name = "demo-npc",
    version,
    about = "Deterministic NPC tracking walkthrough"
)]
struct Cli {
    /// Protocol version, e.g. 1.8 or 1.19.3.
    #[arg(long, default_value = "1.20.0")]
    version: String,
    /// Spawn radius in blocks.
    #[arg(long, default_value_t = 50.0)]
    spawn_distance: f64,
    /// Imitation radius in blocks.
    #[arg(long, default_value_t = 20.0)]
    imitate_distance: f64,
    /// Blocks the scripted player covers per tick.
    #[arg(long, default_value_t = 5.0)]
    speed: f64,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();
    let version = parse_version(&cli.version)?;

    let sink = Arc::new(RecordingSink::new());
    let scheduler = Arc::new(QueueScheduler::new());
    let ctx = Arc::new(NpcContext::new(
        version,
        Backend::standard(),
        Arc::clone(&sink) as Arc<dyn PacketSink>,
        Arc::clone(&scheduler) as Arc<dyn TaskScheduler>,
    ));
    let registry = Arc::new(NpcRegistry::new());

    ctx.events().subscribe(|event| {
        log::info!(
            "event {:?} entity={} player={}",
            event.kind(),
            event.entity_id(),
            event.player().0
        );
    });

    let resolver = CachedResolver::new(StaticResolver::new([ResolvedProfile::new(
        "steve",
        Uuid::from_u128(7),
    )
    .context("seed profile")?
    .with_property(ProfileProperty::signed("textures", "dGV4dHVyZXM=", "c2ln"))]));
    let profile = block_on(resolver.resolve(&Profile::by_name("steve").context("lookup key")?))
        .context("resolve profile")?;
    log::info!("resolved profile {} ({})", profile.name(), profile.unique_id());

    let npc_position = Position::new(0.5, 64.0, 0.5, 0.0, 0.0, "world");
    let npc = NpcBuilder::new()
        .entity_id(1)
        .profile(profile)
        .position(npc_position.clone())
        .flag(&LOOK_AT_PLAYER, true)
        .context("look flag")?
        .flag(&SNEAK_WHEN_PLAYER_SNEAKS, true)
        .context("sneak flag")?
        .build_and_register(Arc::clone(&ctx), &registry)
        .context("register npc")?;

    let world_view = Arc::new(StaticWorldView::new());
    world_view.load_around("world", npc_position.chunk(), 8);
    let controller = TrackingControllerBuilder::new()
        .flag(&SPAWN_DISTANCE, cli.spawn_distance)
        .context("spawn distance")?
        .flag(&IMITATE_DISTANCE, cli.imitate_distance)
        .context("imitate distance")?
        .world_view(world_view as Arc<dyn WorldView>)
        .build(Arc::clone(&ctx), Arc::clone(&registry));

    let player = PlayerId(Uuid::from_u128(1));
    let mut here = Position::new(100.0, 64.0, 0.5, 180.0, 0.0, "world");

    // Walk in, look around, sneak, walk back out, then switch worlds.
    log::info!("walking in");
    while here.x() > 2.0 {
        let next = Position::new(here.x() - cli.speed, 64.0, 0.5, 180.0, 0.0, "world");
        controller.handle_move(player, &here, &next);
        here = next;
        scheduler.tick();
    }
    log::info!(
        "arrived at x={} tracking={}",
        here.x(),
        npc.is_tracking(player)
    );

    let turned = here.with_orientation(90.0, -15.0);
    controller.handle_move(player, &here, &turned);
    here = turned;
    scheduler.tick();

    controller.handle_sneak(player, &here, true);
    scheduler.tick();
    controller.handle_sneak(player, &here, false);
    scheduler.tick();

    log::info!("walking out");
    while here.x() < 100.0 {
        let next = Position::new(here.x() + cli.speed, 64.0, 0.5, 90.0, -15.0, "world");
        controller.handle_move(player, &here, &next);
        here = next;
        scheduler.tick();
    }
    log::info!("left the radius, tracking={}", npc.is_tracking(player));

    let nether = Position::new(5.0, 64.0, 0.5, 0.0, 0.0, "nether");
    controller.handle_move(player, &here, &nether);
    controller.handle_move(player, &nether, &Position::new(2.0, 64.0, 0.5, 0.0, 0.0, "nether"));
    scheduler.tick();
    log::info!(
        "switched worlds, tracking={} (distance would allow it)",
        npc.is_tracking(player)
    );

    controller.handle_quit(player);
    while scheduler.pending() > 0 {
        scheduler.tick();
    }

    let mut by_kind: BTreeMap<&'static str, usize> = BTreeMap::new();
    for (_, frame) in sink.sent() {
        *by_kind.entry(frame.kind.name()).or_default() += 1;
    }
    println!("packets sent at {version}:");
    for (kind, count) in by_kind {
        println!("  {kind}: {count}");
    }
    Ok(())
}
