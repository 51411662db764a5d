//! Integration test: population maintenance across ticks.
//!
//! Drives a [`CrowdEngine`] against the test-utils doubles and checks the
//! slot-table guarantees: retired actors are destroyed exactly once, the
//! solver steps once per tick, empty slots are refilled or accounted for,
//! and a starved pool keeps running.

use throng_core::{Bounds, SlotId, TickId, Vec2, Vec3};
use throng_engine::{CrowdConfig, CrowdEngine, RetireReason, Retirement};
use throng_test_utils::{ChainGraph, MockActorWorld, RecordingAvoidance, ScriptedRandom};

fn config(pool_size: usize, lookahead: usize) -> CrowdConfig {
    let mut config = CrowdConfig {
        bounds: Bounds::new(Vec2::new(-1.0, -1.0), Vec2::new(100.0, 1.0)),
        pool_size,
        ..CrowdConfig::default()
    };
    config.path.lookahead = lookahead;
    config.path.branch_probability = 0.0;
    config
}

fn build(
    config: CrowdConfig,
    graph: ChainGraph,
    world: &MockActorWorld,
    avoidance: &RecordingAvoidance,
) -> CrowdEngine {
    CrowdEngine::new(
        config,
        Box::new(graph),
        Box::new(avoidance.clone()),
        Box::new(world.clone()),
        Box::new(ScriptedRandom::new(vec![0.13, 0.71, 0.42, 0.05, 0.88, 0.37])),
    )
    .unwrap()
}

#[test]
fn fallen_agent_is_destroyed_exactly_once() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    let mut engine = build(config(1, 5), ChainGraph::looped(80, 1.0), &world, &avoidance);
    engine.fill_pool();
    let spot = world.actor(0).unwrap().position;

    // Still on a valid path, just below the floor.
    world.teleport(0, Vec3::new(spot.x, spot.y, -11.0));
    let result = engine.execute_tick();
    assert_eq!(
        result.retired,
        vec![Retirement {
            slot: SlotId(0),
            reason: RetireReason::FellThrough
        }]
    );
    assert_eq!(result.metrics.retired_fell_through, 1);

    for _ in 0..10 {
        engine.execute_tick();
    }
    let fallen = world.actor(0).unwrap();
    assert!(!fallen.alive);
    assert_eq!(fallen.destroy_calls, 1);
    assert!(world.actors().iter().all(|a| a.destroy_calls <= 1));
}

#[test]
fn floor_is_exclusive() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    let mut engine = build(config(1, 5), ChainGraph::looped(80, 1.0), &world, &avoidance);
    engine.fill_pool();
    let spot = world.actor(0).unwrap().position;
    world.teleport(0, Vec3::new(spot.x, spot.y, -10.0));
    assert!(engine.execute_tick().retired.is_empty());
}

#[test]
fn solver_steps_once_per_tick_regardless_of_population() {
    for pool_size in [1, 7, 50] {
        let world = MockActorWorld::new();
        let avoidance = RecordingAvoidance::new();
        let mut engine = build(
            config(pool_size, 5),
            ChainGraph::looped(80, 1.0),
            &world,
            &avoidance,
        );
        for _ in 0..12 {
            engine.execute_tick();
        }
        let log = avoidance.log();
        assert_eq!(log.step_count, 12);
        // Every slot, empty or not, gets one submission per tick.
        assert!(log.submissions_per_step.iter().all(|&n| n == pool_size));
        assert_eq!(engine.current_tick(), TickId(12));
    }
}

#[test]
fn dead_end_retires_with_zero_velocity() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    // Three points cannot satisfy a lookahead of five.
    let mut engine = build(config(1, 5), ChainGraph::line(3, 1.0), &world, &avoidance);
    engine.fill_pool();

    let result = engine.execute_tick();
    assert_eq!(
        result.retired,
        vec![Retirement {
            slot: SlotId(0),
            reason: RetireReason::NoPath
        }]
    );
    assert_eq!(avoidance.log().preferred[&SlotId(0)], Vec2::ZERO);
    let first = world.actor(0).unwrap();
    assert_eq!(first.destroy_calls, 1);
    assert_eq!(first.velocity, Vec2::ZERO);
    // The slot is refilled in the same tick.
    assert_eq!(result.spawned, vec![SlotId(0)]);
    assert_eq!(engine.live_count(), 1);
}

#[test]
fn single_spawn_cell_stabilizes_at_one() {
    let world = MockActorWorld::new().with_clearance(0.5);
    let avoidance = RecordingAvoidance::new();
    let graph = ChainGraph::from_positions(vec![Vec2::new(5.0, 0.0)], true);
    let mut engine = build(config(2, 3), graph, &world, &avoidance);

    for _ in 0..50 {
        let result = engine.execute_tick();
        assert_eq!(result.metrics.live_agents, 1);
    }
    assert_eq!(engine.live_count(), 1);
    assert_eq!(world.live_count(), 1);
    assert!(world.spawn_failures() > 0);
    assert_eq!(engine.shortfall_ticks(), 50);
}

#[test]
fn respawn_fills_pool_or_exhausts_attempts() {
    let world = MockActorWorld::new().with_clearance(3.0);
    let avoidance = RecordingAvoidance::new();
    let mut cfg = config(12, 5);
    cfg.spawn_attempts_per_slot = 2;
    let attempts = cfg.spawn_attempts_per_slot as usize;
    let pool = cfg.pool_size;
    let mut engine = build(cfg, ChainGraph::looped(30, 1.0), &world, &avoidance);

    for _ in 0..40 {
        world.advance(1.0);
        let result = engine.execute_tick();
        let live = result.metrics.live_agents as usize;
        assert_eq!(live, engine.live_count());
        assert!(
            live == pool || result.metrics.spawn_failures as usize >= (pool - live) * attempts,
            "live {live} with only {} failed attempts",
            result.metrics.spawn_failures
        );
    }
}

#[test]
fn snaps_outside_bounds_never_reach_the_factory() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    // Every route point sits above the top edge of the bounds.
    let graph = ChainGraph::from_positions(
        (0..12).map(|i| Vec2::new(i as f64 * 8.0, 5.0)).collect(),
        true,
    );
    let mut cfg = config(3, 3);
    cfg.spawn_attempts_per_slot = 2;
    let mut engine = build(cfg, graph, &world, &avoidance);

    assert!(engine.fill_pool().is_empty());
    for _ in 0..5 {
        let result = engine.execute_tick();
        assert!(result.spawned.is_empty());
        assert_eq!(result.metrics.spawn_attempts, 6);
        assert_eq!(result.metrics.spawn_failures, 6);
    }
    assert_eq!(world.spawn_attempts(), 0);
    assert!(world.actors().is_empty());
    assert_eq!(engine.live_count(), 0);
}

#[test]
fn spawns_stay_inside_bounds_when_some_points_lie_outside() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    let mut positions: Vec<Vec2> = (0..4).map(|i| Vec2::new(i as f64, 0.0)).collect();
    positions.extend((40..=60).map(|x| Vec2::new(x as f64, 4.0)));
    let mut cfg = config(10, 4);
    cfg.seed = 11;
    let bounds = cfg.bounds;
    let mut engine = CrowdEngine::seeded(
        cfg,
        Box::new(ChainGraph::from_positions(positions, true)),
        Box::new(avoidance.clone()),
        Box::new(world.clone()),
    )
    .unwrap();

    let (mut attempts, mut failures) = (0u64, 0u64);
    for _ in 0..20 {
        let result = engine.execute_tick();
        attempts += u64::from(result.metrics.spawn_attempts);
        failures += u64::from(result.metrics.spawn_failures);
    }

    // Actors never move here, so their positions are where they spawned.
    let actors = world.actors();
    assert!(!actors.is_empty());
    assert!(actors.iter().all(|a| bounds.contains(a.position.xy())));
    assert!(failures > 0);
    // The factory accepts every call, so each failure was rejected before it.
    assert_eq!(world.spawn_attempts(), attempts - failures);
    assert_eq!(world.spawn_failures(), 0);
}

#[test]
fn retired_slots_keep_their_identity() {
    let world = MockActorWorld::new();
    let avoidance = RecordingAvoidance::new();
    let mut engine = build(config(3, 5), ChainGraph::looped(80, 1.0), &world, &avoidance);
    engine.fill_pool();
    let before: Vec<usize> = world.live_ids();

    world.teleport(before[1], Vec3::new(-50.0, 0.0, 3.0));
    let result = engine.execute_tick();
    assert_eq!(result.retired.len(), 1);
    assert_eq!(result.retired[0].slot, SlotId(1));
    assert_eq!(result.spawned, vec![SlotId(1)]);

    // Slots 0 and 2 still hold the original actors.
    let after = world.live_ids();
    assert!(after.contains(&before[0]));
    assert!(after.contains(&before[2]));
    assert!(!after.contains(&before[1]));
    // No re-registration.
    assert_eq!(avoidance.log().registered.len(), 3);
}

mod props {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn every_tick_fills_or_exhausts(
            pool in 1usize..24,
            clearance in 0.0f64..4.0,
            seed in any::<u64>(),
            ticks in 1usize..20,
        ) {
            let world = MockActorWorld::new().with_clearance(clearance);
            let avoidance = RecordingAvoidance::new();
            let mut cfg = config(pool, 4);
            cfg.seed = seed;
            let attempts = cfg.spawn_attempts_per_slot as usize;
            let mut engine = CrowdEngine::seeded(
                cfg,
                Box::new(ChainGraph::looped(40, 1.0)),
                Box::new(avoidance.clone()),
                Box::new(world.clone()),
            )
            .unwrap();

            for _ in 0..ticks {
                world.advance(0.5);
                let r = engine.execute_tick();
                let live = r.metrics.live_agents as usize;
                prop_assert_eq!(live, world.live_count());
                prop_assert!(live == pool || r.metrics.spawn_failures as usize >= (pool - live) * attempts);
            }
            prop_assert_eq!(avoidance.step_count(), ticks as u64);
            prop_assert!(world.actors().iter().all(|a| a.destroy_calls <= 1));
        }
    }
}
