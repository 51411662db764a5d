//! Throng demo: a crowd walking a grid of city blocks.
//!
//! Demonstrates:
//!   1. Loading a `CrowdConfig` from TOML (or using the defaults)
//!   2. Building a sidewalk network with `PolylineGraph::block_grid`
//!   3. Running a `CrowdEngine` against an in-memory actor world
//!
//! Run with:
//!   RUST_LOG=throng_engine=debug cargo run --example sidewalk_loop --features serde [config.toml]
//!
//! Any field missing from the TOML file keeps its default, including fields
//! of the `[path]` and `[agent_params]` tables. A `[bounds]` table must give
//! both corners. For example:
//!
//! ```toml
//! pool_size = 120
//! seed = 7
//! [path]
//! branch_probability = 0.05
//! ```

use std::error::Error;

use throng_core::Vec2;
use throng_engine::{CrowdConfig, CrowdEngine, PassThroughAvoidance};
use throng_graph::PolylineGraph;
use throng_test_utils::MockActorWorld;

// ─── Network layout ─────────────────────────────────────────────

const BLOCK: f64 = 60.0;
const STREET: f64 = 8.0;
const INSET: f64 = 1.0;
const TICKS: usize = 600;
const DT: f64 = 0.05;

fn load_config() -> Result<CrowdConfig, Box<dyn Error>> {
    let Some(path) = std::env::args().nth(1) else {
        return Ok(CrowdConfig::default());
    };
    let text = std::fs::read_to_string(&path)?;
    let config: CrowdConfig = toml::from_str(&text)?;
    config.validate()?;
    Ok(config)
}

fn main() -> Result<(), Box<dyn Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let config = load_config()?;
    let bounds = config.bounds;
    let pitch = BLOCK + STREET;
    let cols = ((bounds.width() + STREET) / pitch).floor().max(1.0) as usize;
    let rows = ((bounds.height() + STREET) / pitch).floor().max(1.0) as usize;

    let graph = PolylineGraph::builder()
        .spacing(config.path.step_length)
        .junction_radius(STREET + 2.0 * INSET + 0.5)
        .block_grid(bounds.min, cols, rows, BLOCK, STREET, INSET)
        .build()?;
    println!(
        "network: {} sidewalks, {} route points, {} junction points",
        graph.route_count(),
        graph.point_count(),
        graph.junction_count()
    );

    let world = MockActorWorld::new().with_clearance(config.agent_params.radius * 2.0);
    let mut engine = CrowdEngine::seeded(
        config,
        Box::new(graph),
        Box::new(PassThroughAvoidance::new()),
        Box::new(world.clone()),
    )?;

    let filled = engine.fill_pool();
    println!("spawned {} of {} agents", filled.len(), engine.slots().len());

    let mut retired = 0;
    let mut spawned = 0;
    let mut first_agent = Vec2::ZERO;
    for _ in 0..TICKS {
        let result = engine.execute_tick();
        retired += result.retired.len();
        spawned += result.spawned.len();
        world.advance(DT);

        if let Some(agent) = engine.slots().iter().find_map(|(_, s)| s.agent()) {
            first_agent = agent.position().xy();
        }
    }

    let m = engine.last_metrics();
    println!(
        "tick {}: {} live, {} retired, {} respawned, last tick {} us",
        engine.current_tick(),
        engine.live_count(),
        retired,
        spawned,
        m.total_us
    );
    println!("first live agent is at {first_agent}");

    engine.despawn_all();
    Ok(())
}
