//! Benchmark profiles for the Throng crowd crates.
//!
//! - [`reference_profile`]: 300 agents on a 10x10 block grid
//! - [`stress_profile`]: 3000 agents on a 30x30 block grid
//! - [`block_network`]: the sidewalk graph both profiles walk on
//! - [`build_crowd`]: an engine wired to an in-memory actor world

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use throng_core::{Bounds, Vec2};
use throng_engine::{CrowdConfig, CrowdEngine, PassThroughAvoidance};
use throng_graph::{GraphError, PolylineGraph};
use throng_test_utils::MockActorWorld;

/// Side length of one city block, in metres.
pub const BLOCK: f64 = 40.0;
/// Street width between blocks, in metres.
pub const STREET: f64 = 6.0;

const INSET: f64 = 1.0;

/// Bounds covering a `blocks` x `blocks` grid anchored at the origin.
pub fn grid_bounds(blocks: usize) -> Bounds {
    let extent = blocks as f64 * (BLOCK + STREET) - STREET;
    Bounds::new(Vec2::ZERO, Vec2::new(extent, extent))
}

/// Closed sidewalk rings around a `blocks` x `blocks` grid, linked across
/// every street.
pub fn block_network(blocks: usize) -> Result<PolylineGraph, GraphError> {
    PolylineGraph::builder()
        .junction_radius(STREET + 2.0 * INSET + 0.5)
        .block_grid(Vec2::ZERO, blocks, blocks, BLOCK, STREET, INSET)
        .build()
}

/// 300 pedestrians on a 10x10 block grid.
pub fn reference_profile(seed: u64) -> CrowdConfig {
    CrowdConfig {
        bounds: grid_bounds(10),
        pool_size: 300,
        seed,
        ..CrowdConfig::default()
    }
}

/// 3000 pedestrians on a 30x30 block grid.
pub fn stress_profile(seed: u64) -> CrowdConfig {
    CrowdConfig {
        bounds: grid_bounds(30),
        pool_size: 3000,
        seed,
        ..CrowdConfig::default()
    }
}

/// Build a filled crowd for `config` on a `blocks` x `blocks` network.
///
/// Returns the engine and the actor world it spawns into; call
/// [`MockActorWorld::advance`] between ticks to let agents walk.
pub fn build_crowd(
    config: CrowdConfig,
    blocks: usize,
) -> Result<(CrowdEngine, MockActorWorld), Box<dyn std::error::Error>> {
    let world = MockActorWorld::new();
    let mut engine = CrowdEngine::seeded(
        config,
        Box::new(block_network(blocks)?),
        Box::new(PassThroughAvoidance::new()),
        Box::new(world.clone()),
    )?;
    engine.fill_pool();
    Ok((engine, world))
}
