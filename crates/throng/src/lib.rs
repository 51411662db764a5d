//! Throng: sidewalk crowd simulation for driving pedestrians in a host
//! simulator.
//!
//! This is the top-level facade crate that re-exports the public API from
//! all Throng sub-crates. For most users, adding `throng` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use throng::prelude::*;
//! use throng::graph::PolylineGraph;
//! use throng_test_utils::MockActorWorld;
//!
//! // Nine city blocks with a sidewalk ring around each.
//! let graph = PolylineGraph::builder()
//!     .junction_radius(4.5)
//!     .block_grid(Vec2::new(450.0, 1100.0), 3, 3, 40.0, 3.0, 0.5)
//!     .build()
//!     .unwrap();
//!
//! let config = CrowdConfig {
//!     pool_size: 20,
//!     ..CrowdConfig::default()
//! };
//! let world = MockActorWorld::new();
//! let mut engine = CrowdEngine::seeded(
//!     config,
//!     Box::new(graph),
//!     Box::new(PassThroughAvoidance::new()),
//!     Box::new(world.clone()),
//! )
//! .unwrap();
//!
//! engine.fill_pool();
//! let result = engine.execute_tick();
//! assert_eq!(result.tick, TickId(1));
//! assert_eq!(engine.live_count(), 20);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `throng-core` | Geometry, IDs, errors, collaborator traits |
//! | [`graph`] | `throng-graph` | Reference polyline sidewalk graph |
//! | [`path`] | `throng-path` | Path buffers and velocity steering |
//! | [`engine`] | `throng-engine` | Crowd engine, config, metrics, slot table |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`throng-core`).
///
/// Hosts implement [`types::RouteGraph`], [`types::CollisionAvoidance`],
/// [`types::ActorFactory`], and [`types::Actuator`] to plug a simulator in.
pub use throng_core as types;

/// Reference sidewalk graph (`throng-graph`).
pub use throng_graph as graph;

/// Path buffers and steering (`throng-path`).
///
/// Usable on their own for agents that are not managed by an engine.
pub use throng_path as path;

/// The crowd engine (`throng-engine`).
pub use throng_engine as engine;

/// Common imports for typical Throng usage.
pub mod prelude {
    // Core types and traits
    pub use throng_core::{
        ActorFactory, Actuator, AgentParams, Bounds, CollisionAvoidance, RandomSource,
        RouteGraph, RoutePointId, SlotId, TickId, Transform, Vec2, Vec3,
    };

    // Errors
    pub use throng_core::{AgentParamsError, PathError, SpawnError};

    // Path following
    pub use throng_path::{PathBuffer, PathParams};

    // Engine
    pub use throng_engine::{
        ChaChaSource, ConfigError, CrowdConfig, CrowdEngine, PassThroughAvoidance, RetireReason,
        TickMetrics, TickResult,
    };
}
