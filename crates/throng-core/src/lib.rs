//! Core types and traits for the Throng crowd framework.
//!
//! This is the leaf crate with zero internal dependencies. It defines
//! the fundamental abstractions used throughout the Throng workspace:
//! planar geometry, typed IDs, error types, and the collaborator traits
//! (route graph, collision avoidance, actor control, randomness) that the
//! crowd engine drives but never implements itself.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod geom;
pub mod id;
pub mod params;
pub mod traits;

pub use error::{AgentParamsError, PathError, SpawnError};
pub use geom::{Bounds, Transform, Vec2, Vec3};
pub use id::{RoutePointId, SlotId, TickId};
pub use params::AgentParams;
pub use traits::{ActorFactory, Actuator, CollisionAvoidance, RandomSource, RouteGraph};
