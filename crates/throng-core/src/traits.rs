//! Collaborator traits consumed by the crowd engine.
//!
//! The engine owns the path-following and population logic; everything
//! else (the sidewalk network, the collision-avoidance solver, the actors
//! in the host simulator, the random source) is injected through these
//! traits. All of them are object safe and used as `Box<dyn _>`.
//!
//! # Thread Safety
//!
//! `Send` is required so a fully assembled engine can be moved onto a
//! worker thread. The engine itself never shares collaborators between
//! threads.

use smallvec::SmallVec;

use crate::error::SpawnError;
use crate::geom::{Transform, Vec2, Vec3};
use crate::id::{RoutePointId, SlotId};
use crate::params::AgentParams;

/// Queries over a discretized sidewalk route-point graph.
pub trait RouteGraph: Send {
    /// The route point closest to `position`, or `None` if the graph is empty.
    fn nearest_point(&self, position: Vec2) -> Option<RoutePointId>;

    /// The route point `step` metres further along the route from `point`.
    ///
    /// Returns `None` at a dead end.
    fn next_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId>;

    /// The route point `step` metres back along the route from `point`.
    ///
    /// Returns `None` at a dead end.
    fn previous_point(&self, point: RoutePointId, step: f64) -> Option<RoutePointId>;

    /// Route points on other routes reachable from `point` (junctions).
    ///
    /// Returns points in a deterministic, implementation-defined order.
    fn adjacent_points(&self, point: RoutePointId) -> SmallVec<[RoutePointId; 4]>;

    /// World position of `point`, or `None` for a handle this graph did
    /// not issue.
    fn position_of(&self, point: RoutePointId) -> Option<Vec2>;
}

/// A crowd-wide collision-avoidance solver addressed by slot index.
///
/// Every slot is registered once when the engine is built and is never
/// removed. Per tick the engine submits a position and preferred velocity
/// for every slot, calls [`step`](CollisionAvoidance::step) exactly once,
/// and then reads back adjusted velocities.
pub trait CollisionAvoidance: Send {
    /// Register an agent for `slot` with the given parameters.
    fn register_agent(&mut self, params: &AgentParams, slot: SlotId);

    /// Set the current position of `slot`.
    fn set_position(&mut self, slot: SlotId, position: Vec2);

    /// Set the preferred (unobstructed) velocity of `slot`.
    fn set_preferred_velocity(&mut self, slot: SlotId, velocity: Vec2);

    /// Advance the solver by one step for all registered agents.
    fn step(&mut self);

    /// The collision-adjusted velocity of `slot` after the last step.
    fn velocity(&self, slot: SlotId) -> Vec2;
}

/// Creates actors in the host simulator.
pub trait ActorFactory: Send {
    /// Try to spawn an actor from `blueprint` at `transform`.
    fn try_spawn(
        &mut self,
        blueprint: &str,
        transform: Transform,
    ) -> Result<Box<dyn Actuator>, SpawnError>;
}

/// Handle to one live actor in the host simulator.
pub trait Actuator: Send {
    /// Current world position, including height.
    fn position(&self) -> Vec3;

    /// Command a planar walking velocity.
    fn set_velocity(&mut self, velocity: Vec2);

    /// Remove the actor from the host simulator.
    ///
    /// Consumes the handle, so an actor can be destroyed at most once.
    fn destroy(self: Box<Self>);
}

/// Source of uniform randomness for branch choices and spawning.
///
/// Only [`next_f64`](RandomSource::next_f64) is required; the other
/// methods are derived from it so scripted sources stay trivial.
pub trait RandomSource: Send {
    /// A uniform sample in `[0, 1)`.
    fn next_f64(&mut self) -> f64;

    /// A uniform sample in `[lo, hi)`; returns `lo` when `hi <= lo`.
    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        if hi <= lo {
            return lo;
        }
        lo + (hi - lo) * self.next_f64()
    }

    /// A fair coin flip.
    fn coin(&mut self) -> bool {
        self.next_f64() < 0.5
    }

    /// A uniform index in `0..len`. Returns 0 when `len` is 0.
    fn index(&mut self, len: usize) -> usize {
        if len == 0 {
            return 0;
        }
        ((self.next_f64() * len as f64) as usize).min(len - 1)
    }
}
