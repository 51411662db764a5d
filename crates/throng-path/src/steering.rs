//! Preferred-velocity steering towards the path buffer's front point.

use throng_core::{PathError, RandomSource, RouteGraph, Vec2};

use crate::path::{PathBuffer, PathParams};

/// Velocity of magnitude `max_speed` pointing from `position` to `target`.
///
/// When the agent already stands on the target (or the offset is not
/// finite) there is no direction to steer in and the result is
/// [`Vec2::ZERO`].
pub fn compute_velocity(position: Vec2, target: Vec2, max_speed: f64) -> Vec2 {
    (target - position).normalize_or_zero() * max_speed
}

/// Advance `path` for an agent at `position` and return its preferred
/// velocity.
///
/// # Errors
///
/// Propagates [`PathError::NoPath`] from
/// [`PathBuffer::extend_and_trim`]; the velocity is undefined in that case.
pub fn steer(
    path: &mut PathBuffer,
    graph: &dyn RouteGraph,
    rng: &mut dyn RandomSource,
    params: &PathParams,
    position: Vec2,
    max_speed: f64,
) -> Result<Vec2, PathError> {
    let target = path.extend_and_trim(graph, rng, params, position)?;
    Ok(compute_velocity(position, target, max_speed))
}
