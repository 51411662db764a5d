//! Per-tick metrics for the crowd engine.
//!
//! [`TickMetrics`] captures timing and population counters for a single
//! tick, for telemetry and for spotting spawn starvation.

/// Timing and population metrics collected during a single tick.
///
/// All durations are in microseconds. Counters describe this tick only,
/// except where marked cumulative.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickMetrics {
    /// Wall-clock time for the entire tick, in microseconds.
    pub total_us: u64,
    /// Time spent extending paths and computing preferred velocities.
    pub steering_us: u64,
    /// Time spent inside the collision-avoidance step.
    pub avoidance_us: u64,
    /// Time spent in the respawn pass.
    pub respawn_us: u64,
    /// Active slots after the respawn pass.
    pub live_agents: u32,
    /// Agents admitted this tick.
    pub spawned: u32,
    /// Spawn attempts this tick. Each attempt samples a location, snaps it
    /// to a route point, and only then calls the actor factory, so attempts
    /// rejected before the factory are counted too.
    pub spawn_attempts: u32,
    /// Spawn attempts that did not produce an agent.
    pub spawn_failures: u32,
    /// Agents retired for leaving the bounds.
    pub retired_out_of_bounds: u32,
    /// Agents retired for falling below the ground threshold.
    pub retired_fell_through: u32,
    /// Agents retired because their path could not be extended.
    pub retired_no_path: u32,
    /// Cumulative number of consecutive ticks that ended below the
    /// target population. Resets to zero once the pool is full.
    pub shortfall_ticks: u64,
}

impl TickMetrics {
    /// Total retirements this tick.
    pub fn retired(&self) -> u32 {
        self.retired_out_of_bounds + self.retired_fell_through + self.retired_no_path
    }
}
