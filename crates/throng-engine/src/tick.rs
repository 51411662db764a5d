//! Crowd engine: the single-threaded population loop.
//!
//! [`CrowdEngine`] wires a [`SlotTable`] to the route graph, the
//! collision-avoidance solver, and the actor factory. Each
//! [`execute_tick()`](CrowdEngine::execute_tick) runs five passes in order:
//!
//! 1. **Retire** agents that left the bounds or fell through the ground.
//! 2. **Steer** every remaining agent along its path buffer and submit
//!    preferred velocities; agents whose path dead-ends are retired here.
//! 3. **Step** the avoidance solver exactly once.
//! 4. **Apply** the adjusted velocities to the actors.
//! 5. **Respawn** into empty slots.
//!
//! # Ownership model
//!
//! `CrowdEngine` is [`Send`] but all mutation goes through `&mut self`, so
//! there is never more than one pass touching the slot table or the solver.

use std::time::Instant;

use thiserror::Error;
use throng_core::{
    ActorFactory, CollisionAvoidance, RandomSource, RouteGraph, SlotId, SpawnError, TickId,
    Transform, Vec2,
};
use throng_path::steer;
use tracing::{debug, info, trace, warn};

use crate::config::{ConfigError, CrowdConfig};
use crate::metrics::TickMetrics;
use crate::pool::{Agent, RetireReason, Retirement, SlotTable};
use crate::rng::ChaChaSource;

// Compile-time assertion: CrowdEngine can be moved to another thread.
const _: () = {
    #[allow(dead_code)]
    fn assert_send<T: Send>() {}
    #[allow(dead_code)]
    fn check() {
        assert_send::<CrowdEngine>();
    }
};

// ── TickResult ───────────────────────────────────────────────────

/// Outcome of one [`CrowdEngine::execute_tick()`] call.
#[derive(Clone, Debug, PartialEq)]
pub struct TickResult {
    /// The tick that just completed.
    pub tick: TickId,
    /// Agents retired this tick, in the order they were retired.
    pub retired: Vec<Retirement>,
    /// Slots refilled this tick, in ascending order.
    pub spawned: Vec<SlotId>,
    /// Timing and population counters for this tick.
    pub metrics: TickMetrics,
}

// ── SpawnAttemptError ────────────────────────────────────────────

#[derive(Debug, Error)]
enum SpawnAttemptError {
    #[error("no route point near {0}")]
    NoRoutePoint(Vec2),
    #[error("route point {0} lies outside the bounds")]
    OutsideBounds(Vec2),
    #[error(transparent)]
    Factory(#[from] SpawnError),
}

// ── CrowdEngine ──────────────────────────────────────────────────

/// Keeps a fixed-size crowd walking the sidewalks.
///
/// Every slot is registered with the avoidance solver once, at
/// construction, and keeps its index for the life of the engine.
///
/// # Example
///
/// ```ignore
/// let mut engine = CrowdEngine::seeded(config, graph, avoidance, factory)?;
/// engine.fill_pool();
/// loop {
///     let result = engine.execute_tick();
///     host.tick();
/// }
/// ```
pub struct CrowdEngine {
    config: CrowdConfig,
    slots: SlotTable,
    graph: Box<dyn RouteGraph>,
    avoidance: Box<dyn CollisionAvoidance>,
    factory: Box<dyn ActorFactory>,
    rng: Box<dyn RandomSource>,
    current_tick: TickId,
    shortfall_ticks: u64,
    reached_target: bool,
    last_metrics: TickMetrics,
}

impl CrowdEngine {
    /// Construct an engine from a [`CrowdConfig`] and its collaborators.
    ///
    /// Validates the configuration and registers one solver agent per
    /// slot. No actors are spawned until [`fill_pool()`](Self::fill_pool)
    /// or the first tick.
    pub fn new(
        config: CrowdConfig,
        graph: Box<dyn RouteGraph>,
        mut avoidance: Box<dyn CollisionAvoidance>,
        factory: Box<dyn ActorFactory>,
        rng: Box<dyn RandomSource>,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let slots = SlotTable::new(config.pool_size);
        for (id, _) in slots.iter() {
            avoidance.register_agent(&config.agent_params, id);
        }
        debug!(pool_size = config.pool_size, "registered crowd slots");
        Ok(Self {
            config,
            slots,
            graph,
            avoidance,
            factory,
            rng,
            current_tick: TickId(0),
            shortfall_ticks: 0,
            reached_target: false,
            last_metrics: TickMetrics::default(),
        })
    }

    /// Like [`new()`](Self::new), with a [`ChaChaSource`] seeded from
    /// [`CrowdConfig::seed`].
    pub fn seeded(
        config: CrowdConfig,
        graph: Box<dyn RouteGraph>,
        avoidance: Box<dyn CollisionAvoidance>,
        factory: Box<dyn ActorFactory>,
    ) -> Result<Self, ConfigError> {
        let rng = Box::new(ChaChaSource::new(config.seed));
        Self::new(config, graph, avoidance, factory, rng)
    }

    /// Run only the respawn pass, without advancing the tick counter.
    ///
    /// Intended for populating the crowd before the first tick. Returns
    /// the slots that were filled.
    pub fn fill_pool(&mut self) -> Vec<SlotId> {
        let mut metrics = TickMetrics::default();
        let spawned = self.respawn(self.current_tick, &mut metrics);
        metrics.live_agents = self.slots.live_count() as u32;
        // No tick ran, so a short pool does not count as a shortfall tick.
        self.note_full(metrics.live_agents);
        metrics.shortfall_ticks = self.shortfall_ticks;
        self.last_metrics = metrics;
        spawned
    }

    /// Execute one tick: retire, steer, step, apply, respawn.
    ///
    /// Never fails. Agents that cannot continue are retired and their
    /// slots refilled; actors that cannot be spawned are retried next tick.
    pub fn execute_tick(&mut self) -> TickResult {
        let tick_start = Instant::now();
        let tick = TickId(self.current_tick.0 + 1);
        let mut metrics = TickMetrics::default();
        let mut retired = Vec::new();

        // 1. Retirement pass.
        let bounds = self.config.bounds;
        let floor = self.config.fall_through_z;
        for id in self.slots.active_slots() {
            let Some(agent) = self.slots.agent(id) else {
                continue;
            };
            let position = agent.position();
            let reason = if !bounds.contains(position.xy()) {
                Some(RetireReason::OutOfBounds)
            } else if position.z < floor {
                Some(RetireReason::FellThrough)
            } else {
                None
            };
            if let Some(reason) = reason {
                self.retire(id, reason, &mut retired, &mut metrics);
            }
        }

        // 2. Steering pass.
        let steering_start = Instant::now();
        for i in 0..self.slots.len() {
            let id = SlotId(i as u32);
            let Some(agent) = self.slots.agent_mut(id) else {
                self.avoidance.set_preferred_velocity(id, Vec2::ZERO);
                continue;
            };
            let position = agent.position().xy();
            let max_speed = agent.max_speed();
            let steered = steer(
                agent.path_mut(),
                self.graph.as_ref(),
                self.rng.as_mut(),
                &self.config.path,
                position,
                max_speed,
            );
            self.avoidance.set_position(id, position);
            match steered {
                Ok(velocity) => self.avoidance.set_preferred_velocity(id, velocity),
                Err(error) => {
                    self.avoidance.set_preferred_velocity(id, Vec2::ZERO);
                    debug!(slot = %id, %error, "path exhausted");
                    self.retire(id, RetireReason::NoPath, &mut retired, &mut metrics);
                }
            }
        }
        metrics.steering_us = steering_start.elapsed().as_micros() as u64;

        // 3. External step, once per tick regardless of population.
        let avoidance_start = Instant::now();
        self.avoidance.step();
        metrics.avoidance_us = avoidance_start.elapsed().as_micros() as u64;

        // 4. Apply pass.
        for id in self.slots.active_slots() {
            let velocity = self.avoidance.velocity(id);
            if let Some(agent) = self.slots.agent_mut(id) {
                agent.set_velocity(velocity);
            }
        }

        // 5. Respawn pass.
        let respawn_start = Instant::now();
        let spawned = self.respawn(tick, &mut metrics);
        metrics.respawn_us = respawn_start.elapsed().as_micros() as u64;

        // 6. Bookkeeping.
        self.current_tick = tick;
        metrics.live_agents = self.slots.live_count() as u32;
        self.note_population(metrics.live_agents);
        metrics.shortfall_ticks = self.shortfall_ticks;
        metrics.total_us = tick_start.elapsed().as_micros() as u64;
        trace!(
            tick = tick.0,
            live = metrics.live_agents,
            retired = metrics.retired(),
            spawned = metrics.spawned,
            total_us = metrics.total_us,
            "crowd tick"
        );
        self.last_metrics = metrics.clone();

        TickResult {
            tick,
            retired,
            spawned,
            metrics,
        }
    }

    /// Execute ticks until `stop` returns `true` for a tick's result.
    ///
    /// Returns the result of the final tick.
    pub fn run_until(&mut self, mut stop: impl FnMut(&TickResult) -> bool) -> TickResult {
        loop {
            let result = self.execute_tick();
            if stop(&result) {
                return result;
            }
        }
    }

    /// Destroy every live actor and empty all slots.
    ///
    /// Solver registrations are kept, so the engine can be refilled with
    /// [`fill_pool()`](Self::fill_pool). Returns the number of actors
    /// destroyed.
    pub fn despawn_all(&mut self) -> usize {
        let mut count = 0;
        for id in self.slots.active_slots() {
            if let Some(agent) = self.slots.take(id) {
                agent.destroy();
                count += 1;
            }
        }
        self.reached_target = false;
        debug!(count, "despawned crowd");
        count
    }

    /// Current tick ID. Zero before the first tick.
    pub fn current_tick(&self) -> TickId {
        self.current_tick
    }

    /// Number of live agents.
    pub fn live_count(&self) -> usize {
        self.slots.live_count()
    }

    /// Read-only view of the slot table.
    pub fn slots(&self) -> &SlotTable {
        &self.slots
    }

    /// The validated configuration.
    pub fn config(&self) -> &CrowdConfig {
        &self.config
    }

    /// Metrics from the most recent tick (or [`fill_pool()`](Self::fill_pool)).
    pub fn last_metrics(&self) -> &TickMetrics {
        &self.last_metrics
    }

    /// Consecutive ticks that ended below the target population.
    pub fn shortfall_ticks(&self) -> u64 {
        self.shortfall_ticks
    }

    fn retire(
        &mut self,
        id: SlotId,
        reason: RetireReason,
        retired: &mut Vec<Retirement>,
        metrics: &mut TickMetrics,
    ) {
        let Some(agent) = self.slots.take(id) else {
            return;
        };
        debug!(slot = %id, %reason, blueprint = agent.blueprint(), "retiring agent");
        agent.destroy();
        match reason {
            RetireReason::OutOfBounds => metrics.retired_out_of_bounds += 1,
            RetireReason::FellThrough => metrics.retired_fell_through += 1,
            RetireReason::NoPath => metrics.retired_no_path += 1,
        }
        retired.push(Retirement { slot: id, reason });
    }

    fn respawn(&mut self, tick: TickId, metrics: &mut TickMetrics) -> Vec<SlotId> {
        let mut spawned = Vec::new();
        for id in self.slots.empty_slots() {
            for _ in 0..self.config.spawn_attempts_per_slot {
                metrics.spawn_attempts += 1;
                let agent = match self.try_spawn(tick) {
                    Ok(agent) => agent,
                    Err(error) => {
                        metrics.spawn_failures += 1;
                        trace!(slot = %id, %error, "spawn attempt failed");
                        continue;
                    }
                };
                debug!(
                    slot = %id,
                    blueprint = agent.blueprint(),
                    speed = agent.max_speed(),
                    "spawned agent"
                );
                if let Err(orphan) = self.slots.admit(id, agent) {
                    orphan.destroy();
                    break;
                }
                metrics.spawned += 1;
                spawned.push(id);
                break;
            }
        }
        spawned
    }

    fn try_spawn(&mut self, tick: TickId) -> Result<Agent, SpawnAttemptError> {
        let bounds = self.config.bounds;
        let sample = Vec2::new(
            self.rng.uniform(bounds.min.x, bounds.max.x),
            self.rng.uniform(bounds.min.y, bounds.max.y),
        );
        let location = self
            .graph
            .nearest_point(sample)
            .and_then(|point| self.graph.position_of(point))
            .ok_or(SpawnAttemptError::NoRoutePoint(sample))?;
        if !bounds.contains(location) {
            return Err(SpawnAttemptError::OutsideBounds(location));
        }

        let blueprint = &self.config.blueprints[self.rng.index(self.config.blueprints.len())];
        let actuator = self.factory.try_spawn(
            blueprint,
            Transform::at(location.x, location.y, self.config.spawn_height),
        )?;
        let speed = self
            .rng
            .uniform(self.config.min_speed, self.config.max_speed);
        Ok(Agent::new(actuator, blueprint.clone(), speed, tick))
    }

    /// Reset the shortfall counter if the pool is full. Returns whether it is.
    fn note_full(&mut self, live: u32) -> bool {
        if (live as usize) < self.slots.len() {
            return false;
        }
        if !self.reached_target {
            info!(
                live,
                tick = self.current_tick.0,
                "crowd reached target population"
            );
            self.reached_target = true;
        }
        self.shortfall_ticks = 0;
        true
    }

    fn note_population(&mut self, live: u32) {
        if self.note_full(live) {
            return;
        }
        self.shortfall_ticks += 1;
        if self.shortfall_ticks % self.config.starvation_warn_ticks == 0 {
            warn!(
                live,
                target = self.slots.len(),
                ticks = self.shortfall_ticks,
                "crowd below target population; spawns keep failing"
            );
        }
    }
}
