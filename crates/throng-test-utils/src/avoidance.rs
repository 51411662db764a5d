//! Collision-avoidance adapter that records every call.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard};

use throng_core::{AgentParams, CollisionAvoidance, SlotId, Vec2};

/// Everything a [`RecordingAvoidance`] has been told.
#[derive(Clone, Debug, Default)]
pub struct AvoidanceLog {
    /// Registrations in call order.
    pub registered: Vec<(SlotId, AgentParams)>,
    /// Last position submitted per slot.
    pub positions: BTreeMap<SlotId, Vec2>,
    /// Last preferred velocity submitted per slot.
    pub preferred: BTreeMap<SlotId, Vec2>,
    /// Number of `step()` calls.
    pub step_count: u64,
    /// Preferred-velocity submissions received before each `step()`.
    pub submissions_per_step: Vec<usize>,
    pending_submissions: usize,
}

/// Adapter that echoes preferred velocities back as adjusted velocities
/// (scaled by `velocity_scale`) and logs every interaction.
#[derive(Clone, Debug)]
pub struct RecordingAvoidance {
    log: Arc<Mutex<AvoidanceLog>>,
    velocity_scale: f64,
}

impl RecordingAvoidance {
    pub fn new() -> Self {
        Self {
            log: Arc::new(Mutex::new(AvoidanceLog::default())),
            velocity_scale: 1.0,
        }
    }

    /// Scale the echoed velocities, so tests can tell adjusted from preferred.
    pub fn with_velocity_scale(mut self, scale: f64) -> Self {
        self.velocity_scale = scale;
        self
    }

    /// Snapshot of the log.
    pub fn log(&self) -> AvoidanceLog {
        self.lock().clone()
    }

    pub fn step_count(&self) -> u64 {
        self.lock().step_count
    }

    fn lock(&self) -> MutexGuard<'_, AvoidanceLog> {
        self.log.lock().expect("avoidance log poisoned")
    }
}

impl Default for RecordingAvoidance {
    fn default() -> Self {
        Self::new()
    }
}

impl CollisionAvoidance for RecordingAvoidance {
    fn register_agent(&mut self, params: &AgentParams, slot: SlotId) {
        self.lock().registered.push((slot, params.clone()));
    }

    fn set_position(&mut self, slot: SlotId, position: Vec2) {
        self.lock().positions.insert(slot, position);
    }

    fn set_preferred_velocity(&mut self, slot: SlotId, velocity: Vec2) {
        let mut log = self.lock();
        log.preferred.insert(slot, velocity);
        log.pending_submissions += 1;
    }

    fn step(&mut self) {
        let mut log = self.lock();
        log.step_count += 1;
        let pending = std::mem::take(&mut log.pending_submissions);
        log.submissions_per_step.push(pending);
    }

    fn velocity(&self, slot: SlotId) -> Vec2 {
        self.lock()
            .preferred
            .get(&slot)
            .copied()
            .unwrap_or(Vec2::ZERO)
            * self.velocity_scale
    }
}
