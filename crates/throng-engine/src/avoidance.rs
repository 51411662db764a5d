//! Collision-avoidance adapter without any avoidance.

use throng_core::{AgentParams, CollisionAvoidance, SlotId, Vec2};

#[derive(Clone, Debug, Default)]
struct Entry {
    max_speed: f64,
    preferred: Vec2,
    velocity: Vec2,
}

/// Adapter that passes preferred velocities straight through.
///
/// Each agent's velocity after [`step`](CollisionAvoidance::step) is its
/// preferred velocity clamped to the `max_speed` it was registered with.
/// Agents walk through each other; useful for demos, benchmarks, and hosts
/// that resolve collisions themselves.
#[derive(Clone, Debug, Default)]
pub struct PassThroughAvoidance {
    agents: Vec<Entry>,
}

impl PassThroughAvoidance {
    /// Create an adapter with no registered agents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered slots.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    fn entry(&mut self, slot: SlotId) -> &mut Entry {
        let i = slot.index();
        if i >= self.agents.len() {
            self.agents.resize_with(i + 1, Entry::default);
        }
        &mut self.agents[i]
    }
}

impl CollisionAvoidance for PassThroughAvoidance {
    fn register_agent(&mut self, params: &AgentParams, slot: SlotId) {
        self.entry(slot).max_speed = params.max_speed;
    }

    fn set_position(&mut self, _slot: SlotId, _position: Vec2) {}

    fn set_preferred_velocity(&mut self, slot: SlotId, velocity: Vec2) {
        self.entry(slot).preferred = velocity;
    }

    fn step(&mut self) {
        for e in &mut self.agents {
            e.velocity = e.preferred.clamp_length(e.max_speed);
        }
    }

    fn velocity(&self, slot: SlotId) -> Vec2 {
        self.agents
            .get(slot.index())
            .map_or(Vec2::ZERO, |e| e.velocity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn velocity_is_clamped_after_step() {
        let mut a = PassThroughAvoidance::new();
        let params = AgentParams {
            max_speed: 2.0,
            ..AgentParams::people()
        };
        a.register_agent(&params, SlotId(0));
        a.set_preferred_velocity(SlotId(0), Vec2::new(3.0, 4.0));
        assert_eq!(a.velocity(SlotId(0)), Vec2::ZERO);
        a.step();
        let v = a.velocity(SlotId(0));
        assert!((v.length() - 2.0).abs() < 1e-12);
        assert!((v.x - 1.2).abs() < 1e-12);
    }

    #[test]
    fn slow_velocity_passes_unchanged() {
        let mut a = PassThroughAvoidance::new();
        a.register_agent(&AgentParams::people(), SlotId(3));
        assert_eq!(a.agent_count(), 4);
        a.set_preferred_velocity(SlotId(3), Vec2::new(0.5, 0.0));
        a.step();
        assert_eq!(a.velocity(SlotId(3)), Vec2::new(0.5, 0.0));
    }

    #[test]
    fn unknown_slot_reads_zero() {
        let a = PassThroughAvoidance::new();
        assert_eq!(a.velocity(SlotId(9)), Vec2::ZERO);
    }
}
