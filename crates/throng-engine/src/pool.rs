//! Fixed-size slot table holding the crowd's agents.
//!
//! A slot's index is the agent's identity in the collision-avoidance
//! solver, so the table never grows, shrinks, or reorders. Retiring an
//! agent empties its slot in place; the respawn pass refills it.

use std::fmt;

use throng_core::{Actuator, SlotId, TickId, Vec2, Vec3};
use throng_path::PathBuffer;

// ── Retirement ─────────────────────────────────────────────────────

/// Why an agent was removed from the crowd.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RetireReason {
    /// Its ground position left the bounds.
    OutOfBounds,
    /// Its height dropped below the fall-through threshold.
    FellThrough,
    /// Its path buffer could not be extended to the lookahead.
    NoPath,
}

impl fmt::Display for RetireReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds => write!(f, "out of bounds"),
            Self::FellThrough => write!(f, "fell through"),
            Self::NoPath => write!(f, "no path"),
        }
    }
}

/// One agent retired during a tick.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Retirement {
    /// Slot the agent occupied; empty afterwards.
    pub slot: SlotId,
    /// Why it was retired.
    pub reason: RetireReason,
}

// ── Agent ──────────────────────────────────────────────────────────

/// A live pedestrian: its actor handle plus path-following state.
pub struct Agent {
    path: PathBuffer,
    max_speed: f64,
    actuator: Box<dyn Actuator>,
    blueprint: String,
    spawned_at: TickId,
}

impl Agent {
    /// Wrap a freshly spawned actor. The path starts empty.
    pub fn new(
        actuator: Box<dyn Actuator>,
        blueprint: String,
        max_speed: f64,
        spawned_at: TickId,
    ) -> Self {
        Self {
            path: PathBuffer::new(),
            max_speed,
            actuator,
            blueprint,
            spawned_at,
        }
    }

    /// The agent's route-point lookahead.
    pub fn path(&self) -> &PathBuffer {
        &self.path
    }

    pub(crate) fn path_mut(&mut self) -> &mut PathBuffer {
        &mut self.path
    }

    /// Preferred walking speed, fixed at spawn.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// Blueprint the actor was spawned from.
    pub fn blueprint(&self) -> &str {
        &self.blueprint
    }

    /// Tick on which the agent was admitted.
    pub fn spawned_at(&self) -> TickId {
        self.spawned_at
    }

    /// Current world position, read from the actor.
    pub fn position(&self) -> Vec3 {
        self.actuator.position()
    }

    pub(crate) fn set_velocity(&mut self, velocity: Vec2) {
        self.actuator.set_velocity(velocity);
    }

    /// Remove the actor from the host simulator.
    pub(crate) fn destroy(self) {
        self.actuator.destroy();
    }
}

impl fmt::Debug for Agent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Agent")
            .field("blueprint", &self.blueprint)
            .field("max_speed", &self.max_speed)
            .field("spawned_at", &self.spawned_at)
            .field("path_len", &self.path.len())
            .finish_non_exhaustive()
    }
}

// ── SlotTable ──────────────────────────────────────────────────────

/// One entry of the [`SlotTable`].
#[derive(Debug, Default)]
pub enum Slot {
    /// Waiting for the respawn pass.
    #[default]
    Empty,
    /// Holding a live agent.
    Active(Agent),
}

impl Slot {
    /// Whether the slot holds an agent.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Active(_))
    }

    /// The agent in this slot, if any.
    pub fn agent(&self) -> Option<&Agent> {
        match self {
            Self::Active(agent) => Some(agent),
            Self::Empty => None,
        }
    }
}

/// Fixed-length table of agent slots indexed by [`SlotId`].
#[derive(Debug)]
pub struct SlotTable {
    slots: Vec<Slot>,
}

impl SlotTable {
    /// Create `size` empty slots.
    pub fn new(size: usize) -> Self {
        let mut slots = Vec::with_capacity(size);
        slots.resize_with(size, Slot::default);
        Self { slots }
    }

    /// Number of slots (the target population).
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the table has no slots at all.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots holding an agent.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_active()).count()
    }

    /// The slot at `id`, or `None` if out of range.
    pub fn get(&self, id: SlotId) -> Option<&Slot> {
        self.slots.get(id.index())
    }

    /// The agent at `id`, if the slot is active.
    pub fn agent(&self, id: SlotId) -> Option<&Agent> {
        self.get(id).and_then(Slot::agent)
    }

    pub(crate) fn agent_mut(&mut self, id: SlotId) -> Option<&mut Agent> {
        match self.slots.get_mut(id.index()) {
            Some(Slot::Active(agent)) => Some(agent),
            _ => None,
        }
    }

    /// All slots with their ids, in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &Slot)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .map(|(i, slot)| (SlotId(i as u32), slot))
    }

    /// Ids of empty slots, in ascending order.
    pub fn empty_slots(&self) -> Vec<SlotId> {
        self.iter()
            .filter(|(_, slot)| !slot.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Ids of active slots, in ascending order.
    pub fn active_slots(&self) -> Vec<SlotId> {
        self.iter()
            .filter(|(_, slot)| slot.is_active())
            .map(|(id, _)| id)
            .collect()
    }

    /// Place `agent` in the empty slot `id`.
    ///
    /// Hands the agent back if the slot is occupied or out of range.
    pub(crate) fn admit(&mut self, id: SlotId, agent: Agent) -> Result<(), Agent> {
        match self.slots.get_mut(id.index()) {
            Some(slot) if !slot.is_active() => {
                *slot = Slot::Active(agent);
                Ok(())
            }
            _ => Err(agent),
        }
    }

    /// Empty slot `id` and return its agent.
    pub(crate) fn take(&mut self, id: SlotId) -> Option<Agent> {
        let slot = self.slots.get_mut(id.index())?;
        match std::mem::take(slot) {
            Slot::Active(agent) => Some(agent),
            Slot::Empty => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use throng_core::{ActorFactory, Transform};
    use throng_test_utils::MockActorWorld;

    fn agent(world: &mut MockActorWorld) -> Agent {
        let actuator = world
            .try_spawn("walker", Transform::at(1.0, 2.0, 3.0))
            .unwrap();
        Agent::new(actuator, "walker".into(), 1.5, TickId(0))
    }

    #[test]
    fn new_table_is_all_empty() {
        let table = SlotTable::new(5);
        assert_eq!(table.len(), 5);
        assert_eq!(table.live_count(), 0);
        assert_eq!(table.empty_slots().len(), 5);
        assert!(table.get(SlotId(5)).is_none());
    }

    #[test]
    fn admit_then_take() {
        let mut world = MockActorWorld::new();
        let mut table = SlotTable::new(3);
        table.admit(SlotId(1), agent(&mut world)).unwrap();
        assert_eq!(table.live_count(), 1);
        assert_eq!(table.active_slots(), vec![SlotId(1)]);
        assert_eq!(table.empty_slots(), vec![SlotId(0), SlotId(2)]);
        assert_eq!(table.agent(SlotId(1)).unwrap().blueprint(), "walker");

        let taken = table.take(SlotId(1)).unwrap();
        taken.destroy();
        assert_eq!(table.live_count(), 0);
        assert!(table.take(SlotId(1)).is_none());
        assert_eq!(world.actor(0).unwrap().destroy_calls, 1);
    }

    #[test]
    fn admit_into_occupied_slot_hands_agent_back() {
        let mut world = MockActorWorld::new();
        let mut table = SlotTable::new(1);
        table.admit(SlotId(0), agent(&mut world)).unwrap();
        let rejected = table.admit(SlotId(0), agent(&mut world)).unwrap_err();
        assert_eq!(rejected.blueprint(), "walker");
        assert!(table.admit(SlotId(7), rejected).is_err());
        assert_eq!(table.live_count(), 1);
    }

    #[test]
    fn agent_reads_position_from_actor() {
        let mut world = MockActorWorld::new();
        let a = agent(&mut world);
        world.teleport(0, Vec3::new(4.0, 5.0, -1.0));
        assert_eq!(a.position(), Vec3::new(4.0, 5.0, -1.0));
        assert!(a.path().is_empty());
    }

    #[test]
    fn reason_display() {
        assert_eq!(RetireReason::FellThrough.to_string(), "fell through");
    }
}
