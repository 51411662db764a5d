//! In-memory actor world standing in for the host simulator.

use std::sync::{Arc, Mutex, MutexGuard};

use throng_core::{ActorFactory, Actuator, SpawnError, Transform, Vec2, Vec3};

/// One actor ever spawned in a [`MockActorWorld`].
#[derive(Clone, Debug, PartialEq)]
pub struct ActorRecord {
    pub id: usize,
    pub blueprint: String,
    pub position: Vec3,
    pub velocity: Vec2,
    pub alive: bool,
    pub destroy_calls: u32,
}

#[derive(Debug, Default)]
struct WorldState {
    actors: Vec<ActorRecord>,
    clearance: Option<f64>,
    reject_all: bool,
    blueprints: Option<Vec<String>>,
    spawn_attempts: u64,
    spawn_failures: u64,
}

impl WorldState {
    fn check_spawn(&self, blueprint: &str, transform: &Transform) -> Result<(), SpawnError> {
        if self.reject_all {
            return Err(SpawnError::Rejected {
                reason: "mock world rejects all spawns".into(),
            });
        }
        if let Some(known) = &self.blueprints {
            if !known.iter().any(|b| b == blueprint) {
                return Err(SpawnError::UnknownBlueprint(blueprint.to_string()));
            }
        }
        if let Some(clearance) = self.clearance {
            let at = transform.location.xy();
            let blocked = self
                .actors
                .iter()
                .filter(|a| a.alive)
                .any(|a| a.position.xy().distance(at) < clearance);
            if blocked {
                return Err(SpawnError::Occupied);
            }
        }
        Ok(())
    }
}

/// Actor factory backed by a shared table of [`ActorRecord`]s.
///
/// By default every spawn succeeds. Actors only move when the test calls
/// [`advance`](MockActorWorld::advance) or
/// [`teleport`](MockActorWorld::teleport).
#[derive(Clone, Debug, Default)]
pub struct MockActorWorld {
    state: Arc<Mutex<WorldState>>,
}

impl MockActorWorld {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reject spawns closer than `radius` to a live actor.
    pub fn with_clearance(self, radius: f64) -> Self {
        self.lock().clearance = Some(radius);
        self
    }

    /// Only accept the listed blueprints.
    pub fn with_blueprints(self, blueprints: &[&str]) -> Self {
        self.lock().blueprints = Some(blueprints.iter().map(|b| b.to_string()).collect());
        self
    }

    /// Reject every spawn (or stop rejecting).
    pub fn set_reject_all(&self, reject: bool) {
        self.lock().reject_all = reject;
    }

    /// Move every live actor by `velocity * dt`.
    pub fn advance(&self, dt: f64) {
        for actor in self.lock().actors.iter_mut().filter(|a| a.alive) {
            actor.position.x += actor.velocity.x * dt;
            actor.position.y += actor.velocity.y * dt;
        }
    }

    /// Place actor `id` at `position`.
    pub fn teleport(&self, id: usize, position: Vec3) {
        if let Some(actor) = self.lock().actors.get_mut(id) {
            actor.position = position;
        }
    }

    pub fn actors(&self) -> Vec<ActorRecord> {
        self.lock().actors.clone()
    }

    pub fn actor(&self, id: usize) -> Option<ActorRecord> {
        self.lock().actors.get(id).cloned()
    }

    pub fn live_count(&self) -> usize {
        self.lock().actors.iter().filter(|a| a.alive).count()
    }

    /// Ids of live actors, in spawn order.
    pub fn live_ids(&self) -> Vec<usize> {
        self.lock()
            .actors
            .iter()
            .filter(|a| a.alive)
            .map(|a| a.id)
            .collect()
    }

    pub fn spawn_attempts(&self) -> u64 {
        self.lock().spawn_attempts
    }

    pub fn spawn_failures(&self) -> u64 {
        self.lock().spawn_failures
    }

    fn lock(&self) -> MutexGuard<'_, WorldState> {
        self.state.lock().expect("mock actor world poisoned")
    }
}

impl ActorFactory for MockActorWorld {
    fn try_spawn(
        &mut self,
        blueprint: &str,
        transform: Transform,
    ) -> Result<Box<dyn Actuator>, SpawnError> {
        let mut state = self.lock();
        state.spawn_attempts += 1;
        if let Err(e) = state.check_spawn(blueprint, &transform) {
            state.spawn_failures += 1;
            return Err(e);
        }
        let id = state.actors.len();
        state.actors.push(ActorRecord {
            id,
            blueprint: blueprint.to_string(),
            position: transform.location,
            velocity: Vec2::ZERO,
            alive: true,
            destroy_calls: 0,
        });
        Ok(Box::new(MockActuator {
            id,
            state: Arc::clone(&self.state),
        }))
    }
}

struct MockActuator {
    id: usize,
    state: Arc<Mutex<WorldState>>,
}

impl MockActuator {
    fn with_record<R>(&self, f: impl FnOnce(&mut ActorRecord) -> R) -> R {
        let mut state = self.state.lock().expect("mock actor world poisoned");
        f(&mut state.actors[self.id])
    }
}

impl Actuator for MockActuator {
    fn position(&self) -> Vec3 {
        self.with_record(|a| a.position)
    }

    fn set_velocity(&mut self, velocity: Vec2) {
        self.with_record(|a| a.velocity = velocity);
    }

    fn destroy(self: Box<Self>) {
        self.with_record(|a| {
            a.alive = false;
            a.destroy_calls += 1;
        });
    }
}
