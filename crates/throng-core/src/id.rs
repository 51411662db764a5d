//! Strongly-typed identifiers.

use std::fmt;

/// Opaque handle to a route point on a sidewalk graph.
///
/// Issued by a [`RouteGraph`](crate::RouteGraph) implementation, which is
/// free to pack whatever it needs into the 64 bits. The engine and path
/// buffer only compare handles for equality and pass them back to the
/// graph that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RoutePointId(pub u64);

impl fmt::Display for RoutePointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rp:{}", self.0)
    }
}

impl From<u64> for RoutePointId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}

/// Index of a slot in the fixed-size crowd table.
///
/// The same index identifies the agent towards the collision-avoidance
/// adapter, so a slot keeps its `SlotId` for the lifetime of the engine
/// even while it is empty.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(pub u32);

impl SlotId {
    /// The slot index as a `usize`, for table lookups.
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for SlotId {
    fn from(v: u32) -> Self {
        Self(v)
    }
}

/// Monotonically increasing tick counter.
///
/// Incremented each time the crowd engine completes one tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TickId(pub u64);

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for TickId {
    fn from(v: u64) -> Self {
        Self(v)
    }
}
