//! Error types shared across the Throng workspace.
//!
//! Neither runtime error is fatal to a running crowd: a [`PathError`] retires the
//! agent that produced it, and a [`SpawnError`] leaves its slot empty until
//! the next respawn pass.

use thiserror::Error;

/// Path construction failed for one agent.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PathError {
    /// The path buffer could not be grown to the lookahead length, either
    /// because the graph dead-ends or because it has no route points at all.
    #[error("no path: buffered {buffered} of {lookahead} route points")]
    NoPath {
        /// Route points in the buffer when extension stopped.
        buffered: usize,
        /// Required lookahead length.
        lookahead: usize,
    },
}

/// An [`ActorFactory`](crate::ActorFactory) declined to create an actor.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SpawnError {
    /// The spawn location collides with existing geometry or actors.
    #[error("spawn location occupied")]
    Occupied,
    /// The requested blueprint is not known to the factory.
    #[error("unknown blueprint '{0}'")]
    UnknownBlueprint(String),
    /// The factory refused for another reason.
    #[error("spawn rejected: {reason}")]
    Rejected {
        /// Description supplied by the factory.
        reason: String,
    },
}

/// An [`AgentParams`](crate::AgentParams) field failed validation.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum AgentParamsError {
    /// A numeric parameter is NaN, infinite, zero, or negative.
    #[error("{field} must be finite and positive, got {value}")]
    NonPositive {
        /// Name of the offending field.
        field: &'static str,
        /// The invalid value.
        value: f64,
    },
}
