//! Tick-driven crowd population engine for Throng.
//!
//! [`CrowdEngine`] keeps a fixed-size pool of pedestrians walking a
//! sidewalk route graph: each tick it retires agents that left the map or
//! fell through it, steers the rest along their path buffers through an
//! external collision-avoidance solver, and respawns into empty slots.
//!
//! The engine never installs a `tracing` subscriber; hosts choose where
//! spawn, retirement, and starvation events go.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod avoidance;
pub mod config;
pub mod metrics;
pub mod pool;
pub mod rng;
pub mod tick;

pub use avoidance::PassThroughAvoidance;
pub use config::{ConfigError, CrowdConfig};
pub use metrics::TickMetrics;
pub use pool::{Agent, RetireReason, Retirement, Slot, SlotTable};
pub use rng::ChaChaSource;
pub use tick::{CrowdEngine, TickResult};
