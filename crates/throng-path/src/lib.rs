//! Per-agent path following for Throng crowds.
//!
//! A crowd agent keeps a short lookahead of route points in a
//! [`PathBuffer`], grows it by walking a [`RouteGraph`](throng_core::RouteGraph)
//! and drops the points it has already reached. [`steering`] turns the
//! buffer's front point into a preferred velocity.
//!
//! # Per-agent order (each tick)
//!
//! 1. [`PathBuffer::extend_and_trim`]: seed, extend to lookahead, trim reached points
//! 2. [`compute_velocity`]: front point → preferred velocity at the agent's max speed

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod path;
pub mod steering;

pub use path::{ExtendDirection, PathBuffer, PathParams};
pub use steering::{compute_velocity, steer};
