//! Reference route-point graphs for Throng crowd simulations.
//!
//! The crowd engine only sees the [`RouteGraph`](throng_core::RouteGraph)
//! trait. [`PolylineGraph`] is an in-memory implementation for demos,
//! benchmarks and tests: sidewalks are given as polylines (closed loops
//! around blocks, or open lanes), resampled at a fixed spacing, and linked
//! to each other wherever two sidewalks pass within a junction radius.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
mod grid;
pub mod polyline;

pub use error::GraphError;
pub use polyline::{PolylineGraph, PolylineGraphBuilder};
