//! Test utilities and mock collaborators for Throng development.
//!
//! Provides in-memory implementations of the collaborator traits from
//! `throng-core` ([`RouteGraph`](throng_core::RouteGraph),
//! [`CollisionAvoidance`](throng_core::CollisionAvoidance),
//! [`ActorFactory`](throng_core::ActorFactory),
//! [`RandomSource`](throng_core::RandomSource)) so the path buffer and the
//! crowd engine can be driven deterministically in tests.
//!
//! Mocks that the engine takes ownership of keep their state behind an
//! `Arc<Mutex<_>>`; clone the mock before handing it over and inspect the
//! clone afterwards.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod actors;
pub mod avoidance;
pub mod graph;
pub mod random;

pub use actors::{ActorRecord, MockActorWorld};
pub use avoidance::{AvoidanceLog, RecordingAvoidance};
pub use graph::ChainGraph;
pub use random::ScriptedRandom;
