//! Test fixtures for Anvil development.
//!
//! Provides computational objects that count their work or fail on cue,
//! an agent that records every invocation, and small meshes, so that
//! tests across the workspace share one set of doubles.

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod agents;
pub mod fixtures;

pub use agents::{InvocationLog, RecordingAgent};
pub use fixtures::{
    register_fixture_types, two_block_mesh, CountingObject, FailingObject, COUNTING, FAILING,
    SIDE,
};
