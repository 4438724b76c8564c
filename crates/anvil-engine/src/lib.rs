//! Problem construction and the parallel assembly driver.
//!
//! Ties the lower crates together: an [`InputTree`] of configuration
//! blocks is mapped to construction agents through an [`AgentRegistry`],
//! the agents run in task order against a fresh
//! [`ObjectStore`](anvil_store::ObjectStore), and the resulting
//! [`Problem`] sweeps the mesh with one worker per thread.
//!
//! The standard task graph, agents, and built-in object types live in
//! [`tasks`], [`agents`], and [`objects`].

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod agents;
pub mod assembly;
pub mod config;
pub mod error;
pub mod input;
#[cfg(feature = "logging")]
pub mod logging;
pub mod metrics;
pub mod objects;
pub mod problem;
pub mod syntax;
pub mod tasks;

pub use agents::{ObjectAgent, VariableAgent};
pub use assembly::AssemblyOutcome;
pub use config::{ProblemConfig, MAX_THREADS};
pub use error::{ConfigError, ConstructionError, EngineError};
pub use input::{InputBlock, InputTree};
pub use metrics::{AssemblyMetrics, ConstructionMetrics};
pub use objects::{register_standard_types, ConstantInitialCondition, FieldVariable};
pub use problem::Problem;
pub use syntax::{AgentBuildResult, AgentRegistry, AgentSpec, BoundAgent};
pub use tasks::{register_standard_agents, standard_scheduler, STANDARD_TASKS};
