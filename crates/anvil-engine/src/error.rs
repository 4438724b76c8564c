//! Engine-level errors.

use anvil_dispatch::{DispatchError, SchedulerError};
use anvil_registry::{BoxError, SchemaViolation};
use anvil_store::StoreError;
use thiserror::Error;

/// Input, syntax, and agent-instantiation errors.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A block path is empty or has an empty segment.
    #[error("malformed block path '{path}'")]
    MalformedPath {
        /// The path as given.
        path: String,
    },
    /// Two blocks share a path.
    #[error("block '{path}' appears more than once")]
    DuplicateBlock {
        /// The repeated path.
        path: String,
    },
    /// An agent type name is already registered.
    #[error("agent type '{name}' is already registered")]
    DuplicateAgentType {
        /// Agent type name.
        name: String,
    },
    /// A syntax pattern refers to an unregistered agent type.
    #[error("syntax '{pattern}' refers to unknown agent type '{name}'")]
    UnknownAgentType {
        /// The pattern being registered.
        pattern: String,
        /// The unknown agent type.
        name: String,
    },
    /// No syntax pattern matches a block path.
    #[error("no syntax registered for block '{path}'")]
    UnknownSyntax {
        /// The unmatched path.
        path: String,
    },
    /// A block's options do not satisfy its agent type's schema.
    #[error("invalid options in block '{path}' ({agent_type}): {source}")]
    AgentParameters {
        /// Block path.
        path: String,
        /// Agent type the block maps to.
        agent_type: String,
        /// The violated option.
        #[source]
        source: SchemaViolation,
    },
    /// An agent builder failed.
    #[error("could not create agent for block '{path}' ({agent_type}): {source}")]
    AgentBuildFailed {
        /// Block path.
        path: String,
        /// Agent type the block maps to.
        agent_type: String,
        /// Builder error.
        #[source]
        source: BoxError,
    },
}

// ── ConfigError ────────────────────────────────────────────────────

/// Errors detected during [`ProblemConfig::validate`](crate::ProblemConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The mesh defines no blocks.
    #[error("mesh defines no blocks")]
    NoBlocks,
}

// ── ConstructionError ──────────────────────────────────────────────

/// Everything that can abort [`Problem::construct`](crate::Problem::construct).
///
/// On any of these, no store is published.
#[derive(Debug, Error)]
pub enum ConstructionError {
    /// Problem configuration is invalid.
    #[error("invalid problem configuration: {0}")]
    Config(#[from] ConfigError),
    /// The task graph could not be ordered.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    /// The input could not be turned into agents.
    #[error(transparent)]
    Input(#[from] EngineError),
    /// Binding or running agents failed.
    #[error(transparent)]
    Dispatch(#[from] DispatchError),
    /// Post-construction object ordering failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}
