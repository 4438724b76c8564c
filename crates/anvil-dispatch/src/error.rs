//! Scheduler, agent, and dispatch errors.

use anvil_core::ParamError;
use anvil_registry::RegistryError;
use anvil_store::StoreError;
use thiserror::Error;

/// Errors from the [`TaskScheduler`](crate::TaskScheduler).
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SchedulerError {
    /// A task with this name is already registered.
    #[error("task '{name}' is already registered")]
    DuplicateTask {
        /// Task name.
        name: String,
    },
    /// No task with this name is registered.
    #[error("task '{name}' is not registered")]
    UnknownTask {
        /// Task name.
        name: String,
    },
    /// A task depends on a task that was never registered.
    #[error("task '{task}' depends on unregistered task '{dependency}'")]
    UnknownDependency {
        /// The dependent task.
        task: String,
        /// The missing dependency.
        dependency: String,
    },
    /// The task graph contains a cycle.
    #[error("cyclic task dependency: {}", .cycle.join(" -> "))]
    CyclicDependency {
        /// Task names forming one cycle, earliest-registered first, each
        /// depending on the next.
        cycle: Vec<String>,
    },
}

/// Errors an agent may return from
/// [`ConstructionAgent::act`](crate::ConstructionAgent::act).
#[derive(Debug, Error)]
pub enum AgentError {
    /// Type lookup, parameter validation, or object building failed.
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// The object store rejected an object.
    #[error(transparent)]
    Store(#[from] StoreError),
    /// An agent option could not be read.
    #[error(transparent)]
    Param(#[from] ParamError),
    /// A `block` or `boundary` entry names nothing in the mesh.
    #[error("object '{object}' names {kind} '{reference}', which does not exist in the mesh")]
    UnresolvedRestriction {
        /// Object name.
        object: String,
        /// `"block"` or `"boundary"`.
        kind: &'static str,
        /// The unresolvable entry.
        reference: String,
    },
    /// Agent-specific failure.
    #[error("{0}")]
    Custom(String),
}

impl AgentError {
    /// An agent-specific failure with a message.
    pub fn custom(msg: impl Into<String>) -> Self {
        Self::Custom(msg.into())
    }
}

/// Errors from the [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An agent was bound to a task the scheduler does not know.
    #[error("agent '{agent}' is bound to unregistered task '{task}'")]
    UnregisteredTask {
        /// Agent name.
        agent: String,
        /// Unknown task name.
        task: String,
    },
    /// The task graph could not be ordered.
    #[error(transparent)]
    Scheduler(#[from] SchedulerError),
    /// An agent failed; the run was aborted.
    #[error("agent '{agent}' ({agent_type}) failed during task '{task}': {source}")]
    AgentFailed {
        /// Agent name.
        agent: String,
        /// Agent type name.
        agent_type: String,
        /// Task being executed.
        task: String,
        /// What went wrong.
        #[source]
        source: AgentError,
    },
    /// `execute` was called on a dispatcher that already ran.
    #[error("dispatcher has already executed; construction runs are not resumable")]
    AlreadyExecuted,
}
