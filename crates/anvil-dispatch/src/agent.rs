//! The [`ConstructionAgent`] protocol.

use crate::context::ConstructionContext;
use crate::error::AgentError;

/// A unit of construction logic bound to one or more tasks.
///
/// One agent is created per matching configuration block. The
/// [`Dispatcher`](crate::Dispatcher) calls [`act`](Self::act) once for
/// every task the agent is bound to, in task order; a multi-task agent can
/// branch on `task`.
pub trait ConstructionAgent: Send {
    /// Agent name, normally the configuration block path.
    fn name(&self) -> &str;

    /// Registered agent type name.
    fn type_name(&self) -> &str;

    /// Position among agents bound to the same task; lower runs first.
    /// Equal priorities run in binding order.
    fn priority(&self) -> i32 {
        0
    }

    /// Perform this agent's work for `task`.
    fn act(&mut self, task: &str, ctx: &mut ConstructionContext<'_>) -> Result<(), AgentError>;
}
