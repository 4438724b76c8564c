//! Agent types and the syntax that maps input blocks to them.
//!
//! An agent type names the tasks its instances bind to, the options a
//! block may set, and how to build an agent from a validated block.
//! Syntax patterns (`Kernels/*`, `Mesh`) select the agent type for each
//! block path; `*` matches exactly one path segment.

use std::fmt;
use std::sync::Arc;

use anvil_core::Params;
use anvil_dispatch::ConstructionAgent;
use anvil_registry::{BoxError, SchemaFn};
use indexmap::IndexMap;

use crate::error::EngineError;
use crate::input::InputTree;

/// What an agent builder receives.
#[derive(Clone, Copy, Debug)]
pub struct AgentSpec<'a> {
    /// Full block path; becomes the agent name.
    pub path: &'a str,
    /// Last path segment; the name of the object(s) the agent adds.
    pub name: &'a str,
    /// Agent type being built.
    pub agent_type: &'a str,
    /// Block options validated against the agent type's schema.
    pub params: &'a Params,
}

/// Result of an agent builder.
pub type AgentBuildResult = Result<Box<dyn ConstructionAgent>, BoxError>;

type AgentBuilderFn = Arc<dyn Fn(&AgentSpec<'_>) -> AgentBuildResult + Send + Sync>;

struct AgentType {
    tasks: Vec<String>,
    schema: SchemaFn,
    builder: AgentBuilderFn,
}

/// An instantiated agent and the tasks it must be bound to.
pub struct BoundAgent {
    /// The agent.
    pub agent: Box<dyn ConstructionAgent>,
    /// Task names from its agent type.
    pub tasks: Vec<String>,
}

impl fmt::Debug for BoundAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundAgent")
            .field("agent", &self.agent.name())
            .field("tasks", &self.tasks)
            .finish()
    }
}

/// Agent types plus syntax patterns.
#[derive(Default)]
pub struct AgentRegistry {
    types: IndexMap<String, AgentType>,
    syntax: Vec<(String, String)>,
}

impl AgentRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an agent type bound to `tasks`.
    ///
    /// Task names are checked against the scheduler only when agents are
    /// bound, so plugins may name tasks registered later.
    pub fn register_agent_type<F>(
        &mut self,
        name: &str,
        tasks: &[&str],
        schema: SchemaFn,
        builder: F,
    ) -> Result<(), EngineError>
    where
        F: Fn(&AgentSpec<'_>) -> AgentBuildResult + Send + Sync + 'static,
    {
        if self.types.contains_key(name) {
            return Err(EngineError::DuplicateAgentType {
                name: name.to_string(),
            });
        }
        self.types.insert(
            name.to_string(),
            AgentType {
                tasks: tasks.iter().map(|t| t.to_string()).collect(),
                schema,
                builder: Arc::new(builder),
            },
        );
        Ok(())
    }

    /// Map block paths matching `pattern` to `agent_type`.
    pub fn register_syntax(&mut self, pattern: &str, agent_type: &str) -> Result<(), EngineError> {
        if !self.types.contains_key(agent_type) {
            return Err(EngineError::UnknownAgentType {
                pattern: pattern.to_string(),
                name: agent_type.to_string(),
            });
        }
        self.syntax
            .push((pattern.trim_matches('/').to_string(), agent_type.to_string()));
        Ok(())
    }

    /// Agent type for `path`: an exact pattern wins over a wildcard one;
    /// otherwise the first registered match.
    pub fn resolve(&self, path: &str) -> Option<&str> {
        let exact = self
            .syntax
            .iter()
            .find(|(pattern, _)| pattern == path);
        exact
            .or_else(|| {
                self.syntax
                    .iter()
                    .find(|(pattern, _)| pattern_matches(pattern, path))
            })
            .map(|(_, agent_type)| agent_type.as_str())
    }

    /// Tasks an agent type binds to.
    pub fn tasks(&self, agent_type: &str) -> Option<&[String]> {
        self.types.get(agent_type).map(|t| t.tasks.as_slice())
    }

    /// Registered agent type names in registration order.
    pub fn agent_types(&self) -> impl Iterator<Item = &str> {
        self.types.keys().map(String::as_str)
    }

    /// Create one agent per input block, in input order.
    pub fn instantiate(&self, input: &InputTree) -> Result<Vec<BoundAgent>, EngineError> {
        let mut agents = Vec::with_capacity(input.len());
        for block in input.blocks() {
            let type_name = self
                .resolve(&block.path)
                .ok_or_else(|| EngineError::UnknownSyntax {
                    path: block.path.clone(),
                })?;
            let Some(agent_type) = self.types.get(type_name) else {
                return Err(EngineError::UnknownSyntax {
                    path: block.path.clone(),
                });
            };
            let params = (agent_type.schema)()
                .validate(&block.params)
                .map_err(|source| EngineError::AgentParameters {
                    path: block.path.clone(),
                    agent_type: type_name.to_string(),
                    source,
                })?;
            let spec = AgentSpec {
                path: &block.path,
                name: block.name(),
                agent_type: type_name,
                params: &params,
            };
            let agent = (agent_type.builder)(&spec).map_err(|source| {
                EngineError::AgentBuildFailed {
                    path: block.path.clone(),
                    agent_type: type_name.to_string(),
                    source,
                }
            })?;
            tracing::debug!(path = %block.path, agent_type = type_name, "created agent");
            agents.push(BoundAgent {
                agent,
                tasks: agent_type.tasks.clone(),
            });
        }
        Ok(agents)
    }
}

impl fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("types", &self.types.keys().collect::<Vec<_>>())
            .field("syntax", &self.syntax)
            .finish()
    }
}

fn pattern_matches(pattern: &str, path: &str) -> bool {
    let mut pat = pattern.split('/');
    let mut segs = path.split('/');
    loop {
        match (pat.next(), segs.next()) {
            (None, None) => return true,
            (Some(p), Some(s)) if p == "*" || p == s => {}
            _ => return false,
        }
    }
}
