//! The standard construction agents.

use anvil_core::{ParamKind, Params};
use anvil_dispatch::{AgentError, ConstructionAgent, ConstructionContext};
use anvil_registry::{ParamSchema, BLOCK_OPTION};

use crate::objects::{FieldVariable, CONSTANT_IC_TYPE};
use crate::syntax::{AgentBuildResult, AgentSpec};
use crate::tasks::ADD_IC;

/// Option naming the object type an [`ObjectAgent`] builds.
pub const TYPE_OPTION: &str = "type";
/// Option holding a [`VariableAgent`]'s constant initial value.
pub const INITIAL_CONDITION_OPTION: &str = "initial_condition";

// ── ObjectAgent ────────────────────────────────────────────────────

/// Builds the object named by the block's `type` option, passing every
/// other option through to that type's schema.
#[derive(Debug)]
pub struct ObjectAgent {
    path: String,
    agent_type: String,
    object_name: String,
    object_type: String,
    params: Params,
}

impl ObjectAgent {
    /// Requires `type`; every other option belongs to the object type.
    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Adds one object of the given type")
            .required(TYPE_OPTION, ParamKind::Str, "Registered object type to build")
            .accept_unknown()
    }

    /// Build from a validated block.
    pub fn build(spec: &AgentSpec<'_>) -> AgentBuildResult {
        let mut params = spec.params.clone();
        let object_type = params.get_str(TYPE_OPTION)?.to_string();
        params.remove(TYPE_OPTION);
        Ok(Box::new(Self {
            path: spec.path.to_string(),
            agent_type: spec.agent_type.to_string(),
            object_name: spec.name.to_string(),
            object_type,
            params,
        }))
    }

    /// Type of the object this agent adds.
    pub fn object_type(&self) -> &str {
        &self.object_type
    }
}

impl ConstructionAgent for ObjectAgent {
    fn name(&self) -> &str {
        &self.path
    }

    fn type_name(&self) -> &str {
        &self.agent_type
    }

    fn act(&mut self, _task: &str, ctx: &mut ConstructionContext<'_>) -> Result<(), AgentError> {
        ctx.add_object(&self.object_type, &self.object_name, &self.params)
    }
}

// ── VariableAgent ──────────────────────────────────────────────────

/// Adds a variable in its variable task and, when `initial_condition` is
/// set, a constant initial condition for it in `add_ic`.
#[derive(Debug)]
pub struct VariableAgent {
    path: String,
    agent_type: String,
    name: String,
    variable_task: &'static str,
    variable_type: &'static str,
    variable_params: Params,
    initial_condition: Option<f64>,
}

impl VariableAgent {
    /// Variable options plus the optional `initial_condition`.
    pub fn schema() -> ParamSchema {
        FieldVariable::schema().optional(
            INITIAL_CONDITION_OPTION,
            ParamKind::Real,
            "Constant initial value",
        )
    }

    /// Build from a validated block; the variable is added in
    /// `variable_task` as an object of `variable_type`.
    pub fn build(
        spec: &AgentSpec<'_>,
        variable_task: &'static str,
        variable_type: &'static str,
    ) -> AgentBuildResult {
        let mut variable_params = spec.params.clone();
        let initial_condition = match variable_params.remove(INITIAL_CONDITION_OPTION) {
            Some(_) => Some(spec.params.get_real(INITIAL_CONDITION_OPTION)?),
            None => None,
        };
        Ok(Box::new(Self {
            path: spec.path.to_string(),
            agent_type: spec.agent_type.to_string(),
            name: spec.name.to_string(),
            variable_task,
            variable_type,
            variable_params,
            initial_condition,
        }))
    }

    fn initial_condition_params(&self, value: f64) -> Params {
        let mut params = Params::new()
            .with("variable", self.name.as_str())
            .with("value", value);
        if let Some(block) = self.variable_params.get(BLOCK_OPTION) {
            params.set(BLOCK_OPTION, block.clone());
        }
        params
    }
}

impl ConstructionAgent for VariableAgent {
    fn name(&self) -> &str {
        &self.path
    }

    fn type_name(&self) -> &str {
        &self.agent_type
    }

    fn act(&mut self, task: &str, ctx: &mut ConstructionContext<'_>) -> Result<(), AgentError> {
        if task == self.variable_task {
            return ctx.add_object(self.variable_type, &self.name, &self.variable_params);
        }
        if task == ADD_IC {
            if let Some(value) = self.initial_condition {
                let params = self.initial_condition_params(value);
                return ctx.add_object(CONSTANT_IC_TYPE, &format!("{}_ic", self.name), &params);
            }
            return Ok(());
        }
        Err(AgentError::custom(format!(
            "variable agent bound to unexpected task '{task}'"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anvil_core::{BlockId, ThreadId};
    use anvil_registry::TypeRegistry;
    use anvil_store::ObjectStore;

    use crate::objects::{register_standard_types, VARIABLE_TYPE};
    use crate::tasks::ADD_VARIABLE;

    fn spec<'a>(path: &'a str, name: &'a str, params: &'a Params) -> AgentSpec<'a> {
        AgentSpec {
            path,
            name,
            agent_type: "Test",
            params,
        }
    }

    #[test]
    fn object_agent_forwards_options_without_type() {
        let mut types = TypeRegistry::new();
        register_standard_types(&mut types).unwrap();
        let mesh = anvil_core::MeshPartition::uniform(&[1, 2], 1);
        let mut store = ObjectStore::new(&mesh, 2);

        let params = Params::new()
            .with(TYPE_OPTION, VARIABLE_TYPE)
            .with("order", "SECOND")
            .with("block", vec!["block_1"]);
        let validated = ObjectAgent::schema().validate(&params).unwrap();
        let mut agent = ObjectAgent::build(&spec("Kernels/v", "v", &validated)).unwrap();
        assert_eq!(agent.name(), "Kernels/v");
        assert_eq!(agent.type_name(), "Test");

        // The variable schema is closed, so a forwarded `type` would be rejected.
        let mut ctx = anvil_dispatch::ConstructionContext::new(&types, &mesh, &mut store);
        agent.act(ADD_VARIABLE, &mut ctx).unwrap();

        for t in 0..2 {
            let variable = store
                .get_object(ThreadId(t), "v")
                .and_then(|o| o.downcast_ref::<FieldVariable>())
                .unwrap();
            assert_eq!(variable.order(), "SECOND");
            assert_eq!(store.objects_on(ThreadId(t), BlockId(1)).names(), vec!["v"]);
            assert!(store.objects_on(ThreadId(t), BlockId(2)).is_empty());
        }
    }

    #[test]
    fn variable_agent_adds_variable_then_initial_condition() {
        let mut types = TypeRegistry::new();
        register_standard_types(&mut types).unwrap();
        let mesh = anvil_core::MeshPartition::uniform(&[1, 2], 1);
        let mut store = ObjectStore::new(&mesh, 2);

        let params = Params::new()
            .with(INITIAL_CONDITION_OPTION, 300.0)
            .with("block", vec!["block_2"]);
        let validated = VariableAgent::schema().validate(&params).unwrap();
        let mut agent =
            VariableAgent::build(&spec("Variables/T", "T", &validated), ADD_VARIABLE, VARIABLE_TYPE)
                .unwrap();

        let mut ctx = anvil_dispatch::ConstructionContext::new(&types, &mesh, &mut store);
        agent.act(ADD_VARIABLE, &mut ctx).unwrap();
        agent.act(ADD_IC, &mut ctx).unwrap();
        assert!(agent.act("add_kernel", &mut ctx).is_err());

        for t in 0..2 {
            assert_eq!(
                store.objects_on(ThreadId(t), BlockId(2)).names(),
                vec!["T", "T_ic"]
            );
            assert!(store.objects_on(ThreadId(t), BlockId(1)).is_empty());
        }
    }

    #[test]
    fn variable_without_initial_condition_skips_add_ic() {
        let mut types = TypeRegistry::new();
        register_standard_types(&mut types).unwrap();
        let mesh = anvil_core::MeshPartition::uniform(&[1], 1);
        let mut store = ObjectStore::new(&mesh, 1);
        let validated = VariableAgent::schema().validate(&Params::new()).unwrap();
        let mut agent =
            VariableAgent::build(&spec("Variables/u", "u", &validated), ADD_VARIABLE, VARIABLE_TYPE)
                .unwrap();
        let mut ctx = anvil_dispatch::ConstructionContext::new(&types, &mesh, &mut store);
        agent.act(ADD_VARIABLE, &mut ctx).unwrap();
        agent.act(ADD_IC, &mut ctx).unwrap();
        assert_eq!(store.objects(ThreadId(0)).len(), 1);
    }
}
