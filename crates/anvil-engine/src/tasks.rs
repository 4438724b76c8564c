//! The standard task graph and syntax.

use anvil_dispatch::{SchedulerError, TaskScheduler};

use crate::agents::{ObjectAgent, VariableAgent};
use crate::error::EngineError;
use crate::objects::{AUX_VARIABLE_TYPE, VARIABLE_TYPE};
use crate::syntax::AgentRegistry;

/// Mesh modifications, before anything refers to blocks.
pub const ADD_MESH_MODIFIER: &str = "add_mesh_modifier";
/// Solution variables.
pub const ADD_VARIABLE: &str = "add_variable";
/// Auxiliary variables.
pub const ADD_AUX_VARIABLE: &str = "add_aux_variable";
/// Analytic functions.
pub const ADD_FUNCTION: &str = "add_function";
/// Material properties.
pub const ADD_MATERIAL: &str = "add_material";
/// Volumetric residual contributions.
pub const ADD_KERNEL: &str = "add_kernel";
/// Auxiliary variable updates.
pub const ADD_AUX_KERNEL: &str = "add_aux_kernel";
/// Boundary conditions.
pub const ADD_BC: &str = "add_bc";
/// Initial conditions.
pub const ADD_IC: &str = "add_ic";
/// User objects.
pub const ADD_USER_OBJECT: &str = "add_user_object";
/// Postprocessors.
pub const ADD_POSTPROCESSOR: &str = "add_postprocessor";

/// `(task, dependencies)` in registration order.
pub const STANDARD_TASKS: &[(&str, &[&str])] = &[
    (ADD_MESH_MODIFIER, &[]),
    (ADD_VARIABLE, &[]),
    (ADD_AUX_VARIABLE, &[]),
    (ADD_FUNCTION, &[]),
    (ADD_MATERIAL, &[ADD_VARIABLE, ADD_FUNCTION]),
    (ADD_KERNEL, &[ADD_VARIABLE, ADD_AUX_VARIABLE, ADD_MATERIAL]),
    (ADD_AUX_KERNEL, &[ADD_AUX_VARIABLE]),
    (ADD_BC, &[ADD_VARIABLE, ADD_MATERIAL]),
    (ADD_IC, &[ADD_VARIABLE, ADD_AUX_VARIABLE]),
    (ADD_USER_OBJECT, &[ADD_MATERIAL]),
    (ADD_POSTPROCESSOR, &[ADD_USER_OBJECT]),
];

/// `(syntax, agent type, task)` for agents that build one object from the
/// block's `type` option.
const OBJECT_SYNTAX: &[(&str, &str, &str)] = &[
    ("MeshModifiers/*", "AddMeshModifierAgent", ADD_MESH_MODIFIER),
    ("Functions/*", "AddFunctionAgent", ADD_FUNCTION),
    ("Materials/*", "AddMaterialAgent", ADD_MATERIAL),
    ("Kernels/*", "AddKernelAgent", ADD_KERNEL),
    ("AuxKernels/*", "AddAuxKernelAgent", ADD_AUX_KERNEL),
    ("BCs/*", "AddBCAgent", ADD_BC),
    ("ICs/*", "AddICAgent", ADD_IC),
    ("UserObjects/*", "AddUserObjectAgent", ADD_USER_OBJECT),
    ("Postprocessors/*", "AddPostprocessorAgent", ADD_POSTPROCESSOR),
];

/// A scheduler holding [`STANDARD_TASKS`].
pub fn standard_scheduler() -> Result<TaskScheduler, SchedulerError> {
    let mut scheduler = TaskScheduler::new();
    for &(task, deps) in STANDARD_TASKS {
        scheduler.register_task(task, deps.iter().copied())?;
    }
    Ok(scheduler)
}

/// Register the standard agent types and their syntax.
pub fn register_standard_agents(agents: &mut AgentRegistry) -> Result<(), EngineError> {
    agents.register_agent_type(
        "AddVariableAgent",
        &[ADD_VARIABLE, ADD_IC],
        VariableAgent::schema,
        |spec| VariableAgent::build(spec, ADD_VARIABLE, VARIABLE_TYPE),
    )?;
    agents.register_syntax("Variables/*", "AddVariableAgent")?;

    agents.register_agent_type(
        "AddAuxVariableAgent",
        &[ADD_AUX_VARIABLE, ADD_IC],
        VariableAgent::schema,
        |spec| VariableAgent::build(spec, ADD_AUX_VARIABLE, AUX_VARIABLE_TYPE),
    )?;
    agents.register_syntax("AuxVariables/*", "AddAuxVariableAgent")?;

    for &(syntax, agent_type, task) in OBJECT_SYNTAX {
        agents.register_agent_type(agent_type, &[task], ObjectAgent::schema, ObjectAgent::build)?;
        agents.register_syntax(syntax, agent_type)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_order_respects_every_edge() {
        let mut s = standard_scheduler().unwrap();
        let order = s.ordered_tasks().unwrap().to_vec();
        assert_eq!(order.len(), STANDARD_TASKS.len());
        let pos = |t: &str| order.iter().position(|o| o == t).unwrap();
        for &(task, deps) in STANDARD_TASKS {
            for &dep in deps {
                assert!(pos(dep) < pos(task), "{dep} must precede {task}");
            }
        }
    }

    #[test]
    fn standard_order_is_fixed() {
        let mut s = standard_scheduler().unwrap();
        assert_eq!(
            s.ordered_tasks().unwrap(),
            [
                ADD_MESH_MODIFIER,
                ADD_VARIABLE,
                ADD_AUX_VARIABLE,
                ADD_FUNCTION,
                ADD_MATERIAL,
                ADD_KERNEL,
                ADD_AUX_KERNEL,
                ADD_BC,
                ADD_IC,
                ADD_USER_OBJECT,
                ADD_POSTPROCESSOR,
            ]
        );
    }

    #[test]
    fn every_standard_syntax_resolves() {
        let mut agents = AgentRegistry::new();
        register_standard_agents(&mut agents).unwrap();
        assert_eq!(agents.resolve("Variables/u"), Some("AddVariableAgent"));
        assert_eq!(agents.resolve("BCs/left"), Some("AddBCAgent"));
        assert_eq!(
            agents.tasks("AddAuxVariableAgent").unwrap(),
            [ADD_AUX_VARIABLE, ADD_IC]
        );
        assert_eq!(agents.resolve("Outputs/exodus"), None);
    }
}
