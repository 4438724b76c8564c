//! Built-in object types used by the standard agents.

use anvil_core::{ComputationalObject, ParamKind, ThreadId};
use anvil_registry::{BuildContext, BuildResult, ParamSchema, RegistryError, TypeRegistry};

/// Registered name of [`FieldVariable`] for solution variables.
pub const VARIABLE_TYPE: &str = "FieldVariable";
/// Registered name of [`FieldVariable`] for auxiliary variables.
pub const AUX_VARIABLE_TYPE: &str = "AuxVariable";
/// Registered name of [`ConstantInitialCondition`].
pub const CONSTANT_IC_TYPE: &str = "ConstantIC";

/// A field variable: a named unknown (or auxiliary field) on some blocks.
///
/// Supplies its own name so that objects requiring it sort after it.
#[derive(Clone, Debug)]
pub struct FieldVariable {
    name: String,
    type_name: &'static str,
    thread: ThreadId,
    order: String,
    family: String,
}

impl FieldVariable {
    /// Options accepted by variables.
    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("A finite element field variable")
            .param("order", "FIRST", "Polynomial order of the shape functions")
            .one_of("order", &["CONSTANT", "FIRST", "SECOND", "THIRD"])
            .param("family", "LAGRANGE", "Shape function family")
            .one_of("family", &["LAGRANGE", "MONOMIAL", "HERMITE"])
            .block_restrictable()
    }

    fn build(type_name: &'static str, ctx: &BuildContext<'_>) -> BuildResult {
        Ok(Box::new(Self {
            name: ctx.object_name.to_string(),
            type_name,
            thread: ctx.thread,
            order: ctx.params.get_str("order")?.to_string(),
            family: ctx.params.get_str("family")?.to_string(),
        }))
    }

    /// Shape function order.
    pub fn order(&self) -> &str {
        &self.order
    }

    /// Shape function family.
    pub fn family(&self) -> &str {
        &self.family
    }

    /// Thread this replica belongs to.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }
}

impl ComputationalObject for FieldVariable {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.type_name
    }

    fn supplies(&self) -> Vec<String> {
        vec![self.name.clone()]
    }
}

/// Sets a variable to a constant at the start of the solve.
#[derive(Clone, Debug)]
pub struct ConstantInitialCondition {
    name: String,
    variable: String,
    value: f64,
}

impl ConstantInitialCondition {
    /// Options accepted by the constant initial condition.
    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Constant initial value for a variable")
            .required("variable", ParamKind::Str, "Variable to initialize")
            .required("value", ParamKind::Real, "Initial value")
            .block_restrictable()
    }

    fn build(ctx: &BuildContext<'_>) -> BuildResult {
        Ok(Box::new(Self {
            name: ctx.object_name.to_string(),
            variable: ctx.params.get_str("variable")?.to_string(),
            value: ctx.params.get_real("value")?,
        }))
    }

    /// Variable being initialized.
    pub fn variable(&self) -> &str {
        &self.variable
    }

    /// Initial value.
    pub fn value(&self) -> f64 {
        self.value
    }
}

impl ComputationalObject for ConstantInitialCondition {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        CONSTANT_IC_TYPE
    }

    fn requires(&self) -> Vec<String> {
        vec![self.variable.clone()]
    }
}

/// Register the built-in object types.
pub fn register_standard_types(types: &mut TypeRegistry) -> Result<(), RegistryError> {
    types.register_type(VARIABLE_TYPE, FieldVariable::schema, |ctx| {
        FieldVariable::build(VARIABLE_TYPE, ctx)
    })?;
    types.register_type(AUX_VARIABLE_TYPE, FieldVariable::schema, |ctx| {
        FieldVariable::build(AUX_VARIABLE_TYPE, ctx)
    })?;
    types.register_type(
        CONSTANT_IC_TYPE,
        ConstantInitialCondition::schema,
        ConstantInitialCondition::build,
    )?;
    Ok(())
}
