//! Reusable object fixtures.
//!
//! - [`CountingObject`]: records every element it computes (per-thread scratch).
//! - [`FailingObject`]: raises a [`DomainError`] on one element.
//!
//! [`register_fixture_types`] makes both available to a [`TypeRegistry`]
//! under [`COUNTING`], [`FAILING`], and the boundary-restricted [`SIDE`].

use anvil_core::{
    BlockId, BoundaryId, ComputationalObject, DomainError, ElementContext, ElementId, MeshPartition,
    ParamKind, ThreadId,
};
use anvil_registry::{BuildContext, BuildResult, ParamSchema, TypeRegistry};

/// Type name of [`CountingObject`].
pub const COUNTING: &str = "Counting";
/// Type name of [`FailingObject`].
pub const FAILING: &str = "Failing";
/// Type name of the boundary-restricted [`CountingObject`].
pub const SIDE: &str = "Side";

/// Counts elements; optionally supplies and requires named quantities.
pub struct CountingObject {
    pub name: String,
    pub type_name: &'static str,
    pub thread: ThreadId,
    pub enabled: bool,
    pub supplies: Vec<String>,
    pub requires: Vec<String>,
    pub visited: Vec<ElementId>,
}

impl CountingObject {
    pub fn new(name: impl Into<String>, thread: ThreadId) -> Self {
        Self {
            name: name.into(),
            type_name: COUNTING,
            thread,
            enabled: true,
            supplies: Vec::new(),
            requires: Vec::new(),
            visited: Vec::new(),
        }
    }

    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Counts the elements it is asked to compute")
            .optional("variable", ParamKind::Str, "Variable the object acts on")
            .param("enable", true, "Whether the object takes part in assembly")
            .param("supplies", Vec::<String>::new(), "Quantities this object provides")
            .param("requires", Vec::<String>::new(), "Quantities this object consumes")
            .block_restrictable()
    }

    pub fn side_schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Counting object attached to boundaries")
            .optional("variable", ParamKind::Str, "Variable the object acts on")
            .boundary_restrictable()
    }

    pub fn build(ctx: &BuildContext<'_>) -> BuildResult {
        let mut obj = Self::new(ctx.object_name, ctx.thread);
        if ctx.params.contains("enable") {
            obj.enabled = ctx.params.get_bool("enable")?;
            obj.supplies = ctx.params.get_str_list("supplies")?;
            obj.requires = ctx.params.get_str_list("requires")?;
        } else {
            obj.type_name = SIDE;
        }
        Ok(Box::new(obj))
    }

    /// Number of elements computed so far.
    pub fn hits(&self) -> usize {
        self.visited.len()
    }
}

impl ComputationalObject for CountingObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        self.type_name
    }

    fn enabled(&self) -> bool {
        self.enabled
    }

    fn supplies(&self) -> Vec<String> {
        self.supplies.clone()
    }

    fn requires(&self) -> Vec<String> {
        self.requires.clone()
    }

    fn compute(&mut self, ctx: &ElementContext) -> Result<(), DomainError> {
        self.visited.push(ctx.element);
        Ok(())
    }
}

/// Rejects one element with a [`DomainError`]; accepts all others.
pub struct FailingObject {
    pub name: String,
    pub fail_on: ElementId,
    pub computed: usize,
}

impl FailingObject {
    pub fn new(name: impl Into<String>, fail_on: ElementId) -> Self {
        Self {
            name: name.into(),
            fail_on,
            computed: 0,
        }
    }

    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Fails on a chosen element")
            .required("fail_on_element", ParamKind::Int, "Element id to reject")
            .range("fail_on_element", Some(0.0), None)
            .block_restrictable()
    }

    pub fn build(ctx: &BuildContext<'_>) -> BuildResult {
        let element = ctx.params.get_int("fail_on_element")?;
        Ok(Box::new(Self::new(ctx.object_name, ElementId(element as u64))))
    }
}

impl ComputationalObject for FailingObject {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        FAILING
    }

    fn compute(&mut self, ctx: &ElementContext) -> Result<(), DomainError> {
        self.computed += 1;
        if ctx.element == self.fail_on {
            return Err(DomainError::new(
                &self.name,
                ctx.element,
                "negative Jacobian",
            ));
        }
        Ok(())
    }
}

/// Register [`COUNTING`], [`FAILING`], and [`SIDE`].
///
/// # Panics
///
/// If any of the names is already registered.
pub fn register_fixture_types(types: &mut TypeRegistry) {
    let result = types
        .register_type(COUNTING, CountingObject::schema, CountingObject::build)
        .and_then(|()| types.register_type(FAILING, FailingObject::schema, FailingObject::build))
        .and_then(|()| types.register_type(SIDE, CountingObject::side_schema, CountingObject::build));
    if let Err(err) = result {
        panic!("fixture registration failed: {err}");
    }
}

/// Blocks 1 (`left`) and 2 (`right`), each with `elements_per_block`
/// elements numbered consecutively, and boundaries 0 (`west`) and 1 (`east`).
pub fn two_block_mesh(elements_per_block: usize) -> MeshPartition {
    let mut mesh = MeshPartition::new();
    let blocks = [(BlockId(1), "left"), (BlockId(2), "right")];
    let mut next = 0u64;
    for (id, name) in blocks {
        if let Err(err) = mesh.add_block(id, Some(name)) {
            panic!("fixture mesh: {err}");
        }
        for _ in 0..elements_per_block {
            if let Err(err) = mesh.add_element(ElementId(next), id) {
                panic!("fixture mesh: {err}");
            }
            next += 1;
        }
    }
    for (id, name) in [(BoundaryId(0), "west"), (BoundaryId(1), "east")] {
        if let Err(err) = mesh.add_boundary(id, Some(name)) {
            panic!("fixture mesh: {err}");
        }
    }
    mesh
}
