//! Benchmark profiles for the Anvil construction core.
//!
//! - [`reference_mesh`]: 4 blocks of 2 500 elements, 2 boundaries
//! - [`reference_input`]: one variable plus a configurable number of kernels
//! - [`reference_types`]: standard types plus [`LoadKernel`]

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use anvil_core::{
    BlockId, BoundaryId, ComputationalObject, DomainError, ElementContext, ElementId,
    MeshPartition, Params,
};
use anvil_engine::{register_standard_types, InputTree, ProblemConfig};
use anvil_registry::{BuildContext, BuildResult, ParamSchema, TypeRegistry};

/// Type name of [`LoadKernel`].
pub const LOAD_KERNEL: &str = "LoadKernel";

/// A kernel doing a fixed amount of floating-point work per element.
pub struct LoadKernel {
    name: String,
    iterations: u32,
    accumulator: f64,
}

impl LoadKernel {
    /// Options: `iterations` (work per element), plus block restriction.
    pub fn schema() -> ParamSchema {
        ParamSchema::new()
            .with_description("Synthetic per-element load")
            .param("iterations", 16i64, "Multiply-adds per element")
            .range("iterations", Some(0.0), Some(1.0e6))
            .block_restrictable()
    }

    /// Registry builder.
    pub fn build(ctx: &BuildContext<'_>) -> BuildResult {
        Ok(Box::new(Self {
            name: ctx.object_name.to_string(),
            iterations: ctx.params.get_int("iterations")? as u32,
            accumulator: 0.0,
        }))
    }

    /// Running sum of all work done, so the optimizer keeps it.
    pub fn accumulator(&self) -> f64 {
        self.accumulator
    }
}

impl ComputationalObject for LoadKernel {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        LOAD_KERNEL
    }

    fn compute(&mut self, ctx: &ElementContext) -> Result<(), DomainError> {
        let mut x = ctx.element.0 as f64;
        for _ in 0..self.iterations {
            x = x.mul_add(0.999, 1.0e-3);
        }
        self.accumulator += x;
        Ok(())
    }
}

/// Four blocks (`b0`..`b3`) of `elements_per_block` elements each, and
/// boundaries `inlet` and `outlet`.
pub fn reference_mesh(elements_per_block: usize) -> MeshPartition {
    let mut mesh = MeshPartition::new();
    let mut next = 0u64;
    for b in 0..4u32 {
        mesh.add_block(BlockId(b), Some(format!("b{b}").as_str())).unwrap();
        for _ in 0..elements_per_block {
            mesh.add_element(ElementId(next), BlockId(b)).unwrap();
            next += 1;
        }
    }
    mesh.add_boundary(BoundaryId(0), Some("inlet")).unwrap();
    mesh.add_boundary(BoundaryId(1), Some("outlet")).unwrap();
    mesh
}

/// Standard object types plus [`LOAD_KERNEL`].
pub fn reference_types() -> TypeRegistry {
    let mut types = TypeRegistry::new();
    register_standard_types(&mut types).unwrap();
    types
        .register_type(LOAD_KERNEL, LoadKernel::schema, LoadKernel::build)
        .unwrap();
    types
}

/// Variable `u` with an initial condition, and `kernels` load kernels
/// spread round-robin over the four blocks.
pub fn reference_input(kernels: usize) -> InputTree {
    let mut input = InputTree::new();
    input
        .add("Variables/u", Params::new().with("initial_condition", 0.0))
        .unwrap();
    for k in 0..kernels {
        let params = Params::new()
            .with("type", LOAD_KERNEL)
            .with("block", vec![format!("b{}", k % 4)]);
        input.add(format!("Kernels/load_{k}"), params).unwrap();
    }
    input
}

/// The reference configuration: 10K elements, sorting on.
pub fn reference_config(threads: usize) -> ProblemConfig {
    ProblemConfig::new(reference_mesh(2_500))
        .with_threads(threads)
        .with_sorting(true)
}
