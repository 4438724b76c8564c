//! Anvil: the construction and scheduling core of a multiphysics framework.
//!
//! This is the top-level facade crate that re-exports the public API from all
//! Anvil sub-crates. For most users, adding `anvil` as a single dependency is
//! sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use anvil::prelude::*;
//!
//! // A kernel that counts the elements it assembles.
//! struct Tally {
//!     name: String,
//!     count: usize,
//! }
//!
//! impl ComputationalObject for Tally {
//!     fn name(&self) -> &str { &self.name }
//!     fn type_name(&self) -> &str { "Tally" }
//!     fn compute(&mut self, _ctx: &ElementContext) -> Result<(), DomainError> {
//!         self.count += 1;
//!         Ok(())
//!     }
//! }
//!
//! let mut types = TypeRegistry::new();
//! register_standard_types(&mut types).unwrap();
//! types
//!     .register_type(
//!         "Tally",
//!         || ParamSchema::new().block_restrictable(),
//!         |ctx| Ok(Box::new(Tally { name: ctx.object_name.into(), count: 0 })),
//!     )
//!     .unwrap();
//!
//! let input = InputTree::new()
//!     .with("Variables/u", Params::new().with("initial_condition", 0.0))
//!     .unwrap()
//!     .with("Kernels/tally", Params::new().with("type", "Tally"))
//!     .unwrap();
//!
//! let config = ProblemConfig::new(MeshPartition::uniform(&[1, 2], 8)).with_threads(2);
//! let mut problem = Problem::construct_standard(config, &types, &input).unwrap();
//! assert_eq!(problem.store().active_objects(ThreadId(0)).names(), ["u", "tally", "u_ic"]);
//!
//! let outcome = problem.assemble();
//! assert!(!outcome.failed);
//! assert_eq!(outcome.elements_visited, 16);
//! ```
//!
//! # Modules
//!
//! Each module corresponds to a sub-crate. Use them for types not in the prelude:
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`types`] | `anvil-core` | IDs, parameters, the object trait, mesh view |
//! | [`registry`] | `anvil-registry` | Parameter schemas and the type registry |
//! | [`store`] | `anvil-store` | Per-thread object storage and views |
//! | [`dispatch`] | `anvil-dispatch` | Task scheduler, agents, dispatcher |
//! | [`engine`] | `anvil-engine` | Input syntax, problem construction, assembly |

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Core types, traits, and IDs (`anvil-core`).
///
/// Contains thread/block/boundary/element IDs, [`types::Params`], the
/// [`types::ComputationalObject`] trait, and [`types::MeshPartition`].
pub use anvil_core as types;

/// Parameter schemas and the object type registry (`anvil-registry`).
pub use anvil_registry as registry;

/// Per-thread object storage (`anvil-store`).
///
/// [`store::ObjectStore`] holds one replica of every object per thread,
/// indexed by block and boundary.
pub use anvil_store as store;

/// Task ordering and agent dispatch (`anvil-dispatch`).
pub use anvil_dispatch as dispatch;

/// Problem construction and parallel assembly (`anvil-engine`).
///
/// [`engine::Problem`] is the entry point; the standard task graph lives in
/// [`engine::tasks`].
pub use anvil_engine as engine;

/// Common imports for typical Anvil usage.
///
/// ```rust
/// use anvil::prelude::*;
/// ```
pub mod prelude {
    // Core types and traits
    pub use anvil_core::{
        BlockId, BoundaryId, ComputationalObject, DomainError, ElementContext, ElementId,
        MeshPartition, ParamKind, ParamValue, Params, Restriction, ThreadId,
    };

    // Registry
    pub use anvil_registry::{BuildContext, ParamSchema, RegistryError, TypeRegistry};

    // Store
    pub use anvil_store::{ObjectStore, ObjectView};

    // Dispatch
    pub use anvil_dispatch::{
        AgentError, ConstructionAgent, ConstructionContext, DispatchError, TaskScheduler,
    };

    // Engine
    pub use anvil_engine::{
        register_standard_agents, register_standard_types, standard_scheduler, AgentRegistry,
        AssemblyOutcome, ConstructionError, InputTree, Problem, ProblemConfig,
    };
}
