//! Core types and traits for the Anvil construction core.
//!
//! This is the leaf crate with zero internal dependencies. It defines the
//! vocabulary shared by every other Anvil crate: strongly-typed IDs,
//! parameter values, the [`ComputationalObject`] trait, the mesh partition
//! view, runtime error types, and the stable topological ordering used by
//! both the task scheduler and the object store.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod id;
pub mod mesh;
pub mod object;
pub mod order;
pub mod param;

pub use error::{DomainError, ParamError};
pub use id::{BlockId, BoundaryId, ElementId, ThreadId};
pub use mesh::{Element, MeshError, MeshPartition};
pub use object::{ComputationalObject, ElementContext, Restriction};
pub use order::{stable_order, OrderCycle};
pub use param::{ParamKind, ParamValue, Params};
