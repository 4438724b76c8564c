//! Type registry and parameter schemas for Anvil.
//!
//! Object types are registered once at startup under a unique name, each
//! with a schema function (the options it accepts) and a builder function.
//! [`TypeRegistry::create`] validates user parameters against the schema,
//! fills in defaults, and calls the builder with a [`BuildContext`] that
//! identifies the worker thread the replica is for.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

pub mod error;
pub mod registry;
pub mod schema;

pub use error::{BoxError, RegistryError, SchemaViolation, Violation};
pub use registry::{BuildContext, BuildResult, SchemaFn, TypeDescriptor, TypeRegistry, ValidatedParams};
pub use schema::{Constraint, ParamSchema, ParamSpec, BLOCK_OPTION, BOUNDARY_OPTION};
