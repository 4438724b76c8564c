//! Error types shared across the Anvil workspace.
//!
//! Construction-time errors live next to the component that raises them
//! (registry, store, dispatcher). This module only holds the two kinds
//! that cross crate boundaries: parameter access failures and the
//! runtime domain error raised during assembly.

use thiserror::Error;

use crate::id::ElementId;
use crate::param::ParamKind;

/// Typed access to a [`Params`](crate::Params) entry failed.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParamError {
    /// The option is not present.
    #[error("option '{name}' is not set")]
    Missing {
        /// Option name.
        name: String,
    },
    /// The option holds a value of a different kind.
    #[error("option '{name}' holds a {found} value, expected {expected}")]
    WrongKind {
        /// Option name.
        name: String,
        /// Kind requested by the caller.
        expected: ParamKind,
        /// Kind actually stored.
        found: ParamKind,
    },
}

/// A computational object detected an invalid physical state.
///
/// Raised from [`ComputationalObject::compute`](crate::ComputationalObject::compute)
/// during assembly. Recoverable: the assembly driver stops the failing
/// thread's sweep and reports the error upward as part of an aggregated
/// failure signal; the process keeps running.
#[derive(Clone, Debug, PartialEq, Error)]
#[error("object '{object}' rejected element {element}: {reason}")]
pub struct DomainError {
    /// Name of the object that raised the error.
    pub object: String,
    /// Element being assembled when the error was raised.
    pub element: ElementId,
    /// Human-readable description of the invalid state.
    pub reason: String,
}

impl DomainError {
    /// Build a domain error for `object` on `element`.
    pub fn new(object: impl Into<String>, element: ElementId, reason: impl Into<String>) -> Self {
        Self {
            object: object.into(),
            element,
            reason: reason.into(),
        }
    }
}
