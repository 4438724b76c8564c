//! The [`ComputationalObject`] trait and mesh [`Restriction`]s.
//!
//! Computational objects are the leaf plugins (kernels, boundary terms,
//! materials, variables, ...) produced by registry builders. Each thread
//! owns its own replica, so `compute` takes `&mut self` and may freely
//! mutate per-element scratch state without synchronization.

use std::any::Any;

use smallvec::SmallVec;

use crate::error::DomainError;
use crate::id::{BlockId, BoundaryId, ElementId, ThreadId};

/// Where an object contributes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Restriction {
    /// Visible on every block of the mesh.
    AnyBlock,
    /// Visible only on the listed blocks.
    Blocks(SmallVec<[BlockId; 4]>),
    /// Visible only on the listed boundaries.
    Boundaries(SmallVec<[BoundaryId; 4]>),
}

impl Restriction {
    /// Restrict to the given blocks. Repeated ids are kept once.
    pub fn blocks(ids: impl IntoIterator<Item = BlockId>) -> Self {
        Self::Blocks(dedup(ids))
    }

    /// Restrict to the given boundaries. Repeated ids are kept once.
    pub fn boundaries(ids: impl IntoIterator<Item = BoundaryId>) -> Self {
        Self::Boundaries(dedup(ids))
    }

    /// Whether this is the "any block" sentinel.
    pub fn is_any_block(&self) -> bool {
        matches!(self, Self::AnyBlock)
    }
}

fn dedup<T: PartialEq>(ids: impl IntoIterator<Item = T>) -> SmallVec<[T; 4]> {
    let mut out = SmallVec::new();
    for id in ids {
        if !out.contains(&id) {
            out.push(id);
        }
    }
    out
}

/// Per-element information handed to [`ComputationalObject::compute`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElementContext {
    /// Thread performing the assembly.
    pub thread: ThreadId,
    /// Element being assembled.
    pub element: ElementId,
    /// Block the element belongs to.
    pub block: BlockId,
}

/// A leaf plugin instance contributing to numerical assembly.
///
/// # Contract
///
/// - One instance exists per worker thread; instances are never shared.
/// - `name()` and `type_name()` are stable for the object's lifetime.
/// - `compute()` may mutate the object's own scratch state only.
///
/// # Object safety
///
/// The trait is object-safe; stores hold `Box<dyn ComputationalObject>`.
/// Concrete types can be recovered with
/// [`downcast_ref`](trait.ComputationalObject.html#method.downcast_ref).
pub trait ComputationalObject: Any + Send {
    /// User-facing object name (the input block name).
    fn name(&self) -> &str;

    /// Registered type name this object was built from.
    fn type_name(&self) -> &str;

    /// Whether the object currently takes part in assembly.
    ///
    /// Disabled objects stay in the store's full list but are dropped from
    /// active views on the next `update_active()`.
    fn enabled(&self) -> bool {
        true
    }

    /// Names of the quantities this object provides to others.
    fn supplies(&self) -> Vec<String> {
        Vec::new()
    }

    /// Names of the quantities this object consumes.
    ///
    /// The store orders an object after every object that supplies one of
    /// these names when sorting is requested.
    fn requires(&self) -> Vec<String> {
        Vec::new()
    }

    /// Per-element assembly hook.
    fn compute(&mut self, _ctx: &ElementContext) -> Result<(), DomainError> {
        Ok(())
    }
}

impl dyn ComputationalObject {
    /// Downcast to a concrete object type.
    pub fn downcast_ref<T: ComputationalObject>(&self) -> Option<&T> {
        (self as &dyn Any).downcast_ref::<T>()
    }

    /// Mutable downcast to a concrete object type.
    pub fn downcast_mut<T: ComputationalObject>(&mut self) -> Option<&mut T> {
        (self as &mut dyn Any).downcast_mut::<T>()
    }
}
