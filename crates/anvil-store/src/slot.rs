//! One thread's share of the object store.
//!
//! A [`ThreadSlot`] owns that thread's replicas plus index buckets keyed by
//! block and boundary. Buckets hold positions into the slot's object list,
//! so a lookup is one hash probe followed by a slice walk.

use std::fmt;

use anvil_core::{BlockId, BoundaryId, ComputationalObject, Restriction, ThreadId};
use indexmap::IndexMap;

/// Read-only view of a subset of a slot's objects, in store order.
#[derive(Clone, Copy)]
pub struct ObjectView<'a> {
    objects: &'a [Box<dyn ComputationalObject>],
    indices: &'a [usize],
}

impl<'a> ObjectView<'a> {
    fn new(objects: &'a [Box<dyn ComputationalObject>], indices: &'a [usize]) -> Self {
        Self { objects, indices }
    }

    fn empty() -> Self {
        Self {
            objects: &[],
            indices: &[],
        }
    }

    /// Number of objects in the view.
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Whether the view holds no objects.
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// The `i`-th object of the view.
    pub fn get(&self, i: usize) -> Option<&'a (dyn ComputationalObject + 'static)> {
        self.indices.get(i).map(|&idx| self.objects[idx].as_ref())
    }

    /// Objects in store order.
    pub fn iter(
        &self,
    ) -> impl ExactSizeIterator<Item = &'a (dyn ComputationalObject + 'static)> + 'a {
        let objects = self.objects;
        self.indices.iter().map(move |&idx| objects[idx].as_ref())
    }

    /// Object names in store order.
    pub fn names(&self) -> Vec<&'a str> {
        self.iter().map(|o| o.name()).collect()
    }
}

impl fmt::Debug for ObjectView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

/// A thread's replicas and their block/boundary indexes.
pub struct ThreadSlot {
    thread: ThreadId,
    objects: Vec<Box<dyn ComputationalObject>>,
    restrictions: Vec<Restriction>,
    blocks: IndexMap<BlockId, Vec<usize>>,
    boundaries: IndexMap<BoundaryId, Vec<usize>>,
    active: Vec<usize>,
    active_blocks: IndexMap<BlockId, Vec<usize>>,
    active_boundaries: IndexMap<BoundaryId, Vec<usize>>,
}

impl ThreadSlot {
    pub(crate) fn new(
        thread: ThreadId,
        blocks: impl IntoIterator<Item = BlockId>,
        boundaries: impl IntoIterator<Item = BoundaryId>,
    ) -> Self {
        let blocks: IndexMap<BlockId, Vec<usize>> =
            blocks.into_iter().map(|b| (b, Vec::new())).collect();
        let boundaries: IndexMap<BoundaryId, Vec<usize>> =
            boundaries.into_iter().map(|b| (b, Vec::new())).collect();
        Self {
            thread,
            objects: Vec::new(),
            restrictions: Vec::new(),
            active_blocks: blocks.clone(),
            active_boundaries: boundaries.clone(),
            blocks,
            boundaries,
            active: Vec::new(),
        }
    }

    /// Thread this slot belongs to.
    pub fn thread(&self) -> ThreadId {
        self.thread
    }

    pub(crate) fn knows_block(&self, block: BlockId) -> bool {
        self.blocks.contains_key(&block)
    }

    pub(crate) fn knows_boundary(&self, boundary: BoundaryId) -> bool {
        self.boundaries.contains_key(&boundary)
    }

    /// Append an object whose restriction has already been checked.
    pub(crate) fn push(&mut self, object: Box<dyn ComputationalObject>, restriction: Restriction) {
        let idx = self.objects.len();
        let enabled = object.enabled();
        self.index(idx, &restriction, enabled);
        self.objects.push(object);
        self.restrictions.push(restriction);
    }

    fn index(&mut self, idx: usize, restriction: &Restriction, enabled: bool) {
        if enabled {
            self.active.push(idx);
        }
        match restriction {
            Restriction::AnyBlock => {
                for bucket in self.blocks.values_mut() {
                    bucket.push(idx);
                }
                if enabled {
                    for bucket in self.active_blocks.values_mut() {
                        bucket.push(idx);
                    }
                }
            }
            Restriction::Blocks(ids) => {
                for id in ids {
                    push_once(self.blocks.get_mut(id), idx);
                    if enabled {
                        push_once(self.active_blocks.get_mut(id), idx);
                    }
                }
            }
            Restriction::Boundaries(ids) => {
                for id in ids {
                    push_once(self.boundaries.get_mut(id), idx);
                    if enabled {
                        push_once(self.active_boundaries.get_mut(id), idx);
                    }
                }
            }
        }
    }

    fn clear_indices(&mut self) {
        self.active.clear();
        let buckets = self
            .blocks
            .values_mut()
            .chain(self.active_blocks.values_mut())
            .chain(self.boundaries.values_mut())
            .chain(self.active_boundaries.values_mut());
        for bucket in buckets {
            bucket.clear();
        }
    }

    /// Recompute every index from the object list and current `enabled()` flags.
    pub(crate) fn reindex(&mut self) {
        self.clear_indices();
        let restrictions = std::mem::take(&mut self.restrictions);
        for (idx, restriction) in restrictions.iter().enumerate() {
            let enabled = self.objects[idx].enabled();
            self.index(idx, restriction, enabled);
        }
        self.restrictions = restrictions;
    }

    /// Reorder objects by `order` (a permutation of positions) and reindex.
    pub(crate) fn permute(&mut self, order: &[usize]) {
        let mut objects: Vec<Option<Box<dyn ComputationalObject>>> =
            std::mem::take(&mut self.objects).into_iter().map(Some).collect();
        let mut restrictions: Vec<Option<Restriction>> = std::mem::take(&mut self.restrictions)
            .into_iter()
            .map(Some)
            .collect();
        for &i in order {
            if let (Some(obj), Some(r)) = (objects[i].take(), restrictions[i].take()) {
                self.objects.push(obj);
                self.restrictions.push(r);
            }
        }
        self.reindex();
    }

    /// Every object, active or not, in store order.
    pub fn objects(&self) -> &[Box<dyn ComputationalObject>] {
        &self.objects
    }

    /// Mutable access to every object, for toggling state between phases.
    ///
    /// Call [`ObjectStore::update_active`](crate::ObjectStore::update_active)
    /// afterwards if `enabled()` may have changed.
    pub fn objects_mut(&mut self) -> &mut [Box<dyn ComputationalObject>] {
        &mut self.objects
    }

    /// Restriction each object was added with, parallel to [`objects`](Self::objects).
    pub fn restrictions(&self) -> &[Restriction] {
        &self.restrictions
    }

    /// Active objects regardless of restriction.
    pub fn active(&self) -> ObjectView<'_> {
        ObjectView::new(&self.objects, &self.active)
    }

    /// Active objects visible on `block`; empty for an unknown block.
    pub fn objects_on(&self, block: BlockId) -> ObjectView<'_> {
        match self.active_blocks.get(&block) {
            Some(indices) => ObjectView::new(&self.objects, indices),
            None => ObjectView::empty(),
        }
    }

    /// All objects visible on `block`, including disabled ones.
    pub fn all_on(&self, block: BlockId) -> ObjectView<'_> {
        match self.blocks.get(&block) {
            Some(indices) => ObjectView::new(&self.objects, indices),
            None => ObjectView::empty(),
        }
    }

    /// Active objects attached to `boundary`; empty for an unknown boundary.
    pub fn objects_on_boundary(&self, boundary: BoundaryId) -> ObjectView<'_> {
        match self.active_boundaries.get(&boundary) {
            Some(indices) => ObjectView::new(&self.objects, indices),
            None => ObjectView::empty(),
        }
    }

    /// Run `f` on every active object of `block`, in store order, stopping
    /// at the first error.
    pub fn for_each_active_on_block_mut<E>(
        &mut self,
        block: BlockId,
        mut f: impl FnMut(&mut (dyn ComputationalObject + 'static)) -> Result<(), E>,
    ) -> Result<(), E> {
        let Some(indices) = self.active_blocks.get(&block) else {
            return Ok(());
        };
        for &idx in indices {
            f(self.objects[idx].as_mut())?;
        }
        Ok(())
    }

    /// First object named `name`, active or not.
    pub fn get_object(&self, name: &str) -> Option<&(dyn ComputationalObject + 'static)> {
        self.objects
            .iter()
            .find(|o| o.name() == name)
            .map(|o| o.as_ref())
    }

    /// Mutable access to the first object named `name`.
    pub fn get_object_mut(
        &mut self,
        name: &str,
    ) -> Option<&mut (dyn ComputationalObject + 'static)> {
        self.objects
            .iter_mut()
            .find(|o| o.name() == name)
            .map(|o| o.as_mut())
    }

    /// Whether an active object named `name` exists.
    pub fn has_active_object(&self, name: &str) -> bool {
        self.active.iter().any(|&idx| self.objects[idx].name() == name)
    }

    /// Whether any active object is visible on `block`, or on any block
    /// when `block` is `None`.
    pub fn has_active_block_objects(&self, block: Option<BlockId>) -> bool {
        match block {
            Some(b) => !self.objects_on(b).is_empty(),
            None => self.active_blocks.values().any(|v| !v.is_empty()),
        }
    }

    /// Whether any active object is visible on `boundary`, or on any
    /// boundary when `boundary` is `None`.
    pub fn has_active_boundary_objects(&self, boundary: Option<BoundaryId>) -> bool {
        match boundary {
            Some(b) => !self.objects_on_boundary(b).is_empty(),
            None => self.active_boundaries.values().any(|v| !v.is_empty()),
        }
    }

    /// Blocks with at least one active object, in mesh order.
    pub fn active_blocks(&self) -> Vec<BlockId> {
        self.active_blocks
            .iter()
            .filter(|(_, v)| !v.is_empty())
            .map(|(&b, _)| b)
            .collect()
    }

    /// Number of objects, active or not.
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Whether the slot holds no objects.
    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub(crate) fn block_keys(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.active_blocks.keys().copied()
    }

    pub(crate) fn boundary_keys(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.active_boundaries.keys().copied()
    }
}

impl fmt::Debug for ThreadSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadSlot")
            .field("thread", &self.thread)
            .field("objects", &self.active())
            .finish_non_exhaustive()
    }
}

/// Indices arrive in increasing order, so a repeated id in one
/// restriction shows up as the bucket's last entry.
fn push_once(bucket: Option<&mut Vec<usize>>, idx: usize) {
    if let Some(bucket) = bucket {
        if bucket.last() != Some(&idx) {
            bucket.push(idx);
        }
    }
}
