//! The per-thread, block-partitioned [`ObjectStore`].

use std::fmt::Write as _;

use anvil_core::{
    stable_order, BlockId, BoundaryId, ComputationalObject, MeshPartition, Restriction, ThreadId,
};
use indexmap::{IndexMap, IndexSet};

use crate::error::StoreError;
use crate::slot::{ObjectView, ThreadSlot};

/// Objects replicated per thread and indexed by block and boundary.
///
/// Written only during the single-threaded construction phase. For
/// parallel assembly, [`slots_mut`](Self::slots_mut) hands out one
/// exclusive [`ThreadSlot`] per worker, so lookups and per-object scratch
/// mutation need no synchronization.
///
/// Every accessor taking a [`ThreadId`] panics when the id is not below
/// [`num_threads`](Self::num_threads).
pub struct ObjectStore {
    slots: Vec<ThreadSlot>,
    block_names: IndexMap<BlockId, Option<String>>,
}

impl ObjectStore {
    /// An empty store for the blocks and boundaries of `mesh`, with one
    /// slot per thread. `num_threads == 0` is treated as 1.
    pub fn new(mesh: &MeshPartition, num_threads: usize) -> Self {
        let num_threads = num_threads.max(1);
        let slots = (0..num_threads)
            .map(|t| {
                ThreadSlot::new(
                    ThreadId(t as u32),
                    mesh.block_ids(),
                    mesh.boundary_ids(),
                )
            })
            .collect();
        let block_names = mesh
            .block_ids()
            .map(|b| (b, mesh.block_name(b).map(str::to_string)))
            .collect();
        Self { slots, block_names }
    }

    /// Number of thread slots.
    pub fn num_threads(&self) -> usize {
        self.slots.len()
    }

    /// One thread's slot.
    pub fn slot(&self, thread: ThreadId) -> &ThreadSlot {
        let n = self.slots.len();
        match self.slots.get(thread.index()) {
            Some(slot) => slot,
            None => panic!("thread {thread} is out of range for a store with {n} threads"),
        }
    }

    /// One thread's slot, mutably.
    pub fn slot_mut(&mut self, thread: ThreadId) -> &mut ThreadSlot {
        let n = self.slots.len();
        match self.slots.get_mut(thread.index()) {
            Some(slot) => slot,
            None => panic!("thread {thread} is out of range for a store with {n} threads"),
        }
    }

    /// All slots, for handing one to each worker.
    pub fn slots_mut(&mut self) -> &mut [ThreadSlot] {
        &mut self.slots
    }

    /// Add an object to `thread`'s lists under `restriction`.
    ///
    /// The restriction is checked against the mesh before anything is
    /// stored; on error the store is unchanged.
    pub fn add_object(
        &mut self,
        thread: ThreadId,
        object: Box<dyn ComputationalObject>,
        restriction: Restriction,
    ) -> Result<(), StoreError> {
        let slot = self.slot_mut(thread);
        match &restriction {
            Restriction::AnyBlock => {}
            Restriction::Blocks(ids) => {
                if let Some(&block) = ids.iter().find(|&&b| !slot.knows_block(b)) {
                    return Err(StoreError::UnknownBlock {
                        object: object.name().to_string(),
                        block,
                    });
                }
            }
            Restriction::Boundaries(ids) => {
                if let Some(&boundary) = ids.iter().find(|&&b| !slot.knows_boundary(b)) {
                    return Err(StoreError::UnknownBoundary {
                        object: object.name().to_string(),
                        boundary,
                    });
                }
            }
        }
        tracing::debug!(
            %thread,
            object = object.name(),
            type_name = object.type_name(),
            ?restriction,
            "stored object"
        );
        slot.push(object, restriction);
        Ok(())
    }

    /// Every object of `thread`, active or not, in store order.
    pub fn objects(&self, thread: ThreadId) -> &[Box<dyn ComputationalObject>] {
        self.slot(thread).objects()
    }

    /// Active objects of `thread` visible on `block`.
    ///
    /// An unknown block yields an empty view.
    pub fn objects_on(&self, thread: ThreadId, block: BlockId) -> ObjectView<'_> {
        self.slot(thread).objects_on(block)
    }

    /// Active objects of `thread` attached to `boundary`.
    pub fn objects_on_boundary(&self, thread: ThreadId, boundary: BoundaryId) -> ObjectView<'_> {
        self.slot(thread).objects_on_boundary(boundary)
    }

    /// Active objects of `thread` regardless of restriction.
    pub fn active_objects(&self, thread: ThreadId) -> ObjectView<'_> {
        self.slot(thread).active()
    }

    /// Distinct type names instantiated on any thread, in first-seen order.
    pub fn type_names(&self) -> IndexSet<&str> {
        self.slots
            .iter()
            .flat_map(|s| s.objects().iter().map(|o| o.type_name()))
            .collect()
    }

    /// First object of `thread` named `name`.
    pub fn get_object(
        &self,
        thread: ThreadId,
        name: &str,
    ) -> Option<&(dyn ComputationalObject + 'static)> {
        self.slot(thread).get_object(name)
    }

    /// Mutable access to the first object of `thread` named `name`.
    pub fn get_object_mut(
        &mut self,
        thread: ThreadId,
        name: &str,
    ) -> Option<&mut (dyn ComputationalObject + 'static)> {
        self.slot_mut(thread).get_object_mut(name)
    }

    /// Whether `thread` has an active object named `name`.
    pub fn has_active_object(&self, thread: ThreadId, name: &str) -> bool {
        self.slot(thread).has_active_object(name)
    }

    /// Whether `thread` has any active object on `block` (or on any block).
    pub fn has_active_block_objects(&self, thread: ThreadId, block: Option<BlockId>) -> bool {
        self.slot(thread).has_active_block_objects(block)
    }

    /// Whether `thread` has any active object on `boundary` (or on any
    /// boundary).
    pub fn has_active_boundary_objects(
        &self,
        thread: ThreadId,
        boundary: Option<BoundaryId>,
    ) -> bool {
        self.slot(thread).has_active_boundary_objects(boundary)
    }

    /// Blocks on which `thread` has at least one active object.
    pub fn active_blocks(&self, thread: ThreadId) -> Vec<BlockId> {
        self.slot(thread).active_blocks()
    }

    /// Number of objects on `thread`.
    pub fn len(&self, thread: ThreadId) -> usize {
        self.slot(thread).len()
    }

    /// Whether `thread` holds no objects.
    pub fn is_empty(&self, thread: ThreadId) -> bool {
        self.slot(thread).is_empty()
    }

    /// Recompute every active view from the objects' `enabled()` flags.
    pub fn update_active(&mut self) {
        for slot in &mut self.slots {
            slot.reindex();
        }
    }

    /// Reorder `thread`'s objects so that every object comes after the
    /// objects supplying the names it requires.
    ///
    /// Objects with no such relation keep their insertion order. An object
    /// supplying a name it also requires does not depend on itself.
    pub fn sort(&mut self, thread: ThreadId) -> Result<(), StoreError> {
        let slot = self.slot_mut(thread);
        let objects = slot.objects();

        let mut suppliers: IndexMap<String, Vec<usize>> = IndexMap::new();
        for (idx, obj) in objects.iter().enumerate() {
            for name in obj.supplies() {
                suppliers.entry(name).or_default().push(idx);
            }
        }
        let deps: Vec<Vec<usize>> = objects
            .iter()
            .enumerate()
            .map(|(idx, obj)| {
                obj.requires()
                    .iter()
                    .filter_map(|name| suppliers.get(name))
                    .flatten()
                    .copied()
                    .filter(|&dep| dep != idx)
                    .collect()
            })
            .collect();

        let order = stable_order(&deps).map_err(|cycle| StoreError::CyclicObjectDependency {
            thread,
            cycle: cycle
                .nodes
                .iter()
                .map(|&i| objects[i].name().to_string())
                .collect(),
        })?;
        slot.permute(&order);
        tracing::debug!(%thread, objects = order.len(), "sorted objects by dependency");
        Ok(())
    }

    /// Sort every thread's objects. See [`sort`](Self::sort).
    pub fn sort_all(&mut self) -> Result<(), StoreError> {
        for t in 0..self.slots.len() {
            self.sort(ThreadId(t as u32))?;
        }
        Ok(())
    }

    /// Human-readable dump of `thread`'s active objects per block and
    /// boundary, each line starting with `prefix`.
    pub fn format_active(&self, thread: ThreadId, prefix: &str) -> String {
        let slot = self.slot(thread);
        let mut out = String::new();
        let _ = writeln!(out, "{prefix}Active objects on thread {thread}:");
        for block in slot.block_keys() {
            let view = slot.objects_on(block);
            if view.is_empty() {
                continue;
            }
            let label = match self.block_names.get(&block).and_then(Option::as_deref) {
                Some(name) => format!("block {block} ({name})"),
                None => format!("block {block}"),
            };
            let _ = writeln!(out, "{prefix}  {label}: {}", view.names().join(", "));
        }
        for boundary in slot.boundary_keys() {
            let view = slot.objects_on_boundary(boundary);
            if !view.is_empty() {
                let _ = writeln!(
                    out,
                    "{prefix}  boundary {boundary}: {}",
                    view.names().join(", ")
                );
            }
        }
        out
    }
}

impl std::fmt::Debug for ObjectStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectStore")
            .field("slots", &self.slots)
            .finish()
    }
}
