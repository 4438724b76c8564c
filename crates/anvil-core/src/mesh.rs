//! The mesh collaborator's view: blocks, boundaries, and elements.
//!
//! [`MeshPartition`] is the authority on which block and boundary ids
//! exist. The object store validates restrictions against it, and the
//! assembly driver splits its element list into per-thread ranges.

use std::ops::Range;

use indexmap::IndexMap;
use thiserror::Error;

use crate::id::{BlockId, BoundaryId, ElementId};

/// Errors from building a [`MeshPartition`].
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The block id is already registered.
    #[error("block {0} is already defined")]
    DuplicateBlock(BlockId),
    /// The boundary id is already registered.
    #[error("boundary {0} is already defined")]
    DuplicateBoundary(BoundaryId),
    /// Another block or boundary already carries this name.
    #[error("name '{0}' is already in use")]
    DuplicateName(String),
    /// An element references a block the mesh does not define.
    #[error("element {element} belongs to undefined block {block}")]
    UnknownElementBlock {
        /// The offending element.
        element: ElementId,
        /// The undefined block.
        block: BlockId,
    },
}

/// One mesh element and the block it belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Element {
    /// Element id.
    pub id: ElementId,
    /// Owning block.
    pub block: BlockId,
}

/// Blocks, boundaries, and the element list of a (local) mesh.
///
/// Block and boundary ids are kept in definition order. Names are optional;
/// restriction strings resolve by name first, then as a numeric id.
#[derive(Clone, Debug, Default)]
pub struct MeshPartition {
    blocks: IndexMap<BlockId, Option<String>>,
    boundaries: IndexMap<BoundaryId, Option<String>>,
    elements: Vec<Element>,
}

impl MeshPartition {
    /// An empty mesh.
    pub fn new() -> Self {
        Self::default()
    }

    /// A mesh with the given blocks, each holding `elements_per_block`
    /// consecutively numbered elements.
    ///
    /// Blocks are named `block_<id>`. Duplicate ids are ignored.
    pub fn uniform(blocks: &[u32], elements_per_block: usize) -> Self {
        let mut mesh = Self::new();
        let mut next = 0u64;
        for &b in blocks {
            let id = BlockId(b);
            if mesh.blocks.contains_key(&id) {
                continue;
            }
            mesh.blocks.insert(id, Some(format!("block_{b}")));
            for _ in 0..elements_per_block {
                mesh.elements.push(Element {
                    id: ElementId(next),
                    block: id,
                });
                next += 1;
            }
        }
        mesh
    }

    fn name_taken(&self, name: &str) -> bool {
        self.blocks.values().flatten().any(|n| n == name)
            || self.boundaries.values().flatten().any(|n| n == name)
    }

    /// Define a block.
    pub fn add_block(&mut self, id: BlockId, name: Option<&str>) -> Result<(), MeshError> {
        if self.blocks.contains_key(&id) {
            return Err(MeshError::DuplicateBlock(id));
        }
        if let Some(n) = name {
            if self.name_taken(n) {
                return Err(MeshError::DuplicateName(n.to_string()));
            }
        }
        self.blocks.insert(id, name.map(str::to_string));
        Ok(())
    }

    /// Define a boundary.
    pub fn add_boundary(&mut self, id: BoundaryId, name: Option<&str>) -> Result<(), MeshError> {
        if self.boundaries.contains_key(&id) {
            return Err(MeshError::DuplicateBoundary(id));
        }
        if let Some(n) = name {
            if self.name_taken(n) {
                return Err(MeshError::DuplicateName(n.to_string()));
            }
        }
        self.boundaries.insert(id, name.map(str::to_string));
        Ok(())
    }

    /// Append an element to an already defined block.
    pub fn add_element(&mut self, id: ElementId, block: BlockId) -> Result<(), MeshError> {
        if !self.blocks.contains_key(&block) {
            return Err(MeshError::UnknownElementBlock { element: id, block });
        }
        self.elements.push(Element { id, block });
        Ok(())
    }

    /// Block ids in definition order.
    pub fn block_ids(&self) -> impl Iterator<Item = BlockId> + '_ {
        self.blocks.keys().copied()
    }

    /// Boundary ids in definition order.
    pub fn boundary_ids(&self) -> impl Iterator<Item = BoundaryId> + '_ {
        self.boundaries.keys().copied()
    }

    /// Number of blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Whether `id` is a defined block.
    pub fn has_block(&self, id: BlockId) -> bool {
        self.blocks.contains_key(&id)
    }

    /// Whether `id` is a defined boundary.
    pub fn has_boundary(&self, id: BoundaryId) -> bool {
        self.boundaries.contains_key(&id)
    }

    /// The name of a block, if it has one.
    pub fn block_name(&self, id: BlockId) -> Option<&str> {
        self.blocks.get(&id)?.as_deref()
    }

    /// Resolve a block reference from input: a block name, or a numeric id.
    ///
    /// Numeric ids that parse but are not defined are returned as-is so the
    /// caller can report them as unknown.
    pub fn resolve_block(&self, reference: &str) -> Option<BlockId> {
        if let Some((&id, _)) = self
            .blocks
            .iter()
            .find(|(_, name)| name.as_deref() == Some(reference))
        {
            return Some(id);
        }
        reference.trim().parse::<u32>().ok().map(BlockId)
    }

    /// Resolve a boundary reference from input: a boundary name, or a numeric id.
    pub fn resolve_boundary(&self, reference: &str) -> Option<BoundaryId> {
        if let Some((&id, _)) = self
            .boundaries
            .iter()
            .find(|(_, name)| name.as_deref() == Some(reference))
        {
            return Some(id);
        }
        reference.trim().parse::<u32>().ok().map(BoundaryId)
    }

    /// All elements in definition order.
    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    /// Split the element list into `parts` contiguous, disjoint ranges whose
    /// lengths differ by at most one. `parts == 0` is treated as 1.
    pub fn partition(&self, parts: usize) -> Vec<Range<usize>> {
        let parts = parts.max(1);
        let len = self.elements.len();
        let base = len / parts;
        let extra = len % parts;
        let mut ranges = Vec::with_capacity(parts);
        let mut start = 0;
        for i in 0..parts {
            let size = base + usize::from(i < extra);
            ranges.push(start..start + size);
            start += size;
        }
        ranges
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn uniform_mesh_numbers_elements_per_block() {
        let mesh = MeshPartition::uniform(&[1, 2], 3);
        assert_eq!(mesh.block_count(), 2);
        assert_eq!(mesh.elements().len(), 6);
        assert_eq!(mesh.elements()[3].block, BlockId(2));
        assert_eq!(mesh.elements()[5].id, ElementId(5));
        assert_eq!(mesh.block_name(BlockId(1)), Some("block_1"));
    }

    #[test]
    fn resolve_by_name_then_number() {
        let mut mesh = MeshPartition::new();
        mesh.add_block(BlockId(3), Some("fuel")).unwrap();
        mesh.add_boundary(BoundaryId(0), Some("left")).unwrap();
        assert_eq!(mesh.resolve_block("fuel"), Some(BlockId(3)));
        assert_eq!(mesh.resolve_block("3"), Some(BlockId(3)));
        assert_eq!(mesh.resolve_block("9"), Some(BlockId(9)));
        assert_eq!(mesh.resolve_block("cladding"), None);
        assert_eq!(mesh.resolve_boundary("left"), Some(BoundaryId(0)));
    }

    #[test]
    fn duplicates_rejected() {
        let mut mesh = MeshPartition::new();
        mesh.add_block(BlockId(1), Some("a")).unwrap();
        assert_eq!(
            mesh.add_block(BlockId(1), None),
            Err(MeshError::DuplicateBlock(BlockId(1)))
        );
        assert_eq!(
            mesh.add_boundary(BoundaryId(1), Some("a")),
            Err(MeshError::DuplicateName("a".into()))
        );
    }

    #[test]
    fn element_on_unknown_block_rejected() {
        let mut mesh = MeshPartition::new();
        assert_eq!(
            mesh.add_element(ElementId(0), BlockId(4)),
            Err(MeshError::UnknownElementBlock {
                element: ElementId(0),
                block: BlockId(4)
            })
        );
    }

    #[test]
    fn partition_more_parts_than_elements() {
        let mesh = MeshPartition::uniform(&[1], 2);
        let ranges = mesh.partition(4);
        assert_eq!(ranges, vec![0..1, 1..2, 2..2, 2..2]);
    }

    proptest! {
        #[test]
        fn partition_covers_all_elements_disjointly(
            elements in 0usize..200,
            parts in 1usize..17,
        ) {
            let mesh = MeshPartition::uniform(&[0], elements);
            let ranges = mesh.partition(parts);
            prop_assert_eq!(ranges.len(), parts);
            let mut expected_start = 0;
            for r in &ranges {
                prop_assert_eq!(r.start, expected_start);
                expected_start = r.end;
            }
            prop_assert_eq!(expected_start, elements);
            let min = ranges.iter().map(|r| r.len()).min().unwrap();
            let max = ranges.iter().map(|r| r.len()).max().unwrap();
            prop_assert!(max - min <= 1);
        }
    }
}
