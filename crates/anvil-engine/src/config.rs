//! Problem configuration.

use anvil_core::MeshPartition;

use crate::error::ConfigError;

/// Upper bound on worker threads.
pub const MAX_THREADS: usize = 256;

/// Configuration for [`Problem::construct`](crate::Problem::construct).
#[derive(Clone, Debug, Default)]
pub struct ProblemConfig {
    /// Worker thread count. `None` uses the available parallelism.
    /// Clamped to `[1, MAX_THREADS]`.
    pub threads: Option<usize>,
    /// The mesh partition objects are distributed over.
    pub mesh: MeshPartition,
    /// Order each thread's objects by supplied/required names after
    /// construction.
    pub sort_objects: bool,
}

impl ProblemConfig {
    /// A configuration over `mesh` with default settings.
    pub fn new(mesh: MeshPartition) -> Self {
        Self {
            mesh,
            ..Self::default()
        }
    }

    /// Set the thread count.
    #[must_use]
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Enable or disable dependency sorting of objects.
    #[must_use]
    pub fn with_sorting(mut self, sort: bool) -> Self {
        self.sort_objects = sort;
        self
    }

    /// Resolve the number of worker threads.
    pub fn resolved_threads(&self) -> usize {
        match self.threads {
            Some(n) => n.clamp(1, MAX_THREADS),
            None => std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1)
                .clamp(1, MAX_THREADS),
        }
    }

    /// Validate structural invariants.
    ///
    /// Element-to-block consistency is enforced when the mesh is built
    /// ([`MeshPartition::add_element`]), so only the block set is checked.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mesh.block_count() == 0 {
            return Err(ConfigError::NoBlocks);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn thread_count_clamped() {
        let mesh = MeshPartition::uniform(&[1], 1);
        assert_eq!(ProblemConfig::new(mesh.clone()).with_threads(0).resolved_threads(), 1);
        assert_eq!(
            ProblemConfig::new(mesh.clone()).with_threads(10_000).resolved_threads(),
            MAX_THREADS
        );
        let auto = ProblemConfig::new(mesh).resolved_threads();
        assert!((1..=MAX_THREADS).contains(&auto));
    }

    #[test]
    fn empty_mesh_rejected() {
        assert_eq!(
            ProblemConfig::default().validate(),
            Err(ConfigError::NoBlocks)
        );
    }

    #[test]
    fn uniform_mesh_accepted() {
        assert!(ProblemConfig::new(MeshPartition::uniform(&[1, 2], 4))
            .validate()
            .is_ok());
    }

    #[test]
    fn element_block_consistency_is_held_by_the_mesh() {
        use anvil_core::{BlockId, ElementId, MeshError};

        let mut mesh = MeshPartition::new();
        mesh.add_block(BlockId(1), None).unwrap();
        assert_eq!(
            mesh.add_element(ElementId(0), BlockId(2)),
            Err(MeshError::UnknownElementBlock {
                element: ElementId(0),
                block: BlockId(2)
            })
        );
        // A block with no elements yet is still a valid configuration.
        assert!(ProblemConfig::new(mesh).validate().is_ok());
    }
}
