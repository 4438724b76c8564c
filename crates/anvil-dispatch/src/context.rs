//! What agents see while they run.

use anvil_core::{MeshPartition, Params, Restriction, ThreadId};
use anvil_registry::{TypeRegistry, ValidatedParams, BLOCK_OPTION, BOUNDARY_OPTION};
use anvil_store::ObjectStore;

use crate::error::AgentError;

/// Borrowed registries and the store under construction.
///
/// Built fresh for one construction run. Objects added here land in the
/// run's own [`ObjectStore`]; nothing outside the run can observe them
/// until the caller publishes the store.
pub struct ConstructionContext<'a> {
    types: &'a TypeRegistry,
    mesh: &'a MeshPartition,
    store: &'a mut ObjectStore,
    objects_added: usize,
}

impl<'a> ConstructionContext<'a> {
    /// A context writing into `store`.
    pub fn new(types: &'a TypeRegistry, mesh: &'a MeshPartition, store: &'a mut ObjectStore) -> Self {
        Self {
            types,
            mesh,
            store,
            objects_added: 0,
        }
    }

    /// The type registry.
    pub fn types(&self) -> &TypeRegistry {
        self.types
    }

    /// The mesh the store is partitioned over.
    pub fn mesh(&self) -> &MeshPartition {
        self.mesh
    }

    /// The store built so far.
    pub fn store(&self) -> &ObjectStore {
        &*self.store
    }

    /// Number of worker threads objects are replicated for.
    pub fn num_threads(&self) -> usize {
        self.store.num_threads()
    }

    /// Logical objects added through this context (not counting replicas).
    pub fn objects_added(&self) -> usize {
        self.objects_added
    }

    /// Validate `params` for `type_name` and add one replica per thread.
    ///
    /// The restriction comes from the validated `boundary` option if
    /// present, else the `block` option, else any block.
    pub fn add_object(
        &mut self,
        type_name: &str,
        object_name: &str,
        params: &Params,
    ) -> Result<(), AgentError> {
        let validated = self.types.validate(type_name, object_name, params)?;
        let restriction = self.restriction_for(&validated)?;
        self.replicate(&validated, restriction)
    }

    /// Like [`add_object`](Self::add_object) with an explicit restriction.
    pub fn add_object_restricted(
        &mut self,
        type_name: &str,
        object_name: &str,
        params: &Params,
        restriction: Restriction,
    ) -> Result<(), AgentError> {
        let validated = self.types.validate(type_name, object_name, params)?;
        self.replicate(&validated, restriction)
    }

    fn replicate(
        &mut self,
        validated: &ValidatedParams,
        restriction: Restriction,
    ) -> Result<(), AgentError> {
        // Build every replica before storing any.
        let replicas = (0..self.store.num_threads())
            .map(|t| {
                let thread = ThreadId(t as u32);
                self.types
                    .instantiate(validated, thread)
                    .map(|object| (thread, object))
            })
            .collect::<Result<Vec<_>, _>>()?;
        for (thread, object) in replicas {
            self.store.add_object(thread, object, restriction.clone())?;
        }
        self.objects_added += 1;
        Ok(())
    }

    fn restriction_for(&self, validated: &ValidatedParams) -> Result<Restriction, AgentError> {
        let params = validated.params();
        let object = validated.object_name();
        if params.contains(BOUNDARY_OPTION) {
            let mut ids = Vec::new();
            for name in params.get_str_list(BOUNDARY_OPTION)? {
                match self.mesh.resolve_boundary(&name) {
                    Some(id) => ids.push(id),
                    None => return Err(unresolved(object, "boundary", name)),
                }
            }
            return Ok(Restriction::boundaries(ids));
        }
        if params.contains(BLOCK_OPTION) {
            let mut ids = Vec::new();
            for name in params.get_str_list(BLOCK_OPTION)? {
                match self.mesh.resolve_block(&name) {
                    Some(id) => ids.push(id),
                    None => return Err(unresolved(object, "block", name)),
                }
            }
            return Ok(Restriction::blocks(ids));
        }
        Ok(Restriction::AnyBlock)
    }
}

fn unresolved(object: &str, kind: &'static str, reference: String) -> AgentError {
    AgentError::UnresolvedRestriction {
        object: object.to_string(),
        kind,
        reference,
    }
}
