//! Turning configuration blocks into a populated object store.

use std::time::Instant;

use anvil_core::{MeshPartition, ThreadId};
use anvil_dispatch::{ConstructionContext, Dispatcher, ExecutionReport, TaskScheduler};
use anvil_registry::TypeRegistry;
use anvil_store::ObjectStore;

use crate::config::ProblemConfig;
use crate::error::ConstructionError;
use crate::input::InputTree;
use crate::metrics::ConstructionMetrics;
use crate::syntax::AgentRegistry;
use crate::tasks::{register_standard_agents, standard_scheduler};

/// A fully constructed problem, ready for assembly.
///
/// Only [`construct`](Self::construct) creates one, and only when every
/// phase succeeded, so a `Problem` never exposes a partially built store.
pub struct Problem {
    mesh: MeshPartition,
    store: ObjectStore,
    metrics: ConstructionMetrics,
    report: ExecutionReport,
}

impl Problem {
    /// Run the construction phase.
    ///
    /// 1. Validate `config` and resolve the thread count.
    /// 2. Finalize the task order.
    /// 3. Create one agent per input block and bind it to its tasks.
    /// 4. Run every task in order against a fresh store.
    /// 5. Optionally sort objects by dependency, then refresh active views.
    ///
    /// The first failure aborts the run; the store being built is dropped.
    pub fn construct(
        config: ProblemConfig,
        types: &TypeRegistry,
        agents: &AgentRegistry,
        mut scheduler: TaskScheduler,
        input: &InputTree,
    ) -> Result<Self, ConstructionError> {
        let start = Instant::now();
        config.validate()?;
        let threads = config.resolved_threads();
        let _span = tracing::info_span!("construct", threads, blocks = input.len()).entered();

        let task_count = scheduler.finalize()?.len();
        tracing::info!(tasks = task_count, "task order finalized");

        let mut dispatcher = Dispatcher::new(scheduler);
        for bound in agents.instantiate(input)? {
            dispatcher.add_agent(bound.agent, bound.tasks.as_slice())?;
        }
        tracing::info!(agents = dispatcher.agent_count(), "agents bound");

        let ProblemConfig {
            mesh, sort_objects, ..
        } = config;
        let mut store = ObjectStore::new(&mesh, threads);
        let mut ctx = ConstructionContext::new(types, &mesh, &mut store);
        let report = dispatcher.execute(&mut ctx)?;
        let objects_created = ctx.objects_added();

        if sort_objects {
            store.sort_all()?;
        }
        store.update_active();

        let metrics = ConstructionMetrics {
            total_us: start.elapsed().as_micros() as u64,
            task_us: report.task_us.clone(),
            agents_invoked: report.invocations.len(),
            objects_created,
            objects_per_thread: (0..store.num_threads())
                .map(|t| store.len(ThreadId(t as u32)))
                .collect(),
        };
        tracing::info!(
            objects = objects_created,
            invocations = metrics.agents_invoked,
            total_us = metrics.total_us,
            "construction complete"
        );
        Ok(Self {
            mesh,
            store,
            metrics,
            report,
        })
    }

    /// [`construct`](Self::construct) with the standard task graph and
    /// standard agents.
    ///
    /// `types` must hold every object type the input names, including the
    /// built-in ones from
    /// [`register_standard_types`](crate::objects::register_standard_types).
    pub fn construct_standard(
        config: ProblemConfig,
        types: &TypeRegistry,
        input: &InputTree,
    ) -> Result<Self, ConstructionError> {
        let mut agents = AgentRegistry::new();
        register_standard_agents(&mut agents)?;
        Self::construct(config, types, &agents, standard_scheduler()?, input)
    }

    /// The object store.
    pub fn store(&self) -> &ObjectStore {
        &self.store
    }

    /// The object store, mutably (e.g. to toggle objects between sweeps).
    pub fn store_mut(&mut self) -> &mut ObjectStore {
        &mut self.store
    }

    /// The mesh partition.
    pub fn mesh(&self) -> &MeshPartition {
        &self.mesh
    }

    /// Number of worker threads.
    pub fn num_threads(&self) -> usize {
        self.store.num_threads()
    }

    /// Construction metrics.
    pub fn metrics(&self) -> &ConstructionMetrics {
        &self.metrics
    }

    /// The dispatcher's execution report.
    pub fn report(&self) -> &ExecutionReport {
        &self.report
    }

    pub(crate) fn parts_mut(&mut self) -> (&MeshPartition, &mut ObjectStore) {
        (&self.mesh, &mut self.store)
    }
}

impl std::fmt::Debug for Problem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Problem")
            .field("threads", &self.num_threads())
            .field("metrics", &self.metrics)
            .finish_non_exhaustive()
    }
}
