//! The task-dependency graph.
//!
//! Tasks are named construction phases ("add_variable", "add_kernel", ...).
//! Each may depend on earlier phases; [`TaskScheduler::finalize`] orders
//! them with a stable topological sort so that independent tasks keep
//! their registration order.

use anvil_core::stable_order;
use indexmap::IndexMap;

use crate::error::SchedulerError;

/// Registry of named tasks and their dependencies.
#[derive(Clone, Debug, Default)]
pub struct TaskScheduler {
    tasks: IndexMap<String, Vec<String>>,
    order: Option<Vec<String>>,
}

impl TaskScheduler {
    /// An empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task that must run after every task in `dependencies`.
    ///
    /// Dependencies may name tasks registered later; they are resolved by
    /// [`finalize`](Self::finalize).
    pub fn register_task<I, S>(&mut self, name: &str, dependencies: I) -> Result<(), SchedulerError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.tasks.contains_key(name) {
            return Err(SchedulerError::DuplicateTask {
                name: name.to_string(),
            });
        }
        self.tasks.insert(
            name.to_string(),
            dependencies.into_iter().map(Into::into).collect(),
        );
        self.order = None;
        Ok(())
    }

    /// Make `task` run after `dependency`.
    pub fn add_dependency(&mut self, task: &str, dependency: &str) -> Result<(), SchedulerError> {
        let deps = self
            .tasks
            .get_mut(task)
            .ok_or_else(|| SchedulerError::UnknownTask {
                name: task.to_string(),
            })?;
        deps.push(dependency.to_string());
        self.order = None;
        Ok(())
    }

    /// Compute and cache the execution order.
    pub fn finalize(&mut self) -> Result<&[String], SchedulerError> {
        let mut deps = Vec::with_capacity(self.tasks.len());
        for (task, task_deps) in &self.tasks {
            let mut indices = Vec::with_capacity(task_deps.len());
            for dep in task_deps {
                let idx = self.tasks.get_index_of(dep.as_str()).ok_or_else(|| {
                    SchedulerError::UnknownDependency {
                        task: task.clone(),
                        dependency: dep.clone(),
                    }
                })?;
                indices.push(idx);
            }
            deps.push(indices);
        }

        let order = stable_order(&deps).map_err(|cycle| SchedulerError::CyclicDependency {
            cycle: cycle
                .nodes
                .iter()
                .filter_map(|&i| self.tasks.get_index(i).map(|(name, _)| name.clone()))
                .collect(),
        })?;
        let names: Vec<String> = order
            .iter()
            .filter_map(|&i| self.tasks.get_index(i).map(|(name, _)| name.clone()))
            .collect();
        tracing::debug!(tasks = names.len(), "finalized task order");
        Ok(self.order.insert(names).as_slice())
    }

    /// The execution order, recomputed only if tasks or dependencies
    /// changed since the last successful [`finalize`](Self::finalize).
    pub fn ordered_tasks(&mut self) -> Result<&[String], SchedulerError> {
        if self.order.is_none() {
            self.finalize()?;
        }
        Ok(self.order.as_deref().unwrap_or_default())
    }

    /// Whether a cached order is available.
    pub fn is_finalized(&self) -> bool {
        self.order.is_some()
    }

    /// Whether `name` is registered.
    pub fn is_registered(&self, name: &str) -> bool {
        self.tasks.contains_key(name)
    }

    /// Number of registered tasks.
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    /// Whether no tasks are registered.
    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    /// Task names in registration order.
    pub fn task_names(&self) -> impl Iterator<Item = &str> {
        self.tasks.keys().map(String::as_str)
    }

    /// Declared dependencies of `task`.
    pub fn dependencies(&self, task: &str) -> Option<&[String]> {
        self.tasks.get(task).map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const NONE: [&str; 0] = [];

    #[test]
    fn chain_orders_dependencies_first() {
        let mut s = TaskScheduler::new();
        s.register_task("add_kernel", ["add_variable"]).unwrap();
        s.register_task("add_variable", NONE).unwrap();
        s.register_task("add_bc", ["add_variable"]).unwrap();
        assert_eq!(
            s.finalize().unwrap(),
            ["add_variable", "add_kernel", "add_bc"]
        );
    }

    #[test]
    fn independent_tasks_keep_registration_order() {
        let mut s = TaskScheduler::new();
        for name in ["c", "a", "b"] {
            s.register_task(name, NONE).unwrap();
        }
        assert_eq!(s.finalize().unwrap(), ["c", "a", "b"]);
    }

    #[test]
    fn duplicate_task_rejected() {
        let mut s = TaskScheduler::new();
        s.register_task("a", NONE).unwrap();
        assert_eq!(
            s.register_task("a", ["b"]),
            Err(SchedulerError::DuplicateTask { name: "a".into() })
        );
        assert_eq!(s.dependencies("a"), Some(&[][..]));
    }

    #[test]
    fn unknown_dependency_names_both_tasks() {
        let mut s = TaskScheduler::new();
        s.register_task("add_kernel", ["add_variabel"]).unwrap();
        assert_eq!(
            s.finalize(),
            Err(SchedulerError::UnknownDependency {
                task: "add_kernel".into(),
                dependency: "add_variabel".into()
            })
        );
    }

    #[test]
    fn three_cycle_names_every_member_from_first_registered() {
        let mut s = TaskScheduler::new();
        s.register_task("T1", ["T3"]).unwrap();
        s.register_task("T2", ["T1"]).unwrap();
        s.register_task("T3", ["T2"]).unwrap();
        match s.finalize() {
            Err(SchedulerError::CyclicDependency { cycle }) => {
                assert_eq!(cycle, vec!["T1", "T3", "T2"]);
            }
            other => panic!("expected CyclicDependency, got {other:?}"),
        }
        assert!(!s.is_finalized());
    }

    #[test]
    fn add_dependency_invalidates_cached_order() {
        let mut s = TaskScheduler::new();
        s.register_task("a", NONE).unwrap();
        s.register_task("b", NONE).unwrap();
        assert_eq!(s.ordered_tasks().unwrap(), ["a", "b"]);
        s.add_dependency("a", "b").unwrap();
        assert!(!s.is_finalized());
        assert_eq!(s.ordered_tasks().unwrap(), ["b", "a"]);
        assert_eq!(
            s.add_dependency("zzz", "a"),
            Err(SchedulerError::UnknownTask { name: "zzz".into() })
        );
    }

    #[test]
    fn ordered_tasks_reuses_cache() {
        let mut s = TaskScheduler::new();
        s.register_task("a", NONE).unwrap();
        s.finalize().unwrap();
        assert!(s.is_finalized());
        assert_eq!(s.ordered_tasks().unwrap(), ["a"]);
    }

    proptest! {
        #[test]
        fn random_dag_orders_every_edge(
            n in 1usize..20,
            edges in prop::collection::vec((0usize..20, 0usize..20), 0..60),
        ) {
            // Only edges from a lower to a higher index, so the graph is a DAG.
            let mut s = TaskScheduler::new();
            for i in 0..n {
                let deps: Vec<String> = edges
                    .iter()
                    .filter(|&&(a, b)| b == i && a < b)
                    .map(|&(a, _)| format!("t{a}"))
                    .collect();
                s.register_task(&format!("t{i}"), deps).unwrap();
            }
            let order = s.finalize().unwrap().to_vec();
            prop_assert_eq!(order.len(), n);
            let pos = |name: &str| order.iter().position(|t| t == name).unwrap();
            for &(a, b) in &edges {
                if a < b && b < n {
                    let (ta, tb) = (format!("t{a}"), format!("t{b}"));
                    prop_assert!(pos(&ta) < pos(&tb), "{} must precede {}", ta, tb);
                }
            }
        }
    }
}
