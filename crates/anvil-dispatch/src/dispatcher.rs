//! Staged construction: walk tasks in order, invoke bound agents.

use std::time::Instant;

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::agent::ConstructionAgent;
use crate::context::ConstructionContext;
use crate::error::DispatchError;
use crate::scheduler::TaskScheduler;

/// One `act()` call made during [`Dispatcher::execute`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Invocation {
    /// Task being executed.
    pub task: String,
    /// Agent that was invoked.
    pub agent: String,
}

/// What happened during a successful [`Dispatcher::execute`].
#[derive(Clone, Debug, Default)]
pub struct ExecutionReport {
    /// Every `act()` call, in call order.
    pub invocations: Vec<Invocation>,
    /// Tasks that ran with no agent bound.
    pub idle_tasks: Vec<String>,
    /// Per-task wall time: `(task, microseconds)`, in task order.
    pub task_us: Vec<(String, u64)>,
}

/// Binds agents to tasks and runs them in dependency order.
pub struct Dispatcher {
    scheduler: TaskScheduler,
    agents: Vec<Box<dyn ConstructionAgent>>,
    bindings: IndexMap<String, SmallVec<[usize; 4]>>,
    executed: bool,
}

impl Dispatcher {
    /// A dispatcher over `scheduler`'s tasks.
    pub fn new(scheduler: TaskScheduler) -> Self {
        Self {
            scheduler,
            agents: Vec::new(),
            bindings: IndexMap::new(),
            executed: false,
        }
    }

    /// The task scheduler.
    pub fn scheduler(&self) -> &TaskScheduler {
        &self.scheduler
    }

    /// The task scheduler, for registering tasks before execution.
    pub fn scheduler_mut(&mut self) -> &mut TaskScheduler {
        &mut self.scheduler
    }

    /// Bind `agent` to each of `tasks`.
    ///
    /// Within a task, agents run by ascending
    /// [`priority`](ConstructionAgent::priority), then in the order they
    /// were added. On error nothing is bound.
    pub fn add_agent<S: AsRef<str>>(
        &mut self,
        agent: Box<dyn ConstructionAgent>,
        tasks: &[S],
    ) -> Result<(), DispatchError> {
        if let Some(task) = tasks
            .iter()
            .map(AsRef::as_ref)
            .find(|t| !self.scheduler.is_registered(t))
        {
            return Err(DispatchError::UnregisteredTask {
                agent: agent.name().to_string(),
                task: task.to_string(),
            });
        }

        let idx = self.agents.len();
        let priority = agent.priority();
        tracing::debug!(
            agent = agent.name(),
            agent_type = agent.type_name(),
            priority,
            "bound agent"
        );
        self.agents.push(agent);
        for task in tasks.iter().map(AsRef::as_ref) {
            let agents = &self.agents;
            let bound = self.bindings.entry(task.to_string()).or_default();
            if bound.contains(&idx) {
                continue;
            }
            let at = bound.partition_point(|&i| agents[i].priority() <= priority);
            bound.insert(at, idx);
        }
        Ok(())
    }

    /// Number of agents added.
    pub fn agent_count(&self) -> usize {
        self.agents.len()
    }

    /// Names of the agents bound to `task`, in invocation order.
    pub fn bound_agents(&self, task: &str) -> Vec<&str> {
        self.bindings
            .get(task)
            .map(|b| b.iter().map(|&i| self.agents[i].name()).collect())
            .unwrap_or_default()
    }

    /// Whether [`execute`](Self::execute) has been called.
    pub fn has_executed(&self) -> bool {
        self.executed
    }

    /// Run every task in order, invoking its bound agents.
    ///
    /// The first agent failure aborts the run. A dispatcher runs at most
    /// once, successful or not.
    pub fn execute(
        &mut self,
        ctx: &mut ConstructionContext<'_>,
    ) -> Result<ExecutionReport, DispatchError> {
        if self.executed {
            return Err(DispatchError::AlreadyExecuted);
        }
        self.executed = true;

        let order = self.scheduler.ordered_tasks()?.to_vec();
        let mut report = ExecutionReport::default();

        for task in order {
            let start = Instant::now();
            let bound = self.bindings.get(&task).cloned().unwrap_or_default();
            if bound.is_empty() {
                tracing::debug!(%task, "no agents bound to task");
                report.idle_tasks.push(task.clone());
            }
            for idx in bound {
                let agent = &mut self.agents[idx];
                tracing::debug!(%task, agent = agent.name(), "invoking agent");
                agent
                    .act(&task, ctx)
                    .map_err(|source| DispatchError::AgentFailed {
                        agent: agent.name().to_string(),
                        agent_type: agent.type_name().to_string(),
                        task: task.clone(),
                        source,
                    })?;
                report.invocations.push(Invocation {
                    task: task.clone(),
                    agent: agent.name().to_string(),
                });
            }
            report
                .task_us
                .push((task, start.elapsed().as_micros() as u64));
        }
        Ok(report)
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("scheduler", &self.scheduler)
            .field("agents", &self.agents.len())
            .field("executed", &self.executed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AgentError;
    use anvil_core::MeshPartition;
    use anvil_registry::TypeRegistry;
    use anvil_store::ObjectStore;
    use std::sync::{Arc, Mutex};

    type Log = Arc<Mutex<Vec<String>>>;

    struct Probe {
        name: String,
        priority: i32,
        fail_on: Option<&'static str>,
        log: Log,
    }

    impl Probe {
        fn boxed(name: &str, priority: i32, log: &Log) -> Box<dyn ConstructionAgent> {
            Box::new(Self {
                name: name.to_string(),
                priority,
                fail_on: None,
                log: Arc::clone(log),
            })
        }
    }

    impl ConstructionAgent for Probe {
        fn name(&self) -> &str {
            &self.name
        }
        fn type_name(&self) -> &str {
            "Probe"
        }
        fn priority(&self) -> i32 {
            self.priority
        }
        fn act(&mut self, task: &str, _ctx: &mut ConstructionContext<'_>) -> Result<(), AgentError> {
            self.log.lock().unwrap().push(format!("{task}:{}", self.name));
            if self.fail_on == Some(task) {
                return Err(AgentError::custom("probe refused"));
            }
            Ok(())
        }
    }

    fn scheduler() -> TaskScheduler {
        let mut s = TaskScheduler::new();
        s.register_task("add_kernel", ["add_variable"]).unwrap();
        s.register_task("add_variable", [""; 0]).unwrap();
        s.register_task("add_bc", ["add_variable"]).unwrap();
        s
    }

    fn run(dispatcher: &mut Dispatcher) -> Result<ExecutionReport, DispatchError> {
        let types = TypeRegistry::new();
        let mesh = MeshPartition::uniform(&[1], 1);
        let mut store = ObjectStore::new(&mesh, 1);
        let mut ctx = ConstructionContext::new(&types, &mesh, &mut store);
        dispatcher.execute(&mut ctx)
    }

    #[test]
    fn multi_task_agent_invoked_once_per_task_in_task_order() {
        let log = Log::default();
        let mut d = Dispatcher::new(scheduler());
        d.add_agent(Probe::boxed("var", 0, &log), &["add_kernel", "add_variable"])
            .unwrap();
        let report = run(&mut d).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["add_variable:var", "add_kernel:var"]
        );
        assert_eq!(report.invocations.len(), 2);
        assert_eq!(report.idle_tasks, vec!["add_bc"]);
        assert_eq!(report.task_us.len(), 3);
    }

    #[test]
    fn priority_then_binding_order_within_task() {
        let log = Log::default();
        let mut d = Dispatcher::new(scheduler());
        d.add_agent(Probe::boxed("b", 0, &log), &["add_kernel"]).unwrap();
        d.add_agent(Probe::boxed("late", 5, &log), &["add_kernel"]).unwrap();
        d.add_agent(Probe::boxed("c", 0, &log), &["add_kernel"]).unwrap();
        d.add_agent(Probe::boxed("early", -1, &log), &["add_kernel"]).unwrap();
        assert_eq!(d.bound_agents("add_kernel"), vec!["early", "b", "c", "late"]);
        run(&mut d).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec![
                "add_kernel:early",
                "add_kernel:b",
                "add_kernel:c",
                "add_kernel:late"
            ]
        );
    }

    #[test]
    fn unregistered_task_binds_nothing() {
        let log = Log::default();
        let mut d = Dispatcher::new(scheduler());
        match d.add_agent(Probe::boxed("x", 0, &log), &["add_variable", "add_kernal"]) {
            Err(DispatchError::UnregisteredTask { agent, task }) => {
                assert_eq!(agent, "x");
                assert_eq!(task, "add_kernal");
            }
            other => panic!("expected UnregisteredTask, got {other:?}"),
        }
        assert_eq!(d.agent_count(), 0);
        assert!(d.bound_agents("add_variable").is_empty());
    }

    #[test]
    fn first_failure_aborts_and_names_agent_and_task() {
        let log = Log::default();
        let mut d = Dispatcher::new(scheduler());
        d.add_agent(
            Box::new(Probe {
                name: "Kernels/diff".into(),
                priority: 0,
                fail_on: Some("add_kernel"),
                log: Arc::clone(&log),
            }),
            &["add_kernel"],
        )
        .unwrap();
        d.add_agent(Probe::boxed("after", 0, &log), &["add_kernel", "add_bc"])
            .unwrap();
        match run(&mut d) {
            Err(DispatchError::AgentFailed {
                agent,
                agent_type,
                task,
                source,
            }) => {
                assert_eq!(agent, "Kernels/diff");
                assert_eq!(agent_type, "Probe");
                assert_eq!(task, "add_kernel");
                assert_eq!(source.to_string(), "probe refused");
            }
            other => panic!("expected AgentFailed, got {other:?}"),
        }
        assert_eq!(*log.lock().unwrap(), vec!["add_kernel:Kernels/diff"]);
    }

    #[test]
    fn second_execute_rejected() {
        let mut d = Dispatcher::new(scheduler());
        run(&mut d).unwrap();
        assert!(matches!(run(&mut d), Err(DispatchError::AlreadyExecuted)));
    }

    #[test]
    fn cyclic_schedule_surfaces_as_scheduler_error() {
        let mut s = TaskScheduler::new();
        s.register_task("a", ["b"]).unwrap();
        s.register_task("b", ["a"]).unwrap();
        let mut d = Dispatcher::new(s);
        assert!(matches!(
            run(&mut d),
            Err(DispatchError::Scheduler(
                crate::error::SchedulerError::CyclicDependency { .. }
            ))
        ));
    }
}
