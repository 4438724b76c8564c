//! Agent fixtures.

use std::sync::{Arc, Mutex};

use anvil_dispatch::{AgentError, ConstructionAgent, ConstructionContext};

/// Shared, ordered record of `"task:agent"` invocations.
#[derive(Clone, Debug, Default)]
pub struct InvocationLog(Arc<Mutex<Vec<String>>>);

impl InvocationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, entry: String) {
        match self.0.lock() {
            Ok(mut entries) => entries.push(entry),
            Err(poisoned) => poisoned.into_inner().push(entry),
        }
    }

    /// Snapshot of the entries so far.
    pub fn entries(&self) -> Vec<String> {
        match self.0.lock() {
            Ok(entries) => entries.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

/// Records every `act()` call; optionally fails on one task.
pub struct RecordingAgent {
    pub name: String,
    pub priority: i32,
    pub fail_on: Option<String>,
    pub log: InvocationLog,
}

impl RecordingAgent {
    pub fn new(name: impl Into<String>, log: &InvocationLog) -> Self {
        Self {
            name: name.into(),
            priority: 0,
            fail_on: None,
            log: log.clone(),
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    pub fn failing_on(mut self, task: impl Into<String>) -> Self {
        self.fail_on = Some(task.into());
        self
    }
}

impl ConstructionAgent for RecordingAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn type_name(&self) -> &str {
        "RecordingAgent"
    }

    fn priority(&self) -> i32 {
        self.priority
    }

    fn act(&mut self, task: &str, _ctx: &mut ConstructionContext<'_>) -> Result<(), AgentError> {
        self.log.push(format!("{task}:{}", self.name));
        if self.fail_on.as_deref() == Some(task) {
            return Err(AgentError::custom(format!(
                "{} refused task {task}",
                self.name
            )));
        }
        Ok(())
    }
}
