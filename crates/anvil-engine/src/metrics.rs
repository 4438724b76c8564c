//! Construction and assembly metrics.
//!
//! All durations are in microseconds.

/// Timing and counts for one [`Problem::construct`](crate::Problem::construct).
#[derive(Clone, Debug, Default)]
pub struct ConstructionMetrics {
    /// Wall-clock time for the whole construction, in microseconds.
    pub total_us: u64,
    /// Per-task time: `(task, microseconds)`, in task order.
    pub task_us: Vec<(String, u64)>,
    /// Number of `act()` calls made.
    pub agents_invoked: usize,
    /// Logical objects created (one per `add_object`, not per replica).
    pub objects_created: usize,
    /// Objects held by each thread's slot after construction.
    pub objects_per_thread: Vec<usize>,
}

/// Timing and counts for one [`Problem::assemble`](crate::Problem::assemble).
#[derive(Clone, Debug, Default)]
pub struct AssemblyMetrics {
    /// Wall-clock time for the whole sweep, in microseconds.
    pub total_us: u64,
    /// Per-thread sweep time, indexed by thread.
    pub thread_us: Vec<u64>,
}
