//! The parallel assembly sweep.
//!
//! Each worker gets exclusive access to its own [`ThreadSlot`] and a
//! contiguous range of elements, and calls `compute` on every active object
//! of each element's block. No locks are taken: the only synchronization
//! is the scope join at the end and the channel workers report through.

use std::time::Instant;

use anvil_core::{DomainError, Element, ElementContext, ThreadId};
use anvil_store::ThreadSlot;

use crate::metrics::AssemblyMetrics;
use crate::problem::Problem;

/// Result of one assembly sweep.
#[derive(Clone, Debug, Default)]
pub struct AssemblyOutcome {
    /// Whether any thread raised a domain error.
    pub failed: bool,
    /// The domain errors, ordered by thread.
    pub failures: Vec<DomainError>,
    /// Elements fully assembled across all threads.
    pub elements_visited: usize,
    /// Sweep timing.
    pub metrics: AssemblyMetrics,
}

struct WorkerReport {
    thread: ThreadId,
    visited: usize,
    failure: Option<DomainError>,
    elapsed_us: u64,
}

fn sweep(slot: &mut ThreadSlot, elements: &[Element]) -> WorkerReport {
    let start = Instant::now();
    let thread = slot.thread();
    let mut visited = 0;
    let mut failure = None;
    for element in elements {
        let ctx = ElementContext {
            thread,
            element: element.id,
            block: element.block,
        };
        if let Err(err) = slot.for_each_active_on_block_mut(element.block, |obj| obj.compute(&ctx)) {
            failure = Some(err);
            break;
        }
        visited += 1;
    }
    WorkerReport {
        thread,
        visited,
        failure,
        elapsed_us: start.elapsed().as_micros() as u64,
    }
}

impl Problem {
    /// Sweep every element once, one worker per thread.
    ///
    /// A domain error stops only the worker that raised it; the others
    /// finish their ranges. Failures are collected into the outcome, never
    /// propagated as panics or errors.
    pub fn assemble(&mut self) -> AssemblyOutcome {
        let start = Instant::now();
        let (mesh, store) = self.parts_mut();
        let ranges = mesh.partition(store.num_threads());
        let elements = mesh.elements();
        let (tx, rx) = crossbeam_channel::unbounded::<WorkerReport>();

        std::thread::scope(|scope| {
            for (slot, range) in store.slots_mut().iter_mut().zip(ranges) {
                let tx = tx.clone();
                let chunk = &elements[range];
                scope.spawn(move || {
                    // The receiver outlives the scope.
                    let _ = tx.send(sweep(slot, chunk));
                });
            }
        });
        drop(tx);

        let mut reports: Vec<WorkerReport> = rx.try_iter().collect();
        reports.sort_by_key(|r| r.thread);

        let mut outcome = AssemblyOutcome::default();
        for report in reports {
            outcome.elements_visited += report.visited;
            outcome.metrics.thread_us.push(report.elapsed_us);
            if let Some(err) = report.failure {
                tracing::warn!(thread = %report.thread, error = %err, "assembly failed on thread");
                outcome.failures.push(err);
            }
        }
        outcome.failed = !outcome.failures.is_empty();
        outcome.metrics.total_us = start.elapsed().as_micros() as u64;
        tracing::debug!(
            elements = outcome.elements_visited,
            failed = outcome.failed,
            total_us = outcome.metrics.total_us,
            "assembly sweep complete"
        );
        outcome
    }
}
