//! Errors raised while populating or sorting an [`ObjectStore`](crate::ObjectStore).

use anvil_core::{BlockId, BoundaryId, ThreadId};
use thiserror::Error;

/// Object store errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum StoreError {
    /// The object is restricted to a block the mesh does not define.
    #[error("object '{object}' is restricted to block {block}, which does not exist in the mesh")]
    UnknownBlock {
        /// Object name.
        object: String,
        /// The undefined block.
        block: BlockId,
    },
    /// The object is restricted to a boundary the mesh does not define.
    #[error(
        "object '{object}' is restricted to boundary {boundary}, which does not exist in the mesh"
    )]
    UnknownBoundary {
        /// Object name.
        object: String,
        /// The undefined boundary.
        boundary: BoundaryId,
    },
    /// Objects' supplied/required names form a cycle.
    #[error("objects on thread {thread} form a dependency cycle: {}", render_cycle(.cycle))]
    CyclicObjectDependency {
        /// Thread whose lists were being sorted.
        thread: ThreadId,
        /// Object names forming the cycle, in dependency order.
        cycle: Vec<String>,
    },
}

fn render_cycle(cycle: &[String]) -> String {
    let mut out = cycle.join(" -> ");
    if let Some(first) = cycle.first() {
        out.push_str(" -> ");
        out.push_str(first);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_message_closes_the_loop() {
        let err = StoreError::CyclicObjectDependency {
            thread: ThreadId(0),
            cycle: vec!["a".into(), "b".into()],
        };
        assert_eq!(
            err.to_string(),
            "objects on thread 0 form a dependency cycle: a -> b -> a"
        );
    }
}
