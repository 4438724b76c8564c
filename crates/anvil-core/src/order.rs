//! Stable topological ordering.
//!
//! [`stable_order`] is Kahn's algorithm with a min-heap of ready nodes, so
//! that among nodes whose dependencies are all satisfied the one with the
//! lowest index (registration order) always goes first. Identical inputs
//! therefore always produce identical orders, which downstream numbering
//! (objects, degrees of freedom) relies on.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

/// A dependency cycle found by [`stable_order`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OrderCycle {
    /// Node indices forming one cycle, starting from the lowest index and
    /// following "depends on" edges.
    pub nodes: Vec<usize>,
}

/// Order nodes `0..deps.len()` so that each node comes after everything it
/// depends on.
///
/// `deps[i]` lists the nodes that must precede node `i`. Every index in
/// `deps` must be `< deps.len()`; callers resolve names and report unknown
/// references before calling this. Duplicate edges are allowed.
///
/// Returns the order as node indices, or one concrete cycle if the graph is
/// not a DAG.
pub fn stable_order(deps: &[Vec<usize>]) -> Result<Vec<usize>, OrderCycle> {
    let n = deps.len();
    let mut in_degree: Vec<usize> = deps.iter().map(Vec::len).collect();
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (node, node_deps) in deps.iter().enumerate() {
        for &dep in node_deps {
            dependents[dep].push(node);
        }
    }

    let mut ready: BinaryHeap<Reverse<usize>> = (0..n)
        .filter(|&i| in_degree[i] == 0)
        .map(Reverse)
        .collect();
    let mut order = Vec::with_capacity(n);
    let mut emitted = vec![false; n];

    while let Some(Reverse(node)) = ready.pop() {
        order.push(node);
        emitted[node] = true;
        for &next in &dependents[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                ready.push(Reverse(next));
            }
        }
    }

    if order.len() == n {
        return Ok(order);
    }
    Err(find_cycle(deps, &emitted))
}

/// Walk "depends on" edges through unemitted nodes until one repeats.
///
/// Every unemitted node has at least one unemitted dependency, so the walk
/// cannot get stuck.
fn find_cycle(deps: &[Vec<usize>], emitted: &[bool]) -> OrderCycle {
    let mut position = vec![usize::MAX; deps.len()];
    let mut path = Vec::new();
    let mut current = emitted
        .iter()
        .position(|&done| !done)
        .unwrap_or_default();

    loop {
        if position[current] != usize::MAX {
            let mut nodes = path.split_off(position[current]);
            let lowest = nodes
                .iter()
                .enumerate()
                .min_by_key(|&(_, &node)| node)
                .map(|(i, _)| i)
                .unwrap_or(0);
            nodes.rotate_left(lowest);
            return OrderCycle { nodes };
        }
        position[current] = path.len();
        path.push(current);
        match deps[current].iter().copied().find(|&d| !emitted[d]) {
            Some(next) => current = next,
            None => return OrderCycle { nodes: path },
        }
    }
}
