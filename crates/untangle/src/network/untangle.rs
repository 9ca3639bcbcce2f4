//! Connection-pair rebuild, crossing detection, and mover-subtree gathering.

use std::collections::HashSet;

use crate::geom::segments_intersect;
use crate::node::{Graph, NodeId};

use super::types::{ConnectionPair, Untangle};

/// Every edge once, oldest node first.
///
/// Walks nodes in spawn order and each node's connections in order; an edge is
/// recorded from whichever endpoint is visited first. Parallel edges yield
/// parallel pairs.
pub fn connection_pairs(graph: &Graph) -> Vec<ConnectionPair> {
    let mut pairs = Vec::new();
    let mut known: HashSet<NodeId> = HashSet::with_capacity(graph.len());
    for node in graph.nodes() {
        for &other in &node.connections {
            if !known.contains(&other) {
                pairs.push(ConnectionPair(node.id, other));
            }
        }
        known.insert(node.id);
    }
    pairs
}

/// First crossing among pairs `(i, j)`, `i < j`, that share no endpoint.
///
/// Of the two crossing pairs, the one holding the newest node is fixed; its
/// newer endpoint moves toward the older one.
pub fn find_crossing(graph: &Graph, pairs: &[ConnectionPair]) -> Option<Untangle> {
    for (i, a) in pairs.iter().enumerate() {
        let (Some(p1), Some(p2)) = (graph.position(a.0), graph.position(a.1)) else {
            continue;
        };
        for b in &pairs[i + 1..] {
            if a.shares_endpoint(b) {
                continue;
            }
            let (Some(q1), Some(q2)) = (graph.position(b.0), graph.position(b.1)) else {
                continue;
            };
            if segments_intersect(p1, p2, q1, q2) {
                let fix = if a.newest() > b.newest() { a } else { b };
                return Some(Untangle {
                    mover: fix.newest(),
                    target: fix.oldest(),
                });
            }
        }
    }
    None
}

/// `mover` plus everything reachable from it without passing through `target`.
///
/// Iterative DFS; the visited set also guards against cycles from parallel or
/// hand-made edges.
pub fn mover_subtree(graph: &Graph, untangle: Untangle) -> HashSet<NodeId> {
    let mut movers = HashSet::from([untangle.mover]);
    let mut visited = HashSet::from([untangle.mover, untangle.target]);
    let mut stack = vec![untangle.mover];
    while let Some(id) = stack.pop() {
        let Some(node) = graph.get(id) else {
            continue;
        };
        for &child in &node.connections {
            if visited.insert(child) {
                movers.insert(child);
                stack.push(child);
            }
        }
    }
    movers
}
