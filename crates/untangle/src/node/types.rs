//! Node identity and per-node adjacency.

use nalgebra::Vector2;

use crate::agent::{Agent, AgentCfg};

/// Unique node id; larger means spawned later.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Monotonic id source: 1, 2, 3, …
#[derive(Clone, Debug, Default)]
pub struct NodeIdGen {
    last: u64,
}

impl NodeIdGen {
    pub fn next_id(&mut self) -> NodeId {
        self.last += 1;
        NodeId(self.last)
    }
}

/// Steering agent plus an undirected adjacency list.
///
/// Invariant (kept by `Graph`): `b ∈ a.connections` as many times as
/// `a ∈ b.connections`, and never `a ∈ a.connections`.
#[derive(Clone, Debug)]
pub struct Node {
    pub id: NodeId,
    pub agent: Agent,
    pub connections: Vec<NodeId>,
}

impl Node {
    pub fn new(id: NodeId, position: Vector2<f64>, cfg: AgentCfg) -> Self {
        Self {
            id,
            agent: Agent::new(position, cfg),
            connections: Vec::new(),
        }
    }

    #[inline]
    pub fn position(&self) -> Vector2<f64> {
        self.agent.position
    }

    #[inline]
    pub fn is_connected_to(&self, other: NodeId) -> bool {
        self.connections.contains(&other)
    }

    /// Drop the first edge entry pointing at `other` (one side only).
    pub fn remove_connection(&mut self, other: Option<NodeId>) {
        let Some(other) = other else {
            return;
        };
        if let Some(k) = self.connections.iter().position(|&c| c == other) {
            self.connections.remove(k);
        }
    }
}
