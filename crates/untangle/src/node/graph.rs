//! Spawn-ordered node arena with symmetric edge edits and neighborhood forces.

use nalgebra::Vector2;

use crate::agent::{Agent, AgentCfg};

use super::types::{Node, NodeId, NodeIdGen};

/// All nodes of a network, oldest first.
///
/// Ids grow with insertion order, so lookups binary-search the arena.
#[derive(Clone, Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
    ids: NodeIdGen,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fresh, unconnected node and return its id.
    pub fn spawn(&mut self, position: Vector2<f64>, cfg: AgentCfg) -> NodeId {
        let id = self.ids.next_id();
        self.nodes.push(Node::new(id, position, cfg));
        id
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub(crate) fn nodes_mut(&mut self) -> &mut [Node] {
        &mut self.nodes
    }

    pub fn index_of(&self, id: NodeId) -> Option<usize> {
        self.nodes.binary_search_by_key(&id, |n| n.id).ok()
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.index_of(id).map(|k| &self.nodes[k])
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.index_of(id).map(move |k| &mut self.nodes[k])
    }

    pub fn position(&self, id: NodeId) -> Option<Vector2<f64>> {
        self.get(id).map(Node::position)
    }

    /// Add one undirected edge `a–b`. Repeated calls add repeated edges.
    ///
    /// No-op for `None`, for `a == b`, and for ids not in the graph.
    pub fn connect(&mut self, a: NodeId, b: Option<NodeId>) {
        let Some(b) = b else {
            return;
        };
        if a == b {
            return;
        }
        let (Some(ia), Some(ib)) = (self.index_of(a), self.index_of(b)) else {
            return;
        };
        self.nodes[ia].connections.push(b);
        self.nodes[ib].connections.push(a);
    }

    /// Remove one instance of the edge `a–b` from both sides.
    pub fn disconnect(&mut self, a: NodeId, b: Option<NodeId>) {
        let Some(b) = b else {
            return;
        };
        if let Some(nb) = self.get_mut(b) {
            nb.remove_connection(Some(a));
        }
        if let Some(na) = self.get_mut(a) {
            na.remove_connection(Some(b));
        }
    }

    fn agents_of<'a>(&'a self, ids: &'a [NodeId]) -> impl Iterator<Item = &'a Agent> + 'a {
        ids.iter().filter_map(move |&id| self.get(id)).map(|n| &n.agent)
    }

    /// Stalk aggregate over direct neighbors (default band).
    pub fn crowd(&self, id: NodeId) -> Vector2<f64> {
        let Some(node) = self.get(id) else {
            return Vector2::zeros();
        };
        node.agent
            .group_behavior(self.agents_of(&node.connections), |me, p| me.stalk(p))
    }

    /// Repulsion from strangers (default reject radius) blended with a weaker,
    /// shorter-range repulsion from neighbors (`stalk.min` radius), each weighted
    /// by its share of `strangers + connections`.
    ///
    /// Strangers include the node itself; `group_behavior` skips it.
    pub fn separate(&self, id: NodeId) -> Vector2<f64> {
        let Some(node) = self.get(id) else {
            return Vector2::zeros();
        };
        let me = &node.agent;
        let strangers: Vec<&Agent> = self
            .nodes
            .iter()
            .filter(|n| !node.is_connected_to(n.id))
            .map(|n| &n.agent)
            .collect();
        let stranger_push = me.group_behavior(strangers.iter().copied(), |a, p| a.reject(p));
        let neighbor_radius = me.cfg.stalk.min;
        let neighbor_push = me.group_behavior(self.agents_of(&node.connections), |a, p| {
            a.reject_within(p, neighbor_radius)
        });
        let total = (strangers.len() + node.connections.len()) as f64;
        if total == 0.0 {
            return Vector2::zeros();
        }
        stranger_push * (strangers.len() as f64 / total)
            + neighbor_push * (node.connections.len() as f64 / total)
    }
}
