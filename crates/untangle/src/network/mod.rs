//! Network controller: growth, untangling, and the per-frame force pass.
//!
//! Purpose
//! - Own the node `Graph`, the derived `ConnectionPair` list, and the containment
//!   fence; advance everything by one frame per `update`.
//!
//! Frame model
//! 1. Spawn at most one node when the interval has elapsed and the cap allows.
//! 2. Find the first crossing pair of connections; its newer endpoint becomes the
//!    mover, the older one the target.
//! 3. Mover and its subtree (away from the target) seek the target; the target
//!    only feels the fence; everyone else crowds and separates.
//! 4. Non-zero forces are averaged per node and steered toward, then all nodes
//!    integrate. Desired velocities are computed against one snapshot of
//!    positions, so node order does not bias the frame.
//!
//! Notes
//! - Pairs are rebuilt from scratch after every spawn; both the rebuild and the
//!   crossing scan are quadratic, which is fine at the default cap of 90 nodes.

mod types;
mod untangle;

pub use types::{CfgError, ConnectionPair, FrameReport, NetworkCfg, Untangle};
pub use untangle::{connection_pairs, find_crossing, mover_subtree};

use nalgebra::Vector2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::{debug, trace};

use crate::node::{Graph, NodeId};
use crate::render::{Canvas, NODE_DIAMETER};

pub struct Network {
    cfg: NetworkCfg,
    graph: Graph,
    pairs: Vec<ConnectionPair>,
    fence: Vec<Vector2<f64>>,
    last_spawn_ms: f64,
    rng: StdRng,
}

impl Network {
    /// Validate `cfg`, lay out the fence, and start the spawn clock at `now_ms`.
    pub fn setup(cfg: NetworkCfg, now_ms: f64) -> Result<Self, CfgError> {
        Self::from_graph(cfg, Graph::new(), now_ms)
    }

    /// Like `setup`, but start from an existing graph.
    pub fn from_graph(cfg: NetworkCfg, graph: Graph, now_ms: f64) -> Result<Self, CfgError> {
        cfg.validate()?;
        let mut net = Self {
            cfg,
            graph,
            pairs: Vec::new(),
            fence: fence_for(&cfg),
            last_spawn_ms: now_ms,
            rng: StdRng::seed_from_u64(cfg.seed),
        };
        net.rebuild_pairs();
        Ok(net)
    }

    pub fn cfg(&self) -> &NetworkCfg {
        &self.cfg
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    pub fn pairs(&self) -> &[ConnectionPair] {
        &self.pairs
    }

    /// Containment rectangle, clockwise on screen.
    pub fn fence(&self) -> &[Vector2<f64>] {
        &self.fence
    }

    /// Advance one frame at wall/simulated time `now_ms`.
    pub fn update(&mut self, now_ms: f64) -> FrameReport {
        let mut report = FrameReport {
            spawned: self.spawn_due(now_ms),
            ..FrameReport::default()
        };

        let untangle = find_crossing(&self.graph, &self.pairs);
        let movers = untangle.map(|u| mover_subtree(&self.graph, u));
        if let (Some(u), Some(m)) = (untangle, movers.as_ref()) {
            debug!(mover = %u.mover, target = %u.target, subtree = m.len(), "untangle");
            report.untangle = Some(u);
            report.movers = m.len();
        }
        let target = untangle.map(|u| u.target);
        let target_pos = target.and_then(|t| self.graph.position(t));

        let desired: Vec<Option<Vector2<f64>>> = self
            .graph
            .nodes()
            .iter()
            .map(|node| {
                let mut forces = vec![node.agent.contain(&self.fence)];
                if Some(node.id) != target {
                    match (movers.as_ref(), target_pos) {
                        (Some(m), Some(tp)) if m.contains(&node.id) => {
                            forces.push(node.agent.seek(tp));
                        }
                        _ => {
                            forces.push(self.graph.crowd(node.id));
                            forces.push(self.graph.separate(node.id));
                        }
                    }
                }
                average_nonzero(&forces)
            })
            .collect();

        for (node, want) in self.graph.nodes_mut().iter_mut().zip(desired) {
            if let Some(v) = want {
                node.agent.steer(v);
            }
            node.agent.integrate();
        }
        report
    }

    /// Draw connections first, then nodes on top.
    pub fn render<C: Canvas>(&self, canvas: &mut C) {
        for pair in &self.pairs {
            if let (Some(a), Some(b)) = (self.graph.position(pair.0), self.graph.position(pair.1)) {
                canvas.line(a, b);
            }
        }
        for node in self.graph.nodes() {
            canvas.circle(node.position(), NODE_DIAMETER);
        }
    }

    fn spawn_due(&mut self, now_ms: f64) -> Option<NodeId> {
        if self.graph.len() >= self.cfg.max_nodes
            || now_ms - self.last_spawn_ms < self.cfg.spawn_interval_ms
        {
            return None;
        }
        self.last_spawn_ms = now_ms;
        Some(self.add_node())
    }

    fn add_node(&mut self) -> NodeId {
        let isolated =
            self.graph.is_empty() || self.rng.gen::<f64>() < self.cfg.isolated_spawn_chance;
        let (id, parent) = if isolated {
            let position = self.random_position();
            (self.graph.spawn(position, self.cfg.agent), None)
        } else {
            let pick = self.rng.gen_range(0..self.graph.len());
            let parent = self.graph.nodes()[pick].id;
            let origin = self.graph.position(parent).unwrap_or_else(Vector2::zeros);
            let position = origin + self.jitter();
            let id = self.graph.spawn(position, self.cfg.agent);
            self.graph.connect(id, Some(parent));
            (id, Some(parent))
        };
        self.rebuild_pairs();
        debug!(
            id = %id,
            parent = ?parent.map(|p| p.0),
            nodes = self.graph.len(),
            pairs = self.pairs.len(),
            "spawn"
        );
        id
    }

    fn random_position(&mut self) -> Vector2<f64> {
        let m = self.cfg.spawn_margin;
        let (w, h) = (self.cfg.width, self.cfg.height);
        Vector2::new(
            self.rng.gen_range(w * m..=w * (1.0 - m)),
            self.rng.gen_range(h * m..=h * (1.0 - m)),
        )
    }

    fn jitter(&mut self) -> Vector2<f64> {
        let j = self.cfg.spawn_jitter;
        if j <= 0.0 {
            return Vector2::zeros();
        }
        Vector2::new(self.rng.gen_range(-j..j), self.rng.gen_range(-j..j))
    }

    fn rebuild_pairs(&mut self) {
        self.pairs = connection_pairs(&self.graph);
        trace!(pairs = self.pairs.len(), "pairs rebuilt");
    }
}

/// Corners inset from the canvas edges.
fn fence_for(cfg: &NetworkCfg) -> Vec<Vector2<f64>> {
    let i = cfg.fence_inset;
    vec![
        Vector2::new(i, i),
        Vector2::new(cfg.width - i, i),
        Vector2::new(cfg.width - i, cfg.height - i),
        Vector2::new(i, cfg.height - i),
    ]
}

/// Mean of the non-zero vectors; `None` if all are zero.
fn average_nonzero(forces: &[Vector2<f64>]) -> Option<Vector2<f64>> {
    let (sum, count) = forces
        .iter()
        .filter(|v| v.norm() > 0.0)
        .fold((Vector2::<f64>::zeros(), 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}
