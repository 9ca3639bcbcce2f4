//! Controller configuration and per-frame records.

use std::fmt;

use crate::agent::AgentCfg;
use crate::node::NodeId;

/// Controller configuration. Defaults reproduce the reference animation.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NetworkCfg {
    pub width: f64,
    pub height: f64,
    /// Distance from each canvas edge to the containment fence.
    pub fence_inset: f64,
    pub max_nodes: usize,
    pub spawn_interval_ms: f64,
    /// Probability that a non-first node spawns unconnected at a random spot.
    pub isolated_spawn_chance: f64,
    /// Per-axis offset bound for a node spawned next to its parent.
    pub spawn_jitter: f64,
    /// Fraction of each axis left free on both sides for random spawns.
    pub spawn_margin: f64,
    pub seed: u64,
    pub agent: AgentCfg,
}

impl Default for NetworkCfg {
    fn default() -> Self {
        Self {
            width: 1200.0,
            height: 800.0,
            fence_inset: 40.0,
            max_nodes: 90,
            spawn_interval_ms: 500.0,
            isolated_spawn_chance: 0.1,
            spawn_jitter: 1.0,
            spawn_margin: 0.1,
            seed: 2019,
            agent: AgentCfg::default(),
        }
    }
}

impl NetworkCfg {
    pub fn validate(&self) -> Result<(), CfgError> {
        if !(self.width.is_finite() && self.height.is_finite()) {
            return Err(CfgError::invalid("canvas size must be finite"));
        }
        if self.width <= 0.0 || self.height <= 0.0 {
            return Err(CfgError::invalid("canvas size must be > 0"));
        }
        if !self.fence_inset.is_finite() || self.fence_inset < 0.0 {
            return Err(CfgError::invalid("fence_inset must be finite and >= 0"));
        }
        if 2.0 * self.fence_inset >= self.width.min(self.height) {
            return Err(CfgError::invalid("fence_inset leaves no interior"));
        }
        if !self.spawn_interval_ms.is_finite() || self.spawn_interval_ms < 0.0 {
            return Err(CfgError::invalid("spawn_interval_ms must be finite and >= 0"));
        }
        if !(0.0..=1.0).contains(&self.isolated_spawn_chance) {
            return Err(CfgError::invalid("isolated_spawn_chance must lie in [0, 1]"));
        }
        if !self.spawn_jitter.is_finite() || self.spawn_jitter < 0.0 {
            return Err(CfgError::invalid("spawn_jitter must be finite and >= 0"));
        }
        if !(0.0..0.5).contains(&self.spawn_margin) {
            return Err(CfgError::invalid("spawn_margin must lie in [0, 0.5)"));
        }
        self.agent.check().map_err(CfgError::invalid)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CfgError {
    InvalidParams { reason: String },
}

impl CfgError {
    fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidParams {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CfgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidParams { reason } => write!(f, "invalid network config: {reason}"),
        }
    }
}

impl std::error::Error for CfgError {}

/// One undirected edge, in the order it was first seen during the pair rebuild.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConnectionPair(pub NodeId, pub NodeId);

impl ConnectionPair {
    #[inline]
    pub fn shares_endpoint(&self, other: &ConnectionPair) -> bool {
        self.0 == other.0 || self.0 == other.1 || self.1 == other.0 || self.1 == other.1
    }

    #[inline]
    pub fn newest(&self) -> NodeId {
        self.0.max(self.1)
    }

    #[inline]
    pub fn oldest(&self) -> NodeId {
        self.0.min(self.1)
    }
}

/// Crossing resolution for one frame: `mover` (and its subtree) seeks `target`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Untangle {
    pub mover: NodeId,
    pub target: NodeId,
}

/// What happened during one `Network::update`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    pub spawned: Option<NodeId>,
    pub untangle: Option<Untangle>,
    /// Nodes pulled toward the target this frame (mover included).
    pub movers: usize,
}
