//! Growing node networks that untangle themselves.
//!
//! Layers, leaves first:
//! - `geom`: orientation, segment intersection, point-in-convex-polygon.
//! - `agent`: steering behaviors and the velocity integrator.
//! - `node`: agents joined by undirected connections (`Graph`, `Node`, `NodeId`).
//! - `network`: spawn policy, crossing detection, and the per-frame update.
//! - `render`: the `Canvas` trait a frontend implements to draw a frame.
//!
//! The crate is frame-driven and single-threaded: call `Network::update` then
//! `Network::render` once per frame.

pub mod agent;
pub mod geom;
pub mod network;
pub mod node;
pub mod render;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use agent::{Agent, AgentCfg, StalkRange};
pub use network::{CfgError, ConnectionPair, FrameReport, Network, NetworkCfg, Untangle};
pub use node::{Graph, Node, NodeId};
pub use render::Canvas;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::agent::{Agent, AgentCfg, StalkRange};
    pub use crate::geom::{orientation, point_in_convex_polygon, segments_intersect, Orientation};
    pub use crate::network::{
        connection_pairs, find_crossing, mover_subtree, ConnectionPair, FrameReport, Network,
        NetworkCfg, Untangle,
    };
    pub use crate::node::{Graph, Node, NodeId};
    pub use crate::render::{Canvas, Recorder, Shape, NODE_DIAMETER};
    pub use nalgebra::Vector2 as Vec2;
}
