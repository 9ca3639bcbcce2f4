//! Network nodes: steering agents joined by undirected connections.
//!
//! Purpose
//! - `Node` couples an `Agent` with its adjacency list; `Graph` owns every node,
//!   hands out monotonic `NodeId`s, and keeps edges symmetric.
//! - Two composite forces live on `Graph` because they read neighbors:
//!   `crowd` (hold neighbors at a comfortable distance) and `separate`
//!   (avoid strangers more than neighbors).
//!
//! Notes
//! - `connect` does not deduplicate; a repeated call yields a parallel edge,
//!   which shows up as an extra connection pair and extra weight in `separate`.

mod graph;
mod types;

pub use graph::Graph;
pub use types::{Node, NodeId, NodeIdGen};
