//! Grow a network to its cap and print counts once per simulated second.
//!
//! Usage:
//!   cargo run -p untangle --example grow -- [seed]

use untangle::{Network, NetworkCfg};

const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    let seed = std::env::args()
        .nth(1)
        .and_then(|s| s.parse().ok())
        .unwrap_or(2019);
    let cfg = NetworkCfg {
        seed,
        ..NetworkCfg::default()
    };
    let mut net = match Network::setup(cfg, 0.0) {
        Ok(net) => net,
        Err(e) => {
            eprintln!("{e}");
            return;
        }
    };
    let seconds = (cfg.max_nodes as f64 * cfg.spawn_interval_ms / 1000.0).ceil() as usize + 5;
    let mut untangles = 0usize;
    for frame in 1..=seconds * 60 {
        let report = net.update(frame as f64 * FRAME_MS);
        if report.untangle.is_some() {
            untangles += 1;
        }
        if frame % 60 == 0 {
            println!(
                "t={:>3}s nodes={:>3} pairs={:>3} untangle_frames={untangles}",
                frame / 60,
                net.graph().len(),
                net.pairs().len()
            );
            untangles = 0;
        }
    }
}
