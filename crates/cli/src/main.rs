use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::fmt::SubscriberBuilder;
use untangle::{FrameReport, Network, NetworkCfg};

mod provenance;
mod svg;
mod trace;

use provenance::Payload;
use trace::TraceRow;

#[derive(Parser)]
#[command(name = "untangle-cli")]
#[command(about = "Headless runner for self-untangling node networks")]
struct Cmd {
    /// Log every spawn and untangle decision
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Args, Clone, Debug)]
struct SimArgs {
    /// JSON file with a (partial) network config
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the config seed
    #[arg(long)]
    seed: Option<u64>,
    #[arg(long, default_value_t = 3600)]
    frames: u64,
    /// Simulated frame rate; sets the clock step between updates
    #[arg(long, default_value_t = 60.0)]
    fps: f64,
}

#[derive(Subcommand)]
enum Action {
    /// Simulate and write a per-frame trace (.csv or .parquet)
    Run {
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Simulate and render the last frame as SVG
    Figure {
        #[command(flatten)]
        sim: SimArgs,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the effective config and code revision as JSON
    Report {
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cmd = Cmd::parse();
    let level = if cmd.verbose { Level::DEBUG } else { Level::INFO };
    SubscriberBuilder::default()
        .with_target(false)
        .with_max_level(level)
        .init();
    match cmd.action {
        Action::Run { sim, out } => run(&sim, &out),
        Action::Figure { sim, out } => figure(&sim, &out),
        Action::Report { config } => report(config.as_deref()),
    }
}

fn load_cfg(path: Option<&Path>, seed: Option<u64>) -> Result<NetworkCfg> {
    let mut cfg = match path {
        Some(p) => {
            let bytes = std::fs::read(p).with_context(|| format!("reading {}", p.display()))?;
            serde_json::from_slice::<NetworkCfg>(&bytes)
                .with_context(|| format!("parsing {}", p.display()))?
        }
        None => NetworkCfg::default(),
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    cfg.validate()?;
    Ok(cfg)
}

/// Drive `frames` updates on a fixed simulated clock.
fn simulate<F>(cfg: NetworkCfg, sim: &SimArgs, mut on_frame: F) -> Result<Network>
where
    F: FnMut(u64, f64, &Network, FrameReport),
{
    if !(sim.fps.is_finite() && sim.fps > 0.0) {
        bail!("fps must be finite and > 0 (got {})", sim.fps);
    }
    let step_ms = 1000.0 / sim.fps;
    let mut net = Network::setup(cfg, 0.0)?;
    for frame in 1..=sim.frames {
        let now_ms = frame as f64 * step_ms;
        let report = net.update(now_ms);
        on_frame(frame, now_ms, &net, report);
    }
    Ok(net)
}

fn run(sim: &SimArgs, out: &Path) -> Result<()> {
    let cfg = load_cfg(sim.config.as_deref(), sim.seed)?;
    tracing::info!(frames = sim.frames, fps = sim.fps, seed = cfg.seed, out = %out.display(), "run");
    let mut rows = Vec::with_capacity(sim.frames as usize);
    let net = simulate(cfg, sim, |frame, now_ms, net, report| {
        rows.push(TraceRow::new(frame, now_ms, net, &report));
    })?;
    let untangle_frames = rows.iter().filter(|r| r.mover.is_some()).count();
    tracing::info!(
        nodes = net.graph().len(),
        pairs = net.pairs().len(),
        untangle_frames,
        "simulation done"
    );

    trace::write(&rows, out)?;
    let payload = Payload::new(serde_json::json!({
        "command": "run",
        "frames": sim.frames,
        "fps": sim.fps,
        "config": cfg,
    }));
    let sidecar = provenance::write_sidecar(out, payload)?;
    tracing::info!(sidecar = %sidecar.display(), "wrote trace");
    Ok(())
}

fn figure(sim: &SimArgs, out: &Path) -> Result<()> {
    let cfg = load_cfg(sim.config.as_deref(), sim.seed)?;
    tracing::info!(frames = sim.frames, seed = cfg.seed, out = %out.display(), "figure");
    let net = simulate(cfg, sim, |_, _, _, _| {})?;
    let mut canvas = svg::SvgCanvas::new(cfg.width, cfg.height);
    net.render(&mut canvas);
    provenance::ensure_parent(out)?;
    std::fs::write(out, canvas.finish()).with_context(|| format!("writing {}", out.display()))?;

    let payload = Payload::new(serde_json::json!({
        "command": "figure",
        "frames": sim.frames,
        "fps": sim.fps,
        "config": cfg,
        "nodes": net.graph().len(),
        "pairs": net.pairs().len(),
    }));
    provenance::write_sidecar(out, payload)?;
    Ok(())
}

#[derive(Serialize)]
struct ReportDoc<'a> {
    code_rev: String,
    version: &'a str,
    config: &'a NetworkCfg,
}

fn report(config: Option<&Path>) -> Result<()> {
    let cfg = load_cfg(config, None)?;
    let doc = ReportDoc {
        code_rev: provenance::current_git_rev(),
        version: untangle::VERSION,
        config: &cfg,
    };
    println!("{}", serde_json::to_string_pretty(&doc)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    fn sim(frames: u64) -> SimArgs {
        SimArgs {
            config: None,
            seed: Some(7),
            frames,
            fps: 60.0,
        }
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"max_nodes": 12, "agent": {"max_speed": 2.0}}"#).unwrap();
        let cfg = load_cfg(Some(&path), Some(3)).unwrap();
        assert_eq!(cfg.max_nodes, 12);
        assert_eq!(cfg.seed, 3);
        assert_eq!(cfg.agent.max_speed, 2.0);
        assert_eq!(cfg.agent.max_force, NetworkCfg::default().agent.max_force);
        assert_eq!(cfg.width, 1200.0);
    }

    #[test]
    fn invalid_config_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("cfg.json");
        fs::write(&path, r#"{"isolated_spawn_chance": 2.0}"#).unwrap();
        assert!(load_cfg(Some(&path), None).is_err());
    }

    #[test]
    fn simulate_reports_every_frame() {
        // 20 ms steps keep the clock exact
        let mut args = sim(100);
        args.fps = 50.0;
        let mut seen = 0u64;
        let net = simulate(NetworkCfg::default(), &args, |frame, now_ms, _, _| {
            seen += 1;
            assert_eq!(now_ms, frame as f64 * 20.0);
        })
        .unwrap();
        assert_eq!(seen, 100);
        // two simulated seconds at one spawn per 500 ms
        assert_eq!(net.graph().len(), 4);
    }

    #[test]
    fn zero_fps_is_rejected() {
        let mut args = sim(1);
        args.fps = 0.0;
        assert!(simulate(NetworkCfg::default(), &args, |_, _, _, _| {}).is_err());
    }

    #[test]
    fn run_writes_trace_and_sidecar() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("trace.csv");
        run(&sim(90), &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1 + 90);
        assert!(dir.path().join("trace.provenance.json").exists());
    }

    #[test]
    fn figure_writes_svg() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("figs/last.svg");
        figure(&sim(200), &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        assert!(text.starts_with("<svg"));
        assert!(text.contains("<circle"));
    }
}
