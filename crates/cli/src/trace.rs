//! Per-frame trace table written with polars (CSV or Parquet by extension).

use anyhow::{Context, Result};
use polars::prelude::*;
use std::fs::File;
use std::path::Path;
use untangle::{FrameReport, Network};

/// One row per simulated frame.
#[derive(Clone, Debug, PartialEq)]
pub struct TraceRow {
    pub frame: u64,
    pub time_ms: f64,
    pub nodes: u64,
    pub pairs: u64,
    pub spawned: Option<u64>,
    pub mover: Option<u64>,
    pub target: Option<u64>,
    pub movers: u64,
}

impl TraceRow {
    pub fn new(frame: u64, time_ms: f64, net: &Network, report: &FrameReport) -> Self {
        Self {
            frame,
            time_ms,
            nodes: net.graph().len() as u64,
            pairs: net.pairs().len() as u64,
            spawned: report.spawned.map(|id| id.0),
            mover: report.untangle.map(|u| u.mover.0),
            target: report.untangle.map(|u| u.target.0),
            movers: report.movers as u64,
        }
    }
}

pub fn to_frame(rows: &[TraceRow]) -> PolarsResult<DataFrame> {
    df!(
        "frame" => rows.iter().map(|r| r.frame).collect::<Vec<_>>(),
        "time_ms" => rows.iter().map(|r| r.time_ms).collect::<Vec<_>>(),
        "nodes" => rows.iter().map(|r| r.nodes).collect::<Vec<_>>(),
        "pairs" => rows.iter().map(|r| r.pairs).collect::<Vec<_>>(),
        "spawned" => rows.iter().map(|r| r.spawned).collect::<Vec<_>>(),
        "mover" => rows.iter().map(|r| r.mover).collect::<Vec<_>>(),
        "target" => rows.iter().map(|r| r.target).collect::<Vec<_>>(),
        "movers" => rows.iter().map(|r| r.movers).collect::<Vec<_>>(),
    )
}

/// Write `rows` to `out`; `.parquet` selects Parquet, anything else CSV.
pub fn write(rows: &[TraceRow], out: &Path) -> Result<()> {
    let mut df = to_frame(rows)?;
    crate::provenance::ensure_parent(out)?;
    let mut file = File::create(out).with_context(|| format!("creating {}", out.display()))?;
    let parquet = out.extension().is_some_and(|e| e == "parquet");
    if parquet {
        ParquetWriter::new(&mut file)
            .finish(&mut df)
            .with_context(|| format!("writing {}", out.display()))?;
    } else {
        CsvWriter::new(&mut file)
            .include_header(true)
            .finish(&mut df)
            .with_context(|| format!("writing {}", out.display()))?;
    }
    tracing::debug!(rows = df.height(), parquet, "trace written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;
    use untangle::NetworkCfg;

    fn rows(n: u64) -> Vec<TraceRow> {
        let mut net = Network::setup(NetworkCfg::default(), 0.0).unwrap();
        (1..=n)
            .map(|frame| {
                let now = frame as f64 * 250.0;
                let report = net.update(now);
                TraceRow::new(frame, now, &net, &report)
            })
            .collect()
    }

    #[test]
    fn rows_track_spawns() {
        let rows = rows(8);
        // one spawn every other frame at 250 ms steps
        let spawned: Vec<_> = rows.iter().filter_map(|r| r.spawned).collect();
        assert_eq!(spawned, vec![1, 2, 3, 4]);
        assert_eq!(rows.last().unwrap().nodes, 4);
    }

    #[test]
    fn frame_has_one_column_per_field() {
        let df = to_frame(&rows(5)).unwrap();
        assert_eq!(df.shape(), (5, 8));
    }

    #[test]
    fn csv_has_header_and_rows() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("t.csv");
        write(&rows(6), &out).unwrap();
        let text = fs::read_to_string(&out).unwrap();
        let mut lines = text.lines();
        assert_eq!(
            lines.next(),
            Some("frame,time_ms,nodes,pairs,spawned,mover,target,movers")
        );
        assert_eq!(lines.count(), 6);
    }

    #[test]
    fn parquet_by_extension() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("t.parquet");
        write(&rows(3), &out).unwrap();
        let bytes = fs::read(&out).unwrap();
        assert_eq!(&bytes[..4], b"PAR1");
    }
}
