//! CSV report backend.
//!
//! Writes one row per strategy per comparison, so a comparison yields a
//! Dijkstra row followed by an A* row.  Geometry is summarised by its point
//! count; renderers that need the polyline take it from
//! [`RouteComparison`] directly.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use csv::Writer;

use wf_spatial::{SearchStatus, Strategy};

use crate::{CompareError, CompareResult, RouteComparison};

/// Column names, in write order.
pub const REPORT_HEADER: [&str; 13] = [
    "start_lat",
    "start_lon",
    "end_lat",
    "end_lon",
    "origin_node",
    "destination_node",
    "strategy",
    "status",
    "cost_m",
    "elapsed_us",
    "nodes_visited",
    "edges_relaxed",
    "geometry_points",
];

/// Streams comparison rows to any `io::Write` sink.
pub struct ReportWriter<W: Write> {
    out:      Writer<W>,
    rows:     usize,
    finished: bool,
}

impl ReportWriter<File> {
    /// Create (or truncate) the CSV file at `path` and write the header row.
    pub fn create(path: &Path) -> CompareResult<Self> {
        Self::new(File::create(path)?)
    }
}

impl<W: Write> ReportWriter<W> {
    /// Wrap `sink` and write the header row.
    pub fn new(sink: W) -> CompareResult<Self> {
        let mut out = Writer::from_writer(sink);
        out.write_record(REPORT_HEADER)?;
        Ok(Self { out, rows: 0, finished: false })
    }

    /// Append the Dijkstra and A* rows for `cmp`.
    pub fn write(&mut self, cmp: &RouteComparison) -> CompareResult<()> {
        for strategy in [Strategy::Dijkstra, Strategy::AStar] {
            let report = cmp.report(strategy);
            let r = &report.result;
            self.out.write_record(&[
                cmp.start.lat.to_string(),
                cmp.start.lon.to_string(),
                cmp.end.lat.to_string(),
                cmp.end.lon.to_string(),
                cmp.origin.0.to_string(),
                cmp.destination.0.to_string(),
                strategy.as_str().to_owned(),
                status_label(r.status).to_owned(),
                format!("{:.3}", r.cost_m),
                r.elapsed.as_micros().to_string(),
                r.nodes_visited.to_string(),
                r.edges_relaxed.to_string(),
                report.geometry.len().to_string(),
            ])?;
            self.rows += 1;
        }
        // Rows written after a `finish` need the next one to flush them.
        self.finished = false;
        Ok(())
    }

    /// Data rows written so far (header excluded).
    pub fn rows_written(&self) -> usize {
        self.rows
    }

    /// Flush buffered rows.  Idempotent until the next `write`.
    pub fn finish(&mut self) -> CompareResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.out.flush()?;
        Ok(())
    }

    /// Flush and hand back the underlying sink.
    pub fn into_inner(mut self) -> CompareResult<W> {
        self.finish()?;
        self.out
            .into_inner()
            .map_err(|e| CompareError::Io(std::io::Error::other(e.to_string())))
    }
}

fn status_label(status: SearchStatus) -> &'static str {
    match status {
        SearchStatus::Found       => "found",
        SearchStatus::NoPathFound => "no_path",
    }
}
