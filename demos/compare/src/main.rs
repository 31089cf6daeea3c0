//! compare — Dijkstra vs A* over a small synthetic Hanoi road network.
//!
//! Runs a handful of "clicked" start/end coordinates through the same path a
//! routing service would: boundary pre-check, nearest-node snap, both
//! searches, geometry reconstruction.  Prints a cost/timing table, dumps the
//! first comparison as JSON, and optionally writes the full CSV report.
//!
//! ```text
//! cargo run -p compare -- [report.csv]
//! RUST_LOG=debug cargo run -p compare
//! ```

mod network;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use wf_compare::{CompareConfig, CompareError, ReportWriter, compare_routes_within};
use wf_core::{GeoPoint, SearchLimits};

use network::{LANDMARKS, build_network};

// ── Service area ──────────────────────────────────────────────────────────────

// Hoan Kiem / Hai Ba Trung bounding box.
const MIN_LON: f64 = 105.83;
const MAX_LON: f64 = 105.88;
const MIN_LAT: f64 = 20.99;
const MAX_LAT: f64 = 21.05;

fn in_service_area(p: GeoPoint) -> bool {
    (MIN_LAT..=MAX_LAT).contains(&p.lat) && (MIN_LON..=MAX_LON).contains(&p.lon)
}

/// Clicked start/end pairs.  The last one ends outside the service area.
const QUERIES: [((f64, f64), (f64, f64)); 5] = [
    ((21.0290, 105.8522), (20.9957, 105.8676)), // lake → Times City
    ((21.0408, 105.8483), (21.0052, 105.8428)), // Long Bien → Bach Khoa
    ((21.0246, 105.8414), (21.0241, 105.8577)), // station → opera
    ((21.0162, 105.8443), (21.0162, 105.8443)), // park → park
    ((21.0288, 105.8525), (21.0700, 105.8200)), // lake → outside
];

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();
    let report_path = std::env::args().nth(1).map(PathBuf::from);

    println!("=== compare — wayfind routing engine ===");

    // 1. Build road network.
    let (network, ids) = build_network().context("building demo network")?;
    info!(nodes = network.node_count(), edges = network.edge_count(), "road network ready");

    let config = CompareConfig {
        limits: SearchLimits::default().with_max_settled(100_000),
        ..CompareConfig::default()
    };

    let mut report = match &report_path {
        Some(path) => Some(
            ReportWriter::create(path).with_context(|| format!("creating {}", path.display()))?,
        ),
        None => None,
    };

    // 2. Run every query.
    println!();
    println!(
        "{:<20} {:<20} {:>10} {:>10} {:>8} {:>8}",
        "From", "To", "Cost (m)", "A* (µs)", "Dij vis", "A* vis"
    );
    println!("{}", "-".repeat(82));

    let t0 = Instant::now();
    let mut first_json = None;
    for ((slat, slon), (elat, elon)) in QUERIES {
        let (start, end) = (GeoPoint::new(slat, slon), GeoPoint::new(elat, elon));

        let cmp = match compare_routes_within(&network, start, end, &in_service_area, &config) {
            Ok(cmp) => cmp,
            Err(CompareError::OutsideBoundary(p)) => {
                warn!(point = %p, "query rejected: outside service area");
                continue;
            }
            Err(e) => return Err(e.into()),
        };

        let name = |n: wf_core::NodeId| {
            ids.iter()
                .position(|&id| id == n)
                .map_or("?", |i| LANDMARKS[i].0)
        };
        println!(
            "{:<20} {:<20} {:>10.1} {:>10} {:>8} {:>8}",
            name(cmp.origin),
            name(cmp.destination),
            cmp.astar.result.cost_m,
            cmp.astar.result.elapsed.as_micros(),
            cmp.dijkstra.result.nodes_visited,
            cmp.astar.result.nodes_visited,
        );

        if first_json.is_none() {
            first_json = Some(serde_json::to_string_pretty(&cmp)?);
        }
        if let Some(w) = report.as_mut() {
            w.write(&cmp)?;
        }
    }
    println!();
    println!("All queries complete in {:.3} ms", t0.elapsed().as_secs_f64() * 1e3);

    // 3. JSON for a renderer.
    if let Some(json) = first_json {
        println!();
        println!("First comparison as JSON:");
        println!("{json}");
    }

    // 4. CSV report.
    if let (Some(mut w), Some(path)) = (report, report_path) {
        w.finish()?;
        println!();
        println!("{} report rows written to {}", w.rows_written(), path.display());
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(env_filter).finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
