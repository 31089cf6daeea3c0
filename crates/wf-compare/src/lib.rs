//! `wf-compare` — route comparison and reporting for the wayfind engine.
//!
//! Given a start and end coordinate, snaps both to the road network, runs
//! Dijkstra and A* over it, reconstructs each route's road geometry, and
//! reports cost, timing, and search effort side by side.
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`compare`] | `compare_routes`, `compare_batch`, `Boundary`, results      |
//! | [`report`]  | `ReportWriter` (CSV, one row per strategy)                  |
//! | [`error`]   | `CompareError`, `CompareResult<T>`                          |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Runs both strategies and batch queries on Rayon.         |
//! | `serde`    | Derives `Serialize`/`Deserialize` on comparison results. |
//!
//! # Usage
//!
//! ```rust,ignore
//! use wf_compare::{CompareConfig, ReportWriter, compare_routes};
//!
//! let cmp = compare_routes(&network, start, end, &CompareConfig::default())?;
//! let mut report = ReportWriter::create(Path::new("comparison.csv"))?;
//! report.write(&cmp)?;
//! report.finish()?;
//! ```

pub mod compare;
pub mod error;
pub mod report;


pub use compare::{
    Boundary, CompareConfig, RouteComparison, RouteReport, compare_batch, compare_routes,
    compare_routes_within,
};
pub use error::{CompareError, CompareResult};
pub use report::{REPORT_HEADER, ReportWriter};
