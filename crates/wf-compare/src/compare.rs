//! Side-by-side Dijkstra / A* comparison for a pair of coordinates.
//!
//! One comparison is the whole query path of the routing service:
//!
//! 1. optional boundary pre-check of both endpoints;
//! 2. snap each endpoint to its nearest road node;
//! 3. run both strategies over the same network with the same limits;
//! 4. expand each node path into road geometry;
//! 5. check that the two optimal costs agree.

use tracing::{debug, warn};

use wf_core::{GeoPoint, NodeId, SearchLimits};
use wf_spatial::{
    AStarRouter, DijkstraRouter, RoadNetwork, RouteResult, Router, SearchResult, Strategy,
    reconstruct_geometry,
};

use crate::{CompareError, CompareResult};

// ── Boundary ──────────────────────────────────────────────────────────────────

/// Region test applied to query endpoints before any search runs.
///
/// The routing core does not implement containment itself; callers plug in
/// their own polygon or bounding-box check.  Any `Fn(GeoPoint) -> bool`
/// qualifies.
pub trait Boundary: Send + Sync {
    fn contains(&self, point: GeoPoint) -> bool;
}

impl<F> Boundary for F
where
    F: Fn(GeoPoint) -> bool + Send + Sync,
{
    fn contains(&self, point: GeoPoint) -> bool {
        self(point)
    }
}

// ── Configuration ─────────────────────────────────────────────────────────────

/// Settings shared by every comparison in a run.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompareConfig {
    /// Limits applied to each of the two searches independently.
    pub limits: SearchLimits,
    /// Maximum difference in metres between the two optimal costs before the
    /// comparison is flagged as diverging.
    pub cost_tolerance_m: f64,
}

impl Default for CompareConfig {
    fn default() -> Self {
        Self {
            limits: SearchLimits::UNBOUNDED,
            cost_tolerance_m: 1e-6,
        }
    }
}

// ── Results ───────────────────────────────────────────────────────────────────

/// One strategy's outcome plus its render-ready polyline.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteReport {
    pub result: SearchResult,
    /// Road geometry along `result.path`; empty when no path was found.
    pub geometry: Vec<GeoPoint>,
}

impl RouteReport {
    pub fn new(network: &RoadNetwork, result: SearchResult) -> RouteResult<Self> {
        let geometry = reconstruct_geometry(network, &result.path)?;
        Ok(Self { result, geometry })
    }
}

/// Both strategies' results for one start/end query.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteComparison {
    /// Query coordinates as supplied.
    pub start: GeoPoint,
    pub end: GeoPoint,
    /// Road nodes the query coordinates snapped to.
    pub origin: NodeId,
    pub destination: NodeId,
    pub dijkstra: RouteReport,
    pub astar: RouteReport,
}

impl RouteComparison {
    pub fn report(&self, strategy: Strategy) -> &RouteReport {
        match strategy {
            Strategy::Dijkstra => &self.dijkstra,
            Strategy::AStar    => &self.astar,
        }
    }

    /// `true` if a path was found (both strategies always agree on this).
    pub fn is_found(&self) -> bool {
        self.dijkstra.result.is_found() && self.astar.result.is_found()
    }

    /// `true` if both strategies reached the same verdict and, when a path
    /// exists, their costs differ by at most `tolerance_m`.
    pub fn costs_agree(&self, tolerance_m: f64) -> bool {
        let (d, a) = (&self.dijkstra.result, &self.astar.result);
        d.status == a.status && (d.cost_m - a.cost_m).abs() <= tolerance_m
    }

    /// A* finalised nodes as a fraction of Dijkstra's.  `None` when Dijkstra
    /// visited nothing.
    pub fn astar_visit_ratio(&self) -> Option<f64> {
        let d = self.dijkstra.result.nodes_visited;
        (d > 0).then(|| self.astar.result.nodes_visited as f64 / d as f64)
    }
}

// ── Entry points ──────────────────────────────────────────────────────────────

/// Snap `start` and `end` to the network and compare Dijkstra with A*.
///
/// # Errors
///
/// [`CompareError::Route`] wrapping `InvalidCoordinate` for malformed input,
/// `EmptyGraph` for a network without nodes, or `SearchTimedOut` when either
/// search exceeds `config.limits`.  Disconnected endpoints are *not* an error.
pub fn compare_routes(
    network: &RoadNetwork,
    start: GeoPoint,
    end: GeoPoint,
    config: &CompareConfig,
) -> CompareResult<RouteComparison> {
    let origin = network.nearest_node(start)?;
    let destination = network.nearest_node(end)?;
    debug!(%start, %end, %origin, %destination, "snapped query endpoints");

    let dijkstra_router = DijkstraRouter::new(config.limits);
    let astar_router = AStarRouter::new(config.limits);
    let run = |router: &dyn Router| -> RouteResult<RouteReport> {
        let result = router.route(network, origin, destination)?;
        RouteReport::new(network, result)
    };

    #[cfg(not(feature = "parallel"))]
    let (dijkstra, astar) = (run(&dijkstra_router), run(&astar_router));

    #[cfg(feature = "parallel")]
    let (dijkstra, astar) = rayon::join(|| run(&dijkstra_router), || run(&astar_router));

    let comparison = RouteComparison {
        start,
        end,
        origin,
        destination,
        dijkstra: dijkstra?,
        astar: astar?,
    };

    if !comparison.costs_agree(config.cost_tolerance_m) {
        warn!(
            %origin,
            %destination,
            dijkstra_cost_m = comparison.dijkstra.result.cost_m,
            astar_cost_m = comparison.astar.result.cost_m,
            "strategies disagree on optimal cost"
        );
    }
    Ok(comparison)
}

/// [`compare_routes`] with a boundary pre-check on both endpoints.
///
/// # Errors
///
/// [`CompareError::OutsideBoundary`] naming the first endpoint that falls
/// outside `boundary`, before any search runs.
pub fn compare_routes_within(
    network: &RoadNetwork,
    start: GeoPoint,
    end: GeoPoint,
    boundary: &dyn Boundary,
    config: &CompareConfig,
) -> CompareResult<RouteComparison> {
    for p in [start, end] {
        p.validate().map_err(wf_spatial::RouteError::from)?;
        if !boundary.contains(p) {
            return Err(CompareError::OutsideBoundary(p));
        }
    }
    compare_routes(network, start, end, config)
}

/// Run [`compare_routes`] for every `(start, end)` pair.
///
/// Results are returned in query order; one failing query does not affect
/// the others.  With the `parallel` feature the queries are spread over the
/// Rayon pool.
pub fn compare_batch(
    network: &RoadNetwork,
    queries: &[(GeoPoint, GeoPoint)],
    config: &CompareConfig,
) -> Vec<CompareResult<RouteComparison>> {
    debug!(queries = queries.len(), "comparing batch");

    #[cfg(not(feature = "parallel"))]
    {
        queries
            .iter()
            .map(|&(start, end)| compare_routes(network, start, end, config))
            .collect()
    }

    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;

        queries
            .par_iter()
            .map(|&(start, end)| compare_routes(network, start, end, config))
            .collect()
    }
}
