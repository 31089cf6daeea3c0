//! Routing trait and the Dijkstra / A* implementations.
//!
//! # Pluggability
//!
//! Callers route through the [`Router`] trait, so the two strategies are
//! interchangeable and can be compared side by side.  [`DijkstraRouter`] is
//! uninformed; [`AStarRouter`] adds a haversine lower bound to the
//! destination.
//!
//! # Search state
//!
//! Both strategies share one best-first loop:
//!
//! - frontier: `BinaryHeap` of `(key, node)` entries, popped in ascending key
//!   order, ties broken by lower `NodeId`;
//! - lazy deletion: a node may be pushed several times with improving costs;
//!   entries for an already-finalised node are discarded on pop;
//! - `dist[v]` best known cost, `parent[v]` predecessor on that best path,
//!   `settled[v]` finalised flag.
//!
//! All of it is allocated per call, so concurrent searches over a shared
//! `&RoadNetwork` need no locking.
//!
//! # Cost units
//!
//! Costs are metres of road (`edge_length_m`) along canonical edges.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::fmt;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use wf_core::{GeoPoint, NodeId, SearchLimits};

use crate::network::RoadNetwork;
use crate::{RouteError, RouteResult};

// ── Strategy ──────────────────────────────────────────────────────────────────

/// Which search algorithm produced a result.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Strategy {
    Dijkstra,
    AStar,
}

impl Strategy {
    /// Label used in logs and report columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Dijkstra => "dijkstra",
            Strategy::AStar    => "astar",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ── SearchResult ──────────────────────────────────────────────────────────────

/// Whether a search reached its destination.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SearchStatus {
    Found,
    /// Origin and destination are disconnected.  An expected outcome, not an
    /// error.
    NoPathFound,
}

/// The result of one shortest-path run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SearchResult {
    pub strategy: Strategy,
    pub status: SearchStatus,
    /// Nodes from origin to destination inclusive.  Empty when no path exists.
    pub path: Vec<NodeId>,
    /// Sum of canonical edge lengths along `path`, in metres.  0 when no path.
    pub cost_m: f64,
    /// Wall time spent in the search loop.
    pub elapsed: Duration,
    /// Nodes removed from the frontier and finalised.
    pub nodes_visited: usize,
    /// Successful relaxations (best-known cost lowered, entry pushed).
    pub edges_relaxed: usize,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        self.status == SearchStatus::Found
    }

    /// Number of edges on the path (0 for a trivial or missing path).
    pub fn hop_count(&self) -> usize {
        self.path.len().saturating_sub(1)
    }
}

// ── Router trait ──────────────────────────────────────────────────────────────

/// Pluggable shortest-path engine.
///
/// # Thread safety
///
/// Implementations must be `Send + Sync` so they can be shared across Rayon
/// worker threads when comparisons run in parallel.
pub trait Router: Send + Sync {
    fn strategy(&self) -> Strategy;

    /// Compute the shortest path from `from` to `to`.
    ///
    /// Returns a result with [`SearchStatus::NoPathFound`] when the nodes are
    /// disconnected.  `from == to` yields a single-node path of cost 0.
    ///
    /// # Errors
    ///
    /// [`RouteError::NodeNotFound`] for an unknown endpoint,
    /// [`RouteError::SearchTimedOut`] when the router's limits are exceeded.
    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> RouteResult<SearchResult>;
}

/// Standard Dijkstra's algorithm over the CSR road graph.
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraRouter {
    pub limits: SearchLimits,
}

impl DijkstraRouter {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

impl Router for DijkstraRouter {
    fn strategy(&self) -> Strategy {
        Strategy::Dijkstra
    }

    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> RouteResult<SearchResult> {
        best_first(network, from, to, self.limits, Strategy::Dijkstra, |_| 0.0)
    }
}

/// A* with the haversine distance to the destination as heuristic.
///
/// Optimal as long as no edge is shorter than the great-circle distance
/// between its endpoints, which holds for lengths measured along the road.
#[derive(Copy, Clone, Debug, Default)]
pub struct AStarRouter {
    pub limits: SearchLimits,
}

impl AStarRouter {
    pub fn new(limits: SearchLimits) -> Self {
        Self { limits }
    }
}

impl Router for AStarRouter {
    fn strategy(&self) -> Strategy {
        Strategy::AStar
    }

    fn route(&self, network: &RoadNetwork, from: NodeId, to: NodeId) -> RouteResult<SearchResult> {
        let target: GeoPoint = network.position(to)?;
        best_first(network, from, to, self.limits, Strategy::AStar, |n| {
            network.node_pos[n.index()].distance_m(target)
        })
    }
}

/// Dijkstra with no search limits.
pub fn shortest_path_dijkstra(
    network: &RoadNetwork,
    origin: NodeId,
    destination: NodeId,
) -> RouteResult<SearchResult> {
    DijkstraRouter::default().route(network, origin, destination)
}

/// A* with no search limits.
pub fn shortest_path_astar(
    network: &RoadNetwork,
    origin: NodeId,
    destination: NodeId,
) -> RouteResult<SearchResult> {
    AStarRouter::default().route(network, origin, destination)
}

// ── Search internals ──────────────────────────────────────────────────────────

/// Frontier entry.  Ordered by `key` only, then `node`; reversed so that
/// `BinaryHeap` (a max-heap) pops the smallest key first.
#[derive(Copy, Clone, Debug)]
struct FrontierEntry {
    key: f64,
    node: NodeId,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .key
            .total_cmp(&self.key)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

fn best_first<H>(
    network: &RoadNetwork,
    from: NodeId,
    to: NodeId,
    limits: SearchLimits,
    strategy: Strategy,
    heuristic: H,
) -> RouteResult<SearchResult>
where
    H: Fn(NodeId) -> f64,
{
    network.check_node(from)?;
    network.check_node(to)?;

    let started = Instant::now();
    debug!(%strategy, %from, %to, "search started");

    let n = network.node_count();
    let mut dist    = vec![f64::INFINITY; n];
    let mut parent  = vec![NodeId::INVALID; n];
    let mut settled = vec![false; n];

    let mut nodes_visited = 0usize;
    let mut edges_relaxed = 0usize;

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(FrontierEntry { key: heuristic(from), node: from });

    while let Some(FrontierEntry { node, .. }) = heap.pop() {
        // Stale entry: a cheaper copy of this node was already finalised.
        if settled[node.index()] {
            continue;
        }
        settled[node.index()] = true;
        nodes_visited += 1;

        let g = dist[node.index()];
        if node == to {
            let path = trace_path(&parent, from, to);
            let elapsed = started.elapsed();
            debug!(%strategy, nodes_visited, edges_relaxed, cost_m = g, ?elapsed, "search finished");
            return Ok(SearchResult {
                strategy,
                status: SearchStatus::Found,
                path,
                cost_m: g,
                elapsed,
                nodes_visited,
                edges_relaxed,
            });
        }

        if !limits.is_unbounded() {
            let elapsed = started.elapsed();
            if limits.exceeded(nodes_visited, elapsed) {
                warn!(%strategy, %from, %to, nodes_visited, ?elapsed, "search limits exceeded");
                return Err(RouteError::SearchTimedOut { settled: nodes_visited, elapsed });
            }
        }

        for group in network.out_groups_unchecked(node) {
            let next = group.target;
            if settled[next.index()] {
                continue;
            }
            let new_g = g + network.edge_length_m[group.canonical.index()];
            if new_g < dist[next.index()] {
                dist[next.index()] = new_g;
                parent[next.index()] = node;
                edges_relaxed += 1;
                heap.push(FrontierEntry { key: new_g + heuristic(next), node: next });
            }
        }
    }

    let elapsed = started.elapsed();
    debug!(%strategy, %from, %to, nodes_visited, ?elapsed, "no path");
    Ok(SearchResult {
        strategy,
        status: SearchStatus::NoPathFound,
        path: Vec::new(),
        cost_m: 0.0,
        elapsed,
        nodes_visited,
        edges_relaxed,
    })
}

fn trace_path(parent: &[NodeId], from: NodeId, to: NodeId) -> Vec<NodeId> {
    let mut path = vec![to];
    let mut cur = to;
    while cur != from {
        cur = parent[cur.index()];
        path.push(cur);
    }
    path.reverse();
    path
}
