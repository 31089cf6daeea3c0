//! Expanding a node path into render-ready road geometry.
//!
//! Each hop `(u, v)` resolves to the canonical edge, the same one the search
//! used for its cost, and contributes either that edge's recorded curve or a
//! straight step to `v`.

use wf_core::{EdgeId, GeoPoint, NodeId};

use crate::network::RoadNetwork;
use crate::{RouteError, RouteResult};

/// Dense `(lat, lon)` polyline following the real road shape along `path`.
///
/// - empty path → empty polyline;
/// - single node → that node's coordinate;
/// - otherwise the first node's coordinate, then per hop the canonical edge's
///   curve without its first vertex, or the next node's coordinate for a
///   straight edge.
///
/// Identical adjacent points are collapsed, so segment joins never repeat a
/// vertex.
///
/// # Errors
///
/// [`RouteError::NodeNotFound`] for an unknown node id,
/// [`RouteError::EdgeNotFound`] when two consecutive nodes are not adjacent.
pub fn reconstruct_geometry(network: &RoadNetwork, path: &[NodeId]) -> RouteResult<Vec<GeoPoint>> {
    let Some(&first) = path.first() else {
        return Ok(Vec::new());
    };

    let mut points = vec![network.position(first)?];
    for (edge, to) in path_edges(network, path)? {
        match network.edge_geometry(edge) {
            Some(curve) => {
                for &p in &curve[1..] {
                    push_distinct(&mut points, p);
                }
            }
            None => push_distinct(&mut points, network.node_pos[to.index()]),
        }
    }
    Ok(points)
}

/// Total length in metres of `path` along canonical edges.
///
/// Equals the `cost_m` the search reported for the same path.
pub fn path_length_m(network: &RoadNetwork, path: &[NodeId]) -> RouteResult<f64> {
    Ok(path_edges(network, path)?
        .into_iter()
        .map(|(edge, _)| network.edge_length(edge))
        .sum())
}

/// Canonical edge of every hop in `path`, paired with the hop's target.
pub fn path_edges(network: &RoadNetwork, path: &[NodeId]) -> RouteResult<Vec<(EdgeId, NodeId)>> {
    if let [only] = path {
        network.check_node(*only)?;
    }
    path.windows(2)
        .map(|hop| {
            let (from, to) = (hop[0], hop[1]);
            network
                .edge_between(from, to)?
                .map(|e| (e, to))
                .ok_or(RouteError::EdgeNotFound { from, to })
        })
        .collect()
}

#[inline]
fn push_distinct(points: &mut Vec<GeoPoint>, p: GeoPoint) {
    if points.last() != Some(&p) {
        points.push(p);
    }
}
