//! Road network representation and builder.
//!
//! # Data layout
//!
//! The graph uses **Compressed Sparse Row (CSR)** format for outgoing edges.
//! Given a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edge_to[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! Edges are stably sorted by `(source, target)`, so the parallel edges of
//! one ordered node pair form a contiguous run in insertion order.  An edge's
//! position within its run is its *parallel-edge key* (`edge_key`).
//!
//! # Canonical edge
//!
//! Whenever a single weight between `u` and `v` is needed (search relaxation,
//! path cost, geometry reconstruction) the **canonical** edge is used: the
//! minimum-length edge of the run, ties going to the lowest key.  Using one
//! rule everywhere keeps the reported cost and the drawn route in agreement.
//!
//! # Edge geometry
//!
//! Curve vertices of all edges are stored in one flat `Vec<GeoPoint>`;
//! `edge_geom_start[e] .. edge_geom_start[e+1]` is edge `e`'s slice.  An empty
//! slice means "straight segment between the endpoints".
//!
//! # Spatial index
//!
//! An R-tree (via `rstar`) over unit-sphere vectors maps an arbitrary
//! coordinate to the geodesically nearest `NodeId`.

use std::ops::Range;

use rstar::{AABB, PointDistance, RTree, RTreeObject};
use rustc_hash::FxHashMap;
use tracing::debug;

use wf_core::{EdgeId, GeoPoint, NodeId};

use crate::{RouteError, RouteResult};

// ── R-tree node entry ─────────────────────────────────────────────────────────

/// Entry stored in the R-tree spatial index: a unit-sphere `[x, y, z]` point
/// with the associated `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 3],
    id: NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 3]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared chord length.  Monotonic in great-circle distance, so ordering
    /// by it is ordering by haversine distance.
    fn distance_2(&self, point: &[f64; 3]) -> f64 {
        let dx = self.point[0] - point[0];
        let dy = self.point[1] - point[1];
        let dz = self.point[2] - point[2];
        dx * dx + dy * dy + dz * dz
    }
}

// ── Target groups ─────────────────────────────────────────────────────────────

/// All parallel edges from one source node to one target node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TargetGroup {
    pub target: NodeId,
    /// Minimum-length edge of the group (lowest key on ties).
    pub canonical: EdgeId,
    edges: Range<u32>,
}

impl TargetGroup {
    /// Every parallel edge in the group, in key order.
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.clone().map(EdgeId)
    }

    /// Number of parallel edges (≥ 1).
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}

/// Iterator over a node's outgoing edges grouped by target.  See
/// [`RoadNetwork::out_groups`].
pub struct TargetGroups<'a> {
    net: &'a RoadNetwork,
    pos: u32,
    end: u32,
}

impl Iterator for TargetGroups<'_> {
    type Item = TargetGroup;

    #[inline]
    fn next(&mut self) -> Option<TargetGroup> {
        if self.pos >= self.end {
            return None;
        }
        let start = self.pos;
        let target = self.net.edge_to[start as usize];
        let mut canonical = start;
        let mut best = self.net.edge_length_m[start as usize];

        let mut i = start + 1;
        while i < self.end && self.net.edge_to[i as usize] == target {
            // Strict `<` keeps the lowest key on equal lengths.
            let len = self.net.edge_length_m[i as usize];
            if len < best {
                best = len;
                canonical = i;
            }
            i += 1;
        }
        self.pos = i;

        Some(TargetGroup {
            target,
            canonical: EdgeId(canonical),
            edges: start..i,
        })
    }
}

// ── RoadNetwork ───────────────────────────────────────────────────────────────

/// Directed road multigraph in CSR format plus a spatial index for node
/// snapping.
///
/// Read-only once built, so a single instance can be shared by reference
/// across any number of concurrent searches.  Construct with
/// [`RoadNetworkBuilder`].
pub struct RoadNetwork {
    // ── Node data ─────────────────────────────────────────────────────────
    /// Geographic position of each node.  Indexed by `NodeId`.
    pub node_pos: Vec<GeoPoint>,

    /// Loader-assigned identifier of each node (e.g. the OSM node id).
    /// `None` for nodes added without one.
    pub node_external_id: Vec<Option<i64>>,

    // ── CSR edge adjacency ────────────────────────────────────────────────
    /// CSR row pointer.  Outgoing edges of node `n` are at EdgeIds
    /// `node_out_start[n] .. node_out_start[n+1]`.
    /// Length = `node_count + 1`.
    pub node_out_start: Vec<u32>,

    // ── Edge data (indexed by EdgeId = position in sorted order) ──────────
    /// Source node of each edge.
    pub edge_from: Vec<NodeId>,

    /// Destination node of each edge.
    pub edge_to: Vec<NodeId>,

    /// Length of each edge in metres.  Used as the search cost.
    pub edge_length_m: Vec<f64>,

    /// Parallel-edge key: position of the edge among all edges sharing its
    /// `(from, to)` pair, in insertion order.
    pub edge_key: Vec<u32>,

    // ── Edge geometry ─────────────────────────────────────────────────────
    edge_geom_start: Vec<u32>,
    geom_points: Vec<GeoPoint>,

    // ── Lookups ───────────────────────────────────────────────────────────
    external_index: FxHashMap<i64, NodeId>,
    spatial_idx: RTree<NodeEntry>,
}

impl RoadNetwork {
    /// Construct an empty network with no nodes or edges.
    ///
    /// Any nearest-node query against it fails with
    /// [`RouteError::EmptyGraph`].
    pub fn empty() -> Self {
        RoadNetworkBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edge_to.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains_node(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    /// `Ok(())` if `node` exists, [`RouteError::NodeNotFound`] otherwise.
    #[inline]
    pub fn check_node(&self, node: NodeId) -> RouteResult<()> {
        if self.contains_node(node) {
            Ok(())
        } else {
            Err(RouteError::NodeNotFound(node))
        }
    }

    // ── Node lookups ──────────────────────────────────────────────────────

    /// Coordinate of `node`.
    pub fn position(&self, node: NodeId) -> RouteResult<GeoPoint> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(RouteError::NodeNotFound(node))
    }

    /// Loader-assigned identifier of `node`, `None` if it was added without
    /// one.
    pub fn external_id(&self, node: NodeId) -> RouteResult<Option<i64>> {
        self.node_external_id
            .get(node.index())
            .copied()
            .ok_or(RouteError::NodeNotFound(node))
    }

    /// Resolve a loader-assigned identifier back to its `NodeId`.
    pub fn node_by_external_id(&self, external: i64) -> Option<NodeId> {
        self.external_index.get(&external).copied()
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Iterator over the `EdgeId`s of all outgoing edges from `node`.
    ///
    /// This is a contiguous index range — no heap allocation.  `node` must
    /// exist; use [`check_node`](Self::check_node) first for untrusted ids.
    #[inline]
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = EdgeId> + '_ {
        let start = self.node_out_start[node.index()];
        let end = self.node_out_start[node.index() + 1];
        (start..end).map(EdgeId)
    }

    /// Out-degree of `node` counting every parallel edge.
    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        let start = self.node_out_start[node.index()] as usize;
        let end = self.node_out_start[node.index() + 1] as usize;
        end - start
    }

    /// Outgoing edges of `node` grouped by target, one [`TargetGroup`] per
    /// distinct neighbour, in ascending target order.
    pub fn out_groups(&self, node: NodeId) -> RouteResult<TargetGroups<'_>> {
        self.check_node(node)?;
        Ok(self.out_groups_unchecked(node))
    }

    #[inline]
    pub(crate) fn out_groups_unchecked(&self, node: NodeId) -> TargetGroups<'_> {
        TargetGroups {
            net: self,
            pos: self.node_out_start[node.index()],
            end: self.node_out_start[node.index() + 1],
        }
    }

    /// All parallel edges from `from` to `to`, in key order.  Empty when the
    /// nodes are not adjacent.
    pub fn parallel_edges(&self, from: NodeId, to: NodeId) -> RouteResult<Vec<EdgeId>> {
        self.check_node(to)?;
        Ok(self
            .out_groups(from)?
            .find(|g| g.target == to)
            .map(|g| g.edges().collect())
            .unwrap_or_default())
    }

    /// Canonical edge from `from` to `to`: minimum length, lowest key on ties.
    ///
    /// `Ok(None)` when the nodes exist but are not adjacent.
    pub fn edge_between(&self, from: NodeId, to: NodeId) -> RouteResult<Option<EdgeId>> {
        self.check_node(to)?;
        Ok(self
            .out_groups(from)?
            .find(|g| g.target == to)
            .map(|g| g.canonical))
    }

    // ── Edge lookups ──────────────────────────────────────────────────────

    #[inline]
    pub fn edge_length(&self, edge: EdgeId) -> f64 {
        self.edge_length_m[edge.index()]
    }

    /// Recorded curve of `edge`, first vertex at the source end.  `None` for a
    /// straight edge.
    pub fn edge_geometry(&self, edge: EdgeId) -> Option<&[GeoPoint]> {
        let start = self.edge_geom_start[edge.index()] as usize;
        let end = self.edge_geom_start[edge.index() + 1] as usize;
        (end > start).then(|| &self.geom_points[start..end])
    }

    #[inline]
    pub fn has_geometry(&self, edge: EdgeId) -> bool {
        self.edge_geom_start[edge.index() + 1] > self.edge_geom_start[edge.index()]
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Return the `NodeId` of the node geodesically nearest to `pos`.
    ///
    /// Equidistant candidates resolve to the lowest `NodeId`.
    pub fn nearest_node(&self, pos: GeoPoint) -> RouteResult<NodeId> {
        pos.validate()?;
        let query = pos.to_unit_vector();
        let mut candidates = self.spatial_idx.nearest_neighbor_iter(&query);

        let first = candidates.next().ok_or(RouteError::EmptyGraph)?;
        let best_d2 = first.distance_2(&query);

        let best = candidates
            .take_while(|e| e.distance_2(&query) <= best_d2)
            .fold(first.id, |acc, e| acc.min(e.id));
        Ok(best)
    }

    /// Return up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: GeoPoint, k: usize) -> RouteResult<Vec<NodeId>> {
        pos.validate()?;
        if self.is_empty() {
            return Err(RouteError::EmptyGraph);
        }
        Ok(self
            .spatial_idx
            .nearest_neighbor_iter(&pos.to_unit_vector())
            .take(k)
            .map(|e| e.id)
            .collect())
    }
}

// ── RoadNetworkBuilder ────────────────────────────────────────────────────────

/// Construct a [`RoadNetwork`] incrementally, then call [`build`](Self::build).
///
/// This is the seam a map loader drives: nodes first, then directed edges in
/// any order.  `build()` sorts edges by `(source, target)`, assigns
/// parallel-edge keys, constructs the CSR arrays, and bulk-loads the R-tree.
///
/// # Example
///
/// ```
/// use wf_core::GeoPoint;
/// use wf_spatial::RoadNetworkBuilder;
///
/// let mut b = RoadNetworkBuilder::new();
/// let a = b.add_node(GeoPoint::new(21.028, 105.852));
/// let c = b.add_node(GeoPoint::new(21.030, 105.855));
/// b.add_road(a, c, 380.0).unwrap();
/// let net = b.build();
/// assert_eq!(net.node_count(), 2);
/// assert_eq!(net.edge_count(), 2); // bidirectional
/// ```
pub struct RoadNetworkBuilder {
    nodes: Vec<GeoPoint>,
    external_ids: Vec<Option<i64>>,
    external_index: FxHashMap<i64, NodeId>,
    raw_edges: Vec<RawEdge>,
}

struct RawEdge {
    from: NodeId,
    to: NodeId,
    length_m: f64,
    geometry: Option<Vec<GeoPoint>>,
}

impl RoadNetworkBuilder {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            external_ids: Vec::new(),
            external_index: FxHashMap::default(),
            raw_edges: Vec::new(),
        }
    }

    /// Pre-allocate for the expected number of nodes and edges to reduce
    /// reallocations when bulk-loading.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            external_ids: Vec::with_capacity(nodes),
            external_index: FxHashMap::with_capacity_and_hasher(nodes, Default::default()),
            raw_edges: Vec::with_capacity(edges),
        }
    }

    /// Add a road node and return its `NodeId` (sequential from 0).
    ///
    /// Unchecked path for trusted data, like [`GeoPoint::new`]; the node has
    /// no external id.  Debug builds assert that `pos` is valid.  Use
    /// [`try_add_node`](Self::try_add_node) for caller-supplied coordinates.
    pub fn add_node(&mut self, pos: GeoPoint) -> NodeId {
        debug_assert!(pos.is_valid(), "invalid node coordinate {pos}");
        self.push_node(pos, None)
    }

    /// Validating [`add_node`](Self::add_node).
    ///
    /// # Errors
    ///
    /// [`RouteError::InvalidCoordinate`] if `pos` is malformed.
    pub fn try_add_node(&mut self, pos: GeoPoint) -> RouteResult<NodeId> {
        pos.validate()?;
        Ok(self.push_node(pos, None))
    }

    /// Add a road node keyed by a loader-assigned identifier.
    ///
    /// # Errors
    ///
    /// [`RouteError::DuplicateExternalId`] if `external` was already used,
    /// [`RouteError::InvalidCoordinate`] if `pos` is malformed.
    pub fn add_node_with_external_id(&mut self, external: i64, pos: GeoPoint) -> RouteResult<NodeId> {
        pos.validate()?;
        if self.external_index.contains_key(&external) {
            return Err(RouteError::DuplicateExternalId(external));
        }
        let id = self.push_node(pos, Some(external));
        self.external_index.insert(external, id);
        Ok(id)
    }

    fn push_node(&mut self, pos: GeoPoint, external: Option<i64>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        self.external_ids.push(external);
        id
    }

    /// Add a **directed** straight edge from `from` to `to` of `length_m`
    /// metres.
    pub fn add_directed_edge(&mut self, from: NodeId, to: NodeId, length_m: f64) -> RouteResult<()> {
        self.push_edge(from, to, length_m, None)
    }

    /// Add a **directed** edge whose physical curve is `geometry`, ordered from
    /// `from` to `to`.  Curves with fewer than two vertices carry no shape and
    /// are stored as straight edges.
    pub fn add_directed_edge_with_geometry(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        geometry: Vec<GeoPoint>,
    ) -> RouteResult<()> {
        let geometry = (geometry.len() >= 2).then_some(geometry);
        self.push_edge(from, to, length_m, geometry)
    }

    /// Convenience: add edges in **both directions** for a two-way road.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, length_m: f64) -> RouteResult<()> {
        self.add_directed_edge(a, b, length_m)?;
        self.add_directed_edge(b, a, length_m)
    }

    /// Two-way road with a curve; the reverse edge gets the reversed curve.
    pub fn add_road_with_geometry(
        &mut self,
        a: NodeId,
        b: NodeId,
        length_m: f64,
        geometry: Vec<GeoPoint>,
    ) -> RouteResult<()> {
        let mut reversed = geometry.clone();
        reversed.reverse();
        self.add_directed_edge_with_geometry(a, b, length_m, geometry)?;
        self.add_directed_edge_with_geometry(b, a, length_m, reversed)
    }

    fn push_edge(
        &mut self,
        from: NodeId,
        to: NodeId,
        length_m: f64,
        geometry: Option<Vec<GeoPoint>>,
    ) -> RouteResult<()> {
        for n in [from, to] {
            if n.index() >= self.nodes.len() {
                return Err(RouteError::NodeNotFound(n));
            }
        }
        if !(length_m.is_finite() && length_m >= 0.0) {
            return Err(RouteError::InvalidLength { from, to, length_m });
        }
        if let Some(points) = &geometry {
            for p in points {
                p.validate()?;
            }
        }
        self.raw_edges.push(RawEdge { from, to, length_m, geometry });
        Ok(())
    }

    /// Look up the position of a node added earlier (used by loaders to
    /// compute edge lengths between adjacent way nodes).
    pub fn node_pos(&self, id: NodeId) -> RouteResult<GeoPoint> {
        self.nodes.get(id.index()).copied().ok_or(RouteError::NodeNotFound(id))
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Consume the builder and produce a [`RoadNetwork`].
    ///
    /// Time complexity: O(E log E) for edge sort + O(N log N) for R-tree bulk
    /// load, where N = nodes, E = edges.
    pub fn build(self) -> RoadNetwork {
        let node_count = self.nodes.len();
        let edge_count = self.raw_edges.len();

        // Stable sort: parallel edges keep insertion order, which defines
        // their keys.
        let mut raw = self.raw_edges;
        raw.sort_by_key(|e| (e.from.0, e.to.0));

        let edge_from:     Vec<NodeId> = raw.iter().map(|e| e.from).collect();
        let edge_to:       Vec<NodeId> = raw.iter().map(|e| e.to).collect();
        let edge_length_m: Vec<f64>    = raw.iter().map(|e| e.length_m).collect();

        let mut edge_key = Vec::with_capacity(edge_count);
        for (i, e) in raw.iter().enumerate() {
            let key = match i.checked_sub(1).map(|p| &raw[p]) {
                Some(prev) if prev.from == e.from && prev.to == e.to => edge_key[i - 1] + 1,
                _ => 0,
            };
            edge_key.push(key);
        }

        // Flatten curves behind an offset table.
        let mut edge_geom_start = Vec::with_capacity(edge_count + 1);
        let mut geom_points = Vec::new();
        edge_geom_start.push(0u32);
        for e in raw {
            if let Some(points) = e.geometry {
                geom_points.extend(points);
            }
            edge_geom_start.push(geom_points.len() as u32);
        }

        // Build CSR row pointer (node_out_start).
        let mut node_out_start = vec![0u32; node_count + 1];
        for from in &edge_from {
            node_out_start[from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edge_count);

        // Bulk-load R-tree for O(N log N) construction (faster than N inserts).
        let entries: Vec<NodeEntry> = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, &pos)| NodeEntry {
                point: pos.to_unit_vector(),
                id: NodeId(i as u32),
            })
            .collect();
        let spatial_idx = RTree::bulk_load(entries);

        debug!(
            nodes = node_count,
            edges = edge_count,
            curve_points = geom_points.len(),
            "built road network"
        );

        RoadNetwork {
            node_pos: self.nodes,
            node_external_id: self.external_ids,
            node_out_start,
            edge_from,
            edge_to,
            edge_length_m,
            edge_key,
            edge_geom_start,
            geom_points,
            external_index: self.external_index,
            spatial_idx,
        }
    }
}

impl Default for RoadNetworkBuilder {
    fn default() -> Self {
        Self::new()
    }
}
