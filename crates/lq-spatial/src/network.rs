//! Road graph representation and builder.
//!
//! # Data layout
//!
//! Outgoing edges are stored in **Compressed Sparse Row (CSR)** order.  Given
//! a `NodeId n`, its outgoing edges occupy the slice:
//!
//! ```text
//! edges[ node_out_start[n] .. node_out_start[n+1] ]
//! ```
//!
//! `edges` is sorted by source node with a *stable* sort, so within one node
//! the edges keep the order they were added in.  [`RoadGraph::neighbors`]
//! therefore returns a deterministic, insertion-ordered slice.
//!
//! # Spatial index
//!
//! The graph owns one [`SpatialIndex`] over its node positions, built in
//! [`RoadGraphBuilder::build`].  Used to map-match waypoints onto nodes.

use lq_core::{Coordinate, EdgeId, NodeId};

use crate::index::SpatialIndex;
use crate::{SpatialError, SpatialResult};

/// Default speed for edges whose travel time is not given.
pub const DEFAULT_EDGE_SPEED_KMH: f64 = 30.0;

// ── Edge ──────────────────────────────────────────────────────────────────────

/// A directed road segment.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Edge {
    pub from:          NodeId,
    pub to:            NodeId,
    pub distance_m:    f64,
    pub travel_time_s: f64,
    pub name:          String,
    /// Ordered points approximating the physical road, endpoints included.
    /// `None` means a straight segment between the two nodes.
    pub geometry:      Option<Vec<Coordinate>>,
}

// ── Road ──────────────────────────────────────────────────────────────────────

/// Attributes of a segment being added to a [`RoadGraphBuilder`].
///
/// ```
/// use lq_spatial::Road;
///
/// let r = Road::new(1_200.0).travel_time(90.0).named("EM Bypass");
/// assert_eq!(r.distance_m, 1_200.0);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Road {
    pub distance_m:    f64,
    pub travel_time_s: Option<f64>,
    pub name:          Option<String>,
    pub geometry:      Option<Vec<Coordinate>>,
}

impl Road {
    pub fn new(distance_m: f64) -> Self {
        Self { distance_m, ..Self::default() }
    }

    pub fn travel_time(mut self, secs: f64) -> Self {
        self.travel_time_s = Some(secs);
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_geometry(mut self, geometry: Vec<Coordinate>) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

// ── RoadGraph ─────────────────────────────────────────────────────────────────

/// Directed road graph in CSR format plus a spatial index for map-matching.
///
/// Do not construct directly; use [`RoadGraphBuilder`].
pub struct RoadGraph {
    node_pos:       Vec<Coordinate>,
    /// CSR row pointer.  Length = `node_count + 1`.
    node_out_start: Vec<u32>,
    /// Edges sorted by source node; `EdgeId` is the position in this vector.
    edges:          Vec<Edge>,
    spatial_idx:    SpatialIndex,
}

impl RoadGraph {
    /// A graph with no nodes.  Every map-matching request against it fails
    /// with [`SpatialError::EmptyGraph`].
    pub fn empty() -> Self {
        RoadGraphBuilder::new().build()
    }

    // ── Graph dimensions ──────────────────────────────────────────────────

    pub fn node_count(&self) -> usize {
        self.node_pos.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.node_pos.is_empty()
    }

    #[inline]
    pub fn contains(&self, node: NodeId) -> bool {
        node.index() < self.node_pos.len()
    }

    // ── Lookup ────────────────────────────────────────────────────────────

    pub fn node_pos(&self, node: NodeId) -> SpatialResult<Coordinate> {
        self.node_pos
            .get(node.index())
            .copied()
            .ok_or(SpatialError::NodeNotFound(node))
    }

    pub fn edge(&self, edge: EdgeId) -> Option<&Edge> {
        self.edges.get(edge.index())
    }

    // ── Graph traversal ───────────────────────────────────────────────────

    /// Outgoing edges of `node` in insertion order.  Empty for unknown nodes.
    #[inline]
    pub fn neighbors(&self, node: NodeId) -> &[Edge] {
        match self.out_range(node) {
            Some((start, end)) => &self.edges[start..end],
            None => &[],
        }
    }

    /// Like [`neighbors`](Self::neighbors) but paired with each edge's id.
    pub fn out_edges(&self, node: NodeId) -> impl Iterator<Item = (EdgeId, &Edge)> + '_ {
        let (start, end) = self.out_range(node).unwrap_or((0, 0));
        (start..end).map(move |i| (EdgeId(i as u32), &self.edges[i]))
    }

    #[inline]
    pub fn out_degree(&self, node: NodeId) -> usize {
        self.out_range(node).map_or(0, |(s, e)| e - s)
    }

    #[inline]
    fn out_range(&self, node: NodeId) -> Option<(usize, usize)> {
        if !self.contains(node) {
            return None;
        }
        let start = self.node_out_start[node.index()] as usize;
        let end   = self.node_out_start[node.index() + 1] as usize;
        Some((start, end))
    }

    // ── Spatial queries ───────────────────────────────────────────────────

    /// Map-match `pos` to the nearest node.
    pub fn find_nearest_node(&self, pos: Coordinate) -> SpatialResult<NodeId> {
        self.spatial_idx.nearest(pos).ok_or(SpatialError::EmptyGraph)
    }

    /// Up to `k` nearest nodes to `pos`, sorted by ascending distance.
    pub fn k_nearest_nodes(&self, pos: Coordinate, k: usize) -> Vec<NodeId> {
        self.spatial_idx.k_nearest(pos, k)
    }
}

// ── RoadGraphBuilder ──────────────────────────────────────────────────────────

/// Construct a [`RoadGraph`] incrementally, then call [`build`](Self::build).
///
/// # Example
///
/// ```
/// use lq_core::Coordinate;
/// use lq_spatial::{Road, RoadGraphBuilder};
///
/// let mut b = RoadGraphBuilder::new();
/// let a = b.add_node(Coordinate::new(22.5867, 88.4177)).unwrap();
/// let c = b.add_node(Coordinate::new(22.5754, 88.4798)).unwrap();
/// b.add_road(a, c, Road::new(6_500.0)).unwrap();
/// let g = b.build();
/// assert_eq!(g.node_count(), 2);
/// assert_eq!(g.edge_count(), 2); // bidirectional
/// ```
pub struct RoadGraphBuilder {
    nodes:             Vec<Coordinate>,
    raw_edges:         Vec<Edge>,
    default_speed_kmh: f64,
}

impl RoadGraphBuilder {
    pub fn new() -> Self {
        Self {
            nodes:             Vec::new(),
            raw_edges:         Vec::new(),
            default_speed_kmh: DEFAULT_EDGE_SPEED_KMH,
        }
    }

    /// Pre-allocate for the expected number of nodes and edges.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes:     Vec::with_capacity(nodes),
            raw_edges: Vec::with_capacity(edges),
            ..Self::new()
        }
    }

    /// Speed used to derive travel time for roads added without one.
    /// Non-positive values are ignored.
    pub fn default_speed_kmh(mut self, kmh: f64) -> Self {
        if kmh.is_finite() && kmh > 0.0 {
            self.default_speed_kmh = kmh;
        }
        self
    }

    /// Add a node and return its `NodeId` (sequential from 0).
    ///
    /// Non-finite or out-of-range positions are rejected before they can
    /// reach the spatial index.
    pub fn add_node(&mut self, pos: Coordinate) -> SpatialResult<NodeId> {
        if !pos.is_valid() {
            return Err(SpatialError::InvalidCoordinate(pos));
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(pos);
        Ok(id)
    }

    /// Position of a node added earlier.
    pub fn node_pos(&self, id: NodeId) -> Option<Coordinate> {
        self.nodes.get(id.index()).copied()
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn edge_count(&self) -> usize { self.raw_edges.len() }

    /// Add a **directed** edge from `from` to `to`.
    ///
    /// Both endpoints must already exist.  Edge ids are assigned by
    /// [`build`](Self::build) in CSR order, so none is returned here.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId, road: Road) -> SpatialResult<()> {
        for node in [from, to] {
            if node.index() >= self.nodes.len() {
                return Err(SpatialError::NodeNotFound(node));
            }
        }
        check_weight("distance_m", road.distance_m)?;
        let travel_time_s = match road.travel_time_s {
            Some(t) => {
                check_weight("travel_time_s", t)?;
                t
            }
            None => road.distance_m / (self.default_speed_kmh / 3.6),
        };

        self.raw_edges.push(Edge {
            from,
            to,
            distance_m: road.distance_m,
            travel_time_s,
            name: road.name.unwrap_or_default(),
            geometry: road.geometry,
        });
        Ok(())
    }

    /// Convenience: add edges in **both directions**.  The reverse edge gets
    /// the geometry reversed.
    pub fn add_road(&mut self, a: NodeId, b: NodeId, road: Road) -> SpatialResult<()> {
        let mut reverse = road.clone();
        if let Some(g) = reverse.geometry.as_mut() {
            g.reverse();
        }
        self.add_edge(a, b, road)?;
        self.add_edge(b, a, reverse)
    }

    /// Consume the builder and produce a frozen [`RoadGraph`].
    ///
    /// Time complexity: O(E log E) for the edge sort + O(N log N) for the
    /// R-tree bulk load.
    pub fn build(self) -> RoadGraph {
        let node_count = self.nodes.len();

        // Stable: keeps per-node insertion order.
        let mut edges = self.raw_edges;
        edges.sort_by_key(|e| e.from.0);

        let mut node_out_start = vec![0u32; node_count + 1];
        for e in &edges {
            node_out_start[e.from.index() + 1] += 1;
        }
        for i in 1..=node_count {
            node_out_start[i] += node_out_start[i - 1];
        }
        debug_assert_eq!(node_out_start[node_count] as usize, edges.len());

        let spatial_idx = SpatialIndex::build(
            self.nodes
                .iter()
                .enumerate()
                .map(|(i, &pos)| (NodeId(i as u32), pos)),
        );

        RoadGraph {
            node_pos: self.nodes,
            node_out_start,
            edges,
            spatial_idx,
        }
    }
}

impl Default for RoadGraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn check_weight(field: &'static str, value: f64) -> SpatialResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SpatialError::InvalidWeight { field, value })
    }
}
