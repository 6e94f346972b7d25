//! Nearest-node spatial index.
//!
//! An R-tree (via `rstar`) over `[lat, lon]` points.  Built once by bulk
//! load, O(N log N); queries are O(log N) expected.  There is no incremental
//! insert: callers collect every node first and call [`SpatialIndex::build`]
//! again if the point set ever changes.

use rstar::{PointDistance, RTree, RTreeObject, AABB};

use lq_core::{Coordinate, NodeId};

// ── R-tree entry ──────────────────────────────────────────────────────────────

/// Entry stored in the R-tree: a 2-D `[lat, lon]` point with its `NodeId`.
#[derive(Clone)]
struct NodeEntry {
    point: [f64; 2],
    id:    NodeId,
}

impl RTreeObject for NodeEntry {
    type Envelope = AABB<[f64; 2]>;
    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.point)
    }
}

impl PointDistance for NodeEntry {
    /// Squared Euclidean distance in lat/lon space.  Good enough to rank
    /// candidates within a metropolitan area; ranking errors only appear
    /// between nodes that are almost equidistant.
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dlat = self.point[0] - point[0];
        let dlon = self.point[1] - point[1];
        dlat * dlat + dlon * dlon
    }
}

// ── SpatialIndex ──────────────────────────────────────────────────────────────

/// Immutable nearest-neighbour index over a fixed node set.
pub struct SpatialIndex {
    tree: RTree<NodeEntry>,
}

impl SpatialIndex {
    /// Bulk-load an index from `(NodeId, Coordinate)` pairs.
    pub fn build<I>(points: I) -> Self
    where
        I: IntoIterator<Item = (NodeId, Coordinate)>,
    {
        let entries: Vec<NodeEntry> = points
            .into_iter()
            .map(|(id, pos)| NodeEntry { point: [pos.lat, pos.lon], id })
            .collect();
        Self { tree: RTree::bulk_load(entries) }
    }

    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }

    /// The node nearest to `pos`, or `None` if the index is empty.
    pub fn nearest(&self, pos: Coordinate) -> Option<NodeId> {
        self.tree.nearest_neighbor(&[pos.lat, pos.lon]).map(|e| e.id)
    }

    /// Up to `k` nearest nodes, sorted by ascending distance.
    pub fn k_nearest(&self, pos: Coordinate, k: usize) -> Vec<NodeId> {
        self.tree
            .nearest_neighbor_iter(&[pos.lat, pos.lon])
            .take(k)
            .map(|e| e.id)
            .collect()
    }
}
