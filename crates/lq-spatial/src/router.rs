//! Shortest-path trait and default Dijkstra implementation.
//!
//! # Pluggability
//!
//! The route assembler calls the solver through the [`PathSolver`] trait, so
//! an application can swap in A* or contraction hierarchies without touching
//! the assembler.
//!
//! # Determinism
//!
//! The priority queue orders entries by accumulated weight, then by the
//! order in which they were pushed.  Two nodes reached with exactly the same
//! weight are therefore settled first-pushed-first, and the same graph and
//! query always produce the same edge sequence.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use lq_core::{Coordinate, EdgeId, NodeId};

use crate::network::{Edge, RoadGraph};
use crate::{SpatialError, SpatialResult};

// ── Weight ────────────────────────────────────────────────────────────────────

/// Which edge attribute the solver minimises.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Weight {
    /// Metres.
    Distance,
    /// Seconds.
    #[default]
    TravelTime,
}

impl Weight {
    #[inline]
    pub fn of(self, edge: &Edge) -> f64 {
        match self {
            Weight::Distance   => edge.distance_m,
            Weight::TravelTime => edge.travel_time_s,
        }
    }
}

// ── Path ──────────────────────────────────────────────────────────────────────

/// The result of a shortest-path query.
#[derive(Debug, Clone, PartialEq)]
pub struct Path {
    pub source:       NodeId,
    pub target:       NodeId,
    /// Edges to traverse in order, from source to target.
    pub edges:        Vec<EdgeId>,
    /// Sum of the selected weight over `edges`.
    pub total_weight: f64,
}

impl Path {
    /// `true` if the source and target are the same node.
    pub fn is_trivial(&self) -> bool {
        self.edges.is_empty()
    }

    pub fn distance_m(&self, graph: &RoadGraph) -> f64 {
        self.edges.iter().filter_map(|&e| graph.edge(e)).map(|e| e.distance_m).sum()
    }

    pub fn travel_time_s(&self, graph: &RoadGraph) -> f64 {
        self.edges.iter().filter_map(|&e| graph.edge(e)).map(|e| e.travel_time_s).sum()
    }

    /// Expand the path into coordinates: each edge's geometry when it has
    /// one, otherwise its two endpoints.  Shared joints appear once.
    pub fn geometry(&self, graph: &RoadGraph) -> Vec<Coordinate> {
        let mut out: Vec<Coordinate> = Vec::new();
        if self.is_trivial() {
            if let Ok(p) = graph.node_pos(self.source) {
                out.push(p);
            }
            return out;
        }
        for edge in self.edges.iter().filter_map(|&e| graph.edge(e)) {
            let segment = match &edge.geometry {
                Some(g) => g.clone(),
                None => [edge.from, edge.to]
                    .into_iter()
                    .filter_map(|n| graph.node_pos(n).ok())
                    .collect(),
            };
            for p in segment {
                if out.last() != Some(&p) {
                    out.push(p);
                }
            }
        }
        out
    }
}

// ── PathSolver trait ──────────────────────────────────────────────────────────

/// Pluggable single-pair shortest-path engine.
///
/// Implementations must be `Send + Sync` so one solver can serve concurrent
/// requests against a shared graph.
pub trait PathSolver: Send + Sync {
    /// Shortest path from `from` to `to` minimising `weight`.
    ///
    /// `from == to` yields a zero-weight path with no edges.  Unknown nodes
    /// yield [`SpatialError::NodeNotFound`], unreachable targets
    /// [`SpatialError::NoRoute`].
    fn shortest_path(
        &self,
        graph:  &RoadGraph,
        from:   NodeId,
        to:     NodeId,
        weight: Weight,
    ) -> SpatialResult<Path>;
}

// ── DijkstraSolver ────────────────────────────────────────────────────────────

/// Binary-heap Dijkstra over the CSR road graph.  Edge weights are
/// non-negative by construction (the builder rejects anything else).
#[derive(Copy, Clone, Debug, Default)]
pub struct DijkstraSolver;

impl PathSolver for DijkstraSolver {
    fn shortest_path(
        &self,
        graph:  &RoadGraph,
        from:   NodeId,
        to:     NodeId,
        weight: Weight,
    ) -> SpatialResult<Path> {
        dijkstra(graph, from, to, weight)
    }
}

// ── Dijkstra internals ────────────────────────────────────────────────────────

/// Heap entry.  `Ord` is reversed so `BinaryHeap` (a max-heap) pops the
/// smallest cost first, then the smallest push sequence.
#[derive(Copy, Clone, Debug)]
struct QueueEntry {
    cost: f64,
    seq:  u64,
    node: NodeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .cost
            .total_cmp(&self.cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

fn dijkstra(graph: &RoadGraph, from: NodeId, to: NodeId, weight: Weight) -> SpatialResult<Path> {
    for node in [from, to] {
        if !graph.contains(node) {
            return Err(SpatialError::NodeNotFound(node));
        }
    }
    if from == to {
        return Ok(Path { source: from, target: to, edges: vec![], total_weight: 0.0 });
    }

    let n = graph.node_count();
    // dist[v] = best known weight to reach v.
    let mut dist      = vec![f64::INFINITY; n];
    // prev_edge[v] = EdgeId that reached v; EdgeId::INVALID for unreached nodes.
    let mut prev_edge = vec![EdgeId::INVALID; n];
    let mut settled   = vec![false; n];
    let mut seq: u64  = 0;

    dist[from.index()] = 0.0;
    let mut heap = BinaryHeap::new();
    heap.push(QueueEntry { cost: 0.0, seq, node: from });

    while let Some(QueueEntry { cost, node, .. }) = heap.pop() {
        // Skip stale heap entries.
        if settled[node.index()] || cost > dist[node.index()] {
            continue;
        }
        settled[node.index()] = true;

        if node == to {
            return Ok(reconstruct(graph, &prev_edge, from, to, cost));
        }

        for (edge_id, edge) in graph.out_edges(node) {
            let next = edge.to;
            if settled[next.index()] {
                continue;
            }
            let new_cost = cost + weight.of(edge);
            if new_cost < dist[next.index()] {
                dist[next.index()] = new_cost;
                prev_edge[next.index()] = edge_id;
                seq += 1;
                heap.push(QueueEntry { cost: new_cost, seq, node: next });
            }
        }
    }

    Err(SpatialError::NoRoute { from, to })
}

fn reconstruct(
    graph:     &RoadGraph,
    prev_edge: &[EdgeId],
    from:      NodeId,
    to:        NodeId,
    total:     f64,
) -> Path {
    let mut edges = Vec::new();
    let mut cur = to;
    while cur != from {
        let e = prev_edge[cur.index()];
        let Some(edge) = graph.edge(e) else { break };
        edges.push(e);
        cur = edge.from;
    }
    edges.reverse();
    Path { source: from, target: to, edges, total_weight: total }
}
