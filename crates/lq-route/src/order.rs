//! Waypoint ordering.
//!
//! # Algorithm
//!
//! Greedy nearest neighbour: the first waypoint is the fixed start; from the
//! current position, repeatedly move to the closest unvisited waypoint
//! (geodesic distance).  Ties go to the waypoint that appears first in the
//! input.  O(n²) distance evaluations.
//!
//! # Known limitation
//!
//! This is a construction heuristic only.  No local-search refinement
//! (2-opt, or-opt) is applied, so tours can be noticeably longer than
//! optimal when stops form interleaved clusters.  That is accepted
//! behaviour, not a bug: callers that need near-optimal multi-stop tours
//! should use a dedicated VRP solver.

use crate::model::Waypoint;

/// Reorders intermediate waypoints to shorten the trip.
#[derive(Copy, Clone, Debug, Default)]
pub struct WaypointOrderer;

impl WaypointOrderer {
    /// Visiting order as indices into `waypoints`.
    ///
    /// Always a permutation starting with `0`; the identity for two or fewer
    /// waypoints.
    pub fn order(&self, waypoints: &[Waypoint]) -> Vec<usize> {
        let n = waypoints.len();
        if n <= 2 {
            return (0..n).collect();
        }

        let mut order = Vec::with_capacity(n);
        let mut visited = vec![false; n];
        let mut current = 0usize;
        visited[0] = true;
        order.push(0);

        while order.len() < n {
            let here = waypoints[current].pos;
            let mut best: Option<(usize, f64)> = None;
            for (i, wp) in waypoints.iter().enumerate() {
                if visited[i] {
                    continue;
                }
                let d = here.distance_m(wp.pos);
                // Strict `<`: first encountered wins ties.
                if best.is_none_or(|(_, best_d)| d < best_d) {
                    best = Some((i, d));
                }
            }
            let Some((next, _)) = best else { break };
            visited[next] = true;
            order.push(next);
            current = next;
        }
        order
    }

    /// Reorder `waypoints` in place of the input vector.
    pub fn apply(&self, waypoints: Vec<Waypoint>) -> Vec<Waypoint> {
        let order = self.order(&waypoints);
        let mut slots: Vec<Option<Waypoint>> = waypoints.into_iter().map(Some).collect();
        order.into_iter().filter_map(|i| slots[i].take()).collect()
    }

    /// Length in metres of the open path visiting `waypoints` in order.
    pub fn path_length_m(waypoints: &[Waypoint]) -> f64 {
        waypoints.windows(2).map(|w| w[0].pos.distance_m(w[1].pos)).sum()
    }
}
