//! Multi-leg route assembly.
//!
//! # Pipeline
//!
//! 1. Validate the request (≥ 2 waypoints, unique non-empty ids, valid
//!    coordinates).
//! 2. Optionally reorder stops with [`WaypointOrderer`].
//! 3. Map-match every waypoint to its nearest road-graph node.  One failure
//!    rejects the whole request before any provider call is made.
//! 4. Per consecutive pair, ask the [`RouteProvider`].  On any provider
//!    error the leg is rebuilt locally according to [`FallbackStrategy`].
//! 5. Sum legs into a [`Route`].
//!
//! Legs are independent, so one provider outage only degrades the legs it
//! touches.  With the `parallel` feature the provider calls for all legs are
//! issued concurrently; results are collected by leg index, never by
//! completion order.

use std::sync::Arc;

use lq_core::{Coordinate, FallbackStrategy, NodeId, RoutingConfig};
use lq_spatial::{DijkstraSolver, PathSolver, RoadGraph, SpatialError, Weight};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

use crate::instruction;
use crate::model::{LegSource, Maneuver, NavigationStep, Route, RouteLeg, Waypoint};
use crate::order::WaypointOrderer;
use crate::polyline;
use crate::provider::{ProviderRoute, RouteProvider};
use crate::{ProviderError, ProviderResult, RouteError, RouteResult};

// ── RouteOptions ──────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RouteOptions {
    /// Reorder intermediate stops (first stop stays first).
    pub optimize:   bool,
    /// Request turn-by-turn steps from the provider.
    pub want_steps: bool,
}

impl Default for RouteOptions {
    fn default() -> Self {
        Self { optimize: false, want_steps: true }
    }
}

// ── RouteAssembler ────────────────────────────────────────────────────────────

/// Builds routes against a shared, frozen road graph.
///
/// `P` is the external provider, `S` the solver used by the road-graph
/// fallback.  Both are `Send + Sync`, so one assembler can serve concurrent
/// requests.
pub struct RouteAssembler<P: RouteProvider, S: PathSolver = DijkstraSolver> {
    graph:    Arc<RoadGraph>,
    provider: P,
    solver:   S,
    config:   RoutingConfig,
}

impl<P: RouteProvider> RouteAssembler<P, DijkstraSolver> {
    pub fn new(graph: Arc<RoadGraph>, provider: P, config: RoutingConfig) -> Self {
        Self { graph, provider, solver: DijkstraSolver, config }
    }
}

impl<P: RouteProvider, S: PathSolver> RouteAssembler<P, S> {
    /// Replace the solver used by [`FallbackStrategy::RoadGraph`].
    pub fn with_solver<S2: PathSolver>(self, solver: S2) -> RouteAssembler<P, S2> {
        RouteAssembler {
            graph:    self.graph,
            provider: self.provider,
            solver,
            config:   self.config,
        }
    }

    pub fn graph(&self) -> &RoadGraph {
        &self.graph
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    /// Assemble a route through `waypoints`.
    pub fn assemble(&self, waypoints: Vec<Waypoint>, options: &RouteOptions) -> RouteResult<Route> {
        validate(&waypoints)?;

        let waypoints = if options.optimize && waypoints.len() >= 3 {
            let before = WaypointOrderer::path_length_m(&waypoints);
            let reordered = WaypointOrderer.apply(waypoints);
            log::debug!(
                "reordered {} waypoints: {:.0} m -> {:.0} m straight-line",
                reordered.len(),
                before,
                WaypointOrderer::path_length_m(&reordered)
            );
            reordered
        } else {
            waypoints
        };

        let nodes = waypoints
            .iter()
            .map(|wp| {
                self.graph
                    .find_nearest_node(wp.pos)
                    .map_err(|source| RouteError::Unmatched { waypoint: wp.id.clone(), source })
            })
            .collect::<RouteResult<Vec<NodeId>>>()?;

        let leg_count = waypoints.len() - 1;
        let build = |i: usize| {
            self.build_leg(i, &waypoints[i], &waypoints[i + 1], nodes[i], nodes[i + 1], options.want_steps)
        };

        #[cfg(feature = "parallel")]
        let legs = (0..leg_count).into_par_iter().map(build).collect::<RouteResult<Vec<_>>>()?;
        #[cfg(not(feature = "parallel"))]
        let legs = (0..leg_count).map(build).collect::<RouteResult<Vec<_>>>()?;

        let route = Route::from_legs(waypoints.into_iter().map(|w| w.id).collect(), legs);
        let fallback = route.fallback_leg_count();
        if fallback > 0 {
            log::info!("route assembled with {fallback} of {leg_count} legs on local fallback");
        }
        Ok(route)
    }

    /// Travel times in seconds between all `waypoints`.  Uses the provider
    /// matrix when available, otherwise geodesic distance at the fallback
    /// speed.
    pub fn travel_time_matrix(&self, waypoints: &[Waypoint]) -> Vec<Vec<f64>> {
        let coords: Vec<Coordinate> = waypoints.iter().map(|w| w.pos).collect();
        match self.provider.travel_time_matrix(&coords) {
            Ok(m) if is_square(&m, coords.len()) => m,
            Ok(_) => {
                log::warn!("provider matrix has the wrong shape; using straight-line estimate");
                self.straight_line_matrix(&coords)
            }
            Err(e) => {
                log::warn!("provider matrix unavailable ({e}); using straight-line estimate");
                self.straight_line_matrix(&coords)
            }
        }
    }

    fn straight_line_matrix(&self, coords: &[Coordinate]) -> Vec<Vec<f64>> {
        coords
            .iter()
            .map(|a| coords.iter().map(|&b| a.distance_m(b) / self.fallback_speed_ms()).collect())
            .collect()
    }

    #[inline]
    fn fallback_speed_ms(&self) -> f64 {
        self.config.fallback_speed_kmh / 3.6
    }

    // ── Per-leg ───────────────────────────────────────────────────────────

    fn build_leg(
        &self,
        index:      usize,
        a:          &Waypoint,
        b:          &Waypoint,
        from_node:  NodeId,
        to_node:    NodeId,
        want_steps: bool,
    ) -> RouteResult<RouteLeg> {
        let provided = self
            .provider
            .route(&[a.pos, b.pos], want_steps)
            .and_then(|pr| translate(pr, want_steps));

        let (distance_m, duration_s, geometry, steps, source) = match provided {
            Ok(leg) => {
                log::debug!("leg {index} {} -> {}: provider route", a.id, b.id);
                (leg.distance_m, leg.duration_s, leg.geometry, leg.steps, LegSource::Provider)
            }
            Err(e) => {
                log::warn!("leg {index} {} -> {}: provider unavailable ({e}); using fallback", a.id, b.id);
                match self.config.fallback {
                    FallbackStrategy::StraightLine => self.straight_line(a, b),
                    FallbackStrategy::RoadGraph => self.road_graph(index, a, b, from_node, to_node)?,
                }
            }
        };

        Ok(RouteLeg {
            from: a.id.clone(),
            to: b.id.clone(),
            from_node,
            to_node,
            distance_m,
            duration_s,
            geometry,
            steps,
            source,
        })
    }

    fn straight_line(&self, a: &Waypoint, b: &Waypoint) -> LegParts {
        let distance_m = a.pos.distance_m(b.pos);
        let duration_s = distance_m / self.fallback_speed_ms();
        let geometry = vec![a.pos, b.pos];
        let step = NavigationStep {
            instruction: format!("Head straight to {}", b.label()),
            maneuver:    Maneuver::Depart,
            distance_m,
            duration_s,
            geometry:    geometry.clone(),
        };
        (distance_m, duration_s, geometry, vec![step], LegSource::StraightLine)
    }

    fn road_graph(
        &self,
        index:     usize,
        a:         &Waypoint,
        b:         &Waypoint,
        from_node: NodeId,
        to_node:   NodeId,
    ) -> RouteResult<LegParts> {
        let path = match self.solver.shortest_path(&self.graph, from_node, to_node, Weight::TravelTime) {
            Ok(p) => p,
            Err(SpatialError::NoRoute { .. }) => {
                return Err(RouteError::NoPath { leg: index, from: a.id.clone(), to: b.id.clone() });
            }
            Err(e) => return Err(RouteError::Internal(e.to_string())),
        };

        let mut geometry = path.geometry(&self.graph);
        if geometry.first() != Some(&a.pos) {
            geometry.insert(0, a.pos);
        }
        if geometry.last() != Some(&b.pos) {
            geometry.push(b.pos);
        }

        // Off-network stretches between each waypoint and its matched node.
        let node_pos = |n: NodeId| self.graph.node_pos(n).map_err(|e| RouteError::Internal(e.to_string()));
        let gap_m = a.pos.distance_m(node_pos(from_node)?) + b.pos.distance_m(node_pos(to_node)?);

        let distance_m = path.distance_m(&self.graph) + gap_m;
        let duration_s = path.travel_time_s(&self.graph) + gap_m / self.fallback_speed_ms();
        let steps = graph_steps(&self.graph, &path.edges, b);
        Ok((distance_m, duration_s, geometry, steps, LegSource::RoadGraph))
    }
}

type LegParts = (f64, f64, Vec<Coordinate>, Vec<NavigationStep>, LegSource);

// ── Helpers ───────────────────────────────────────────────────────────────────

fn validate(waypoints: &[Waypoint]) -> RouteResult<()> {
    if waypoints.len() < 2 {
        return Err(RouteError::InvalidInput(format!(
            "at least 2 waypoints are required, got {}",
            waypoints.len()
        )));
    }
    let mut seen = std::collections::HashSet::with_capacity(waypoints.len());
    for wp in waypoints {
        if wp.id.trim().is_empty() {
            return Err(RouteError::InvalidInput("waypoint id must not be empty".into()));
        }
        if !seen.insert(wp.id.as_str()) {
            return Err(RouteError::InvalidInput(format!("duplicate waypoint id {:?}", wp.id)));
        }
        Coordinate::try_new(wp.pos.lat, wp.pos.lon)?;
    }
    Ok(())
}

fn is_square(m: &[Vec<f64>], n: usize) -> bool {
    m.len() == n && m.iter().all(|row| row.len() == n && row.iter().all(|v| v.is_finite() && *v >= 0.0))
}

struct TranslatedLeg {
    distance_m: f64,
    duration_s: f64,
    geometry:   Vec<Coordinate>,
    steps:      Vec<NavigationStep>,
}

/// Turn a provider answer into leg parts.  Anything inconsistent is a
/// malformed payload and therefore "unavailable".
fn translate(pr: ProviderRoute, want_steps: bool) -> ProviderResult<TranslatedLeg> {
    if !(pr.distance_m.is_finite() && pr.distance_m >= 0.0 && pr.duration_s.is_finite() && pr.duration_s >= 0.0) {
        return Err(ProviderError::Malformed(format!(
            "invalid totals: {} m, {} s",
            pr.distance_m, pr.duration_s
        )));
    }
    let geometry = polyline::decode(&pr.geometry)?;
    if geometry.is_empty() {
        return Err(ProviderError::Malformed("empty route geometry".into()));
    }

    let mut steps = Vec::new();
    if want_steps {
        for step in pr.legs.into_iter().flat_map(|l| l.steps) {
            let (start, end) = step.way_points;
            if start > end || end >= geometry.len() {
                return Err(ProviderError::Malformed(format!(
                    "step way points {start}..={end} outside geometry of {} points",
                    geometry.len()
                )));
            }
            steps.push(NavigationStep {
                instruction: instruction::normalize(&step.instruction),
                maneuver:    step.maneuver,
                distance_m:  step.distance_m,
                duration_s:  step.duration_s,
                geometry:    geometry[start..=end].to_vec(),
            });
        }
    }

    Ok(TranslatedLeg { distance_m: pr.distance_m, duration_s: pr.duration_s, geometry, steps })
}

/// One step per run of same-named edges, plus an arrival step.
fn graph_steps(graph: &RoadGraph, edges: &[lq_core::EdgeId], dest: &Waypoint) -> Vec<NavigationStep> {
    let mut steps: Vec<NavigationStep> = Vec::new();
    let mut current_road: Option<&str> = None;
    for edge in edges.iter().filter_map(|&e| graph.edge(e)) {
        let shape = match &edge.geometry {
            Some(g) => g.clone(),
            None => [edge.from, edge.to].into_iter().filter_map(|n| graph.node_pos(n).ok()).collect(),
        };
        let same_road = current_road == Some(edge.name.as_str());
        if let Some(last) = steps.last_mut().filter(|_| same_road) {
            last.distance_m += edge.distance_m;
            last.duration_s += edge.travel_time_s;
            last.geometry.extend(shape.into_iter().skip(1));
            continue;
        }
        let road = if edge.name.is_empty() { "the road" } else { edge.name.as_str() };
        let (instruction, maneuver) = if steps.is_empty() {
            (format!("Head out on {road}"), Maneuver::Depart)
        } else {
            (format!("Turn onto {road}"), Maneuver::Turn)
        };
        steps.push(NavigationStep {
            instruction,
            maneuver,
            distance_m: edge.distance_m,
            duration_s: edge.travel_time_s,
            geometry:   shape,
        });
        current_road = Some(edge.name.as_str());
    }
    steps.push(NavigationStep {
        instruction: format!("Arrive at {}", dest.label()),
        maneuver:    Maneuver::Arrive,
        distance_m:  0.0,
        duration_s:  0.0,
        geometry:    vec![dest.pos],
    });
    steps
}
