//! Route request and result types.

use lq_core::{Coordinate, NodeId};

// ── Waypoint ──────────────────────────────────────────────────────────────────

/// A stop supplied by the caller.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Waypoint {
    pub id:   String,
    pub pos:  Coordinate,
    pub name: Option<String>,
}

impl Waypoint {
    pub fn new(id: impl Into<String>, pos: Coordinate) -> Self {
        Self { id: id.into(), pos, name: None }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Display name, falling back to the id.
    pub fn label(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }
}

// ── Steps ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Maneuver {
    Depart,
    Continue,
    Turn,
    Arrive,
    /// Provider-specific maneuver kept verbatim (roundabout, ferry, …).
    Other(String),
}

/// One turn-by-turn instruction.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NavigationStep {
    /// Plain text; never empty.
    pub instruction: String,
    pub maneuver:    Maneuver,
    pub distance_m:  f64,
    pub duration_s:  f64,
    /// The part of the leg geometry this step covers.
    pub geometry:    Vec<Coordinate>,
}

// ── Legs & routes ─────────────────────────────────────────────────────────────

/// Where a leg's geometry and timing came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum LegSource {
    /// Road-following result from the external provider.
    Provider,
    /// Provider unavailable: geodesic straight line at the fallback speed.
    StraightLine,
    /// Provider unavailable: shortest path over the in-memory road graph.
    RoadGraph,
}

impl LegSource {
    pub fn is_fallback(self) -> bool {
        !matches!(self, LegSource::Provider)
    }
}

/// The computed path between two consecutive waypoints.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RouteLeg {
    /// Waypoint ids.
    pub from:       String,
    pub to:         String,
    /// Road-graph nodes the waypoints were matched to.
    pub from_node:  NodeId,
    pub to_node:    NodeId,
    pub distance_m: f64,
    pub duration_s: f64,
    pub geometry:   Vec<Coordinate>,
    pub steps:      Vec<NavigationStep>,
    pub source:     LegSource,
}

/// An assembled multi-leg route.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Route {
    /// Waypoint ids in travel order (after optional reordering).
    pub waypoint_order: Vec<String>,
    pub legs:           Vec<RouteLeg>,
    pub distance_m:     f64,
    pub duration_s:     f64,
    /// Leg geometries concatenated in order; shared joints appear once.
    pub geometry:       Vec<Coordinate>,
}

impl Route {
    /// Aggregate legs computed in waypoint order.
    pub fn from_legs(waypoint_order: Vec<String>, legs: Vec<RouteLeg>) -> Self {
        let distance_m = legs.iter().map(|l| l.distance_m).sum();
        let duration_s = legs.iter().map(|l| l.duration_s).sum();
        let mut geometry: Vec<Coordinate> = Vec::new();
        for leg in &legs {
            for &p in &leg.geometry {
                if geometry.last() != Some(&p) {
                    geometry.push(p);
                }
            }
        }
        Self { waypoint_order, legs, distance_m, duration_s, geometry }
    }

    pub fn distance_km(&self) -> f64 {
        self.distance_m / 1_000.0
    }

    pub fn fallback_leg_count(&self) -> usize {
        self.legs.iter().filter(|l| l.source.is_fallback()).count()
    }
}
