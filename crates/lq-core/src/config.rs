//! Planner configuration.
//!
//! One section per component.  Every field has a default matching the
//! LocateIQ web dashboard, so `PlannerConfig::default()` is a working
//! configuration.  Applications
//! typically deserialize a JSON file (feature `serde`; missing fields fall
//! back to their defaults) and call [`PlannerConfig::validate`] once at
//! startup.

use crate::{CoreError, CoreResult};

// ── PlannerConfig ─────────────────────────────────────────────────────────────

/// Top-level configuration handed to each component constructor.
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PlannerConfig {
    pub routing:  RoutingConfig,
    pub insight:  InsightConfig,
    pub facility: FacilityConfig,
    pub provider: ProviderConfig,
}

impl PlannerConfig {
    /// Reject values that would make a component divide by zero or produce
    /// meaningless scores.
    pub fn validate(&self) -> CoreResult<()> {
        positive("routing.fallback_speed_kmh", self.routing.fallback_speed_kmh)?;
        positive("routing.default_edge_speed_kmh", self.routing.default_edge_speed_kmh)?;
        positive("insight.baseline_speed_kmh", self.insight.baseline_speed_kmh)?;
        non_negative("insight.default_liters_per_100km", self.insight.default_liters_per_100km)?;
        non_negative("insight.default_fuel_price_per_liter", self.insight.default_fuel_price_per_liter)?;
        non_negative("facility.cost_per_km", self.facility.cost_per_km)?;
        non_negative("facility.demand_per_store", self.facility.demand_per_store)?;
        if self.facility.cluster_count == 0 {
            return Err(CoreError::Config("facility.cluster_count must be at least 1".into()));
        }
        if self.facility.forecast_window == 0 {
            return Err(CoreError::Config("facility.forecast_window must be at least 1".into()));
        }
        if self.facility.forecast_horizon == 0 {
            return Err(CoreError::Config("facility.forecast_horizon must be at least 1".into()));
        }
        if self.provider.timeout_secs == 0 {
            return Err(CoreError::Config("provider.timeout_secs must be at least 1".into()));
        }
        Ok(())
    }
}

fn positive(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v > 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be a positive number, got {v}")))
    }
}

fn non_negative(name: &str, v: f64) -> CoreResult<()> {
    if v.is_finite() && v >= 0.0 {
        Ok(())
    } else {
        Err(CoreError::Config(format!("{name} must be a non-negative number, got {v}")))
    }
}

// ── RoutingConfig ─────────────────────────────────────────────────────────────

/// What the route assembler does with a leg whose provider call failed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FallbackStrategy {
    /// Geodesic straight line at `fallback_speed_kmh`.
    #[default]
    StraightLine,
    /// Shortest path by travel time over the in-memory road graph.  The
    /// stretch from each waypoint to its matched node is added at the
    /// fallback speed.
    RoadGraph,
}

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoutingConfig {
    /// Assumed speed for straight-line fallback legs.  Default: 50 km/h.
    pub fallback_speed_kmh: f64,
    /// Speed used to default an edge's travel time from its length when the
    /// seed data gives none.  Default: 30 km/h.
    pub default_edge_speed_kmh: f64,
    pub fallback: FallbackStrategy,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            fallback_speed_kmh:     50.0,
            default_edge_speed_kmh: 30.0,
            fallback:               FallbackStrategy::StraightLine,
        }
    }
}

// ── InsightConfig ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct InsightConfig {
    /// Free-flow speed the congestion heuristic compares against.
    pub baseline_speed_kmh: f64,
    /// Consumption used when the caller gives no vehicle.  Default: 8 L/100 km.
    pub default_liters_per_100km: f64,
    /// Fuel price used when the caller gives none.  Default: 100 (INR/L).
    pub default_fuel_price_per_liter: f64,
    /// Routes shorter than this are flagged low-confidence.
    pub short_route_km: f64,
    /// Routes longer than this get a rest-break advisory.
    pub long_route_km: f64,
    /// Congestion scores above this get an advisory.
    pub high_congestion: f64,
}

impl Default for InsightConfig {
    fn default() -> Self {
        Self {
            baseline_speed_kmh:           50.0,
            default_liters_per_100km:     8.0,
            default_fuel_price_per_liter: 100.0,
            short_route_km:               0.1,
            long_route_km:                100.0,
            high_congestion:              0.7,
        }
    }
}

// ── FacilityConfig ────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FacilityConfig {
    /// Transport cost per km of summed store distance for the `cost`
    /// criterion.  Default: 50.
    pub cost_per_km: f64,
    /// Demand assumed for a store whose record carries none.  Default: 100.
    pub demand_per_store: f64,
    /// Requested number of clusters for the `clustering` criterion.
    pub cluster_count: usize,
    /// Seed for k-means initialisation.  Same seed, same clusters.
    pub cluster_seed: u64,
    pub max_cluster_iterations: u64,
    /// Trailing observations averaged by the demand forecast.  Default: 4.
    pub forecast_window: usize,
    /// Weekly periods the forecast covers.  Default: 4.
    pub forecast_horizon: usize,
}

impl Default for FacilityConfig {
    fn default() -> Self {
        Self {
            cost_per_km:            50.0,
            demand_per_store:       100.0,
            cluster_count:          3,
            cluster_seed:           42,
            max_cluster_iterations: 300,
            forecast_window:        4,
            forecast_horizon:       4,
        }
    }
}

// ── ProviderConfig ────────────────────────────────────────────────────────────

/// External road-routing provider (openrouteservice-compatible).
#[derive(Clone, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProviderConfig {
    pub base_url: String,
    /// Routing profile path segment, e.g. `driving-car` or `driving-hgv`.
    pub profile: String,
    /// Per-request timeout.  A timed-out leg falls back locally.
    pub timeout_secs: u64,
    /// `None` disables the provider entirely.
    pub api_key: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url:     "https://api.openrouteservice.org".to_string(),
            profile:      "driving-car".to_string(),
            timeout_secs: 10,
            api_key:      None,
        }
    }
}
