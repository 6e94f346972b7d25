//! Selection criteria and their strategies.
//!
//! Each [`Criterion`] maps to one [`SelectionStrategy`].  Dispatch is by
//! enum, so an unknown criterion can only appear at the string boundary
//! ([`Criterion::from_str`]).

use std::fmt;
use std::str::FromStr;

use lq_core::{Coordinate, FacilityConfig};

use crate::cluster;
use crate::model::{Store, Warehouse};
use crate::optimizer::{ClusterRecommendation, FacilityScore, Selection};
use crate::{FacilityError, FacilityResult};

// ── Criterion ─────────────────────────────────────────────────────────────────

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Criterion {
    /// Minimum summed store distance.
    Distance,
    /// Minimum operating cost plus distance-proportional transport cost.
    Cost,
    /// Nearest warehouse that can hold the selected demand.
    Capacity,
    /// One warehouse per k-means cluster of stores.
    Clustering,
}

impl Criterion {
    pub const ALL: [Criterion; 4] =
        [Criterion::Distance, Criterion::Cost, Criterion::Capacity, Criterion::Clustering];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Distance => "distance",
            Criterion::Cost => "cost",
            Criterion::Capacity => "capacity",
            Criterion::Clustering => "clustering",
        }
    }

    /// The metric that decides the winner under this criterion.
    pub fn metric(self) -> Metric {
        match self {
            Criterion::Distance => Metric::TotalDistanceKm,
            Criterion::Cost => Metric::TotalCost,
            Criterion::Capacity => Metric::FeasibleDistanceKm,
            Criterion::Clustering => Metric::CentroidDistanceKm,
        }
    }

    pub fn strategy(self) -> &'static dyn SelectionStrategy {
        match self {
            Criterion::Distance => &DistanceStrategy,
            Criterion::Cost => &CostStrategy,
            Criterion::Capacity => &CapacityStrategy,
            Criterion::Clustering => &ClusteringStrategy,
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = FacilityError;

    /// Accepts the names used by the dashboard, including `ml_clustering`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" => Ok(Criterion::Distance),
            "cost" => Ok(Criterion::Cost),
            "capacity" => Ok(Criterion::Capacity),
            "clustering" | "ml_clustering" | "kmeans" => Ok(Criterion::Clustering),
            other => Err(FacilityError::InvalidInput(format!(
                "unknown criterion {other:?}: expected distance, cost, capacity, or clustering"
            ))),
        }
    }
}

/// What a result was ranked by.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Metric {
    /// Σ geodesic km from the warehouse to every selected store.
    TotalDistanceKm,
    /// `cost + Σkm × cost_per_km`.
    TotalCost,
    /// Σ km, restricted to warehouses whose capacity covers the demand.
    FeasibleDistanceKm,
    /// Geodesic km from a cluster centroid to the warehouse.
    CentroidDistanceKm,
}

// ── Strategy trait ────────────────────────────────────────────────────────────

/// Inputs shared by every strategy.  `stores` is non-empty and
/// `warehouses` is non-empty; the optimizer checks both.
pub struct SelectionContext<'a> {
    pub stores:     &'a [&'a Store],
    pub warehouses: &'a [Warehouse],
    pub config:     &'a FacilityConfig,
}

impl SelectionContext<'_> {
    /// Total demand of the selected stores.
    pub fn required_capacity(&self) -> f64 {
        self.stores
            .iter()
            .map(|s| s.demand.unwrap_or(self.config.demand_per_store))
            .sum()
    }

    fn score(&self, w: &Warehouse, metric: Metric) -> FacilityScore {
        FacilityScore::compute(w, self.stores, self.required_capacity(), self.config, metric)
    }
}

pub trait SelectionStrategy: Send + Sync {
    fn criterion(&self) -> Criterion;

    fn select(&self, ctx: &SelectionContext<'_>) -> FacilityResult<Selection>;
}

/// Item with the smallest key; the first one wins ties.
fn first_min<T>(items: impl IntoIterator<Item = T>, key: impl Fn(&T) -> f64) -> Option<T> {
    let mut best: Option<(T, f64)> = None;
    for item in items {
        let k = key(&item);
        if best.as_ref().is_none_or(|(_, b)| k < *b) {
            best = Some((item, k));
        }
    }
    best.map(|(item, _)| item)
}

fn no_warehouses<T>(o: Option<T>) -> FacilityResult<T> {
    o.ok_or(FacilityError::NoWarehouses)
}

// ── Strategies ────────────────────────────────────────────────────────────────

pub struct DistanceStrategy;

impl SelectionStrategy for DistanceStrategy {
    fn criterion(&self) -> Criterion {
        Criterion::Distance
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> FacilityResult<Selection> {
        let scores = ctx.warehouses.iter().map(|w| ctx.score(w, Metric::TotalDistanceKm));
        let best = no_warehouses(first_min(scores, |s| s.total_distance_km))?;
        Ok(Selection::Single(best))
    }
}

pub struct CostStrategy;

impl SelectionStrategy for CostStrategy {
    fn criterion(&self) -> Criterion {
        Criterion::Cost
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> FacilityResult<Selection> {
        let scores = ctx.warehouses.iter().map(|w| ctx.score(w, Metric::TotalCost));
        let best = no_warehouses(first_min(scores, |s| s.total_cost))?;
        Ok(Selection::Single(best))
    }
}

pub struct CapacityStrategy;

impl SelectionStrategy for CapacityStrategy {
    fn criterion(&self) -> Criterion {
        Criterion::Capacity
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> FacilityResult<Selection> {
        let required = ctx.required_capacity();
        let feasible = ctx.warehouses.iter().filter(|w| w.capacity >= required);
        let scores = feasible.map(|w| ctx.score(w, Metric::FeasibleDistanceKm));

        if let Some(best) = first_min(scores, |s| s.total_distance_km) {
            return Ok(Selection::Single(best));
        }

        // Nothing fits: fall back to the largest site.
        let largest = no_warehouses(first_min(ctx.warehouses.iter(), |w| -w.capacity))?;
        log::warn!(
            "no warehouse can hold {required} units; relaxing to largest site {} ({} units)",
            largest.name,
            largest.capacity
        );
        let mut score = ctx.score(largest, Metric::FeasibleDistanceKm);
        score.capacity_relaxed = true;
        Ok(Selection::Single(score))
    }
}

pub struct ClusteringStrategy;

impl SelectionStrategy for ClusteringStrategy {
    fn criterion(&self) -> Criterion {
        Criterion::Clustering
    }

    fn select(&self, ctx: &SelectionContext<'_>) -> FacilityResult<Selection> {
        let points: Vec<Coordinate> = ctx.stores.iter().map(|s| s.pos).collect();
        let labels = cluster::kmeans_labels(
            &points,
            ctx.config.cluster_count,
            ctx.config.cluster_seed,
            ctx.config.max_cluster_iterations,
        )?;
        let k = labels.iter().max().map_or(0, |&m| m + 1);

        let mut recommendations = Vec::with_capacity(k);
        for cluster in 0..k {
            let members: Vec<&Store> = ctx
                .stores
                .iter()
                .zip(&labels)
                .filter(|(_, l)| **l == cluster)
                .map(|(s, _)| *s)
                .collect();
            let centroid = cluster::centroid(members.iter().map(|s| s.pos));
            let (warehouse, distance_km) = no_warehouses(first_min(
                ctx.warehouses.iter().map(|w| (w, centroid.distance_km(w.pos))),
                |(_, d)| *d,
            ))?;
            recommendations.push(ClusterRecommendation {
                cluster,
                centroid,
                members: members.iter().map(|s| s.id).collect(),
                warehouse: warehouse.clone(),
                distance_km,
                metric: Metric::CentroidDistanceKm,
            });
        }
        Ok(Selection::Clusters(recommendations))
    }
}
