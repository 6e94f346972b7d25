//! Warehouse selection for a chosen subset of stores.

use rustc_hash::{FxHashMap, FxHashSet};

use lq_core::{Coordinate, FacilityConfig, StoreId};

use crate::criterion::{Criterion, Metric, SelectionContext};
use crate::model::{Store, Warehouse};
use crate::{FacilityError, FacilityResult};

// ── Results ───────────────────────────────────────────────────────────────────

/// Query-scoped figures for one warehouse against the selected stores.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FacilityScore {
    pub warehouse:            Warehouse,
    /// Σ geodesic km to every selected store.
    pub total_distance_km:    f64,
    /// `warehouse.cost + total_distance_km × cost_per_km`.
    pub total_cost:           f64,
    /// Σ demand of the selected stores.
    pub required_capacity:    f64,
    /// `required_capacity / warehouse.capacity × 100`.
    pub capacity_utilization: f64,
    /// Set when no warehouse could hold the demand and the largest one was
    /// chosen instead.
    pub capacity_relaxed:     bool,
    /// The figure that decided the selection.
    pub metric:               Metric,
}

impl FacilityScore {
    pub(crate) fn compute(
        warehouse: &Warehouse,
        stores:    &[&Store],
        required:  f64,
        config:    &FacilityConfig,
        metric:    Metric,
    ) -> Self {
        let total_distance_km: f64 = stores.iter().map(|s| s.pos.distance_km(warehouse.pos)).sum();
        Self {
            warehouse: warehouse.clone(),
            total_distance_km,
            total_cost: warehouse.cost + total_distance_km * config.cost_per_km,
            required_capacity: required,
            capacity_utilization: required / warehouse.capacity * 100.0,
            capacity_relaxed: false,
            metric,
        }
    }

    /// Value of [`FacilityScore::metric`].
    pub fn metric_value(&self) -> f64 {
        match self.metric {
            Metric::TotalCost => self.total_cost,
            _ => self.total_distance_km,
        }
    }
}

/// One k-means cluster and the warehouse nearest its centroid.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ClusterRecommendation {
    /// Clusters are numbered in order of their first member in the request.
    pub cluster:     usize,
    pub centroid:    Coordinate,
    pub members:     Vec<StoreId>,
    pub warehouse:   Warehouse,
    /// Geodesic km from the centroid to the warehouse.
    pub distance_km: f64,
    pub metric:      Metric,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Selection {
    Single(FacilityScore),
    Clusters(Vec<ClusterRecommendation>),
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OptimizationResult {
    pub criterion: Criterion,
    /// The stores considered, in request order.
    pub stores:    Vec<StoreId>,
    pub selection: Selection,
}

impl OptimizationResult {
    /// The winning score for single-warehouse criteria.
    pub fn best(&self) -> Option<&FacilityScore> {
        match &self.selection {
            Selection::Single(s) => Some(s),
            Selection::Clusters(_) => None,
        }
    }

    /// Per-cluster recommendations; empty for single-warehouse criteria.
    pub fn clusters(&self) -> &[ClusterRecommendation] {
        match &self.selection {
            Selection::Single(_) => &[],
            Selection::Clusters(c) => c,
        }
    }
}

// ── FacilityOptimizer ─────────────────────────────────────────────────────────

/// Immutable store and warehouse sets plus tuning parameters.
///
/// Built once at startup; `optimize` takes `&self` and may be called from
/// many threads.
pub struct FacilityOptimizer {
    stores:      Vec<Store>,
    store_index: FxHashMap<StoreId, usize>,
    warehouses:  Vec<Warehouse>,
    config:      FacilityConfig,
}

impl FacilityOptimizer {
    /// Rejects duplicate store ids, invalid store coordinates, and invalid
    /// warehouse records.
    pub fn new(stores: Vec<Store>, warehouses: Vec<Warehouse>, config: FacilityConfig) -> FacilityResult<Self> {
        let mut store_index = FxHashMap::default();
        store_index.reserve(stores.len());
        for (i, s) in stores.iter().enumerate() {
            if !s.pos.is_valid() {
                return Err(FacilityError::InvalidInput(format!(
                    "store {} has invalid coordinate {}",
                    s.id.0, s.pos
                )));
            }
            if store_index.insert(s.id, i).is_some() {
                return Err(FacilityError::InvalidInput(format!("duplicate store id {}", s.id.0)));
            }
        }
        for w in &warehouses {
            w.validate()?;
        }
        log::info!("facility optimizer ready: {} stores, {} warehouses", stores.len(), warehouses.len());
        Ok(Self { stores, store_index, warehouses, config })
    }

    pub fn stores(&self) -> &[Store] {
        &self.stores
    }

    pub fn warehouses(&self) -> &[Warehouse] {
        &self.warehouses
    }

    pub fn config(&self) -> &FacilityConfig {
        &self.config
    }

    pub fn store(&self, id: StoreId) -> Option<&Store> {
        self.store_index.get(&id).map(|&i| &self.stores[i])
    }

    /// Select warehouse(s) for `store_ids` under `criterion`.
    pub fn optimize(&self, store_ids: &[StoreId], criterion: Criterion) -> FacilityResult<OptimizationResult> {
        if store_ids.is_empty() {
            return Err(FacilityError::InvalidInput("no stores selected".into()));
        }
        if self.warehouses.is_empty() {
            return Err(FacilityError::NoWarehouses);
        }

        let mut seen = FxHashSet::default();
        let mut selected = Vec::with_capacity(store_ids.len());
        for &id in store_ids {
            let store = self
                .store(id)
                .ok_or_else(|| FacilityError::InvalidInput(format!("unknown store id {}", id.0)))?;
            if !seen.insert(id) {
                return Err(FacilityError::InvalidInput(format!("store id {} selected twice", id.0)));
            }
            selected.push(store);
        }

        let ctx = SelectionContext { stores: &selected, warehouses: &self.warehouses, config: &self.config };
        let strategy = criterion.strategy();
        let selection = strategy.select(&ctx)?;

        match &selection {
            Selection::Single(s) => log::debug!(
                "{criterion}: {} stores -> {} ({:?} = {:.2})",
                selected.len(),
                s.warehouse.name,
                s.metric,
                s.metric_value()
            ),
            Selection::Clusters(c) => {
                log::debug!("{criterion}: {} stores -> {} clusters", selected.len(), c.len())
            }
        }

        Ok(OptimizationResult { criterion, stores: store_ids.to_vec(), selection })
    }
}
