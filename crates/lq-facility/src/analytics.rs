//! Portfolio figures for the analytics dashboard.

use crate::model::{ConnectivityTier, Warehouse};

/// Chart-ready series: `labels[i]` pairs with `values[i]`.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Distribution {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl Distribution {
    fn push(&mut self, label: impl Into<String>, value: f64) {
        self.labels.push(label.into());
        self.values.push(value);
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PortfolioSummary {
    pub warehouse_count:       usize,
    pub store_count:           usize,
    pub total_capacity:        f64,
    pub average_capacity:      f64,
    pub average_cost:          f64,
    /// Capacity per warehouse, in input order.
    pub capacity_distribution: Distribution,
    /// Warehouse counts per cost band.
    pub cost_distribution:     Distribution,
    /// Warehouse counts per connectivity tier.
    pub connectivity_analysis: Distribution,
}

/// Upper bounds (exclusive) of the cost bands; the last band is open.
const COST_BANDS: [(f64, &str); 3] =
    [(11_000.0, "< 11,000"), (13_000.0, "11,000 - 12,999"), (15_000.0, "13,000 - 14,999")];
const COST_TOP_BAND: &str = ">= 15,000";

pub fn portfolio_summary(warehouses: &[Warehouse], store_count: usize) -> PortfolioSummary {
    let n = warehouses.len();
    let total_capacity: f64 = warehouses.iter().map(|w| w.capacity).sum();
    let total_cost: f64 = warehouses.iter().map(|w| w.cost).sum();
    let mean = |total: f64| if n == 0 { 0.0 } else { total / n as f64 };

    let mut capacity_distribution = Distribution::default();
    for w in warehouses {
        capacity_distribution.push(w.name.clone(), w.capacity);
    }

    let mut cost_counts = [0usize; COST_BANDS.len() + 1];
    for w in warehouses {
        let band = COST_BANDS.iter().position(|(upper, _)| w.cost < *upper).unwrap_or(COST_BANDS.len());
        cost_counts[band] += 1;
    }
    let mut cost_distribution = Distribution::default();
    for (i, count) in cost_counts.into_iter().enumerate() {
        let label = COST_BANDS.get(i).map_or(COST_TOP_BAND, |(_, l)| *l);
        cost_distribution.push(label, count as f64);
    }

    let mut connectivity_analysis = Distribution::default();
    for tier in ConnectivityTier::ALL {
        let count = warehouses.iter().filter(|w| w.connectivity == tier).count();
        connectivity_analysis.push(tier.as_str(), count as f64);
    }

    PortfolioSummary {
        warehouse_count: n,
        store_count,
        total_capacity,
        average_capacity: mean(total_capacity),
        average_cost: mean(total_cost),
        capacity_distribution,
        cost_distribution,
        connectivity_analysis,
    }
}
