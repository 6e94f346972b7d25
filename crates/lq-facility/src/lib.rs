//! `lq-facility`: warehouse selection for a set of retail stores.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`model`]       | `Store`, `Warehouse`, `ConnectivityTier`                   |
//! | [`criterion`]   | `Criterion`, `SelectionStrategy` and its four strategies   |
//! | [`optimizer`]   | `FacilityOptimizer`, `OptimizationResult`, `FacilityScore` |
//! | [`cluster`]     | Seeded k-means over normalized store coordinates           |
//! | [`loader`]      | CSV seed loading (`stores.csv`, `warehouses.csv`)          |
//! | [`analytics`]   | `portfolio_summary` for dashboard charts                   |
//! | [`forecast`]    | Rolling-mean demand forecast, shortage analysis            |
//! | [`error`]       | `FacilityError`, `FacilityResult<T>`                       |
//!
//! The optimizer only needs a distance function over coordinates; it never
//! touches the road graph.  Ties between equally scored warehouses always go
//! to the one that appears first in the input.

pub mod analytics;
pub mod cluster;
pub mod criterion;
pub mod error;
pub mod forecast;
pub mod loader;
pub mod model;
pub mod optimizer;

#[cfg(test)]
mod tests;

pub use analytics::{Distribution, PortfolioSummary, portfolio_summary};
pub use criterion::{
    CapacityStrategy, ClusteringStrategy, CostStrategy, Criterion, DistanceStrategy, Metric, SelectionContext,
    SelectionStrategy,
};
pub use error::{FacilityError, FacilityResult};
pub use forecast::{
    DemandOutlook, ForecastPoint, InventoryRecord, SalesRecord, ShortagePeriod, ShortageReport, StockStatus,
    demand_outlook, forecast, forecast_weekly, load_inventory_csv, load_inventory_reader, load_sales_csv,
    load_sales_reader, sales_series, shortage_analysis, store_location_id, warehouse_location_id,
};
pub use loader::{load_stores_csv, load_stores_reader, load_warehouses_csv, load_warehouses_reader};
pub use model::{ConnectivityTier, Store, Warehouse};
pub use optimizer::{ClusterRecommendation, FacilityOptimizer, FacilityScore, OptimizationResult, Selection};
