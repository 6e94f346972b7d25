//! `lq-core`: foundational types for the LocateIQ planning engine.
//!
//! Every other `lq-*` crate depends on this one.  It has no `lq-*`
//! dependencies; externally it uses `geo` for geodesy, `thiserror`, and
//! optional `serde`.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `NodeId`, `EdgeId`, `StoreId`, `WarehouseId`          |
//! | [`geo`]         | `Coordinate`, ellipsoidal and haversine distance      |
//! | [`config`]      | `PlannerConfig` and its per-component sections        |
//! | [`error`]       | `CoreError`, `CoreResult`                             |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod config;
pub mod error;
pub mod geo;
pub mod ids;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{
    FacilityConfig, FallbackStrategy, InsightConfig, PlannerConfig, ProviderConfig, RoutingConfig,
};
pub use error::{CoreError, CoreResult};
pub use geo::Coordinate;
pub use ids::{EdgeId, NodeId, StoreId, WarehouseId};
