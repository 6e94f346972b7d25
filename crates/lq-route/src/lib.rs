//! `lq-route`: multi-leg delivery routes and trip insights.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                |
//! |-----------------|---------------------------------------------------------|
//! | [`model`]       | `Waypoint`, `RouteLeg`, `Route`, `NavigationStep`       |
//! | [`provider`]    | `RouteProvider` trait, `ProviderRoute`, `OfflineProvider` |
//! | [`ors`]         | `OrsProvider` (feature = `"http"` only)                 |
//! | [`polyline`]    | Encoded-polyline codec used by provider geometries      |
//! | [`instruction`] | Markup stripping and defaults for step instructions     |
//! | [`order`]       | `WaypointOrderer` (greedy nearest neighbour)            |
//! | [`assembler`]   | `RouteAssembler`, `RouteOptions`                        |
//! | [`insight`]     | `InsightEngine`, `InsightReport`, vehicle/traffic input |
//! | [`summary`]     | Optional, failure-isolated report summarisation         |
//! | [`error`]       | `RouteError`, `ProviderError`                           |
//!
//! # Failure model
//!
//! A provider failure never fails a request.  The affected leg is rebuilt
//! locally and marked with its [`LegSource`]; only invalid input, an
//! unmatched waypoint, or (with the road-graph fallback) a disconnected pair
//! surfaces as a [`RouteError`].
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                   |
//! |------------|----------------------------------------------------------|
//! | `parallel` | Issue per-leg provider calls concurrently via Rayon.     |
//! | `http`     | Enables the openrouteservice provider (`reqwest`).       |
//! | `serde`    | Derives `Serialize`/`Deserialize` on public types.       |

pub mod assembler;
pub mod error;
pub mod insight;
pub mod instruction;
pub mod model;
pub mod order;
pub mod polyline;
pub mod provider;
pub mod summary;

#[cfg(feature = "http")]
pub mod ors;


pub use assembler::{RouteAssembler, RouteOptions};
pub use error::{ProviderError, ProviderResult, RouteError, RouteResult};
pub use insight::{FuelEfficiency, InsightEngine, InsightReport, TrafficConditions, VehicleProfile};
pub use model::{LegSource, Maneuver, NavigationStep, Route, RouteLeg, Waypoint};
pub use order::WaypointOrderer;
pub use provider::{OfflineProvider, ProviderLeg, ProviderRoute, ProviderStep, RouteProvider};
pub use summary::{ReportSummarizer, TemplateSummarizer, enrich_with_summary};

#[cfg(feature = "http")]
pub use ors::OrsProvider;
