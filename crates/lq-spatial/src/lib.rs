//! `lq-spatial`: road graph, spatial indexing, and shortest paths.
//!
//! # Crate layout
//!
//! | Module      | Contents                                                    |
//! |-------------|-------------------------------------------------------------|
//! | [`index`]   | `SpatialIndex` (R-tree nearest-node lookup)                 |
//! | [`network`] | `RoadGraph` (CSR + index), `RoadGraphBuilder`, `Road`, `Edge` |
//! | [`router`]  | `PathSolver` trait, `Path`, `Weight`, `DijkstraSolver`      |
//! | [`error`]   | `SpatialError`, `SpatialResult<T>`                          |
//!
//! # Lifecycle
//!
//! A graph is populated through [`RoadGraphBuilder`] and frozen by
//! [`RoadGraphBuilder::build`], which also bulk-loads the spatial index.
//! The resulting [`RoadGraph`] has no mutating methods and is `Send + Sync`,
//! so one instance behind an `Arc` serves every request.
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                       |
//! |---------|--------------------------------------------------------------|
//! | `serde` | Derives `Serialize`/`Deserialize` on public value types.     |

pub mod error;
pub mod index;
pub mod network;
pub mod router;


pub use error::{SpatialError, SpatialResult};
pub use index::SpatialIndex;
pub use network::{Edge, Road, RoadGraph, RoadGraphBuilder};
pub use router::{DijkstraSolver, Path, PathSolver, Weight};
