//! Spatial-subsystem error type.

use thiserror::Error;

use lq_core::{Coordinate, NodeId};

/// Errors produced by `lq-spatial`.
#[derive(Debug, Error)]
pub enum SpatialError {
    #[error("no route from {from} to {to}")]
    NoRoute { from: NodeId, to: NodeId },

    #[error("node {0} not found in graph")]
    NodeNotFound(NodeId),

    #[error("invalid node position ({}, {})", .0.lat, .0.lon)]
    InvalidCoordinate(Coordinate),

    #[error("road graph has no nodes")]
    EmptyGraph,

    #[error("invalid edge weight {value} for {field}: must be finite and non-negative")]
    InvalidWeight { field: &'static str, value: f64 },
}

pub type SpatialResult<T> = Result<T, SpatialError>;
