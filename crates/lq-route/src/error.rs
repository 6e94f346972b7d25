//! Route-subsystem error types.

use thiserror::Error;

use lq_core::CoreError;
use lq_spatial::SpatialError;

/// Why an external provider call produced no usable route.
///
/// Every variant means "provider unavailable": the assembler recovers from
/// all of them identically and only logs the distinction.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("no routing provider configured")]
    NotConfigured,

    #[error("provider request timed out")]
    Timeout,

    #[error("provider request failed: {0}")]
    Transport(String),

    #[error("provider returned status {status}: {message}")]
    Status { status: u16, message: String },

    #[error("malformed provider response: {0}")]
    Malformed(String),
}

pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors surfaced to callers of the route assembler.
#[derive(Debug, Error)]
pub enum RouteError {
    #[error("invalid route request: {0}")]
    InvalidInput(String),

    #[error("invalid waypoint coordinate: {0}")]
    Coordinate(#[from] CoreError),

    #[error("waypoint {waypoint:?} could not be matched to the road graph: {source}")]
    Unmatched {
        waypoint: String,
        #[source]
        source:   SpatialError,
    },

    #[error("no road path for leg {leg} ({from:?} -> {to:?})")]
    NoPath { leg: usize, from: String, to: String },

    #[error("internal routing error: {0}")]
    Internal(String),
}

pub type RouteResult<T> = Result<T, RouteError>;
