//! Core error type.
//!
//! Sub-crates define their own error enums and wrap `CoreError` as one
//! variant via `#[from]`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid coordinate ({lat}, {lon}): latitude must be in [-90, 90] and longitude in [-180, 180]")]
    InvalidCoordinate { lat: f64, lon: f64 },

    #[error("configuration error: {0}")]
    Config(String),
}

/// Shorthand result type for `lq-core`.
pub type CoreResult<T> = Result<T, CoreError>;
