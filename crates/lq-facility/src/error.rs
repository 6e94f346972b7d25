use thiserror::Error;

use lq_core::CoreError;

#[derive(Debug, Error)]
pub enum FacilityError {
    #[error("invalid optimization request: {0}")]
    InvalidInput(String),

    #[error("no candidate warehouses")]
    NoWarehouses,

    #[error("seed data parse error: {0}")]
    Parse(String),

    #[error("clustering failed: {0}")]
    Clustering(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Core(#[from] CoreError),
}

pub type FacilityResult<T> = Result<T, FacilityError>;
