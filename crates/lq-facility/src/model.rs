//! Store and warehouse records.
//!
//! Records are immutable seed data.  Anything computed for a particular
//! query (distance sums, utilization) lives in
//! [`FacilityScore`](crate::FacilityScore), never here.

use std::fmt;
use std::str::FromStr;

use lq_core::{Coordinate, StoreId, WarehouseId};

use crate::FacilityError;

/// A retail store: one demand point.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Store {
    pub id:     StoreId,
    pub name:   String,
    pub pos:    Coordinate,
    pub city:   String,
    /// Units of demand.  `None` means "use the configured default".
    pub demand: Option<f64>,
}

/// How well a site is served by major roads.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ConnectivityTier {
    Good,
    Moderate,
    Poor,
}

impl ConnectivityTier {
    pub const ALL: [ConnectivityTier; 3] =
        [ConnectivityTier::Good, ConnectivityTier::Moderate, ConnectivityTier::Poor];

    pub fn as_str(self) -> &'static str {
        match self {
            ConnectivityTier::Good => "Good",
            ConnectivityTier::Moderate => "Moderate",
            ConnectivityTier::Poor => "Poor",
        }
    }
}

impl fmt::Display for ConnectivityTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConnectivityTier {
    type Err = FacilityError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "good" | "excellent" | "high" => Ok(ConnectivityTier::Good),
            "moderate" | "medium" | "average" => Ok(ConnectivityTier::Moderate),
            "poor" | "low" => Ok(ConnectivityTier::Poor),
            other => Err(FacilityError::Parse(format!(
                "invalid connectivity {other:?}: expected \"Good\", \"Moderate\", or \"Poor\""
            ))),
        }
    }
}

/// A candidate warehouse site.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Warehouse {
    pub id:           WarehouseId,
    pub name:         String,
    pub pos:          Coordinate,
    /// Operating cost (rent), same currency as the per-km rate.
    pub cost:         f64,
    /// Units of demand the site can serve.
    pub capacity:     f64,
    pub connectivity: ConnectivityTier,
    pub ownership:    String,
    pub city:         String,
}

impl Warehouse {
    /// `cost ≥ 0`, `capacity > 0`, valid coordinate.
    pub(crate) fn validate(&self) -> Result<(), FacilityError> {
        if !self.pos.is_valid() {
            return Err(FacilityError::InvalidInput(format!(
                "warehouse {} has invalid coordinate {}",
                self.id.0, self.pos
            )));
        }
        if !(self.cost.is_finite() && self.cost >= 0.0) {
            return Err(FacilityError::InvalidInput(format!(
                "warehouse {} has invalid cost {}",
                self.id.0, self.cost
            )));
        }
        if !(self.capacity.is_finite() && self.capacity > 0.0) {
            return Err(FacilityError::InvalidInput(format!(
                "warehouse {} has invalid capacity {}",
                self.id.0, self.capacity
            )));
        }
        Ok(())
    }
}
