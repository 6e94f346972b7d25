//! Geographic coordinate type and distance functions.
//!
//! `Coordinate` stores WGS-84 latitude/longitude as `f64`.  Facility scores
//! sum dozens of distances and report them to two decimals, so single
//! precision is not enough here.
//!
//! [`Coordinate::distance_m`] is the geodesic distance on the WGS-84
//! ellipsoid (Karney's method via `geo::Geodesic`), which converges for every
//! pair including nearly antipodal ones.

use ::geo::{Distance, Geodesic, Haversine, Point};

use crate::{CoreError, CoreResult};

/// A WGS-84 geographic coordinate in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    /// Construct without validation.  Use [`try_new`](Self::try_new) for
    /// values that come from outside the process.
    #[inline]
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Construct and validate: both components finite, latitude in
    /// `[-90, 90]`, longitude in `[-180, 180]`.
    pub fn try_new(lat: f64, lon: f64) -> CoreResult<Self> {
        let c = Self { lat, lon };
        if c.is_valid() {
            Ok(c)
        } else {
            Err(CoreError::InvalidCoordinate { lat, lon })
        }
    }

    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// Geodesic distance in metres on the WGS-84 ellipsoid.
    pub fn distance_m(self, other: Coordinate) -> f64 {
        Geodesic.distance(point(self), point(other))
    }

    /// Geodesic distance in kilometres.
    #[inline]
    pub fn distance_km(self, other: Coordinate) -> f64 {
        self.distance_m(other) / 1_000.0
    }

    /// Great-circle distance in metres on a sphere of mean Earth radius.
    pub fn haversine_m(self, other: Coordinate) -> f64 {
        Haversine.distance(point(self), point(other))
    }
}

impl std::fmt::Display for Coordinate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:.6}, {:.6})", self.lat, self.lon)
    }
}

fn point(c: Coordinate) -> Point<f64> {
    Point::new(c.lon, c.lat)
}
