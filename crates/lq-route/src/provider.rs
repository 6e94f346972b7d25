//! Boundary to the external road-routing service.
//!
//! The assembler only sees this trait.  Implementations translate their wire
//! format into [`ProviderRoute`] and report every failure (transport error,
//! timeout, non-2xx status, schema mismatch) as a [`ProviderError`].

use std::sync::Arc;

use lq_core::Coordinate;

use crate::model::Maneuver;
use crate::{ProviderError, ProviderResult};

// ── Provider payload ──────────────────────────────────────────────────────────

/// One maneuver as reported by the provider.
#[derive(Clone, Debug, PartialEq)]
pub struct ProviderStep {
    /// Raw instruction text; may contain markup or be empty.
    pub instruction: String,
    pub maneuver:    Maneuver,
    pub distance_m:  f64,
    pub duration_s:  f64,
    /// Inclusive index range into the decoded route geometry.
    pub way_points:  (usize, usize),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderLeg {
    pub distance_m: f64,
    pub duration_s: f64,
    pub steps:      Vec<ProviderStep>,
}

/// A successful provider answer for an ordered coordinate list.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ProviderRoute {
    pub distance_m: f64,
    pub duration_s: f64,
    /// Encoded polyline, precision 5.
    pub geometry:   String,
    pub legs:       Vec<ProviderLeg>,
}

// ── RouteProvider trait ───────────────────────────────────────────────────────

/// Pluggable external routing service.
///
/// Must be `Send + Sync`: the assembler may call it from several threads at
/// once when the `parallel` feature is enabled.  Implementations carry their
/// own request timeout.
pub trait RouteProvider: Send + Sync {
    /// Road-following route through `coords` in order (at least two).
    fn route(&self, coords: &[Coordinate], want_steps: bool) -> ProviderResult<ProviderRoute>;

    /// Square travel-time matrix in seconds, `matrix[i][j]` from `i` to `j`.
    fn travel_time_matrix(&self, coords: &[Coordinate]) -> ProviderResult<Vec<Vec<f64>>>;
}

impl<P: RouteProvider + ?Sized> RouteProvider for Box<P> {
    fn route(&self, coords: &[Coordinate], want_steps: bool) -> ProviderResult<ProviderRoute> {
        (**self).route(coords, want_steps)
    }

    fn travel_time_matrix(&self, coords: &[Coordinate]) -> ProviderResult<Vec<Vec<f64>>> {
        (**self).travel_time_matrix(coords)
    }
}

impl<P: RouteProvider + ?Sized> RouteProvider for Arc<P> {
    fn route(&self, coords: &[Coordinate], want_steps: bool) -> ProviderResult<ProviderRoute> {
        (**self).route(coords, want_steps)
    }

    fn travel_time_matrix(&self, coords: &[Coordinate]) -> ProviderResult<Vec<Vec<f64>>> {
        (**self).travel_time_matrix(coords)
    }
}

// ── OfflineProvider ───────────────────────────────────────────────────────────

/// A provider that is never available.  Used when no API key is configured;
/// every leg then takes the local fallback.
#[derive(Copy, Clone, Debug, Default)]
pub struct OfflineProvider;

impl RouteProvider for OfflineProvider {
    fn route(&self, _coords: &[Coordinate], _want_steps: bool) -> ProviderResult<ProviderRoute> {
        Err(ProviderError::NotConfigured)
    }

    fn travel_time_matrix(&self, _coords: &[Coordinate]) -> ProviderResult<Vec<Vec<f64>>> {
        Err(ProviderError::NotConfigured)
    }
}
