//! Seeded k-means over store coordinates.
//!
//! Coordinates are z-score normalized per axis before clustering so that
//! latitude and longitude weigh equally.  `k` is capped at the number of
//! distinct points; at that cap every distinct location is its own cluster
//! and k-means is skipped.  Labels are renumbered in order of first
//! appearance so results do not depend on the solver's internal numbering.

use linfa::DatasetBase;
use linfa::prelude::*;
use linfa_clustering::KMeans;
use ndarray::Array2;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use rustc_hash::FxHashMap;

use lq_core::Coordinate;

use crate::{FacilityError, FacilityResult};

/// Cluster label for each point, numbered `0..k` by first appearance.
pub fn kmeans_labels(
    points:    &[Coordinate],
    requested: usize,
    seed:      u64,
    max_iter:  u64,
) -> FacilityResult<Vec<usize>> {
    if points.is_empty() {
        return Err(FacilityError::InvalidInput("cannot cluster an empty store set".into()));
    }
    if requested == 0 {
        return Err(FacilityError::InvalidInput("cluster count must be at least 1".into()));
    }

    let distinct = distinct_labels(points);
    let n_distinct = distinct.iter().max().map_or(0, |&m| m + 1);
    let k = requested.min(n_distinct);

    if k == n_distinct {
        return Ok(distinct);
    }
    if k == 1 {
        return Ok(vec![0; points.len()]);
    }

    let records = normalized(points)?;
    let dataset = DatasetBase::from(records.clone());
    let model = KMeans::params_with_rng(k, SmallRng::seed_from_u64(seed))
        .max_n_iterations(max_iter)
        .fit(&dataset)
        .map_err(|e| FacilityError::Clustering(e.to_string()))?;
    let raw = model.predict(&records);

    Ok(renumber(raw.iter().copied()))
}

/// Arithmetic mean of `points`, in degrees.
pub fn centroid(points: impl IntoIterator<Item = Coordinate>) -> Coordinate {
    let (mut lat, mut lon, mut n) = (0.0, 0.0, 0usize);
    for p in points {
        lat += p.lat;
        lon += p.lon;
        n += 1;
    }
    if n == 0 {
        return Coordinate::new(0.0, 0.0);
    }
    Coordinate::new(lat / n as f64, lon / n as f64)
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// One label per distinct coordinate, by first appearance.
fn distinct_labels(points: &[Coordinate]) -> Vec<usize> {
    let mut ids: FxHashMap<(u64, u64), usize> = FxHashMap::default();
    points
        .iter()
        .map(|p| {
            let next = ids.len();
            *ids.entry((p.lat.to_bits(), p.lon.to_bits())).or_insert(next)
        })
        .collect()
}

fn renumber(raw: impl Iterator<Item = usize>) -> Vec<usize> {
    let mut map: FxHashMap<usize, usize> = FxHashMap::default();
    raw.map(|l| {
        let next = map.len();
        *map.entry(l).or_insert(next)
    })
    .collect()
}

/// `n × 2` matrix of z-scores.  An axis with zero spread is only centred.
fn normalized(points: &[Coordinate]) -> FacilityResult<Array2<f64>> {
    let n = points.len() as f64;
    let (mean_lat, mean_lon) = {
        let c = centroid(points.iter().copied());
        (c.lat, c.lon)
    };
    let spread = |f: fn(&Coordinate) -> f64, mean: f64| {
        let var = points.iter().map(|p| (f(p) - mean).powi(2)).sum::<f64>() / n;
        let sd = var.sqrt();
        if sd > 0.0 { sd } else { 1.0 }
    };
    let sd_lat = spread(|p| p.lat, mean_lat);
    let sd_lon = spread(|p| p.lon, mean_lon);

    let flat: Vec<f64> = points
        .iter()
        .flat_map(|p| [(p.lat - mean_lat) / sd_lat, (p.lon - mean_lon) / sd_lon])
        .collect();
    Array2::from_shape_vec((points.len(), 2), flat).map_err(|e| FacilityError::Clustering(e.to_string()))
}
