//! Trip insights derived from an assembled route.
//!
//! [`InsightEngine::compute`] is pure: the current time is an argument, so
//! the same inputs always produce the same report.

use chrono::{DateTime, TimeDelta, Utc};

use lq_core::InsightConfig;

use crate::model::Route;

const LITERS_PER_US_GALLON: f64 = 3.785_411_784;
const KM_PER_MILE: f64 = 1.609_344;

/// Congestion used when neither traffic data nor a usable speed ratio exists.
const NEUTRAL_CONGESTION: f64 = 0.5;

// ── Inputs ────────────────────────────────────────────────────────────────────

/// Fuel efficiency in whichever unit the caller has.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FuelEfficiency {
    KmPerLiter(f64),
    LitersPer100Km(f64),
    /// US miles per gallon.
    MilesPerGallon(f64),
}

impl FuelEfficiency {
    /// Consumption in litres per km, or `None` when the value is unusable
    /// (zero, negative, non-finite).
    pub fn liters_per_km(self) -> Option<f64> {
        let l = match self {
            FuelEfficiency::KmPerLiter(v) if v > 0.0 => 1.0 / v,
            FuelEfficiency::LitersPer100Km(v) if v >= 0.0 => v / 100.0,
            FuelEfficiency::MilesPerGallon(v) if v > 0.0 => LITERS_PER_US_GALLON / (v * KM_PER_MILE),
            _ => return None,
        };
        l.is_finite().then_some(l)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct VehicleProfile {
    pub efficiency:           Option<FuelEfficiency>,
    pub fuel_price_per_liter: Option<f64>,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TrafficConditions {
    /// Externally measured congestion in `[0, 1]`.  Out-of-range values are
    /// clamped.
    pub congestion_score: Option<f64>,
}

// ── Report ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InsightReport {
    pub eta:                 DateTime<Utc>,
    pub distance_km:         f64,
    pub duration_s:          f64,
    /// Rounded to two decimals.
    pub estimated_fuel_cost: f64,
    pub fuel_liters:         f64,
    /// Always within `[0, 1]`.
    pub congestion_score:    f64,
    pub route_confidence:    bool,
    pub notes:               Vec<String>,
    pub summary:             Option<String>,
}

// ── InsightEngine ─────────────────────────────────────────────────────────────

#[derive(Clone, Debug, Default)]
pub struct InsightEngine {
    config: InsightConfig,
}

impl InsightEngine {
    pub fn new(config: InsightConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &InsightConfig {
        &self.config
    }

    pub fn compute(
        &self,
        route:   &Route,
        vehicle: Option<&VehicleProfile>,
        traffic: Option<&TrafficConditions>,
        now:     DateTime<Utc>,
    ) -> InsightReport {
        let cfg = &self.config;
        let distance_km = route.distance_km();
        let duration_s = route.duration_s;

        let eta = eta(now, duration_s);

        let liters_per_km = vehicle
            .and_then(|v| v.efficiency)
            .and_then(FuelEfficiency::liters_per_km)
            .unwrap_or(cfg.default_liters_per_100km / 100.0);
        let price = vehicle
            .and_then(|v| v.fuel_price_per_liter)
            .filter(|p| p.is_finite() && *p >= 0.0)
            .unwrap_or(cfg.default_fuel_price_per_liter);
        let fuel_liters = distance_km * liters_per_km;
        let estimated_fuel_cost = round2(fuel_liters * price);

        let measured = traffic.and_then(|t| t.congestion_score);
        let congestion_score = match measured {
            Some(s) if s.is_nan() => NEUTRAL_CONGESTION,
            Some(s) => s.clamp(0.0, 1.0),
            None => self.heuristic_congestion(distance_km, duration_s),
        };

        let route_confidence = distance_km >= cfg.short_route_km;

        let mut notes = Vec::new();
        if !route_confidence {
            notes.push("Very short route: estimates have low confidence".to_string());
        }
        if congestion_score > cfg.high_congestion {
            notes.push("High congestion expected: allow extra time".to_string());
        }
        if distance_km > cfg.long_route_km {
            notes.push("Long route: plan rest breaks for the driver".to_string());
        }
        if measured.is_none() {
            notes.push("No live traffic data: congestion is a heuristic estimate".to_string());
        }
        let fallback = route.fallback_leg_count();
        if fallback > 0 {
            notes.push(format!(
                "{fallback} of {} legs use estimated geometry (routing provider unavailable)",
                route.legs.len()
            ));
        }

        InsightReport {
            eta,
            distance_km,
            duration_s,
            estimated_fuel_cost,
            fuel_liters,
            congestion_score,
            route_confidence,
            notes,
            summary: None,
        }
    }

    /// Compare actual travel time with the time at the baseline speed.
    ///
    /// * more than 1.5× slower: rises with the ratio, capped at 0.8
    /// * faster than 0.8×: 0.2
    /// * otherwise: 0.5
    fn heuristic_congestion(&self, distance_km: f64, duration_s: f64) -> f64 {
        let expected_s = distance_km / self.config.baseline_speed_kmh * 3_600.0;
        if !(expected_s > 0.0 && duration_s.is_finite()) {
            return NEUTRAL_CONGESTION;
        }
        let ratio = duration_s / expected_s;
        let score = if ratio > 1.5 {
            (NEUTRAL_CONGESTION * ratio / 1.5).min(0.8)
        } else if ratio < 0.8 {
            0.2
        } else {
            NEUTRAL_CONGESTION
        };
        score.clamp(0.0, 1.0)
    }
}

fn eta(now: DateTime<Utc>, duration_s: f64) -> DateTime<Utc> {
    let secs = if duration_s.is_finite() { duration_s.max(0.0).round() } else { 0.0 };
    // Durations beyond the representable range saturate.
    let delta = TimeDelta::try_seconds(secs.min(i64::MAX as f64 / 1_000.0) as i64).unwrap_or(TimeDelta::MAX);
    now.checked_add_signed(delta).unwrap_or(DateTime::<Utc>::MAX_UTC)
}

#[inline]
fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}
