//! openrouteservice v2 provider over a blocking `reqwest` client.
//!
//! Coordinates are sent `[lon, lat]`.  Directions come back with an encoded
//! polyline (precision 5); matrix durations in seconds.

use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde_json::json;

use lq_core::{Coordinate, ProviderConfig};

use crate::model::Maneuver;
use crate::provider::{ProviderLeg, ProviderRoute, ProviderStep, RouteProvider};
use crate::{ProviderError, ProviderResult};

// ── Wire types ────────────────────────────────────────────────────────────────

#[derive(Deserialize, Debug)]
struct DirectionsResponse {
    #[serde(default)]
    routes: Vec<OrsRoute>,
}

#[derive(Deserialize, Debug)]
struct OrsRoute {
    summary:  OrsSummary,
    geometry: String,
    #[serde(default)]
    segments: Vec<OrsSegment>,
}

#[derive(Deserialize, Debug, Default)]
struct OrsSummary {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
}

#[derive(Deserialize, Debug)]
struct OrsSegment {
    #[serde(default)]
    distance: f64,
    #[serde(default)]
    duration: f64,
    #[serde(default)]
    steps:    Vec<OrsStep>,
}

#[derive(Deserialize, Debug)]
struct OrsStep {
    #[serde(default)]
    distance:    f64,
    #[serde(default)]
    duration:    f64,
    #[serde(rename = "type", default)]
    kind:        u32,
    #[serde(default)]
    instruction: String,
    way_points:  [usize; 2],
}

#[derive(Deserialize, Debug)]
struct MatrixResponse {
    durations: Option<Vec<Vec<Option<f64>>>>,
}

#[derive(Deserialize, Debug)]
struct OrsErrorPayload {
    error: OrsErrorBody,
}

#[derive(Deserialize, Debug)]
#[serde(untagged)]
enum OrsErrorBody {
    Detail { code: u32, message: String },
    Text(String),
}

impl OrsErrorBody {
    fn describe(self) -> String {
        match self {
            OrsErrorBody::Detail { code, message } => format!("code {code}: {message}"),
            OrsErrorBody::Text(t) => t,
        }
    }
}

/// ORS instruction type codes.
fn maneuver(kind: u32) -> Maneuver {
    match kind {
        11 => Maneuver::Depart,
        10 => Maneuver::Arrive,
        6 => Maneuver::Continue,
        0..=5 | 9 | 12 | 13 => Maneuver::Turn,
        7 => Maneuver::Other("roundabout_enter".into()),
        8 => Maneuver::Other("roundabout_exit".into()),
        other => Maneuver::Other(other.to_string()),
    }
}

// ── OrsProvider ───────────────────────────────────────────────────────────────

pub struct OrsProvider {
    client:   Client,
    api_key:  String,
    base_url: String,
    profile:  String,
}

impl OrsProvider {
    /// `NotConfigured` when `config.api_key` is missing or blank.
    pub fn new(config: &ProviderConfig) -> ProviderResult<Self> {
        let api_key = config
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .ok_or(ProviderError::NotConfigured)?
            .to_string();
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| ProviderError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            profile: config.profile.clone(),
        })
    }

    fn post(&self, path: &str, body: &serde_json::Value) -> ProviderResult<String> {
        let url = format!("{}/v2/{}/{}", self.base_url, path, self.profile);
        log::debug!("[ORS] POST {url}");

        let response = self
            .client
            .post(&url)
            .header("Authorization", &self.api_key)
            .json(body)
            .send()
            .map_err(transport)?;

        let status = response.status();
        let text = response.text().map_err(transport)?;
        if !status.is_success() {
            let message = match serde_json::from_str::<OrsErrorPayload>(&text) {
                Ok(payload) => payload.error.describe(),
                Err(_) => {
                    log::debug!("[ORS] unparseable error body: {text}");
                    text
                }
            };
            return Err(ProviderError::Status { status: status.as_u16(), message });
        }
        Ok(text)
    }
}

fn transport(e: reqwest::Error) -> ProviderError {
    if e.is_timeout() {
        ProviderError::Timeout
    } else {
        ProviderError::Transport(e.to_string())
    }
}

fn lon_lat(coords: &[Coordinate]) -> Vec<[f64; 2]> {
    coords.iter().map(|c| [c.lon, c.lat]).collect()
}

impl RouteProvider for OrsProvider {
    fn route(&self, coords: &[Coordinate], want_steps: bool) -> ProviderResult<ProviderRoute> {
        let body = json!({ "coordinates": lon_lat(coords), "instructions": want_steps });
        let text = self.post("directions", &body)?;
        let parsed: DirectionsResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;

        let route = parsed
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| ProviderError::Malformed("no route in success response".into()))?;

        let legs = route
            .segments
            .into_iter()
            .map(|seg| ProviderLeg {
                distance_m: seg.distance,
                duration_s: seg.duration,
                steps:      seg
                    .steps
                    .into_iter()
                    .map(|s| ProviderStep {
                        instruction: s.instruction,
                        maneuver:    maneuver(s.kind),
                        distance_m:  s.distance,
                        duration_s:  s.duration,
                        way_points:  (s.way_points[0], s.way_points[1]),
                    })
                    .collect(),
            })
            .collect();

        Ok(ProviderRoute {
            distance_m: route.summary.distance,
            duration_s: route.summary.duration,
            geometry:   route.geometry,
            legs,
        })
    }

    fn travel_time_matrix(&self, coords: &[Coordinate]) -> ProviderResult<Vec<Vec<f64>>> {
        let body = json!({ "locations": lon_lat(coords), "metrics": ["duration"] });
        let text = self.post("matrix", &body)?;
        let parsed: MatrixResponse =
            serde_json::from_str(&text).map_err(|e| ProviderError::Malformed(e.to_string()))?;
        let rows = parsed
            .durations
            .ok_or_else(|| ProviderError::Malformed("matrix response has no durations".into()))?;

        rows.into_iter()
            .enumerate()
            .map(|(i, row)| {
                row.into_iter()
                    .enumerate()
                    .map(|(j, v)| {
                        v.ok_or_else(|| ProviderError::Malformed(format!("no duration for pair ({i}, {j})")))
                    })
                    .collect()
            })
            .collect()
    }
}
