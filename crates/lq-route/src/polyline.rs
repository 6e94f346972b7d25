//! Encoded polyline codec (Google polyline algorithm, precision 5).
//!
//! Each value is the delta from the previous point, scaled by 1e5, zig-zag
//! encoded and emitted as 5-bit chunks offset by 63.  Points are stored
//! latitude first.

use lq_core::Coordinate;

use crate::{ProviderError, ProviderResult};

const FACTOR: f64 = 1e5;

/// Decode a precision-5 polyline.
///
/// Truncated strings, bytes outside the alphabet, and chunk runs longer than
/// an `i64` can hold are reported as [`ProviderError::Malformed`].
pub fn decode(encoded: &str) -> ProviderResult<Vec<Coordinate>> {
    let bytes = encoded.as_bytes();
    let mut points = Vec::new();
    let mut pos = 0usize;
    let mut lat: i64 = 0;
    let mut lon: i64 = 0;

    while pos < bytes.len() {
        lat += next_value(bytes, &mut pos)?;
        lon += next_value(bytes, &mut pos)?;
        points.push(Coordinate::new(lat as f64 / FACTOR, lon as f64 / FACTOR));
    }
    Ok(points)
}

fn next_value(bytes: &[u8], pos: &mut usize) -> ProviderResult<i64> {
    let mut result: i64 = 0;
    let mut shift = 0u32;
    loop {
        let Some(&byte) = bytes.get(*pos) else {
            return Err(ProviderError::Malformed("truncated polyline".into()));
        };
        *pos += 1;
        if !(63..=126).contains(&byte) {
            return Err(ProviderError::Malformed(format!(
                "invalid polyline byte {byte:#04x} at offset {}",
                *pos - 1
            )));
        }
        if shift > 55 {
            return Err(ProviderError::Malformed("polyline value overflow".into()));
        }
        let chunk = i64::from(byte - 63);
        result |= (chunk & 0x1f) << shift;
        shift += 5;
        if chunk < 0x20 {
            break;
        }
    }
    Ok(if result & 1 != 0 { !(result >> 1) } else { result >> 1 })
}

/// Encode coordinates as a precision-5 polyline.
pub fn encode(points: &[Coordinate]) -> String {
    let mut out = String::new();
    let mut prev_lat: i64 = 0;
    let mut prev_lon: i64 = 0;
    for p in points {
        let lat = (p.lat * FACTOR).round() as i64;
        let lon = (p.lon * FACTOR).round() as i64;
        push_value(&mut out, lat - prev_lat);
        push_value(&mut out, lon - prev_lon);
        prev_lat = lat;
        prev_lon = lon;
    }
    out
}

fn push_value(out: &mut String, delta: i64) {
    let mut v = delta << 1;
    if delta < 0 {
        v = !v;
    }
    while v >= 0x20 {
        out.push(char::from((0x20 | (v & 0x1f)) as u8 + 63));
        v >>= 5;
    }
    out.push(char::from(v as u8 + 63));
}
