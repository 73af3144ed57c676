use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::warn;

/// Substituted when the elevation service cannot be reached or returns
/// garbage, so the tsunami flow can proceed with degraded data
pub const FALLBACK_ELEVATION_M: f64 = 100.0;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Deserialize)]
struct ElevationResponse {
    results: Vec<ElevationResult>,
}

#[derive(Debug, Deserialize)]
struct ElevationResult {
    elevation: f64,
}

/// Ground elevation in meters at (lat, lon). Infallible by contract:
/// any failure is logged and the fallback value is returned.
pub fn fetch_elevation(base_url: &str, lat: f64, lon: f64) -> f64 {
    match try_fetch(base_url, lat, lon) {
        Ok(elevation_m) => elevation_m,
        Err(err) => {
            warn!(lat, lon, error = %err, "elevation lookup failed, using fallback");
            FALLBACK_ELEVATION_M
        }
    }
}

fn try_fetch(base_url: &str, lat: f64, lon: f64) -> Result<f64> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let url = format!("{base_url}?locations={lat},{lon}");
    let response: ElevationResponse = client.get(&url).send()?.error_for_status()?.json()?;
    response
        .results
        .first()
        .map(|r| r.elevation)
        .ok_or_else(|| anyhow!("elevation response contained no results"))
}
