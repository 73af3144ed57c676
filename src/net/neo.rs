use std::time::Duration;

use anyhow::{anyhow, Result};
use serde::Deserialize;

use crate::hash::rand_simple;

/// Assumed approach velocity when the catalog entry has no close-approach data
pub const DEFAULT_VELOCITY_KM_S: f64 = 20.0;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// One asteroid reduced to the inputs the simulation needs
#[derive(Debug, Clone, PartialEq)]
pub struct NeoSummary {
    pub name: String,
    pub diameter_m: f64,
    pub velocity_km_s: f64,
}

#[derive(Debug, Deserialize)]
struct BrowsePage {
    near_earth_objects: Vec<NeoEntry>,
}

#[derive(Debug, Deserialize)]
struct NeoEntry {
    name: String,
    estimated_diameter: EstimatedDiameter,
    #[serde(default)]
    close_approach_data: Vec<CloseApproach>,
}

#[derive(Debug, Deserialize)]
struct EstimatedDiameter {
    meters: DiameterRange,
}

#[derive(Debug, Deserialize)]
struct DiameterRange {
    estimated_diameter_min: f64,
    estimated_diameter_max: f64,
}

#[derive(Debug, Deserialize)]
struct CloseApproach {
    relative_velocity: RelativeVelocity,
}

#[derive(Debug, Deserialize)]
struct RelativeVelocity {
    // The catalog serializes velocities as strings
    kilometers_per_second: String,
}

/// Fetch one page of the NEO catalog and pick an asteroid at random
pub fn fetch_random_neo(base_url: &str, api_key: &str) -> Result<NeoSummary> {
    let client = reqwest::blocking::Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .build()?;
    let url = format!("{base_url}?api_key={api_key}");
    let page: BrowsePage = client.get(&url).send()?.error_for_status()?.json()?;

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos() as u64 ^ d.as_secs())
        .unwrap_or(0);
    pick_from_page(&page, seed)
}

/// Uniform random pick from the page, reduced to a summary
fn pick_from_page(page: &BrowsePage, seed: u64) -> Result<NeoSummary> {
    if page.near_earth_objects.is_empty() {
        return Err(anyhow!("NEO catalog page was empty"));
    }
    let index = (rand_simple(seed) * page.near_earth_objects.len() as f64) as usize;
    let entry = &page.near_earth_objects[index.min(page.near_earth_objects.len() - 1)];
    Ok(summarize(entry))
}

fn summarize(entry: &NeoEntry) -> NeoSummary {
    let meters = &entry.estimated_diameter.meters;
    let diameter_m = (meters.estimated_diameter_min + meters.estimated_diameter_max) / 2.0;
    let velocity_km_s = entry
        .close_approach_data
        .first()
        .and_then(|a| a.relative_velocity.kilometers_per_second.parse::<f64>().ok())
        .unwrap_or(DEFAULT_VELOCITY_KM_S);
    NeoSummary {
        name: entry.name.clone(),
        diameter_m,
        velocity_km_s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn fixture_page() -> BrowsePage {
        let raw = r#"{
            "near_earth_objects": [
                {
                    "name": "433 Eros",
                    "estimated_diameter": {
                        "meters": {
                            "estimated_diameter_min": 15000.0,
                            "estimated_diameter_max": 17000.0
                        }
                    },
                    "close_approach_data": [
                        { "relative_velocity": { "kilometers_per_second": "5.58" } }
                    ]
                },
                {
                    "name": "719 Albert",
                    "estimated_diameter": {
                        "meters": {
                            "estimated_diameter_min": 2000.0,
                            "estimated_diameter_max": 4000.0
                        }
                    },
                    "close_approach_data": []
                }
            ]
        }"#;
        serde_json::from_str(raw).unwrap()
    }

    #[test]
    fn diameter_is_mean_of_estimates() {
        let page = fixture_page();
        let summary = summarize(&page.near_earth_objects[0]);
        assert_relative_eq!(summary.diameter_m, 16000.0);
        assert_relative_eq!(summary.velocity_km_s, 5.58);
        assert_eq!(summary.name, "433 Eros");
    }

    #[test]
    fn missing_close_approach_defaults_velocity() {
        let page = fixture_page();
        let summary = summarize(&page.near_earth_objects[1]);
        assert_relative_eq!(summary.velocity_km_s, DEFAULT_VELOCITY_KM_S);
    }

    #[test]
    fn pick_stays_in_bounds_for_any_seed() {
        let page = fixture_page();
        for seed in [0u64, 1, 12345, u64::MAX] {
            let summary = pick_from_page(&page, seed).unwrap();
            assert!(summary.name == "433 Eros" || summary.name == "719 Albert");
        }
    }

    #[test]
    fn empty_page_is_an_error() {
        let page: BrowsePage = serde_json::from_str(r#"{"near_earth_objects":[]}"#).unwrap();
        assert!(pick_from_page(&page, 42).is_err());
    }

    #[test]
    fn unparseable_velocity_falls_back() {
        let raw = r#"{
            "name": "bogus",
            "estimated_diameter": { "meters": {
                "estimated_diameter_min": 10.0, "estimated_diameter_max": 30.0 } },
            "close_approach_data": [
                { "relative_velocity": { "kilometers_per_second": "not-a-number" } }
            ]
        }"#;
        let entry: NeoEntry = serde_json::from_str(raw).unwrap();
        let summary = summarize(&entry);
        assert_relative_eq!(summary.velocity_km_s, DEFAULT_VELOCITY_KM_S);
    }
}
