//! Outbound lookups. Each request runs on its own background thread and
//! reports back to the UI loop over an mpsc channel, tagged with the
//! generation counter that was current when it was spawned; the receiver
//! drops messages whose generation has been superseded.

mod elevation;
mod neo;

use std::env;
use std::sync::mpsc::Sender;
use std::thread;

pub use elevation::{fetch_elevation, FALLBACK_ELEVATION_M};
pub use neo::{fetch_random_neo, NeoSummary, DEFAULT_VELOCITY_KM_S};

/// Sentinel key accepted by the NEO catalog for unauthenticated use
pub const DEMO_KEY: &str = "DEMO_KEY";

const DEFAULT_NEO_URL: &str = "https://api.nasa.gov/neo/rest/v1/neo/browse";
const DEFAULT_ELEVATION_URL: &str = "https://api.open-elevation.com/api/v1/lookup";

/// External service endpoints, resolved once at startup
#[derive(Clone)]
pub struct Endpoints {
    pub neo_url: String,
    pub elevation_url: String,
    /// Key used when the form field is left empty
    pub api_key: String,
}

impl Endpoints {
    pub fn from_env() -> Self {
        Self {
            neo_url: env::var("NEO_API_URL").unwrap_or_else(|_| DEFAULT_NEO_URL.to_string()),
            elevation_url: env::var("ELEVATION_API_URL")
                .unwrap_or_else(|_| DEFAULT_ELEVATION_URL.to_string()),
            api_key: env::var("NASA_API_KEY").unwrap_or_else(|_| DEMO_KEY.to_string()),
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            neo_url: DEFAULT_NEO_URL.to_string(),
            elevation_url: DEFAULT_ELEVATION_URL.to_string(),
            api_key: DEMO_KEY.to_string(),
        }
    }
}

/// A completed lookup delivered back to the UI loop
pub enum LookupMessage {
    Elevation { generation: u64, elevation_m: f64 },
    Neo {
        generation: u64,
        result: Result<NeoSummary, String>,
    },
}

/// Resolve the elevation at a point on a background thread.
/// Failures never surface here; the worker reports the fallback value.
pub fn spawn_elevation_lookup(
    tx: Sender<LookupMessage>,
    generation: u64,
    base_url: String,
    lat: f64,
    lon: f64,
) {
    thread::spawn(move || {
        let elevation_m = fetch_elevation(&base_url, lat, lon);
        // The UI may have shut down; a closed channel is fine
        let _ = tx.send(LookupMessage::Elevation {
            generation,
            elevation_m,
        });
    });
}

/// Fetch a random catalog asteroid on a background thread
pub fn spawn_neo_lookup(tx: Sender<LookupMessage>, generation: u64, base_url: String, api_key: String) {
    thread::spawn(move || {
        let result = fetch_random_neo(&base_url, &api_key).map_err(|e| e.to_string());
        let _ = tx.send(LookupMessage::Neo { generation, result });
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    #[test]
    fn elevation_worker_reports_fallback_on_dead_endpoint() {
        let (tx, rx) = mpsc::channel();
        // Nothing listens on the discard port; the request fails immediately
        spawn_elevation_lookup(tx, 7, "http://127.0.0.1:9".to_string(), 20.0, 78.0);
        match rx.recv_timeout(Duration::from_secs(30)) {
            Ok(LookupMessage::Elevation {
                generation,
                elevation_m,
            }) => {
                assert_eq!(generation, 7);
                assert_eq!(elevation_m, FALLBACK_ELEVATION_M);
            }
            other => panic!("expected elevation message, got {}", match other {
                Ok(_) => "a NEO message",
                Err(_) => "a timeout",
            }),
        }
    }

    #[test]
    fn neo_worker_reports_error_on_dead_endpoint() {
        let (tx, rx) = mpsc::channel();
        spawn_neo_lookup(tx, 3, "http://127.0.0.1:9".to_string(), DEMO_KEY.to_string());
        match rx.recv_timeout(Duration::from_secs(30)) {
            Ok(LookupMessage::Neo { generation, result }) => {
                assert_eq!(generation, 3);
                assert!(result.is_err());
            }
            _ => panic!("expected NEO message"),
        }
    }
}
