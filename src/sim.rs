//! Simulation reports: the pure compute-and-format half of each flow.
//! Flows in `app` build one of these, then draw the matching shapes.

use crate::physics::{self, TsunamiWave};

/// Elevation above which an impact counts as on land (strictly greater)
pub const LAND_ELEVATION_M: f64 = 20.0;

/// Crater/blast simulation outcome
pub struct ImpactReport {
    pub diameter_m: f64,
    pub velocity_km_s: f64,
    pub energy_j: f64,
    pub crater_m: f64,
}

impl ImpactReport {
    pub fn new(diameter_m: f64, velocity_km_s: f64, density_kg_m3: f64) -> Self {
        let energy_j = physics::kinetic_energy(diameter_m, velocity_km_s, density_kg_m3);
        Self {
            diameter_m,
            velocity_km_s,
            energy_j,
            crater_m: physics::crater_diameter(energy_j),
        }
    }

    pub fn summary(&self) -> Vec<String> {
        vec![
            "Impact Simulation".to_string(),
            format!("Diameter: {} m", self.diameter_m),
            format!("Velocity: {} km/s", self.velocity_km_s),
            format!(
                "Energy: {:.2e} tons TNT",
                physics::tnt_equivalent_tons(self.energy_j)
            ),
            format!("Crater Diameter: {:.1} m", self.crater_m),
        ]
    }
}

/// Seismic simulation outcome
pub struct QuakeReport {
    pub magnitude: f64,
}

impl QuakeReport {
    pub fn new(diameter_m: f64, velocity_km_s: f64, density_kg_m3: f64) -> Self {
        let energy_j = physics::kinetic_energy(diameter_m, velocity_km_s, density_kg_m3);
        Self {
            magnitude: physics::seismic_magnitude(energy_j),
        }
    }

    pub fn summary(&self) -> Vec<String> {
        vec![
            "Earthquake Simulation".to_string(),
            format!("Magnitude: M {:.1}", self.magnitude),
            "Seismic shockwaves expanding outward...".to_string(),
        ]
    }
}

/// Tsunami simulation outcome, resolved once the elevation lookup returns
pub enum TsunamiReport {
    Waves {
        height_m: f64,
        radius_m: f64,
        elevation_m: f64,
    },
    /// Impact point sits above the land threshold; nothing is drawn
    OnLand { elevation_m: f64 },
}

impl TsunamiReport {
    pub fn resolve(wave: TsunamiWave, elevation_m: f64) -> Self {
        if elevation_m > LAND_ELEVATION_M {
            TsunamiReport::OnLand { elevation_m }
        } else {
            TsunamiReport::Waves {
                height_m: wave.height_m,
                radius_m: wave.radius_m,
                elevation_m,
            }
        }
    }

    pub fn summary(&self) -> Vec<String> {
        match *self {
            TsunamiReport::Waves {
                height_m,
                radius_m,
                elevation_m,
            } => vec![
                "Tsunami Simulation".to_string(),
                format!("Wave Height: {height_m:.1} m"),
                format!("Wave Radius: {:.1} km", radius_m / 1000.0),
                format!("Elevation: {elevation_m:.1} m"),
            ],
            TsunamiReport::OnLand { elevation_m } => vec![
                "Tsunami Simulation".to_string(),
                "No tsunami generated - impact occurred on land.".to_string(),
                format!("Elevation: {elevation_m:.1} m"),
            ],
        }
    }
}
