//! Closed-form impact physics.
//!
//! Deliberately simplified scaling laws tuned for legible rendering, not
//! scientific accuracy. All functions are pure and total over finite inputs;
//! NaN inputs propagate to NaN outputs (callers validate form input first).

use std::f64::consts::PI;

/// Joules per ton of TNT
pub const TNT_TON_JOULES: f64 = 4.184e9;

/// Kinetic energy in joules of a spherical impactor.
/// Velocity arrives in km/s and is converted to m/s.
pub fn kinetic_energy(diameter_m: f64, velocity_km_s: f64, density_kg_m3: f64) -> f64 {
    let v = velocity_km_s * 1000.0;
    let mass = (4.0 / 3.0) * PI * (diameter_m / 2.0).powi(3) * density_kg_m3;
    0.5 * mass * v * v
}

/// Crater diameter in meters from impact energy (E^0.25 / 100 scaling)
pub fn crater_diameter(energy_j: f64) -> f64 {
    energy_j.powf(0.25) / 100.0
}

/// Impact energy expressed in tons of TNT
pub fn tnt_equivalent_tons(energy_j: f64) -> f64 {
    energy_j / TNT_TON_JOULES
}

/// Equivalent seismic magnitude, rounded to one decimal
pub fn seismic_magnitude(energy_j: f64) -> f64 {
    let magnitude = energy_j.log10() / 1.5 - 5.0;
    (magnitude * 10.0).round() / 10.0
}

/// Initial tsunami wave produced by an oceanic impact
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TsunamiWave {
    pub height_m: f64,
    pub radius_m: f64,
}

/// Wave height scales with impactor size and speed; the affected radius is
/// 100 km per meter of wave height.
pub fn tsunami_wave(diameter_m: f64, velocity_km_s: f64) -> TsunamiWave {
    let height_m = (diameter_m / 100.0) * (velocity_km_s / 10.0);
    TsunamiWave {
        height_m,
        radius_m: height_m * 100_000.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn magnitude_of_petajoule_impact() {
        // log10(1e15)/1.5 - 5 = 5.0
        assert_relative_eq!(seismic_magnitude(1e15), 5.0, epsilon = 1e-9);
    }

    #[test]
    fn reference_tsunami_wave() {
        let wave = tsunami_wave(1000.0, 20.0);
        assert_relative_eq!(wave.height_m, 20.0, epsilon = 1e-9);
        assert_relative_eq!(wave.radius_m, 2_000_000.0, epsilon = 1e-6);
    }

    #[test]
    fn tnt_conversion() {
        assert_relative_eq!(tnt_equivalent_tons(TNT_TON_JOULES), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn nan_propagates() {
        assert!(kinetic_energy(f64::NAN, 20.0, 3000.0).is_nan());
        assert!(crater_diameter(f64::NAN).is_nan());
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Energy grows when any single argument grows.
        #[test]
        fn prop_energy_monotonic_each_argument(
            d in 1.0f64..500.0,
            v in 1.0f64..70.0,
            rho in 500.0f64..8000.0,
            bump in 0.1f64..100.0,
        ) {
            let base = kinetic_energy(d, v, rho);
            prop_assert!(kinetic_energy(d + bump, v, rho) > base);
            prop_assert!(kinetic_energy(d, v + bump, rho) > base);
            prop_assert!(kinetic_energy(d, v, rho + bump) > base);
        }

        /// Crater size composed with energy is monotonic in every input.
        #[test]
        fn prop_crater_monotonic(
            d in 1.0f64..500.0,
            v in 1.0f64..70.0,
            rho in 500.0f64..8000.0,
            bump in 0.1f64..100.0,
        ) {
            let base = crater_diameter(kinetic_energy(d, v, rho));
            prop_assert!(crater_diameter(kinetic_energy(d + bump, v, rho)) > base);
            prop_assert!(crater_diameter(kinetic_energy(d, v + bump, rho)) > base);
            prop_assert!(crater_diameter(kinetic_energy(d, v, rho + bump)) > base);
        }

        /// Magnitude rounds to one decimal, so it is non-decreasing in energy.
        #[test]
        fn prop_magnitude_non_decreasing(
            energy in 1e9f64..1e20,
            factor in 1.0f64..1000.0,
        ) {
            prop_assert!(seismic_magnitude(energy * factor) >= seismic_magnitude(energy));
        }
    }
}
