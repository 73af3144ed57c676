/// Mean kilometers per degree of latitude (and of longitude at the equator)
pub const KM_PER_DEG: f64 = 111.0;

/// Offset a coordinate by `dist_km` along `bearing` radians (0 = east,
/// π/2 = north) using the equirectangular approximation.
/// Accurate enough for ring rendering below a few thousand kilometers.
#[inline(always)]
pub fn offset_km(lon: f64, lat: f64, dist_km: f64, bearing: f64) -> (f64, f64) {
    // Clamp cos(lat) so polar points don't blow up longitude deltas
    let cos_lat = lat.to_radians().cos().max(0.1);
    let dlat = (dist_km * bearing.sin()) / KM_PER_DEG;
    let dlon = (dist_km * bearing.cos()) / (KM_PER_DEG * cos_lat);
    (lon + dlon, lat + dlat)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn offset_north_moves_latitude_only() {
        let (lon, lat) = offset_km(10.0, 0.0, 111.0, std::f64::consts::FRAC_PI_2);
        assert_relative_eq!(lon, 10.0, epsilon = 1e-9);
        assert_relative_eq!(lat, 1.0, epsilon = 1e-9);
    }

    #[test]
    fn offset_east_shrinks_with_latitude() {
        let (lon_eq, _) = offset_km(0.0, 0.0, 111.0, 0.0);
        let (lon_60, _) = offset_km(0.0, 60.0, 111.0, 0.0);
        assert!(lon_60 > lon_eq, "a fixed distance spans more degrees at 60°N");
    }
}
