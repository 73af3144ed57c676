use std::f64::consts::PI;

const ZOOM_MIN: f64 = 0.5;
const ZOOM_MAX: f64 = 100.0;
const ZOOM_STEP: f64 = 1.5;
/// Web Mercator is undefined at the poles; keep the center away from them
const LAT_LIMIT: f64 = 85.0;

/// Web Mercator normalized y (0 at the north limit, 1 at the south)
fn mercator_y(lat_deg: f64) -> f64 {
    let lat = lat_deg.to_radians();
    (1.0 - (lat.tan() + 1.0 / lat.cos()).ln() / PI) / 2.0
}

/// Web Mercator normalized x (0 at -180°, 1 at +180°)
fn mercator_x(lon_deg: f64) -> f64 {
    (lon_deg + 180.0) / 360.0
}

/// The visible map window: a center coordinate, a zoom factor, and the
/// braille-pixel dimensions of the canvas it projects onto.
#[derive(Clone)]
pub struct Viewport {
    pub center_lon: f64,
    pub center_lat: f64,
    /// Higher is closer; `zoom * width` pixels span the full 360°
    pub zoom: f64,
    /// Canvas width in braille pixels
    pub width: usize,
    /// Canvas height in braille pixels
    pub height: usize,
}

impl Viewport {
    pub fn new(center_lon: f64, center_lat: f64, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center_lon,
            center_lat,
            zoom,
            width,
            height,
        }
    }

    /// Whole-world view centered on the populated latitudes
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(0.0, 20.0, 1.0, width, height)
    }

    fn scale(&self) -> f64 {
        self.zoom * self.width as f64
    }

    /// Project (lon, lat) to canvas pixel coordinates
    pub fn project(&self, lon: f64, lat: f64) -> (i32, i32) {
        let scale = self.scale();
        let px = (mercator_x(lon) - mercator_x(self.center_lon)) * scale + self.width as f64 / 2.0;
        let py = (mercator_y(lat) - mercator_y(self.center_lat)) * scale
            + self.height as f64 / 2.0;
        (px as i32, py as i32)
    }

    /// Inverse of `project`: canvas pixel back to (lon, lat)
    pub fn unproject(&self, px: i32, py: i32) -> (f64, f64) {
        let scale = self.scale();
        let x = (f64::from(px) - self.width as f64 / 2.0) / scale + mercator_x(self.center_lon);
        let y = (f64::from(py) - self.height as f64 / 2.0) / scale + mercator_y(self.center_lat);

        let lon = x * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y)).sinh().atan().to_degrees();
        (lon, lat)
    }

    /// Shift the center by a pixel delta, wrapping longitude
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let deg_per_px = 360.0 / self.scale();
        self.center_lon += f64::from(dx) * deg_per_px;
        // Vertical panning feels about half as fast under Mercator stretch
        self.center_lat -= f64::from(dy) * deg_per_px * 0.5;

        if self.center_lon > 180.0 {
            self.center_lon -= 360.0;
        } else if self.center_lon < -180.0 {
            self.center_lon += 360.0;
        }
        self.center_lat = self.center_lat.clamp(-LAT_LIMIT, LAT_LIMIT);
    }

    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * ZOOM_STEP).min(ZOOM_MAX);
    }

    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / ZOOM_STEP).max(ZOOM_MIN);
    }

    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, ZOOM_STEP);
    }

    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / ZOOM_STEP);
    }

    /// Zoom keeping the coordinate under (px, py) fixed on screen
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        let (lon, lat) = self.unproject(px, py);
        self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, ZOOM_MAX);

        // Pan by however far that point drifted
        let (new_px, new_py) = self.project(lon, lat);
        self.pan(new_px - px, new_py - py);
    }

    /// Point visibility with a small margin for stroke width
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }

    /// Coarse bounding-box rejection for line segments
    pub fn line_might_be_visible(&self, p1: (i32, i32), p2: (i32, i32)) -> bool {
        p1.0.max(p2.0) >= 0
            && p1.0.min(p2.0) < self.width as i32
            && p1.1.max(p2.1) >= 0
            && p1.1.min(p2.1) < self.height as i32
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn project_center() {
        let vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        assert_eq!(vp.project(0.0, 0.0), (50, 50));
    }

    #[test]
    fn pan_moves_center() {
        let mut vp = Viewport::new(0.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon > 0.0);
    }

    #[test]
    fn pan_wraps_longitude() {
        let mut vp = Viewport::new(179.0, 0.0, 1.0, 100, 100);
        vp.pan(10, 0);
        assert!(vp.center_lon < 0.0, "crossed the antimeridian");
    }

    #[test]
    fn zoom_clamps_at_bounds() {
        let mut vp = Viewport::new(0.0, 0.0, 99.0, 100, 100);
        vp.zoom_in();
        vp.zoom_in();
        assert_eq!(vp.zoom, ZOOM_MAX);
    }

    #[test]
    fn unproject_inverts_project() {
        let vp = Viewport::new(78.0, 20.0, 3.0, 400, 200);
        let (px, py) = vp.project(77.2, 28.6);
        let (lon, lat) = vp.unproject(px, py);
        // Pixel quantization allows up to ~1 px of error
        let deg_per_px = 360.0 / (vp.zoom * vp.width as f64);
        assert_relative_eq!(lon, 77.2, epsilon = deg_per_px * 2.0);
        assert_relative_eq!(lat, 28.6, epsilon = deg_per_px * 2.0);
    }
}
