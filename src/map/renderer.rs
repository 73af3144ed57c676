use crate::braille::BrailleCanvas;
use crate::map::geometry::{draw_line, draw_marker, fill_disc_stippled, ring_vertices};
use crate::map::projection::Viewport;
use crate::map::session::{Circle, MapSession};

/// A geographic line (sequence of lon/lat coordinates)
pub type LineString = Vec<(f64, f64)>;

/// Segments used to approximate an overlay circle
const RING_SEGMENTS: usize = 96;

/// Level of detail for map data
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Lod {
    Low,    // 110m - world view
    Medium, // 50m - continental
    High,   // 10m - regional
}

impl Lod {
    /// Select LOD based on zoom level
    pub fn from_zoom(zoom: f64) -> Self {
        if zoom < 2.0 {
            Lod::Low
        } else if zoom < 8.0 {
            Lod::Medium
        } else {
            Lod::High
        }
    }
}

/// Composited frame output: the base map plus one shaded canvas per
/// simulation shape, blitted back-to-front by the UI.
pub struct RenderedMap {
    pub base: BrailleCanvas,
    pub overlays: Vec<(BrailleCanvas, (u8, u8, u8))>,
    /// Impact marker pixel position and label, when one is placed
    pub marker: Option<(i32, i32, String)>,
}

/// Map renderer: multi-resolution base geography plus the session overlay
pub struct MapRenderer {
    coastlines_low: Vec<LineString>,
    coastlines_medium: Vec<LineString>,
    coastlines_high: Vec<LineString>,
    borders_medium: Vec<LineString>,
    borders_high: Vec<LineString>,
}

impl MapRenderer {
    pub fn new() -> Self {
        Self {
            coastlines_low: Vec::new(),
            coastlines_medium: Vec::new(),
            coastlines_high: Vec::new(),
            borders_medium: Vec::new(),
            borders_high: Vec::new(),
        }
    }

    /// Get coastlines for the given LOD, falling back to coarser data
    fn get_coastlines(&self, lod: Lod) -> &Vec<LineString> {
        match lod {
            Lod::High => {
                if !self.coastlines_high.is_empty() {
                    &self.coastlines_high
                } else if !self.coastlines_medium.is_empty() {
                    &self.coastlines_medium
                } else {
                    &self.coastlines_low
                }
            }
            Lod::Medium => {
                if !self.coastlines_medium.is_empty() {
                    &self.coastlines_medium
                } else {
                    &self.coastlines_low
                }
            }
            Lod::Low => &self.coastlines_low,
        }
    }

    fn get_borders(&self, lod: Lod) -> &Vec<LineString> {
        match lod {
            Lod::High => {
                if !self.borders_high.is_empty() {
                    &self.borders_high
                } else {
                    &self.borders_medium
                }
            }
            _ => &self.borders_medium,
        }
    }

    /// Render the base geography and every session shape for this viewport
    pub fn render(&self, session: &MapSession, viewport: &Viewport) -> RenderedMap {
        let chars_w = viewport.width / 2;
        let chars_h = viewport.height / 4;
        let lod = Lod::from_zoom(viewport.zoom);

        let mut base = BrailleCanvas::new(chars_w, chars_h);
        for line in self.get_coastlines(lod) {
            draw_linestring(&mut base, line, viewport);
        }
        for line in self.get_borders(lod) {
            draw_linestring(&mut base, line, viewport);
        }

        let mut overlays = Vec::new();
        for circle in session.circles() {
            let canvas = render_circle(circle, viewport, chars_w, chars_h);
            if !canvas.is_blank() {
                overlays.push((canvas, shade(circle.color, circle.opacity)));
            }
        }

        let marker = session.marker().and_then(|m| {
            let (px, py) = viewport.project(m.lon, m.lat);
            if !viewport.is_visible(px, py) {
                return None;
            }
            let mut canvas = BrailleCanvas::new(chars_w, chars_h);
            draw_marker(&mut canvas, px, py, 3);
            overlays.push((canvas, (255, 255, 255)));
            Some((px, py, m.label.clone()))
        });

        RenderedMap {
            base,
            overlays,
            marker,
        }
    }

    /// Add coastline data at a specific LOD
    pub fn add_coastline(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Low => self.coastlines_low.push(line),
            Lod::Medium => self.coastlines_medium.push(line),
            Lod::High => self.coastlines_high.push(line),
        }
    }

    /// Add border data at a specific LOD
    pub fn add_border(&mut self, line: LineString, lod: Lod) {
        match lod {
            Lod::Medium | Lod::Low => self.borders_medium.push(line),
            Lod::High => self.borders_high.push(line),
        }
    }

    /// Check if any base geography is loaded
    pub fn has_data(&self) -> bool {
        !self.coastlines_low.is_empty()
            || !self.coastlines_medium.is_empty()
            || !self.coastlines_high.is_empty()
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Draw a linestring with viewport culling
fn draw_linestring(canvas: &mut BrailleCanvas, line: &[(f64, f64)], viewport: &Viewport) {
    if line.len() < 2 {
        return;
    }

    let mut prev: Option<(i32, i32)> = None;

    for &(lon, lat) in line {
        let (px, py) = viewport.project(lon, lat);

        if let Some((prev_x, prev_y)) = prev {
            let dist = ((px - prev_x).abs() + (py - prev_y).abs()) as usize;
            if dist < viewport.width && viewport.line_might_be_visible((prev_x, prev_y), (px, py)) {
                draw_line(canvas, prev_x, prev_y, px, py);
            }
        }

        prev = Some((px, py));
    }
}

/// Rasterize one overlay circle: geodesic outline (optionally dashed) plus a
/// hash-stippled interior whose density follows the fill opacity.
fn render_circle(circle: &Circle, viewport: &Viewport, chars_w: usize, chars_h: usize) -> BrailleCanvas {
    let mut canvas = BrailleCanvas::new(chars_w, chars_h);
    let verts = ring_vertices(circle.lon, circle.lat, circle.radius_m, RING_SEGMENTS);

    let mut prev: Option<(i32, i32)> = None;
    for (i, &(vlon, vlat)) in verts.iter().enumerate() {
        let p = viewport.project(vlon, vlat);
        if let Some(pp) = prev {
            // Dashed strokes draw alternate segments
            let in_dash = !circle.dashed || i % 2 == 1;
            let dist = ((p.0 - pp.0).abs() + (p.1 - pp.1).abs()) as usize;
            if in_dash && dist < viewport.width && viewport.line_might_be_visible(pp, p) {
                draw_line(&mut canvas, pp.0, pp.1, p.0, p.1);
            }
        }
        prev = Some(p);
    }

    if circle.fill_opacity > 0.0 {
        let (cx, cy) = viewport.project(circle.lon, circle.lat);
        // Pixel radius from a point one radius due east of center
        let (elon, elat) = crate::geo::offset_km(circle.lon, circle.lat, circle.radius_m / 1000.0, 0.0);
        let (ex, ey) = viewport.project(elon, elat);
        let dx = f64::from(ex - cx);
        let dy = f64::from(ey - cy);
        let radius_px = (dx * dx + dy * dy).sqrt() as i32;
        fill_disc_stippled(&mut canvas, cx, cy, radius_px, circle.fill_opacity);
    }

    canvas
}

/// Scale a color by opacity, with a faint floor so fading rings stay legible
fn shade(color: (u8, u8, u8), opacity: f64) -> (u8, u8, u8) {
    let s = 0.15 + 0.85 * opacity.clamp(0.0, 1.0);
    (
        (f64::from(color.0) * s) as u8,
        (f64::from(color.1) * s) as u8,
        (f64::from(color.2) * s) as u8,
    )
}
