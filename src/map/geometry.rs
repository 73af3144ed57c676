use std::f64::consts::TAU;

use crate::braille::BrailleCanvas;
use crate::geo;
use crate::hash::{hash2, rand_simple};

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a point marker (small cross)
pub fn draw_marker(canvas: &mut BrailleCanvas, x: i32, y: i32, size: i32) {
    for i in -size..=size {
        canvas.set_pixel_signed(x + i, y);
        canvas.set_pixel_signed(x, y + i);
    }
}

/// Vertices of a geodesic circle around (lon, lat) with radius in meters.
/// The ring is closed: first and last vertex coincide.
pub fn ring_vertices(lon: f64, lat: f64, radius_m: f64, segments: usize) -> Vec<(f64, f64)> {
    let radius_km = radius_m / 1000.0;
    (0..=segments)
        .map(|i| {
            let bearing = TAU * i as f64 / segments as f64;
            geo::offset_km(lon, lat, radius_km, bearing)
        })
        .collect()
}

/// Stipple-fill a disc: each interior pixel is lit with probability `density`,
/// hash-dithered so the pattern is stable across frames.
pub fn fill_disc_stippled(canvas: &mut BrailleCanvas, cx: i32, cy: i32, radius_px: i32, density: f64) {
    if density <= 0.0 || radius_px <= 0 {
        return;
    }
    let max_x = canvas.pixel_width() as i32 - 1;
    let max_y = canvas.pixel_height() as i32 - 1;
    let x0 = (cx - radius_px).max(0);
    let x1 = (cx + radius_px).min(max_x);
    let y0 = (cy - radius_px).max(0);
    let y1 = (cy + radius_px).min(max_y);
    let r2 = i64::from(radius_px) * i64::from(radius_px);

    // Full density would merge the braille dots into a solid block; cap it
    let threshold = (density * 0.35).min(1.0);

    for y in y0..=y1 {
        for x in x0..=x1 {
            let dx = i64::from(x - cx);
            let dy = i64::from(y - cy);
            if dx * dx + dy * dy <= r2 && rand_simple(hash2(x as u64, y as u64)) < threshold {
                canvas.set_pixel(x as usize, y as usize);
            }
        }
    }
}
