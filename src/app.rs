use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Instant;

use tracing::info;

use crate::map::session::{Circle, MapSession, BLAST_ORANGE, IMPACT_RED, WAVE_BLUE};
use crate::map::{Lod, MapRenderer, Viewport};
use crate::net::{self, Endpoints, LookupMessage};
use crate::physics::{self, TsunamiWave};
use crate::sim::{ImpactReport, QuakeReport, TsunamiReport};

/// Sidebar width in terminal columns (form + results + legend)
pub const SIDEBAR_WIDTH: u16 = 34;

/// Form fields reachable with Tab
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Field {
    Latitude,
    Longitude,
    Diameter,
    Velocity,
    Density,
    ApiKey,
    Deflection,
}

const FIELD_ORDER: [Field; 7] = [
    Field::Latitude,
    Field::Longitude,
    Field::Diameter,
    Field::Velocity,
    Field::Density,
    Field::ApiKey,
    Field::Deflection,
];

/// Editable simulation inputs, kept as raw text until a flow runs
pub struct InputForm {
    pub latitude: String,
    pub longitude: String,
    pub diameter: String,
    pub velocity: String,
    pub density: String,
    /// Display-only, written by the NEO loader
    pub neo_name: String,
    pub api_key: String,
    /// Cosmetic slider, consumed by nothing
    pub deflection_km_s: f64,
}

impl Default for InputForm {
    fn default() -> Self {
        Self {
            latitude: String::new(),
            longitude: String::new(),
            diameter: "100".to_string(),
            velocity: "20".to_string(),
            density: "3000".to_string(),
            neo_name: String::new(),
            api_key: String::new(),
            deflection_km_s: 1.0,
        }
    }
}

/// A tsunami run waiting on its elevation lookup
struct PendingTsunami {
    generation: u64,
    lon: f64,
    lat: f64,
    wave: TsunamiWave,
}

/// Application state: the sole owner of UI state and the map session
pub struct App {
    pub viewport: Viewport,
    pub map_renderer: MapRenderer,
    pub session: MapSession,
    pub form: InputForm,
    pub focus: Option<Field>,
    pub results: Vec<String>,
    pub alert: Option<String>,
    pub should_quit: bool,
    /// Last mouse position for drag tracking
    pub last_mouse: Option<(u16, u16)>,
    /// Current mouse position for cursor marker
    pub mouse_pos: Option<(u16, u16)>,
    endpoints: Endpoints,
    lookup_tx: Sender<LookupMessage>,
    lookup_rx: Receiver<LookupMessage>,
    /// Bumped on every flow start and clear; stale elevation results drop
    sim_generation: u64,
    /// Bumped on every NEO request and on diameter/velocity edits, so a
    /// late catalog response never clobbers user input
    neo_generation: u64,
    pending_tsunami: Option<PendingTsunami>,
}

impl App {
    pub fn new(width: usize, height: usize, endpoints: Endpoints) -> Self {
        // Braille gives 2x4 resolution per character; the map pane loses the
        // sidebar, 2 border columns, and border + status bar rows
        let inner_width = width.saturating_sub(2 + SIDEBAR_WIDTH as usize);
        let inner_height = height.saturating_sub(3);
        let (lookup_tx, lookup_rx) = mpsc::channel();

        Self {
            viewport: Viewport::world(inner_width * 2, inner_height * 4),
            map_renderer: MapRenderer::new(),
            session: MapSession::new(),
            form: InputForm::default(),
            focus: None,
            results: Vec::new(),
            alert: None,
            should_quit: false,
            last_mouse: None,
            mouse_pos: None,
            endpoints,
            lookup_tx,
            lookup_rx,
            sim_generation: 0,
            neo_generation: 0,
            pending_tsunami: None,
        }
    }

    /// Update viewport size when terminal resizes
    pub fn resize(&mut self, width: usize, height: usize) {
        let inner_width = width.saturating_sub(2 + SIDEBAR_WIDTH as usize);
        let inner_height = height.saturating_sub(3);
        self.viewport.width = inner_width * 2;
        self.viewport.height = inner_height * 4;
    }

    // --- map navigation (unchanged terminal-map behavior) ---

    pub fn pan(&mut self, dx: i32, dy: i32) {
        self.viewport.pan(dx, dy);
    }

    pub fn zoom_in(&mut self) {
        self.viewport.zoom_in();
    }

    pub fn zoom_out(&mut self) {
        self.viewport.zoom_out();
    }

    pub fn zoom_in_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::pixel_pos(col, row);
        self.viewport.zoom_in_at(px, py);
    }

    pub fn zoom_out_at(&mut self, col: u16, row: u16) {
        let (px, py) = Self::pixel_pos(col, row);
        self.viewport.zoom_out_at(px, py);
    }

    /// Convert terminal coords to braille pixel coords.
    /// Each cell is 2 pixels wide, 4 tall; the map border is 1 cell.
    fn pixel_pos(col: u16, row: u16) -> (i32, i32) {
        let px = ((col.saturating_sub(1)) as i32) * 2;
        let py = ((row.saturating_sub(1)) as i32) * 4;
        (px, py)
    }

    pub fn handle_drag(&mut self, x: u16, y: u16) {
        if let Some((last_x, last_y)) = self.last_mouse {
            let dx = last_x as i32 - x as i32;
            let dy = last_y as i32 - y as i32;
            // Scale based on zoom: less sensitive when zoomed out
            let scale = if self.viewport.zoom < 2.0 {
                2
            } else if self.viewport.zoom < 4.0 {
                3
            } else {
                4
            };
            self.pan(dx * scale, dy * scale);
        }
        self.last_mouse = Some((x, y));
    }

    pub fn end_drag(&mut self) {
        self.last_mouse = None;
    }

    pub fn set_mouse_pos(&mut self, col: u16, row: u16) {
        self.mouse_pos = Some((col, row));
    }

    /// Mouse position in braille pixel coordinates (for the cursor marker)
    pub fn mouse_pixel_pos(&self) -> Option<(i32, i32)> {
        self.mouse_pos.map(|(col, row)| Self::pixel_pos(col, row))
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn zoom_level(&self) -> String {
        format!("{:.1}x", self.viewport.zoom)
    }

    pub fn center_coords(&self) -> String {
        format!(
            "{:.1}°{}, {:.1}°{}",
            self.viewport.center_lat.abs(),
            if self.viewport.center_lat >= 0.0 { "N" } else { "S" },
            self.viewport.center_lon.abs(),
            if self.viewport.center_lon >= 0.0 { "E" } else { "W" }
        )
    }

    pub fn lod_level(&self) -> &'static str {
        match Lod::from_zoom(self.viewport.zoom) {
            Lod::Low => "110m",
            Lod::Medium => "50m",
            Lod::High => "10m",
        }
    }

    // --- impact point selection ---

    /// Right-click on the map: record the impact point and drop a marker
    pub fn set_impact_point(&mut self, col: u16, row: u16) {
        let (px, py) = Self::pixel_pos(col, row);
        if px >= self.viewport.width as i32 || py >= self.viewport.height as i32 {
            return; // click landed on the sidebar or status bar
        }
        let (lon, lat) = self.viewport.unproject(px, py);
        self.form.latitude = format!("{lat:.3}");
        self.form.longitude = format!("{lon:.3}");
        self.session.set_marker(lon, lat, "Impact Center");
        info!(lat, lon, "impact point selected");
    }

    // --- form editing ---

    pub fn is_editing(&self) -> bool {
        self.focus.is_some()
    }

    pub fn focus_next(&mut self) {
        self.focus = Some(match self.focus {
            None => FIELD_ORDER[0],
            Some(current) => {
                let idx = FIELD_ORDER.iter().position(|f| *f == current).unwrap_or(0);
                FIELD_ORDER[(idx + 1) % FIELD_ORDER.len()]
            }
        });
    }

    pub fn focus_prev(&mut self) {
        self.focus = Some(match self.focus {
            None => FIELD_ORDER[FIELD_ORDER.len() - 1],
            Some(current) => {
                let idx = FIELD_ORDER.iter().position(|f| *f == current).unwrap_or(0);
                FIELD_ORDER[(idx + FIELD_ORDER.len() - 1) % FIELD_ORDER.len()]
            }
        });
    }

    pub fn focus_clear(&mut self) {
        self.focus = None;
    }

    pub fn handle_edit_char(&mut self, c: char) {
        let Some(field) = self.focus else { return };
        if c.is_control() {
            return;
        }
        if matches!(field, Field::Diameter | Field::Velocity) {
            // A user edit supersedes any in-flight catalog response
            self.neo_generation += 1;
        }
        if let Some(text) = self.field_text_mut(field) {
            text.push(c);
        }
    }

    pub fn handle_edit_backspace(&mut self) {
        let Some(field) = self.focus else { return };
        if matches!(field, Field::Diameter | Field::Velocity) {
            self.neo_generation += 1;
        }
        if let Some(text) = self.field_text_mut(field) {
            text.pop();
        }
    }

    /// Left/Right arrows drive the deflection slider when it has focus
    pub fn handle_edit_arrow(&mut self, delta: f64) {
        if self.focus == Some(Field::Deflection) {
            self.form.deflection_km_s = (self.form.deflection_km_s + delta).clamp(0.0, 10.0);
        }
    }

    fn field_text_mut(&mut self, field: Field) -> Option<&mut String> {
        match field {
            Field::Latitude => Some(&mut self.form.latitude),
            Field::Longitude => Some(&mut self.form.longitude),
            Field::Diameter => Some(&mut self.form.diameter),
            Field::Velocity => Some(&mut self.form.velocity),
            Field::Density => Some(&mut self.form.density),
            Field::ApiKey => Some(&mut self.form.api_key),
            Field::Deflection => None,
        }
    }

    // --- simulation flows ---

    fn parse(raw: &str) -> Option<f64> {
        raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Impact point from the form; missing or unparseable coordinates abort
    fn point(&mut self) -> Option<(f64, f64)> {
        match (Self::parse(&self.form.latitude), Self::parse(&self.form.longitude)) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => {
                self.alert = Some("Select an impact point first!".to_string());
                None
            }
        }
    }

    /// Numeric field, or an alert naming the field. Fail-fast choice: invalid
    /// input never reaches the calculators, so NaN never reaches the summary.
    fn numeric(alert: &mut Option<String>, name: &str, raw: &str) -> Option<f64> {
        let parsed = Self::parse(raw);
        if parsed.is_none() {
            *alert = Some(format!("Enter a numeric {name} value!"));
        }
        parsed
    }

    /// Common flow prologue: invalidate stale lookups, wipe prior layers
    fn begin_run(&mut self) {
        self.sim_generation += 1;
        self.pending_tsunami = None;
        self.session.clear();
        self.results.clear();
    }

    pub fn run_impact(&mut self) {
        self.alert = None;
        let Some((lat, lon)) = self.point() else { return };
        let Some(diameter) = Self::numeric(&mut self.alert, "diameter", &self.form.diameter) else {
            return;
        };
        let Some(velocity) = Self::numeric(&mut self.alert, "velocity", &self.form.velocity) else {
            return;
        };
        let Some(density) = Self::numeric(&mut self.alert, "density", &self.form.density) else {
            return;
        };

        self.begin_run();
        self.session.set_marker(lon, lat, "Impact Center");

        let report = ImpactReport::new(diameter, velocity, density);
        self.session.add_circle(Circle {
            lon,
            lat,
            radius_m: report.crater_m * 500.0,
            color: IMPACT_RED,
            opacity: 1.0,
            fill_opacity: 0.4,
            dashed: false,
        });
        self.session.add_circle(Circle {
            lon,
            lat,
            radius_m: report.crater_m * 3000.0,
            color: BLAST_ORANGE,
            opacity: 1.0,
            fill_opacity: 0.2,
            dashed: false,
        });
        self.session.spawn_pulse(lon, lat, Instant::now());

        info!(diameter, velocity, density, energy_j = report.energy_j, "impact simulated");
        self.results = report.summary();
    }

    pub fn run_earthquake(&mut self) {
        self.alert = None;
        let Some((lat, lon)) = self.point() else { return };
        let Some(diameter) = Self::numeric(&mut self.alert, "diameter", &self.form.diameter) else {
            return;
        };
        let Some(velocity) = Self::numeric(&mut self.alert, "velocity", &self.form.velocity) else {
            return;
        };
        let Some(density) = Self::numeric(&mut self.alert, "density", &self.form.density) else {
            return;
        };

        self.begin_run();
        self.session.set_marker(lon, lat, "Seismic Origin");

        let now = Instant::now();
        for i in 1..=4u32 {
            let id = self.session.add_circle(Circle {
                lon,
                lat,
                radius_m: f64::from(i) * 150_000.0,
                color: BLAST_ORANGE,
                opacity: 0.5,
                fill_opacity: 0.0,
                dashed: false,
            });
            self.session.animate_ring(id, now);
        }

        let report = QuakeReport::new(diameter, velocity, density);
        info!(magnitude = report.magnitude, "earthquake simulated");
        self.results = report.summary();
    }

    pub fn run_tsunami(&mut self) {
        self.alert = None;
        let Some((lat, lon)) = self.point() else { return };
        let Some(diameter) = Self::numeric(&mut self.alert, "diameter", &self.form.diameter) else {
            return;
        };
        let Some(velocity) = Self::numeric(&mut self.alert, "velocity", &self.form.velocity) else {
            return;
        };

        self.begin_run();
        self.session.set_marker(lon, lat, "Oceanic Impact Center");

        let wave = physics::tsunami_wave(diameter, velocity);
        self.pending_tsunami = Some(PendingTsunami {
            generation: self.sim_generation,
            lon,
            lat,
            wave,
        });
        net::spawn_elevation_lookup(
            self.lookup_tx.clone(),
            self.sim_generation,
            self.endpoints.elevation_url.clone(),
            lat,
            lon,
        );
        self.results = vec![
            "Tsunami Simulation".to_string(),
            "Looking up elevation at impact point...".to_string(),
        ];
    }

    /// Second half of the tsunami flow, entered when the elevation arrives
    fn finish_tsunami(&mut self, elevation_m: f64) {
        let Some(pending) = self.pending_tsunami.take() else { return };
        let report = TsunamiReport::resolve(pending.wave, elevation_m);

        if let TsunamiReport::Waves { radius_m, .. } = report {
            let now = Instant::now();
            for j in 1..=3u32 {
                let id = self.session.add_circle(Circle {
                    lon: pending.lon,
                    lat: pending.lat,
                    radius_m: f64::from(j) * radius_m,
                    color: WAVE_BLUE,
                    opacity: 0.5,
                    fill_opacity: 0.0,
                    dashed: true,
                });
                self.session.animate_ring(id, now);
            }
        }

        info!(elevation_m, "tsunami resolved");
        self.results = report.summary();
    }

    /// Remove everything a simulation put on screen, including the point
    pub fn clear(&mut self) {
        self.sim_generation += 1;
        self.pending_tsunami = None;
        self.session.clear();
        self.results.clear();
        self.alert = None;
        self.form.latitude.clear();
        self.form.longitude.clear();
    }

    // --- NEO loader ---

    pub fn load_neo(&mut self) {
        self.alert = None;
        self.neo_generation += 1;
        let key = if self.form.api_key.trim().is_empty() {
            self.endpoints.api_key.clone()
        } else {
            self.form.api_key.trim().to_string()
        };
        net::spawn_neo_lookup(
            self.lookup_tx.clone(),
            self.neo_generation,
            self.endpoints.neo_url.clone(),
            key,
        );
    }

    // --- per-frame update ---

    /// Drain finished lookups and advance the animations
    pub fn tick(&mut self, now: Instant) {
        while let Ok(message) = self.lookup_rx.try_recv() {
            match message {
                LookupMessage::Elevation {
                    generation,
                    elevation_m,
                } => {
                    let current = self
                        .pending_tsunami
                        .as_ref()
                        .is_some_and(|p| p.generation == generation);
                    if current {
                        self.finish_tsunami(elevation_m);
                    }
                }
                LookupMessage::Neo { generation, result } => {
                    if generation != self.neo_generation {
                        continue; // superseded by a newer request or a user edit
                    }
                    match result {
                        Ok(neo) => {
                            info!(name = %neo.name, "NEO loaded");
                            self.form.neo_name = neo.name;
                            self.form.diameter = format!("{:.1}", neo.diameter_m);
                            self.form.velocity = format!("{:.1}", neo.velocity_km_s);
                        }
                        Err(err) => {
                            tracing::warn!(error = %err, "NEO load failed");
                            self.alert =
                                Some("Error loading NEO. Try again or use DEMO_KEY.".to_string());
                        }
                    }
                }
            }
        }

        self.session.tick(now);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::net::NeoSummary;

    fn offline_endpoints() -> Endpoints {
        // Discard port: any spawned worker fails fast and no real service is hit
        Endpoints {
            neo_url: "http://127.0.0.1:9/neo".to_string(),
            elevation_url: "http://127.0.0.1:9/elevation".to_string(),
            api_key: net::DEMO_KEY.to_string(),
        }
    }

    fn app_with_point() -> App {
        let mut app = App::new(120, 40, offline_endpoints());
        app.form.latitude = "20.000".to_string();
        app.form.longitude = "78.000".to_string();
        app
    }

    #[test]
    fn simulate_without_point_alerts_and_draws_nothing() {
        let mut app = App::new(120, 40, offline_endpoints());
        app.run_impact();
        assert_eq!(app.alert.as_deref(), Some("Select an impact point first!"));
        assert!(app.session.is_empty());
        assert!(app.results.is_empty());

        app.run_earthquake();
        assert!(app.session.is_empty());
        app.run_tsunami();
        assert!(app.session.is_empty());
    }

    #[test]
    fn non_numeric_diameter_fails_fast() {
        let mut app = app_with_point();
        app.form.diameter = "wide".to_string();
        app.run_impact();
        assert_eq!(app.alert.as_deref(), Some("Enter a numeric diameter value!"));
        assert!(app.session.is_empty());
    }

    #[test]
    fn impact_draws_marker_two_circles_and_pulse() {
        let mut app = app_with_point();
        app.run_impact();
        assert!(app.alert.is_none());
        assert_eq!(app.session.marker().unwrap().label, "Impact Center");
        assert_eq!(app.session.circle_count(), 3); // crater, blast, pulse
        assert_eq!(app.session.animation_count(), 1);
        assert_eq!(app.results[0], "Impact Simulation");
    }

    #[test]
    fn repeated_impacts_never_accumulate_shapes() {
        let mut app = app_with_point();
        app.run_impact();
        app.run_impact();
        assert_eq!(app.session.circle_count(), 3);
        assert_eq!(app.session.animation_count(), 1);
    }

    #[test]
    fn earthquake_draws_four_animated_rings() {
        let mut app = app_with_point();
        app.run_earthquake();
        assert_eq!(app.session.marker().unwrap().label, "Seismic Origin");
        assert_eq!(app.session.circle_count(), 4);
        assert_eq!(app.session.animation_count(), 4);
        assert!(app.results[1].starts_with("Magnitude: M "));
    }

    #[test]
    fn tsunami_below_threshold_draws_three_wave_rings() {
        let mut app = app_with_point();
        app.form.diameter = "1000".to_string();
        app.form.velocity = "20".to_string();
        app.run_tsunami();
        assert_eq!(app.session.marker().unwrap().label, "Oceanic Impact Center");
        assert_eq!(app.session.circle_count(), 0, "waiting on elevation");

        app.finish_tsunami(19.99);
        assert_eq!(app.session.circle_count(), 3);
        assert_eq!(app.session.animation_count(), 3);
        assert_eq!(app.results[1], "Wave Height: 20.0 m");
    }

    #[test]
    fn tsunami_on_land_is_suppressed() {
        for elevation in [20.01, 100.0] {
            let mut app = app_with_point();
            app.run_tsunami();
            app.finish_tsunami(elevation);
            assert_eq!(app.session.circle_count(), 0);
            assert!(app.results[1].contains("on land"));
        }
    }

    #[test]
    fn tsunami_at_exact_threshold_still_produces_waves() {
        let mut app = app_with_point();
        app.run_tsunami();
        app.finish_tsunami(20.0);
        assert_eq!(app.session.circle_count(), 3, "20.0 m is not land (strict >)");
    }

    #[test]
    fn stale_elevation_result_is_dropped() {
        let mut app = app_with_point();
        app.run_tsunami();
        let stale_generation = app.sim_generation;
        app.clear(); // bumps sim_generation, drops the pending run

        app.lookup_tx
            .send(LookupMessage::Elevation {
                generation: stale_generation,
                elevation_m: 0.0,
            })
            .unwrap();
        app.tick(Instant::now());
        assert!(app.session.is_empty());
        assert!(app.results.is_empty());
    }

    #[test]
    fn clear_restores_initial_state() {
        let mut app = app_with_point();
        app.run_earthquake();
        assert!(!app.session.is_empty());

        app.clear();
        assert!(app.session.is_empty());
        assert!(app.results.is_empty());
        assert!(app.alert.is_none());
        assert!(app.form.latitude.is_empty(), "impact point is cleared too");

        // Simulating again now requires a fresh point
        app.run_impact();
        assert_eq!(app.alert.as_deref(), Some("Select an impact point first!"));
    }

    #[test]
    fn neo_response_populates_fields() {
        let mut app = app_with_point();
        app.neo_generation = 4;
        app.lookup_tx
            .send(LookupMessage::Neo {
                generation: 4,
                result: Ok(NeoSummary {
                    name: "433 Eros".to_string(),
                    diameter_m: 16000.0,
                    velocity_km_s: 5.58,
                }),
            })
            .unwrap();
        app.tick(Instant::now());
        assert_eq!(app.form.neo_name, "433 Eros");
        assert_eq!(app.form.diameter, "16000.0");
        assert_eq!(app.form.velocity, "5.6");
    }

    #[test]
    fn stale_neo_response_never_overwrites_user_edits() {
        let mut app = app_with_point();
        app.neo_generation = 1;

        // User edits diameter while the request is in flight
        app.focus = Some(Field::Diameter);
        app.form.diameter.clear();
        app.handle_edit_char('5');
        app.handle_edit_char('0');

        app.lookup_tx
            .send(LookupMessage::Neo {
                generation: 1,
                result: Ok(NeoSummary {
                    name: "late arrival".to_string(),
                    diameter_m: 999.0,
                    velocity_km_s: 9.9,
                }),
            })
            .unwrap();
        app.tick(Instant::now());
        assert_eq!(app.form.diameter, "50", "late response was dropped");
        assert!(app.form.neo_name.is_empty());
    }

    #[test]
    fn failed_neo_load_alerts_and_preserves_fields() {
        let mut app = app_with_point();
        app.neo_generation = 2;
        app.lookup_tx
            .send(LookupMessage::Neo {
                generation: 2,
                result: Err("connection refused".to_string()),
            })
            .unwrap();
        app.tick(Instant::now());
        assert_eq!(app.form.diameter, "100");
        assert!(app.alert.as_deref().unwrap().contains("DEMO_KEY"));
    }

    #[test]
    fn deflection_slider_clamps() {
        let mut app = App::new(120, 40, offline_endpoints());
        app.focus = Some(Field::Deflection);
        for _ in 0..50 {
            app.handle_edit_arrow(0.5);
        }
        assert_eq!(app.form.deflection_km_s, 10.0);
        for _ in 0..50 {
            app.handle_edit_arrow(-0.5);
        }
        assert_eq!(app.form.deflection_km_s, 0.0);
    }

    #[test]
    fn focus_cycles_through_all_fields() {
        let mut app = App::new(120, 40, offline_endpoints());
        assert!(!app.is_editing());
        for expected in FIELD_ORDER {
            app.focus_next();
            assert_eq!(app.focus, Some(expected));
        }
        app.focus_next();
        assert_eq!(app.focus, Some(Field::Latitude), "wraps around");
        app.focus_clear();
        assert!(!app.is_editing());
    }
}
