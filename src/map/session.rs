//! The map session owns everything a simulation draws: the single impact
//! marker, the tracked circles, and the animations mutating them. Clearing
//! the session removes the shapes *and* cancels their animations, so no
//! timer outlives the layer it was mutating.

use std::time::Instant;

use crate::map::animate::{Animation, Step};

/// Stroke color of impact shapes
pub const IMPACT_RED: (u8, u8, u8) = (255, 60, 60);
/// Stroke color of the outer blast circle and earthquake rings
pub const BLAST_ORANGE: (u8, u8, u8) = (255, 123, 0);
/// Stroke color of tsunami wave fronts
pub const WAVE_BLUE: (u8, u8, u8) = (0, 91, 255);

/// A labeled point marker; at most one exists per session
#[derive(Clone)]
pub struct Marker {
    pub lon: f64,
    pub lat: f64,
    pub label: String,
}

/// A drawn map circle with Leaflet-style styling
#[derive(Clone)]
pub struct Circle {
    pub lon: f64,
    pub lat: f64,
    pub radius_m: f64,
    pub color: (u8, u8, u8),
    /// Stroke opacity, 0..=1
    pub opacity: f64,
    /// Interior stipple opacity; 0 renders an outline only
    pub fill_opacity: f64,
    pub dashed: bool,
}

#[derive(Default)]
pub struct MapSession {
    marker: Option<Marker>,
    circles: Vec<(u64, Circle)>,
    animations: Vec<Animation>,
    next_id: u64,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place (or replace) the impact marker
    pub fn set_marker(&mut self, lon: f64, lat: f64, label: &str) {
        self.marker = Some(Marker {
            lon,
            lat,
            label: label.to_string(),
        });
    }

    pub fn marker(&self) -> Option<&Marker> {
        self.marker.as_ref()
    }

    /// Add a circle to the tracked layer set, returning its id for animation
    pub fn add_circle(&mut self, circle: Circle) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.circles.push((id, circle));
        id
    }

    pub fn circles(&self) -> impl Iterator<Item = &Circle> {
        self.circles.iter().map(|(_, c)| c)
    }

    pub fn circle_count(&self) -> usize {
        self.circles.len()
    }

    pub fn animation_count(&self) -> usize {
        self.animations.len()
    }

    /// Start a pulse animation on a new circle at the impact point
    pub fn spawn_pulse(&mut self, lon: f64, lat: f64, now: Instant) {
        let id = self.add_circle(Circle {
            lon,
            lat,
            radius_m: 10_000.0,
            color: IMPACT_RED,
            opacity: 1.0,
            fill_opacity: 0.6,
            dashed: false,
        });
        self.animations.push(Animation::pulse(id, now));
    }

    /// Animate an existing circle as an expanding ring
    pub fn animate_ring(&mut self, circle_id: u64, now: Instant) {
        self.animations.push(Animation::expanding_ring(circle_id, now));
    }

    /// Remove the marker, every tracked circle, and every running animation.
    /// Idempotent; safe to call when nothing is drawn.
    pub fn clear(&mut self) {
        self.marker = None;
        self.circles.clear();
        self.animations.clear();
    }

    /// True when the map is back to its initial empty state
    pub fn is_empty(&self) -> bool {
        self.marker.is_none() && self.circles.is_empty() && self.animations.is_empty()
    }

    /// Step all animations; finished ones remove their circles and themselves
    pub fn tick(&mut self, now: Instant) {
        let Self {
            circles,
            animations,
            ..
        } = self;

        let mut finished: Vec<u64> = Vec::new();
        animations.retain_mut(|anim| {
            let Some((_, circle)) = circles.iter_mut().find(|(id, _)| *id == anim.circle_id) else {
                // Circle already cleared from under the animation
                return false;
            };
            match anim.step(circle, now) {
                Step::Live => true,
                Step::Finished => {
                    finished.push(anim.circle_id);
                    false
                }
            }
        });
        circles.retain(|(id, _)| !finished.contains(id));
    }
}
