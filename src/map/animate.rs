//! Interval-driven shape animations.
//!
//! Each animation owns exactly one circle in the session and terminates
//! itself once its opacity floor is reached. The event loop ticks all
//! animations every frame; per-animation `Instant` accumulators keep the
//! 80 ms / 100 ms cadences independent of the frame rate.

use std::time::{Duration, Instant};

use crate::map::session::Circle;

/// Radius growth per animation tick, in meters
const RADIUS_STEP_M: f64 = 20_000.0;
/// Expanding rings disappear once stroke opacity falls to this floor
const RING_MIN_OPACITY: f64 = 0.05;
/// Tolerance for repeated-subtraction float drift at the opacity floors
const OPACITY_EPS: f64 = 1e-9;

#[derive(Clone, Copy)]
enum Kind {
    /// Impact shockwave: fast cadence, fades the fill
    Pulse,
    /// Earthquake / tsunami ring: slower cadence, fades the stroke
    ExpandingRing,
}

/// Whether the animation keeps running after a step
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Step {
    Live,
    /// Terminal state: the owned circle must be removed from the session
    Finished,
}

pub struct Animation {
    pub circle_id: u64,
    kind: Kind,
    next_tick: Instant,
}

impl Animation {
    /// One-shot impact pulse: every 80 ms, +20 km radius, -0.03 fill opacity
    pub fn pulse(circle_id: u64, now: Instant) -> Self {
        Self {
            circle_id,
            kind: Kind::Pulse,
            next_tick: now + Self::interval_for(Kind::Pulse),
        }
    }

    /// Expanding ring: every 100 ms, +20 km radius, -0.01 stroke opacity
    pub fn expanding_ring(circle_id: u64, now: Instant) -> Self {
        Self {
            circle_id,
            kind: Kind::ExpandingRing,
            next_tick: now + Self::interval_for(Kind::ExpandingRing),
        }
    }

    fn interval_for(kind: Kind) -> Duration {
        match kind {
            Kind::Pulse => Duration::from_millis(80),
            Kind::ExpandingRing => Duration::from_millis(100),
        }
    }

    /// Advance the owned circle up to `now`. Several intervals may have
    /// elapsed since the last frame; each one applies a full step.
    pub fn step(&mut self, circle: &mut Circle, now: Instant) -> Step {
        let interval = Self::interval_for(self.kind);
        while now >= self.next_tick {
            self.next_tick += interval;
            circle.radius_m += RADIUS_STEP_M;
            match self.kind {
                Kind::Pulse => {
                    circle.fill_opacity -= 0.03;
                    if circle.fill_opacity <= OPACITY_EPS {
                        return Step::Finished;
                    }
                }
                Kind::ExpandingRing => {
                    circle.opacity -= 0.01;
                    if circle.opacity <= RING_MIN_OPACITY + OPACITY_EPS {
                        return Step::Finished;
                    }
                }
            }
        }
        Step::Live
    }
}
