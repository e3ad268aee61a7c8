use std::collections::HashMap;
use std::f64::consts::TAU;

use nalgebra::Point2;

use super::planet::{OrbitParams, Planet};
use crate::math::geometry;

/// Completed revolutions per planet, keyed by name.
#[derive(Debug, Clone, Default)]
pub struct OrbitCounter {
    counts: HashMap<String, u64>,
}

impl OrbitCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> u64 {
        self.counts.get(name).copied().unwrap_or(0)
    }

    fn increment(&mut self, name: &str) {
        match self.counts.get_mut(name) {
            Some(count) => *count += 1,
            None => {
                self.counts.insert(name.to_owned(), 1);
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepOutput {
    pub position: Point2<f64>,
    pub distance: f64,
    pub speed: f64,
}

/// Speed in km/s, derived from the per-frame angular speed.
///
/// Note that this is the body radius, not the orbital radius, over the distance
/// scale. That's how the numbers have always been reported, so it stays.
pub fn orbital_speed(params: &OrbitParams, frames_per_second: f64) -> f64 {
    let m_radius = params.radius / params.distance_scale;
    let angular_velocity_per_second = params.angular_speed * frames_per_second;
    m_radius * angular_velocity_per_second
}

/// How many frames one lap takes. Since the angle restarts from exactly zero
/// on every wrap, this is the same for every lap.
///
/// The angle is a running floating point sum, which can land just short of
/// 2pi after `2pi / omega` frames, so the sum is replayed here exactly as
/// `step` builds it. `None` if the angle never gets to 2pi.
pub fn frames_per_orbit(params: &OrbitParams) -> Option<u64> {
    let omega = params.angular_speed;
    if omega.is_nan() || omega <= 0.0 {
        return None;
    }

    let mut angle = 0.0_f64;
    let mut frames = 0;
    while angle < TAU {
        let next = angle + omega;
        if next == angle {
            return None;
        }
        angle = next;
        frames += 1;
    }
    Some(frames)
}

/// Moves a planet forward one frame.
///
/// The wrap check happens against the angle left over from the previous frame,
/// before any trig. So a planet whose angle lands exactly on 2pi is drawn at 0
/// on the following frame, and that's when its orbit gets counted.
pub fn step(
    planet: &mut Planet,
    counter: &mut OrbitCounter,
    center: &Point2<f64>,
    frames_per_second: f64,
) -> StepOutput {
    if planet.angle() >= TAU {
        planet.set_angle(0.0);
        counter.increment(&planet.name);
    }

    let params = &planet.params;
    let position = geometry::ellipse_point(
        center,
        params.semi_major_axis,
        params.semi_minor_axis,
        planet.angle(),
    );
    let distance = geometry::distance(center, &position);
    let speed = orbital_speed(params, frames_per_second);

    let next_angle = planet.angle() + params.angular_speed;
    planet.set_angle(next_angle);

    StepOutput {
        position,
        distance,
        speed,
    }
}
