use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const WHITE: Color = Color(255, 255, 255);

    /// Components scaled to [0, 1], the way kiss3d and plotters want them.
    pub fn to_unit_rgb(self) -> [f32; 3] {
        [
            self.0 as f32 / 255.0,
            self.1 as f32 / 255.0,
            self.2 as f32 / 255.0,
        ]
    }
}

// All the immutable info about a planet's path and body.
// Lengths are in screen pixels; `distance_scale` converts pixels back to km.
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitParams {
    pub semi_major_axis: f64,
    pub semi_minor_axis: f64,
    pub radius: f64,
    pub distance_scale: f64,
    pub angular_speed: f64,
    pub color: Color,
}

#[derive(Debug, Clone)]
pub struct Planet {
    pub name: String,
    pub params: OrbitParams,
    angle: f64,
}

impl Planet {
    pub fn new(name: impl Into<String>, params: OrbitParams, initial_angle: f64) -> Self {
        Planet {
            name: name.into(),
            params,
            angle: initial_angle,
        }
    }

    pub fn angle(&self) -> f64 {
        self.angle
    }

    // Only the stepper moves planets.
    pub(super) fn set_angle(&mut self, angle: f64) {
        self.angle = angle;
    }

    /// Real-world distance in kilometers for a screen-space distance.
    pub fn real_distance_km(&self, screen_distance: f64) -> f64 {
        screen_distance / self.params.distance_scale
    }
}
