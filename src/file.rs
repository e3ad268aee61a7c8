use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use nalgebra::Point2;
use serde::Deserialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::model::planet::{Color, OrbitParams};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("planet {planet}: {source}")]
    Planet {
        planet: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("planet {planet}: distance_scale must be nonzero")]
    ZeroDistanceScale { planet: String },

    #[error("planet {planet}: {field} = {value} is out of range")]
    InvalidParameter {
        planet: String,
        field: &'static str,
        value: f64,
    },

    #[error("config.{field} is out of range")]
    InvalidSetting { field: &'static str },

    #[error("screen size should look like 1280x720, got {0:?}")]
    ScreenSize(String),
}

#[derive(Debug, Clone)]
pub struct PlanetConfig {
    pub name: String,
    pub params: OrbitParams,
    pub initial_angle: f64,
}

#[derive(Debug, Clone)]
pub struct SimConfig {
    pub screen_size: (u32, u32),
    /// Simulated days per wall-clock second.
    pub time_scale: f64,
    pub fps: u32,
    pub sun_radius: f64,
    pub sun_color: Color,
    /// In file order.
    pub planets: Vec<PlanetConfig>,
}

impl SimConfig {
    /// The sun sits in the middle of the screen, rounded down to whole pixels.
    pub fn center(&self) -> Point2<f64> {
        let (w, h) = self.screen_size;
        Point2::new((w / 2) as f64, (h / 2) as f64)
    }

    pub fn planet(&self, name: &str) -> Option<&PlanetConfig> {
        self.planets
            .iter()
            .find(|p| p.name.to_lowercase() == name.to_lowercase())
    }
}

/// Parses a `WIDTHxHEIGHT` override such as `1920x1080`. Both sides must be
/// nonzero, same as in the file.
pub fn parse_screen_size(text: &str) -> Result<(u32, u32), ConfigError> {
    let invalid = || ConfigError::ScreenSize(text.to_owned());
    let (w, h) = text
        .trim()
        .split_once(|c| c == 'x' || c == 'X')
        .ok_or_else(invalid)?;
    let w: u32 = w.trim().parse().map_err(|_| invalid())?;
    let h: u32 = h.trim().parse().map_err(|_| invalid())?;
    if w == 0 || h == 0 {
        return Err(invalid());
    }
    Ok((w, h))
}

#[derive(Debug, Deserialize)]
struct RawFile {
    config: RawSettings,
    planets: Map<String, Value>,
}

#[derive(Debug, Deserialize)]
struct RawSettings {
    screen_size: [u32; 2],
    time_scale: f64,
    fps: u32,
    sun_radius: f64,
    sun_color: Color,
}

#[derive(Debug, Deserialize)]
struct RawPlanet {
    semi_major_axis: f64,
    semi_minor_axis: f64,
    radius: f64,
    distance_scale: f64,
    angular_speed: f64,
    color: Color,
    #[serde(default)]
    angle: f64,
}

pub fn read_file(path: impl AsRef<Path>) -> Result<SimConfig, ConfigError> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_owned(),
        source,
    })?;
    parse_config(&contents)
}

pub fn parse_config(contents: &str) -> Result<SimConfig, ConfigError> {
    let raw: RawFile = serde_json::from_str(contents)?;
    let settings = raw.config;

    let [width, height] = settings.screen_size;
    if width == 0 || height == 0 {
        return Err(ConfigError::InvalidSetting {
            field: "screen_size",
        });
    }
    if settings.fps == 0 {
        return Err(ConfigError::InvalidSetting { field: "fps" });
    }
    if !settings.time_scale.is_finite() || settings.time_scale < 0.0 {
        return Err(ConfigError::InvalidSetting {
            field: "time_scale",
        });
    }
    if !settings.sun_radius.is_finite() || settings.sun_radius < 0.0 {
        return Err(ConfigError::InvalidSetting {
            field: "sun_radius",
        });
    }

    let planets = raw
        .planets
        .into_iter()
        .map(|(name, value)| parse_planet(name, value))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(SimConfig {
        screen_size: (width, height),
        time_scale: settings.time_scale,
        fps: settings.fps,
        sun_radius: settings.sun_radius,
        sun_color: settings.sun_color,
        planets,
    })
}

fn parse_planet(name: String, value: Value) -> Result<PlanetConfig, ConfigError> {
    let raw: RawPlanet = match serde_json::from_value(value) {
        Ok(raw) => raw,
        Err(source) => {
            return Err(ConfigError::Planet {
                planet: name,
                source,
            })
        }
    };

    let invalid = |field: &'static str, value: f64| ConfigError::InvalidParameter {
        planet: name.clone(),
        field,
        value,
    };

    // Lengths have to be positive, and everything has to be finite.
    for (field, value) in [
        ("semi_major_axis", raw.semi_major_axis),
        ("semi_minor_axis", raw.semi_minor_axis),
        ("radius", raw.radius),
    ] {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(field, value));
        }
    }
    if raw.distance_scale == 0.0 {
        return Err(ConfigError::ZeroDistanceScale {
            planet: name.clone(),
        });
    }
    if !raw.distance_scale.is_finite() {
        return Err(invalid("distance_scale", raw.distance_scale));
    }
    if !raw.angular_speed.is_finite() || raw.angular_speed < 0.0 {
        return Err(invalid("angular_speed", raw.angular_speed));
    }
    if !(0.0..TAU).contains(&raw.angle) {
        return Err(invalid("angle", raw.angle));
    }

    Ok(PlanetConfig {
        params: OrbitParams {
            semi_major_axis: raw.semi_major_axis,
            semi_minor_axis: raw.semi_minor_axis,
            radius: raw.radius,
            distance_scale: raw.distance_scale,
            angular_speed: raw.angular_speed,
            color: raw.color,
        },
        initial_angle: raw.angle,
        name,
    })
}
