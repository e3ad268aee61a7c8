use nalgebra::Point2;

use super::planet::Planet;
use super::stats::{Aggregator, StatsError, SummaryRecord};
use super::stepper::{self, OrbitCounter, StepOutput};
use crate::file::SimConfig;

/// Owns every planet plus the bookkeeping that goes with them. One call to
/// `advance` is one frame.
#[derive(Debug, Clone)]
pub struct Orrery {
    planets: Vec<Planet>,
    counter: OrbitCounter,
    aggregator: Aggregator,
    center: Point2<f64>,
    frames_per_second: f64,
    frames: u64,
}

impl Orrery {
    pub fn new(planets: Vec<Planet>, center: Point2<f64>, frames_per_second: f64) -> Self {
        let aggregator = Aggregator::new(planets.iter().map(|p| p.name.as_str()));
        Orrery {
            planets,
            counter: OrbitCounter::new(),
            aggregator,
            center,
            frames_per_second,
            frames: 0,
        }
    }

    pub fn from_config(config: &SimConfig) -> Self {
        let planets = config
            .planets
            .iter()
            .map(|p| Planet::new(p.name.clone(), p.params.clone(), p.initial_angle))
            .collect();
        Self::new(planets, config.center(), config.fps as f64)
    }

    pub fn planets(&self) -> &[Planet] {
        &self.planets
    }

    pub fn center(&self) -> Point2<f64> {
        self.center
    }

    pub fn frames_per_second(&self) -> f64 {
        self.frames_per_second
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn orbit_count(&self, name: &str) -> u64 {
        self.counter.get(name)
    }

    /// Completed revolutions summed over every planet.
    pub fn total_orbits(&self) -> u64 {
        self.planets
            .iter()
            .map(|p| self.counter.get(&p.name))
            .sum()
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    /// Steps every planet once and records its samples. The outputs line up
    /// with `planets()`.
    pub fn advance(&mut self) -> Vec<StepOutput> {
        let mut outputs = Vec::with_capacity(self.planets.len());
        for planet in self.planets.iter_mut() {
            let out = stepper::step(
                planet,
                &mut self.counter,
                &self.center,
                self.frames_per_second,
            );
            self.aggregator.record(&planet.name, out.distance, out.speed);
            outputs.push(out);
        }
        self.frames += 1;
        outputs
    }

    pub fn finalize(self) -> Result<Vec<SummaryRecord>, StatsError> {
        self.aggregator.finalize(&self.counter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::planet::{Color, OrbitParams};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn test_orrery() -> Orrery {
        let params = |a: f64, b: f64, omega: f64| OrbitParams {
            semi_major_axis: a,
            semi_minor_axis: b,
            radius: 10.0,
            distance_scale: 2.0,
            angular_speed: omega,
            color: Color::WHITE,
        };
        Orrery::new(
            vec![
                Planet::new("Inner", params(100.0, 50.0, PI), 0.0),
                Planet::new("Outer", params(200.0, 200.0, 0.01), 0.0),
            ],
            Point2::new(400.0, 300.0),
            60.0,
        )
    }

    #[test]
    fn test_two_frames() {
        let mut orrery = test_orrery();
        let first = orrery.advance();
        let second = orrery.advance();
        assert_eq!(orrery.frames(), 2);
        assert_relative_eq!(first[0].distance, 100.0);
        assert_relative_eq!(second[0].distance, 100.0, epsilon = 1e-9);
        assert_relative_eq!(first[1].distance, 200.0);
        assert_eq!(orrery.aggregator().series("Outer").unwrap().len(), 2);

        let records = orrery.finalize().unwrap();
        assert_eq!(records[0].name, "Inner");
        assert_eq!(records[0].orbit_count, 0);
        assert_relative_eq!(records[0].mean_distance, 100.0, epsilon = 1e-9);
        assert_relative_eq!(records[0].mean_velocity, 5.0 * (PI * 60.0), max_relative = 1e-12);
        assert_eq!(records[1].name, "Outer");
        assert_relative_eq!(records[1].mean_distance, 200.0, epsilon = 1e-9);
    }

    #[test]
    fn test_orbit_count_reaches_summary() {
        let mut orrery = test_orrery();
        for _ in 0..3 {
            orrery.advance();
        }
        assert_eq!(orrery.orbit_count("Inner"), 1);
        assert_eq!(orrery.total_orbits(), 1);
        for _ in 0..4 {
            orrery.advance();
        }
        // Inner wraps on frames 3, 5 and 7
        assert_eq!(orrery.total_orbits(), 3);
        let records = orrery.finalize().unwrap();
        assert_eq!(records[0].orbit_count, 3);
        assert_eq!(records[1].orbit_count, 0);
    }

    #[test]
    fn test_zero_frames_cannot_be_summarized() {
        let orrery = test_orrery();
        assert_eq!(
            orrery.finalize(),
            Err(StatsError::EmptySeries("Inner".to_owned()))
        );
    }
}
