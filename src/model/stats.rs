use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::stepper::OrbitCounter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("no samples were recorded for planet {0}")]
    EmptySeries(String),
}

/// Per-frame samples for one planet, in the order they were recorded.
#[derive(Debug, Clone, Default)]
pub struct SampleSeries {
    pub distances: Vec<f64>,
    pub speeds: Vec<f64>,
}

impl SampleSeries {
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SummaryRecord {
    pub name: String,
    pub mean_distance: f64,
    pub mean_velocity: f64,
    pub orbit_count: u64,
}

// Planets are kept in registration order, which is also the output order.
#[derive(Debug, Clone, Default)]
pub struct Aggregator {
    series: Vec<(String, SampleSeries)>,
    index: HashMap<String, usize>,
}

impl Aggregator {
    /// Registers every planet up front, so that a planet that never gets a
    /// sample still shows up (and fails) at finalize time.
    pub fn new<'a>(names: impl IntoIterator<Item = &'a str>) -> Self {
        let mut aggregator = Aggregator::default();
        for name in names {
            aggregator.slot(name);
        }
        aggregator
    }

    fn slot(&mut self, name: &str) -> usize {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.series.len();
        self.series.push((name.to_owned(), SampleSeries::default()));
        self.index.insert(name.to_owned(), idx);
        idx
    }

    pub fn record(&mut self, name: &str, distance: f64, speed: f64) {
        let idx = self.slot(name);
        let samples = &mut self.series[idx].1;
        samples.distances.push(distance);
        samples.speeds.push(speed);
    }

    pub fn series(&self, name: &str) -> Option<&SampleSeries> {
        self.index.get(name).map(|&idx| &self.series[idx].1)
    }

    /// Reduces everything recorded so far into one record per planet.
    pub fn finalize(self, counter: &OrbitCounter) -> Result<Vec<SummaryRecord>, StatsError> {
        self.series
            .into_iter()
            .map(|(name, samples)| {
                let mean_distance = mean(&samples.distances);
                let mean_velocity = mean(&samples.speeds);
                match (mean_distance, mean_velocity) {
                    (Some(mean_distance), Some(mean_velocity)) => Ok(SummaryRecord {
                        orbit_count: counter.get(&name),
                        name,
                        mean_distance,
                        mean_velocity,
                    }),
                    _ => Err(StatsError::EmptySeries(name)),
                }
            })
            .collect()
    }
}

fn mean(samples: &[f64]) -> Option<f64> {
    if samples.is_empty() {
        return None;
    }
    Some(samples.iter().sum::<f64>() / samples.len() as f64)
}
