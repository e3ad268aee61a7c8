pub mod orrery;
pub mod planet;
pub mod stats;
pub mod stepper;

pub use orrery::Orrery;
pub use planet::{Color, OrbitParams, Planet};
pub use stats::{Aggregator, SampleSeries, StatsError, SummaryRecord};
pub use stepper::{OrbitCounter, StepOutput};
