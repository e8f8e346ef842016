pub(crate) mod bouts;
pub use bouts::{BoutDefinition, BoutMetric, detect_bout_minutes};

pub mod endpoints;
pub use endpoints::{
    ActivityEndpoint, BoutIntensityTime, EndpointAccumulator, EndpointValues, IntensityFragmentation,
    IntensityGradient, MaxAcceleration, MetricBlock, TotalIntensityTime,
};

pub mod fragmentation;
pub use fragmentation::FragmentationStats;

pub(crate) mod sleep;
pub use sleep::{SleepEndpoint, SleepPeriod, sleep_endpoints};

pub mod helpers;
