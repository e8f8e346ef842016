#[macro_use]
extern crate log;

mod collaborators;
pub use collaborators::{
    DayContext, PrecomputedDay, PrecomputedSleep, SleepClassifier, SleepOpportunityDetector,
};

mod config;
pub use config::{CutpointsConfig, EndpointConfig, PipelineConfig};

pub mod days;
pub use days::DayWindow;

mod pipeline;
pub use pipeline::DayPipeline;

mod recording;
pub use recording::{Recording, epochs_per_minute};
