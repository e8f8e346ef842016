mod error;
pub use error::ConfigError;

pub mod intensity;
pub use intensity::{ActivityLevel, Cutpoints, EndpointState, Thresholds};

pub mod results;
pub use results::{DayRecord, ResultValue, ResultsTable};

pub mod windows;
pub use windows::{IndexWindow, TsoWindow};
