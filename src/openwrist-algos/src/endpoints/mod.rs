use openwrist_types::{ActivityLevel, ConfigError, Cutpoints, EndpointState, Thresholds};

pub(crate) mod bout;
pub use bout::BoutIntensityTime;

pub(crate) mod fragmentation;
pub use fragmentation::IntensityFragmentation;

pub(crate) mod intensity_gradient;
pub use intensity_gradient::IntensityGradient;

pub(crate) mod max_acceleration;
pub use max_acceleration::MaxAcceleration;

pub(crate) mod total;
pub use total::TotalIntensityTime;

/// One contiguous stretch of worn data in a single state.
#[derive(Debug, Clone, Copy)]
pub struct MetricBlock<'a> {
    /// Acceleration metric at the recording epoch, in g.
    pub metric: &'a [f64],
    /// Non-overlapping one minute means of `metric`.
    pub metric_60: &'a [f64],
    pub epoch_seconds: u32,
    pub epochs_per_minute: usize,
}

/// Named values produced by one calculator for one day.
pub type EndpointValues = Vec<(String, f64)>;

/// A per-day activity statistic restricted to wake or sleep periods.
pub trait ActivityEndpoint {
    /// Result columns, in the order values are produced.
    fn names(&self) -> Vec<String>;

    fn state(&self) -> EndpointState;

    /// Fresh per-day state. Dropped or finalized before the next day starts.
    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_>;
}

pub trait EndpointAccumulator {
    fn ingest(&mut self, block: &MetricBlock<'_>);

    /// Values for the day. Empty when nothing was ingested.
    fn finalize(self: Box<Self>) -> EndpointValues;
}

/// Intensity band a calculator thresholds on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntensityBand {
    pub level: ActivityLevel,
    pub thresholds: Thresholds,
}

impl IntensityBand {
    pub fn new(level: &str, cutpoints: &Cutpoints) -> Result<Self, ConfigError> {
        let level: ActivityLevel = level.parse()?;
        Ok(Self {
            level,
            thresholds: cutpoints.thresholds(level)?,
        })
    }
}

fn positive_minutes(lengths: &[u32], what: &'static str) -> Result<Vec<u32>, ConfigError> {
    if lengths.is_empty() || lengths.contains(&0) {
        return Err(ConfigError::InvalidLength(what));
    }
    Ok(lengths.to_vec())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn block<'a>(metric: &'a [f64], metric_60: &'a [f64], epoch_seconds: u32) -> MetricBlock<'a> {
        MetricBlock {
            metric,
            metric_60,
            epoch_seconds,
            epochs_per_minute: (60 / epoch_seconds) as usize,
        }
    }

    pub fn value(values: &EndpointValues, name: &str) -> f64 {
        values
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| *v)
            .unwrap_or_else(|| panic!("missing value {name}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn band_resolves_level_and_thresholds() {
        let band = IntensityBand::new("MVPA", &Cutpoints::default()).unwrap();
        assert_eq!(band.level, ActivityLevel::Mvpa);
        assert_eq!(band.thresholds.lower, 0.110);
    }

    #[test]
    fn band_rejects_unknown_level() {
        assert_eq!(
            IntensityBand::new("extreme", &Cutpoints::default()),
            Err(ConfigError::InvalidLevel("extreme".into()))
        );
    }

    #[test]
    fn band_rejects_malformed_cutpoints() {
        let cutpoints = Cutpoints {
            sedentary: 0.2,
            light: 0.1,
            moderate: 0.4,
        };
        assert!(matches!(
            IntensityBand::new("light", &cutpoints),
            Err(ConfigError::MalformedCutpoints(_))
        ));
    }

    #[test]
    fn lengths_must_be_positive() {
        assert!(positive_minutes(&[1, 5], "window").is_ok());
        assert_eq!(
            positive_minutes(&[0], "window"),
            Err(ConfigError::InvalidLength("window"))
        );
        assert!(positive_minutes(&[], "window").is_err());
    }
}
