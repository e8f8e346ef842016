use crate::fragmentation::{
    average_duration, average_hazard, gini_index, power_law_exponent, transition_probability,
};
use crate::helpers::windowing::{RunLengths, run_length_encode};

pub const SLEEP: u8 = 1;
pub const WAKE: u8 = 0;

/// Minute-level sleep/wake classification restricted to the total sleep
/// opportunity window.
#[derive(Debug, Clone, PartialEq)]
pub struct SleepPeriod {
    pub predictions: Vec<u8>,
    pub runs: RunLengths<u8>,
}

impl SleepPeriod {
    pub fn new(predictions: Vec<u8>) -> Self {
        let runs = run_length_encode(&predictions);
        Self { predictions, runs }
    }

    pub fn sleep_lengths(&self) -> Vec<usize> {
        self.runs.lengths_of(SLEEP)
    }

    pub fn wake_lengths(&self) -> Vec<usize> {
        self.runs.lengths_of(WAKE)
    }

    /// Indices of the first and last sleep runs.
    fn sleep_span(&self) -> Option<(usize, usize)> {
        let first = self.runs.values.iter().position(|&v| v == SLEEP)?;
        let last = self.runs.values.iter().rposition(|&v| v == SLEEP)?;
        Some((first, last))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SleepEndpoint {
    TotalSleepTime,
    PercentTimeAsleep,
    NumberWakeBouts,
    SleepOnsetLatency,
    WakeAfterSleepOnset,
    AverageSleepDuration,
    AverageWakeDuration,
    SleepWakeTransitionProbability,
    WakeSleepTransitionProbability,
    SleepGiniIndex,
    WakeGiniIndex,
    SleepAverageHazard,
    WakeAverageHazard,
    SleepPowerLawDistribution,
    WakePowerLawDistribution,
}

impl SleepEndpoint {
    pub const ALL: [SleepEndpoint; 15] = [
        Self::TotalSleepTime,
        Self::PercentTimeAsleep,
        Self::NumberWakeBouts,
        Self::SleepOnsetLatency,
        Self::WakeAfterSleepOnset,
        Self::AverageSleepDuration,
        Self::AverageWakeDuration,
        Self::SleepWakeTransitionProbability,
        Self::WakeSleepTransitionProbability,
        Self::SleepGiniIndex,
        Self::WakeGiniIndex,
        Self::SleepAverageHazard,
        Self::WakeAverageHazard,
        Self::SleepPowerLawDistribution,
        Self::WakePowerLawDistribution,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Self::TotalSleepTime => "total sleep time",
            Self::PercentTimeAsleep => "percent time asleep",
            Self::NumberWakeBouts => "number of wake bouts",
            Self::SleepOnsetLatency => "sleep onset latency",
            Self::WakeAfterSleepOnset => "wake after sleep onset",
            Self::AverageSleepDuration => "average sleep duration",
            Self::AverageWakeDuration => "average wake duration",
            Self::SleepWakeTransitionProbability => "sleep wake transition probability",
            Self::WakeSleepTransitionProbability => "wake sleep transition probability",
            Self::SleepGiniIndex => "sleep gini index",
            Self::WakeGiniIndex => "wake gini index",
            Self::SleepAverageHazard => "sleep average hazard",
            Self::WakeAverageHazard => "wake average hazard",
            Self::SleepPowerLawDistribution => "sleep power law distribution",
            Self::WakePowerLawDistribution => "wake power law distribution",
        }
    }

    /// Value in minutes, counts, or unitless ratios. Durations are minutes
    /// since the predictions are one per minute.
    pub fn compute(&self, period: &SleepPeriod) -> f64 {
        match self {
            Self::TotalSleepTime => period.sleep_lengths().iter().sum::<usize>() as f64,
            Self::PercentTimeAsleep => {
                if period.predictions.is_empty() {
                    f64::NAN
                } else {
                    let asleep = period.predictions.iter().filter(|&&p| p == SLEEP).count();
                    100.0 * asleep as f64 / period.predictions.len() as f64
                }
            }
            Self::NumberWakeBouts => match period.sleep_span() {
                Some((first, last)) => period.runs.values[first..last]
                    .iter()
                    .filter(|&&v| v == WAKE)
                    .count() as f64,
                None => 0.0,
            },
            Self::SleepOnsetLatency => period
                .sleep_span()
                .map_or(f64::NAN, |(first, _)| period.runs.starts[first] as f64),
            Self::WakeAfterSleepOnset => match period.sleep_span() {
                Some((first, last)) => {
                    let start = period.runs.starts[first];
                    let stop = period.runs.starts[last] + period.runs.lengths[last];
                    period.predictions[start..stop]
                        .iter()
                        .filter(|&&p| p == WAKE)
                        .count() as f64
                }
                None => f64::NAN,
            },
            Self::AverageSleepDuration => average_duration(&period.sleep_lengths()),
            Self::AverageWakeDuration => average_duration(&period.wake_lengths()),
            Self::SleepWakeTransitionProbability => transition_probability(&period.sleep_lengths()),
            Self::WakeSleepTransitionProbability => transition_probability(&period.wake_lengths()),
            Self::SleepGiniIndex => gini_index(&period.sleep_lengths()),
            Self::WakeGiniIndex => gini_index(&period.wake_lengths()),
            Self::SleepAverageHazard => average_hazard(&period.sleep_lengths()),
            Self::WakeAverageHazard => average_hazard(&period.wake_lengths()),
            Self::SleepPowerLawDistribution => power_law_exponent(&period.sleep_lengths()),
            Self::WakePowerLawDistribution => power_law_exponent(&period.wake_lengths()),
        }
    }
}

/// Every sleep endpoint for one period, in [`SleepEndpoint::ALL`] order.
pub fn sleep_endpoints(period: &SleepPeriod) -> Vec<(&'static str, f64)> {
    SleepEndpoint::ALL
        .iter()
        .map(|e| (e.name(), e.compute(period)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn period(p: &[u8]) -> SleepPeriod {
        SleepPeriod::new(p.to_vec())
    }

    #[test]
    fn names_are_unique() {
        let mut names: Vec<_> = SleepEndpoint::ALL.iter().map(|e| e.name()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), SleepEndpoint::ALL.len());
    }

    #[test]
    fn basic_night() {
        // 2 min awake, 3 asleep, 1 awake, 4 asleep, 2 awake
        let p = period(&[0, 0, 1, 1, 1, 0, 1, 1, 1, 1, 0, 0]);

        assert_eq!(SleepEndpoint::TotalSleepTime.compute(&p), 7.0);
        assert!((SleepEndpoint::PercentTimeAsleep.compute(&p) - 700.0 / 12.0).abs() < 1e-9);
        assert_eq!(SleepEndpoint::NumberWakeBouts.compute(&p), 1.0);
        assert_eq!(SleepEndpoint::SleepOnsetLatency.compute(&p), 2.0);
        assert_eq!(SleepEndpoint::WakeAfterSleepOnset.compute(&p), 1.0);
        assert_eq!(SleepEndpoint::AverageSleepDuration.compute(&p), 3.5);
        assert!((SleepEndpoint::AverageWakeDuration.compute(&p) - 5.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn no_sleep() {
        let p = period(&[0, 0, 0]);
        assert_eq!(SleepEndpoint::TotalSleepTime.compute(&p), 0.0);
        assert_eq!(SleepEndpoint::PercentTimeAsleep.compute(&p), 0.0);
        assert_eq!(SleepEndpoint::NumberWakeBouts.compute(&p), 0.0);
        assert!(SleepEndpoint::SleepOnsetLatency.compute(&p).is_nan());
        assert!(SleepEndpoint::WakeAfterSleepOnset.compute(&p).is_nan());
        assert!(SleepEndpoint::SleepGiniIndex.compute(&p).is_nan());
    }

    #[test]
    fn empty_period() {
        let values = sleep_endpoints(&period(&[]));
        assert_eq!(values.len(), 15);
        assert_eq!(values[0], ("total sleep time", 0.0));
        assert!(values[1].1.is_nan());
    }

    #[test]
    fn wake_bouts_between_sleep_only() {
        let p = period(&[0, 1, 0, 0, 1, 0, 1, 0]);
        assert_eq!(SleepEndpoint::NumberWakeBouts.compute(&p), 2.0);
        assert_eq!(SleepEndpoint::WakeAfterSleepOnset.compute(&p), 3.0);
    }
}
