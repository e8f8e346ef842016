use openwrist_types::{ConfigError, Cutpoints, EndpointState};

use super::{ActivityEndpoint, EndpointAccumulator, EndpointValues, IntensityBand, MetricBlock};
use crate::fragmentation::FragmentationStats;
use crate::helpers::windowing::run_length_encode;

/// How broken up the time in an intensity level is, measured on one minute
/// means.
pub struct IntensityFragmentation {
    band: IntensityBand,
    state: EndpointState,
    names: Vec<String>,
}

impl IntensityFragmentation {
    pub fn new(level: &str, cutpoints: &Cutpoints, state: EndpointState) -> Result<Self, ConfigError> {
        let band = IntensityBand::new(level, cutpoints)?;
        let names = FragmentationStats::NAMES
            .iter()
            .map(|stat| state.column(format!("{} {stat}", band.level)))
            .collect();

        Ok(Self { band, state, names })
    }
}

impl ActivityEndpoint for IntensityFragmentation {
    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn state(&self) -> EndpointState {
        self.state
    }

    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_> {
        Box::new(FragmentationAccumulator {
            endpoint: self,
            lengths: None,
        })
    }
}

struct FragmentationAccumulator<'a> {
    endpoint: &'a IntensityFragmentation,
    lengths: Option<Vec<usize>>,
}

impl EndpointAccumulator for FragmentationAccumulator<'_> {
    fn ingest(&mut self, block: &MetricBlock<'_>) {
        let mask = self.endpoint.band.thresholds.mask(block.metric_60);
        let runs = run_length_encode(&mask);
        self.lengths
            .get_or_insert_with(Vec::new)
            .extend(runs.lengths_of(1));
    }

    fn finalize(self: Box<Self>) -> EndpointValues {
        let Some(lengths) = self.lengths else {
            return Vec::new();
        };

        let stats = FragmentationStats::from_lengths(&lengths);
        self.endpoint
            .names
            .iter()
            .cloned()
            .zip(stats.values())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::{block, value};

    fn sedentary() -> IntensityFragmentation {
        IntensityFragmentation::new("sed", &Cutpoints::default(), EndpointState::Wake).unwrap()
    }

    #[test]
    fn names_cover_all_statistics() {
        assert_eq!(
            sedentary().names(),
            vec![
                "wake sed avg duration",
                "wake sed transition probability",
                "wake sed gini index",
                "wake sed avg hazard",
                "wake sed power law distribution",
            ]
        );
    }

    #[test]
    fn runs_collected_across_blocks() {
        let calc = sedentary();
        let mut acc = calc.accumulator();
        // sedentary runs of 2 and 1, then 3
        acc.ingest(&block(&[], &[0.01, 0.02, 0.3, 0.0], 60));
        acc.ingest(&block(&[], &[0.01, 0.01, 0.01, 0.2], 60));
        let values = acc.finalize();

        assert!((value(&values, "wake sed avg duration") - 2.0).abs() < 1e-12);
        assert!((value(&values, "wake sed transition probability") - 0.5).abs() < 1e-12);
    }

    #[test]
    fn no_runs_give_nan() {
        let calc = sedentary();
        let mut acc = calc.accumulator();
        acc.ingest(&block(&[], &[0.5, 0.6], 60));
        let values = acc.finalize();

        assert_eq!(values.len(), 5);
        assert!(values.iter().all(|(_, v)| v.is_nan()));
    }

    #[test]
    fn empty_minute_series_still_reports() {
        let calc = sedentary();
        let mut acc = calc.accumulator();
        acc.ingest(&block(&[0.0; 4], &[], 15));
        assert_eq!(acc.finalize().len(), 5);
    }

    #[test]
    fn no_ingest_gives_no_values() {
        assert!(sedentary().accumulator().finalize().is_empty());
    }
}
