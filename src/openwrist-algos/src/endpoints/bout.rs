use openwrist_types::{ConfigError, Cutpoints, EndpointState};

use super::{
    ActivityEndpoint, EndpointAccumulator, EndpointValues, IntensityBand, MetricBlock,
    positive_minutes,
};
use crate::bouts::BoutDefinition;

/// Minutes per day spent in sustained bouts of an intensity level, one column
/// per bout length.
pub struct BoutIntensityTime {
    band: IntensityBand,
    bouts: Vec<BoutDefinition>,
    state: EndpointState,
    names: Vec<String>,
}

impl BoutIntensityTime {
    pub fn new(
        level: &str,
        bout_minutes: &[u32],
        bout_fraction: f64,
        closed_bout: bool,
        bout_metric: u8,
        cutpoints: &Cutpoints,
        state: EndpointState,
    ) -> Result<Self, ConfigError> {
        let band = IntensityBand::new(level, cutpoints)?;
        let bouts = positive_minutes(bout_minutes, "bout duration")?
            .into_iter()
            .map(|minutes| BoutDefinition::new(bout_metric, minutes, bout_fraction, closed_bout))
            .collect::<Result<Vec<_>, _>>()?;
        let names = bouts
            .iter()
            .map(|b| state.column(format!("{} {}min bout [min]", band.level, b.duration_minutes)))
            .collect();

        Ok(Self {
            band,
            bouts,
            state,
            names,
        })
    }
}

impl ActivityEndpoint for BoutIntensityTime {
    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn state(&self) -> EndpointState {
        self.state
    }

    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_> {
        Box::new(BoutAccumulator {
            endpoint: self,
            minutes: None,
        })
    }
}

struct BoutAccumulator<'a> {
    endpoint: &'a BoutIntensityTime,
    minutes: Option<Vec<f64>>,
}

impl EndpointAccumulator for BoutAccumulator<'_> {
    fn ingest(&mut self, block: &MetricBlock<'_>) {
        let endpoint = self.endpoint;
        let totals = self
            .minutes
            .get_or_insert_with(|| vec![0.0; endpoint.bouts.len()]);

        for (bout, total) in endpoint.bouts.iter().zip(totals.iter_mut()) {
            *total += bout.minutes(block.metric, &endpoint.band.thresholds, block.epoch_seconds);
        }
    }

    fn finalize(self: Box<Self>) -> EndpointValues {
        let Some(minutes) = self.minutes else {
            return Vec::new();
        };
        self.endpoint.names.iter().cloned().zip(minutes).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::endpoints::test_support::{block, value};

    fn mvpa_bouts(lengths: &[u32], metric: u8) -> Result<BoutIntensityTime, ConfigError> {
        BoutIntensityTime::new(
            "MVPA",
            lengths,
            0.8,
            true,
            metric,
            &Cutpoints::default(),
            EndpointState::Wake,
        )
    }

    #[test]
    fn one_name_per_length() {
        let calc = mvpa_bouts(&[1, 5, 10], 4).unwrap();
        assert_eq!(
            calc.names(),
            vec![
                "wake MVPA 1min bout [min]",
                "wake MVPA 5min bout [min]",
                "wake MVPA 10min bout [min]",
            ]
        );
    }

    #[test]
    fn construction_errors() {
        assert_eq!(
            mvpa_bouts(&[5], 9).err(),
            Some(ConfigError::InvalidBoutMetric(9))
        );
        assert_eq!(
            mvpa_bouts(&[0], 1).err(),
            Some(ConfigError::InvalidLength("bout duration"))
        );
        let bad_fraction = BoutIntensityTime::new(
            "MVPA",
            &[5],
            1.2,
            true,
            1,
            &Cutpoints::default(),
            EndpointState::Wake,
        );
        assert_eq!(bad_fraction.err(), Some(ConfigError::InvalidBoutFraction(1.2)));
    }

    #[test]
    fn bouts_sum_across_blocks() {
        let calc = mvpa_bouts(&[10], 1).unwrap();
        let active = vec![0.5; 12];
        let quiet = vec![0.0; 30];

        let mut acc = calc.accumulator();
        acc.ingest(&block(&active, &[], 60));
        acc.ingest(&block(&quiet, &[], 60));
        acc.ingest(&block(&active, &[], 60));
        let values = acc.finalize();

        assert!((value(&values, "wake MVPA 10min bout [min]") - 24.0).abs() < 1e-9);
    }

    #[test]
    fn short_blocks_contribute_zero() {
        let calc = mvpa_bouts(&[10], 3).unwrap();
        let mut acc = calc.accumulator();
        acc.ingest(&block(&[0.5; 5], &[], 60));
        let values = acc.finalize();
        assert_eq!(value(&values, "wake MVPA 10min bout [min]"), 0.0);
    }

    #[test]
    fn no_ingest_gives_no_values() {
        let calc = mvpa_bouts(&[10], 2).unwrap();
        assert!(calc.accumulator().finalize().is_empty());
    }
}
