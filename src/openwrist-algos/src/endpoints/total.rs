use openwrist_types::{ConfigError, Cutpoints, EndpointState};

use super::{ActivityEndpoint, EndpointAccumulator, EndpointValues, IntensityBand, MetricBlock};

/// Minutes per day with the epoch-level metric inside an intensity level.
pub struct TotalIntensityTime {
    band: IntensityBand,
    state: EndpointState,
    name: String,
}

impl TotalIntensityTime {
    pub fn new(
        level: &str,
        epoch_seconds: u32,
        cutpoints: &Cutpoints,
        state: EndpointState,
    ) -> Result<Self, ConfigError> {
        let band = IntensityBand::new(level, cutpoints)?;
        let name = state.column(format!("{} {epoch_seconds}s epoch [min]", band.level));
        Ok(Self { band, state, name })
    }
}

impl ActivityEndpoint for TotalIntensityTime {
    fn names(&self) -> Vec<String> {
        vec![self.name.clone()]
    }

    fn state(&self) -> EndpointState {
        self.state
    }

    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_> {
        Box::new(TotalAccumulator {
            endpoint: self,
            minutes: None,
        })
    }
}

struct TotalAccumulator<'a> {
    endpoint: &'a TotalIntensityTime,
    minutes: Option<f64>,
}

impl EndpointAccumulator for TotalAccumulator<'_> {
    fn ingest(&mut self, block: &MetricBlock<'_>) {
        let epochs = self.endpoint.band.thresholds.count(block.metric) as f64;
        *self.minutes.get_or_insert(0.0) += epochs / block.epochs_per_minute as f64;
    }

    fn finalize(self: Box<Self>) -> EndpointValues {
        self.minutes
            .map(|m| vec![(self.endpoint.name.clone(), m)])
            .unwrap_or_default()
    }
}
