use openwrist_types::{ConfigError, EndpointState};

use super::{ActivityEndpoint, EndpointAccumulator, EndpointValues, MetricBlock, positive_minutes};
use crate::helpers::windowing::moving_mean;

/// Highest mean acceleration sustained over windows of the given lengths.
pub struct MaxAcceleration {
    window_minutes: Vec<u32>,
    state: EndpointState,
    names: Vec<String>,
}

impl MaxAcceleration {
    pub fn new(window_minutes: &[u32], state: EndpointState) -> Result<Self, ConfigError> {
        let window_minutes = positive_minutes(window_minutes, "max acceleration window")?;
        let names = window_minutes
            .iter()
            .map(|n| state.column(format!("max acc {n}min [g]")))
            .collect();

        Ok(Self {
            window_minutes,
            state,
            names,
        })
    }
}

impl ActivityEndpoint for MaxAcceleration {
    fn names(&self) -> Vec<String> {
        self.names.clone()
    }

    fn state(&self) -> EndpointState {
        self.state
    }

    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_> {
        Box::new(MaxAccumulator {
            endpoint: self,
            maxima: vec![None; self.window_minutes.len()],
        })
    }
}

struct MaxAccumulator<'a> {
    endpoint: &'a MaxAcceleration,
    maxima: Vec<Option<f64>>,
}

impl EndpointAccumulator for MaxAccumulator<'_> {
    fn ingest(&mut self, block: &MetricBlock<'_>) {
        for (minutes, best) in self.endpoint.window_minutes.iter().zip(&mut self.maxima) {
            let n = *minutes as usize * block.epochs_per_minute;
            // windows longer than the block are skipped for this block only
            let Ok(means) = moving_mean(block.metric, n, 1) else {
                continue;
            };

            let block_max = means.into_iter().fold(f64::NEG_INFINITY, f64::max);
            *best = Some(best.map_or(block_max, |b| b.max(block_max)));
        }
    }

    fn finalize(self: Box<Self>) -> EndpointValues {
        self.endpoint
            .names
            .iter()
            .zip(self.maxima)
            .filter_map(|(name, max)| max.map(|m| (name.clone(), m)))
            .collect()
    }
}
