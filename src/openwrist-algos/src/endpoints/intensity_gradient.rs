use openwrist_types::{ConfigError, EndpointState};

use super::{ActivityEndpoint, EndpointAccumulator, EndpointValues, MetricBlock};
use crate::helpers::stats::linear_regression;

/// Slope of log time against log intensity (Rowlands 2018).
pub struct IntensityGradient {
    /// Bin edges in g.
    edges: Vec<f64>,
    /// Bin centers in mg.
    centers: Vec<f64>,
    state: EndpointState,
    names: [String; 3],
}

impl IntensityGradient {
    /// 25 mg bins up to 4 g, and one catch-all bin up to 8 g.
    pub fn default_edges() -> Vec<f64> {
        let mut edges: Vec<f64> = (0..=160).map(|i| f64::from(i * 25) / 1000.0).collect();
        edges.push(8.0);
        edges
    }

    pub fn new(state: EndpointState) -> Result<Self, ConfigError> {
        Self::with_edges(Self::default_edges(), state)
    }

    pub fn with_edges(edges: Vec<f64>, state: EndpointState) -> Result<Self, ConfigError> {
        if edges.len() < 2 {
            return Err(ConfigError::MalformedEdges(format!(
                "need at least 2 edges, got {}",
                edges.len()
            )));
        }
        if edges.iter().any(|e| !e.is_finite()) {
            return Err(ConfigError::MalformedEdges("edges must be finite".into()));
        }
        if edges.windows(2).any(|w| w[0] >= w[1]) {
            return Err(ConfigError::MalformedEdges(
                "edges must be strictly increasing".into(),
            ));
        }

        let centers = edges
            .windows(2)
            .map(|w| (w[0] + w[1]) / 2.0 * 1000.0)
            .collect();

        Ok(Self {
            edges,
            centers,
            state,
            names: [
                state.column("intensity gradient"),
                state.column("ig intercept"),
                state.column("ig r-squared"),
            ],
        })
    }

    /// Histogram bin of `value`: half-open bins, except the last which also
    /// holds the top edge. Out of range values have no bin.
    fn bin(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if !(value >= first && value <= last) {
            return None;
        }
        if value == last {
            return Some(self.edges.len() - 2);
        }
        Some(self.edges.partition_point(|&e| e <= value) - 1)
    }
}

impl ActivityEndpoint for IntensityGradient {
    fn names(&self) -> Vec<String> {
        self.names.to_vec()
    }

    fn state(&self) -> EndpointState {
        self.state
    }

    fn accumulator(&self) -> Box<dyn EndpointAccumulator + '_> {
        Box::new(GradientAccumulator {
            endpoint: self,
            minutes: None,
        })
    }
}

struct GradientAccumulator<'a> {
    endpoint: &'a IntensityGradient,
    /// Minutes per bin.
    minutes: Option<Vec<f64>>,
}

impl EndpointAccumulator for GradientAccumulator<'_> {
    fn ingest(&mut self, block: &MetricBlock<'_>) {
        let endpoint = self.endpoint;
        let hist = self
            .minutes
            .get_or_insert_with(|| vec![0.0; endpoint.centers.len()]);

        let per_epoch = 1.0 / block.epochs_per_minute as f64;
        for &value in block.metric {
            if let Some(i) = endpoint.bin(value) {
                hist[i] += per_epoch;
            }
        }
    }

    fn finalize(self: Box<Self>) -> EndpointValues {
        let Some(hist) = self.minutes else {
            return Vec::new();
        };

        let (x, y): (Vec<f64>, Vec<f64>) = self
            .endpoint
            .centers
            .iter()
            .zip(&hist)
            .filter(|(_, minutes)| **minutes > 0.0)
            .map(|(center, minutes)| (center.ln(), minutes.ln()))
            .unzip();

        let values = match linear_regression(&x, &y) {
            Some(fit) => [fit.slope, fit.intercept, fit.r_squared()],
            None => [f64::NAN; 3],
        };

        self.endpoint.names.iter().cloned().zip(values).collect()
    }
}
