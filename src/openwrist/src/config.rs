use std::{fs::File, io::BufReader, path::Path};

use anyhow::anyhow;
use openwrist_algos::{
    ActivityEndpoint, BoutIntensityTime, IntensityFragmentation, IntensityGradient,
    MaxAcceleration, TotalIntensityTime,
};
use openwrist_types::{ConfigError, Cutpoints, EndpointState};
use serde::{Deserialize, Serialize};

use crate::days::DayWindow;

/// Named cutpoint set or custom values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CutpointsConfig {
    Named(String),
    Custom(Cutpoints),
}

impl Default for CutpointsConfig {
    fn default() -> Self {
        Self::Named(Cutpoints::DEFAULT_SET.to_string())
    }
}

impl CutpointsConfig {
    pub fn resolve(&self) -> Result<Cutpoints, ConfigError> {
        match self {
            Self::Named(name) => Cutpoints::named(Some(name)),
            Self::Custom(cutpoints) => Ok(*cutpoints),
        }
    }
}

/// Which activity calculators to register, for each state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EndpointConfig {
    pub cutpoints: CutpointsConfig,
    pub states: Vec<EndpointState>,
    pub total_levels: Vec<String>,
    pub bout_levels: Vec<String>,
    pub bout_minutes: Vec<u32>,
    pub bout_fraction: f64,
    pub closed_bout: bool,
    pub bout_metric: u8,
    pub max_acc_minutes: Vec<u32>,
    pub fragmentation_levels: Vec<String>,
    pub intensity_gradient: bool,
}

fn levels(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self {
            cutpoints: CutpointsConfig::default(),
            states: vec![EndpointState::Wake, EndpointState::Sleep],
            total_levels: levels(&["sed", "light", "mod", "vig", "MVPA"]),
            bout_levels: levels(&["sed", "light", "MVPA"]),
            bout_minutes: vec![1, 5, 10],
            bout_fraction: 0.8,
            closed_bout: false,
            bout_metric: 4,
            max_acc_minutes: vec![6, 15, 60],
            fragmentation_levels: levels(&["sed", "SLPA", "MVPA"]),
            intensity_gradient: true,
        }
    }
}

impl EndpointConfig {
    /// Builds the calculators in registration order: per state, totals, bouts,
    /// max acceleration, fragmentation, then intensity gradient.
    pub fn build(&self, epoch_seconds: u32) -> Result<Vec<Box<dyn ActivityEndpoint>>, ConfigError> {
        let cutpoints = self.cutpoints.resolve()?;
        let mut endpoints: Vec<Box<dyn ActivityEndpoint>> = Vec::new();

        for &state in &self.states {
            for level in &self.total_levels {
                endpoints.push(Box::new(TotalIntensityTime::new(
                    level,
                    epoch_seconds,
                    &cutpoints,
                    state,
                )?));
            }
            if !self.bout_minutes.is_empty() {
                for level in &self.bout_levels {
                    endpoints.push(Box::new(BoutIntensityTime::new(
                        level,
                        &self.bout_minutes,
                        self.bout_fraction,
                        self.closed_bout,
                        self.bout_metric,
                        &cutpoints,
                        state,
                    )?));
                }
            }
            if !self.max_acc_minutes.is_empty() {
                endpoints.push(Box::new(MaxAcceleration::new(&self.max_acc_minutes, state)?));
            }
            for level in &self.fragmentation_levels {
                endpoints.push(Box::new(IntensityFragmentation::new(level, &cutpoints, state)?));
            }
            if self.intensity_gradient {
                endpoints.push(Box::new(IntensityGradient::new(state)?));
            }
        }

        Ok(endpoints)
    }
}

/// Settings for a full run, loadable from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Days with fewer hours of data are skipped.
    pub min_day_hours: f64,
    /// Days with fewer worn hours are skipped.
    pub min_wear_hours: f64,
    pub day_window: DayWindow,
    pub endpoints: EndpointConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            min_day_hours: 6.0,
            min_wear_hours: 0.0,
            day_window: DayWindow::default(),
            endpoints: EndpointConfig::default(),
        }
    }
}

impl PipelineConfig {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("failed to open config `{}`: {}", path.display(), e))?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.day_window.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_build_registers_both_states() {
        let endpoints = EndpointConfig::default().build(60).unwrap();
        // 5 totals + 3 bouts + 1 max + 3 fragmentation + 1 gradient per state
        assert_eq!(endpoints.len(), 26);
        assert_eq!(endpoints[0].state(), EndpointState::Wake);
        assert_eq!(endpoints[25].state(), EndpointState::Sleep);
        assert_eq!(endpoints[0].names(), vec!["wake sed 60s epoch [min]"]);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let config: PipelineConfig =
            serde_json::from_str(r#"{"min_day_hours": 10, "endpoints": {"bout_metric": 1}}"#)
                .unwrap();
        assert_eq!(config.min_day_hours, 10.0);
        assert_eq!(config.endpoints.bout_metric, 1);
        assert_eq!(config.endpoints.bout_minutes, vec![1, 5, 10]);
        assert_eq!(config.day_window, DayWindow::default());
    }

    #[test]
    fn cutpoints_by_name_or_values() {
        let named: CutpointsConfig =
            serde_json::from_str(r#""hildebrand_wrist_adult_actigraph""#).unwrap();
        assert_eq!(
            named.resolve().unwrap(),
            Cutpoints::HILDEBRAND_WRIST_ADULT_ACTIGRAPH
        );

        let custom: CutpointsConfig =
            serde_json::from_str(r#"{"sedentary": 0.1, "light": 0.2, "moderate": 0.3}"#).unwrap();
        assert_eq!(custom.resolve().unwrap().light, 0.2);

        let unknown = CutpointsConfig::Named("nope".into());
        assert_eq!(
            unknown.resolve(),
            Err(ConfigError::UnknownCutpoints("nope".into()))
        );
    }

    #[test]
    fn invalid_settings_fail_at_build() {
        let config = EndpointConfig {
            bout_metric: 0,
            ..Default::default()
        };
        assert_eq!(
            config.build(60).err(),
            Some(ConfigError::InvalidBoutMetric(0))
        );

        let config = EndpointConfig {
            total_levels: vec!["extreme".into()],
            ..Default::default()
        };
        assert!(matches!(
            config.build(60),
            Err(ConfigError::InvalidLevel(_))
        ));
    }
}
