use std::{fs::File, io::BufReader, path::Path};

use anyhow::anyhow;
use openwrist_types::{ConfigError, IndexWindow};
use serde::{Deserialize, Serialize};

use crate::{collaborators::PrecomputedDay, days::DayWindow};

/// Epoch-level acceleration metric for one wrist recording.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recording {
    pub epoch_seconds: u32,
    /// Unix seconds, one per epoch.
    pub time: Vec<f64>,
    /// Acceleration metric in g, one per epoch.
    pub metric: Vec<f64>,
    /// Wear blocks. The whole recording is worn when absent.
    #[serde(default)]
    pub wear: Option<Vec<IndexWindow>>,
    /// Day windows. Segmented by the configured day window when absent.
    #[serde(default)]
    pub days: Option<Vec<IndexWindow>>,
    /// Sleep opportunity and minute predictions per day.
    #[serde(default)]
    pub sleep: Vec<Option<PrecomputedDay>>,
}

impl Recording {
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .map_err(|e| anyhow!("failed to open recording `{}`: {}", path.display(), e))?;
        let recording: Self = serde_json::from_reader(BufReader::new(file))?;
        recording.validate()?;
        Ok(recording)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        epochs_per_minute(self.epoch_seconds)?;

        if self.time.len() != self.metric.len() {
            return Err(anyhow!(
                "time has {} samples but metric has {}",
                self.time.len(),
                self.metric.len()
            ));
        }

        let len = self.len();
        for window in self.wear.iter().chain(self.days.iter()).flatten() {
            if window.start > window.stop || window.stop > len {
                return Err(anyhow!(
                    "window [{}, {}) is outside the recording of {} epochs",
                    window.start,
                    window.stop,
                    len
                ));
            }
        }

        Ok(())
    }

    pub fn len(&self) -> usize {
        self.metric.len()
    }

    pub fn is_empty(&self) -> bool {
        self.metric.is_empty()
    }

    pub fn wear_blocks(&self) -> Vec<IndexWindow> {
        match &self.wear {
            Some(wear) => wear.clone(),
            None if self.is_empty() => Vec::new(),
            None => vec![IndexWindow::new(0, self.len())],
        }
    }

    pub fn day_windows(&self, window: &DayWindow) -> Result<Vec<IndexWindow>, ConfigError> {
        match &self.days {
            Some(days) => Ok(days.clone()),
            None => window.segment(&self.time),
        }
    }
}

/// Epochs per minute; the epoch must evenly divide a minute.
pub fn epochs_per_minute(epoch_seconds: u32) -> Result<usize, ConfigError> {
    if epoch_seconds == 0 || 60 % epoch_seconds != 0 {
        return Err(ConfigError::InvalidEpoch(epoch_seconds));
    }
    Ok((60 / epoch_seconds) as usize)
}
