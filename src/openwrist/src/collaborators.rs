use openwrist_types::{IndexWindow, TsoWindow};
use serde::{Deserialize, Serialize};

/// Data for a single day handed to the sleep collaborators.
#[derive(Debug, Clone, Copy)]
pub struct DayContext<'a> {
    /// Zero based position of the day in the day list.
    pub index: usize,
    pub window: IndexWindow,
    pub time: &'a [f64],
    pub metric: &'a [f64],
    pub epoch_seconds: u32,
    /// Wear blocks already clipped to `window`.
    pub wear: &'a [IndexWindow],
}

/// Finds the total sleep opportunity in a day.
pub trait SleepOpportunityDetector {
    /// `None` when the day has no usable sleep window. Indices are into the
    /// full recording.
    fn detect(&self, day: &DayContext<'_>) -> Option<TsoWindow>;
}

/// Minute-level sleep/wake classification.
pub trait SleepClassifier {
    /// One value per minute from the start of the day, `1` asleep, `0` awake.
    fn classify(&self, day: &DayContext<'_>) -> Vec<u8>;
}

/// Sleep results computed elsewhere, stored per day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrecomputedDay {
    #[serde(default)]
    pub tso: Option<TsoWindow>,
    #[serde(default)]
    pub predictions: Vec<u8>,
}

/// Serves precomputed sleep results by day index. Days without an entry have
/// no sleep opportunity.
#[derive(Debug, Clone, Default)]
pub struct PrecomputedSleep {
    days: Vec<Option<PrecomputedDay>>,
}

impl PrecomputedSleep {
    pub fn new(days: Vec<Option<PrecomputedDay>>) -> Self {
        Self { days }
    }

    fn day(&self, index: usize) -> Option<&PrecomputedDay> {
        self.days.get(index).and_then(Option::as_ref)
    }
}

impl SleepOpportunityDetector for PrecomputedSleep {
    fn detect(&self, day: &DayContext<'_>) -> Option<TsoWindow> {
        self.day(day.index).and_then(|d| d.tso)
    }
}

impl SleepClassifier for PrecomputedSleep {
    fn classify(&self, day: &DayContext<'_>) -> Vec<u8> {
        self.day(day.index)
            .map(|d| d.predictions.clone())
            .unwrap_or_default()
    }
}
