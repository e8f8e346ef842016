use openwrist_algos::{
    ActivityEndpoint, EndpointAccumulator, MetricBlock, SleepEndpoint, SleepPeriod,
    helpers::windowing::moving_mean, sleep_endpoints,
};
use openwrist_types::{ConfigError, DayRecord, EndpointState, IndexWindow, ResultsTable, TsoWindow};

use crate::{
    collaborators::{DayContext, SleepClassifier, SleepOpportunityDetector},
    config::PipelineConfig,
    days::{DayWindow, day_date, day_wear_intersection, format_timestamp},
    recording::{Recording, epochs_per_minute},
};

pub const DAY_N: &str = "Day N";
pub const DATE: &str = "Date";
pub const TSO_START_TIMESTAMP: &str = "TSO Start Timestamp";
pub const TSO_START: &str = "TSO Start";
pub const TSO_DURATION: &str = "TSO Duration";

const METADATA: [&str; 5] = [DAY_N, DATE, TSO_START_TIMESTAMP, TSO_START, TSO_DURATION];

/// Runs the registered calculators over every accepted day of a recording
/// and collects one row per day.
pub struct DayPipeline {
    min_day_hours: f64,
    min_wear_hours: f64,
    day_window: DayWindow,
    endpoints: Vec<Box<dyn ActivityEndpoint>>,
    table: ResultsTable,
}

impl DayPipeline {
    /// Pipeline with the metadata and sleep columns reserved and no activity
    /// calculators.
    pub fn new(config: &PipelineConfig) -> Result<Self, ConfigError> {
        config.day_window.validate()?;

        let mut table = ResultsTable::new();
        for name in METADATA {
            table.reserve(name)?;
        }
        for endpoint in SleepEndpoint::ALL {
            table.reserve(endpoint.name())?;
        }

        Ok(Self {
            min_day_hours: config.min_day_hours,
            min_wear_hours: config.min_wear_hours,
            day_window: config.day_window,
            endpoints: Vec::new(),
            table,
        })
    }

    /// Pipeline with the calculators described by `config.endpoints`.
    pub fn from_config(config: &PipelineConfig, epoch_seconds: u32) -> Result<Self, ConfigError> {
        let mut pipeline = Self::new(config)?;
        for endpoint in config.endpoints.build(epoch_seconds)? {
            pipeline.register(endpoint)?;
        }
        Ok(pipeline)
    }

    /// Adds a calculator. Its columns follow those already registered.
    pub fn register(&mut self, endpoint: Box<dyn ActivityEndpoint>) -> Result<(), ConfigError> {
        let names = endpoint.names();
        if let Some(name) = names.iter().find(|n| self.table.column(n).is_some()) {
            return Err(ConfigError::DuplicateColumn(name.clone()));
        }
        for name in names {
            self.table.reserve(name)?;
        }
        self.endpoints.push(endpoint);
        Ok(())
    }

    pub fn results(&self) -> &ResultsTable {
        &self.table
    }

    pub fn into_results(self) -> ResultsTable {
        self.table
    }

    pub fn day_window(&self) -> DayWindow {
        self.day_window
    }

    /// Processes `days` in order. Days that are too short, barely worn, or
    /// have no sleep opportunity are skipped without a row.
    pub fn process(
        &mut self,
        recording: &Recording,
        days: &[IndexWindow],
        detector: &dyn SleepOpportunityDetector,
        classifier: &dyn SleepClassifier,
    ) -> Result<(), ConfigError> {
        let epm = epochs_per_minute(recording.epoch_seconds)?;
        let hours_per_epoch = f64::from(recording.epoch_seconds) / 3600.0;
        let wear = recording.wear_blocks();

        for (index, day) in days.iter().enumerate() {
            let day = IndexWindow::new(day.start, day.stop.min(recording.len()));

            let day_hours = day.len() as f64 * hours_per_epoch;
            if day_hours < self.min_day_hours {
                info!(
                    "Day {} has less than {} hours of data ({:.2}), skipping",
                    index + 1,
                    self.min_day_hours,
                    day_hours
                );
                continue;
            }

            let day_wear = day_wear_intersection(&wear, &day);
            let wear_hours = day_wear.iter().map(IndexWindow::len).sum::<usize>() as f64
                * hours_per_epoch;
            if wear_hours < self.min_wear_hours {
                info!(
                    "Day {} has less than {} wear hours ({:.2}), skipping",
                    index + 1,
                    self.min_wear_hours,
                    wear_hours
                );
                continue;
            }

            let context = DayContext {
                index,
                window: day,
                time: &recording.time,
                metric: &recording.metric,
                epoch_seconds: recording.epoch_seconds,
                wear: &day_wear,
            };

            let Some(tso) = detector.detect(&context) else {
                info!("Day {} has no sleep opportunity, skipping", index + 1);
                continue;
            };

            let mut record = DayRecord::new();
            self.day_metadata(&mut record, recording, index, &day, &tso);

            let predictions = classifier.classify(&context);
            let period = SleepPeriod::new(tso_minutes(&predictions, &day, &tso, epm).to_vec());
            record.extend(sleep_endpoints(&period));

            let values = self.activity_values(recording, &day_wear, &tso, epm);
            record.extend(values);

            for name in self.table.push_day(record) {
                warn!("Day {}: value `{}` has no column, dropped", index + 1, name);
            }
            debug!("Day {} processed", index + 1);
        }

        Ok(())
    }

    fn day_metadata(
        &self,
        record: &mut DayRecord,
        recording: &Recording,
        index: usize,
        day: &IndexWindow,
        tso: &TsoWindow,
    ) {
        record.set(DAY_N, (index + 1) as f64);

        if let Some(date) = recording
            .time
            .get(day.start)
            .and_then(|&t| day_date(t, self.day_window.base_hour))
        {
            record.set(DATE, date.format("%Y-%m-%d").to_string());
        }

        record.set(TSO_START_TIMESTAMP, tso.start_timestamp);
        if let Some(start) = format_timestamp(tso.start_timestamp) {
            record.set(TSO_START, start);
        }
        let duration = tso.indices().len() as f64 * f64::from(recording.epoch_seconds) / 60.0;
        record.set(TSO_DURATION, duration);
    }

    /// Feeds wear blocks outside the sleep window to wake calculators and
    /// those inside it to sleep calculators, then finalizes in registration
    /// order.
    fn activity_values(
        &self,
        recording: &Recording,
        day_wear: &[IndexWindow],
        tso: &TsoWindow,
        epm: usize,
    ) -> Vec<(String, f64)> {
        let mut accumulators: Vec<(EndpointState, Box<dyn EndpointAccumulator + '_>)> = self
            .endpoints
            .iter()
            .map(|e| (e.state(), e.accumulator()))
            .collect();

        let tso_window = tso.indices();
        for block in day_wear {
            for wake in block.subtract(&tso_window) {
                ingest(&mut accumulators, EndpointState::Wake, recording, &wake, epm);
            }
            if let Some(sleep) = block.intersect(&tso_window) {
                ingest(&mut accumulators, EndpointState::Sleep, recording, &sleep, epm);
            }
        }

        accumulators
            .into_iter()
            .flat_map(|(_, acc)| acc.finalize())
            .collect()
    }
}

fn ingest(
    accumulators: &mut [(EndpointState, Box<dyn EndpointAccumulator + '_>)],
    state: EndpointState,
    recording: &Recording,
    window: &IndexWindow,
    epm: usize,
) {
    let metric = &recording.metric[window.start..window.stop];
    // blocks shorter than a minute have no minute means
    let metric_60 = moving_mean(metric, epm, epm).unwrap_or_default();
    let block = MetricBlock {
        metric,
        metric_60: &metric_60,
        epoch_seconds: recording.epoch_seconds,
        epochs_per_minute: epm,
    };

    for (_, acc) in accumulators.iter_mut().filter(|(s, _)| *s == state) {
        acc.ingest(&block);
    }
}

/// Minute predictions covering the sleep opportunity, clamped to what the
/// classifier returned.
fn tso_minutes<'a>(
    predictions: &'a [u8],
    day: &IndexWindow,
    tso: &TsoWindow,
    epm: usize,
) -> &'a [u8] {
    let start = (tso.start.saturating_sub(day.start) / epm).min(predictions.len());
    let stop = (tso.stop.saturating_sub(day.start) / epm).clamp(start, predictions.len());
    &predictions[start..stop]
}
