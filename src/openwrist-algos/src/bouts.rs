use openwrist_types::{ConfigError, Thresholds};

use crate::helpers::windowing::{prefix_sums, window_sums};

/// Rule deciding which epochs belong to a sustained bout.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BoutMetric {
    /// Seed a window on a qualifying epoch and grow it while the qualifying
    /// fraction holds (Sabia 2014, da Silva 2014).
    Extended = 1,
    /// Mark fixed windows starting on qualifying epochs that pass the fraction.
    FixedWindow = 2,
    /// Sliding windows, breaks longer than one minute disqualify a window.
    Sliding = 3,
    /// [`BoutMetric::Sliding`] with qualifying first and last epochs.
    SlidingBounded = 4,
}

impl BoutMetric {
    pub fn id(self) -> u8 {
        self as u8
    }
}

impl TryFrom<u8> for BoutMetric {
    type Error = ConfigError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Extended),
            2 => Ok(Self::FixedWindow),
            3 => Ok(Self::Sliding),
            4 => Ok(Self::SlidingBounded),
            other => Err(ConfigError::InvalidBoutMetric(other)),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoutDefinition {
    pub metric: BoutMetric,
    pub duration_minutes: u32,
    /// Fraction of the window that must qualify.
    pub fraction: f64,
    /// Count breaks inside a bout towards its duration. Only affects
    /// [`BoutMetric::Extended`].
    pub closed: bool,
}

impl BoutDefinition {
    pub fn new(
        metric_id: u8,
        duration_minutes: u32,
        fraction: f64,
        closed: bool,
    ) -> Result<Self, ConfigError> {
        let metric = BoutMetric::try_from(metric_id)?;
        if duration_minutes == 0 {
            return Err(ConfigError::InvalidLength("bout duration"));
        }
        if !(fraction > 0.0 && fraction <= 1.0) {
            return Err(ConfigError::InvalidBoutFraction(fraction));
        }

        Ok(Self {
            metric,
            duration_minutes,
            fraction,
            closed,
        })
    }

    /// Bout length in epochs, truncated.
    pub fn window_epochs(&self, epoch_seconds: u32) -> usize {
        (f64::from(self.duration_minutes) * (60.0 / f64::from(epoch_seconds))) as usize
    }

    /// Minutes spent in bouts of `metric` epochs falling inside `thresholds`.
    pub fn minutes(&self, metric: &[f64], thresholds: &Thresholds, epoch_seconds: u32) -> f64 {
        if epoch_seconds == 0 {
            return 0.0;
        }

        let n = self.window_epochs(epoch_seconds);
        if n == 0 || metric.len() < n {
            return 0.0;
        }

        let x = thresholds.mask(metric);
        let epochs = match self.metric {
            BoutMetric::Extended => extended_bout_epochs(&x, n, self.fraction, self.closed),
            BoutMetric::FixedWindow => fixed_window_bout_epochs(x, n, self.fraction),
            BoutMetric::Sliding => sliding_bout_epochs(&x, n, self.fraction, epoch_seconds, false),
            BoutMetric::SlidingBounded => {
                sliding_bout_epochs(&x, n, self.fraction, epoch_seconds, true)
            }
        };

        epochs as f64 * (f64::from(epoch_seconds) / 60.0)
    }
}

/// Minutes in bouts for raw thresholds and a numeric bout metric id.
///
/// Fails only when `metric_id` is not one of 1, 2, 3 or 4. Sequences shorter
/// than one bout give 0.
#[allow(clippy::too_many_arguments)]
pub fn detect_bout_minutes(
    metric: &[f64],
    lower_thresh: f64,
    upper_thresh: f64,
    epoch_seconds: u32,
    bout_duration_minutes: u32,
    bout_fraction: f64,
    closed_bout: bool,
    metric_id: u8,
) -> Result<f64, ConfigError> {
    let bout = BoutDefinition {
        metric: BoutMetric::try_from(metric_id)?,
        duration_minutes: bout_duration_minutes,
        fraction: bout_fraction,
        closed: closed_bout,
    };
    let thresholds = Thresholds {
        lower: lower_thresh,
        upper: upper_thresh,
    };

    Ok(bout.minutes(metric, &thresholds, epoch_seconds))
}

fn qualifying_indices(x: &[u8]) -> Vec<usize> {
    x.iter()
        .enumerate()
        .filter(|(_, v)| **v == 1)
        .map(|(i, _)| i)
        .collect()
}

fn extended_bout_epochs(x: &[u8], n: usize, fraction: f64, closed: bool) -> usize {
    let len = x.len();
    let cs = prefix_sums(x);
    let count = |a: usize, b: usize| (cs[b.min(len)] - cs[a.min(len)]) as f64;
    let p = qualifying_indices(x);

    let mut epochs = 0;
    let mut i = 0;
    while i < p.len() {
        let start = p[i];
        let mut end = start + n;
        let mut jump = 1;

        // a window reaching exactly the end of the sequence may seed a bout
        if end <= len && count(start, end) >= n as f64 * fraction {
            while end < len && count(start, end + 1) > (end + 1 - start) as f64 * fraction {
                end += 1;
            }

            let covered = p.partition_point(|&q| q < end);
            let selected = covered - i;
            jump = selected.max(1);

            epochs += if closed {
                p[covered - 1] - start + 1
            } else {
                selected
            };
        }

        i += jump;
    }

    epochs
}

fn fixed_window_bout_epochs(mut x: Vec<u8>, n: usize, fraction: f64) -> usize {
    let len = x.len();
    // Demotions only touch indices before the current start, so window counts
    // over the unmodified mask stay exact.
    let cs = prefix_sums(&x);
    let p = qualifying_indices(&x);
    let mut in_bout = vec![false; len];

    for (i, &start) in p.iter().enumerate() {
        let end = start + n;
        if end < len {
            if (cs[end] - cs[start]) as f64 > n as f64 * fraction {
                in_bout[start..end].fill(true);
            } else {
                x[start] = 0;
            }
        } else if p.len() > 1 && i > 2 {
            x[start] = x[p[i - 1]];
        }
    }

    x.iter()
        .zip(&in_bout)
        .filter(|(v, marked)| **v == 1 || **marked)
        .count()
}

fn sliding_bout_epochs(
    x: &[u8],
    n: usize,
    fraction: f64,
    epoch_seconds: u32,
    bounded: bool,
) -> usize {
    let len = x.len();
    let cs = prefix_sums(x);

    // +1 so that breaks of exactly one minute are tolerated
    let break_window = (60 / epoch_seconds) as usize + 1;
    let offset = (break_window + 1) / 2 - 1;
    let penalty = (-(60.0 / f64::from(epoch_seconds)) * n as f64) as i64;

    // centered window, truncated at the sequence edges
    let penalized: Vec<i64> = (0..len)
        .map(|i| {
            let lo = i.saturating_sub(offset);
            let hi = (i + break_window - offset).min(len);
            if cs[hi] == cs[lo] {
                penalty
            } else {
                i64::from(x[i])
            }
        })
        .collect();

    let Ok(sums) = window_sums(&penalized, n) else {
        return 0;
    };

    let mut cover = vec![0_i64; len + 1];
    for (j, &sum) in sums.iter().enumerate() {
        if sum as f64 / n as f64 <= fraction {
            continue;
        }
        if bounded && !(x[j] == 1 && x[j + n - 1] == 1) {
            continue;
        }
        cover[j] += 1;
        cover[j + n] -= 1;
    }

    let mut depth = 0;
    cover[..len]
        .iter()
        .filter(|&&delta| {
            depth += delta;
            depth > 0
        })
        .count()
}
