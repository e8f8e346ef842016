use crate::helpers::stats::mean;

/// Summary statistics over the lengths of runs of a single state.
///
/// Every statistic is NaN when there are no runs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentationStats {
    pub avg_duration: f64,
    pub transition_probability: f64,
    pub gini_index: f64,
    pub avg_hazard: f64,
    pub power_law: f64,
}

impl FragmentationStats {
    pub const NAMES: [&'static str; 5] = [
        "avg duration",
        "transition probability",
        "gini index",
        "avg hazard",
        "power law distribution",
    ];

    pub fn from_lengths(lengths: &[usize]) -> Self {
        Self {
            avg_duration: average_duration(lengths),
            transition_probability: transition_probability(lengths),
            gini_index: gini_index(lengths),
            avg_hazard: average_hazard(lengths),
            power_law: power_law_exponent(lengths),
        }
    }

    /// Values in the order of [`FragmentationStats::NAMES`].
    pub fn values(&self) -> [f64; 5] {
        [
            self.avg_duration,
            self.transition_probability,
            self.gini_index,
            self.avg_hazard,
            self.power_law,
        ]
    }
}

fn as_f64(lengths: &[usize]) -> Vec<f64> {
    lengths.iter().map(|&l| l as f64).collect()
}

pub fn average_duration(lengths: &[usize]) -> f64 {
    mean(&as_f64(lengths))
}

/// Probability of leaving the state on any given epoch, `1 / mean(lengths)`.
pub fn transition_probability(lengths: &[usize]) -> f64 {
    1.0 / average_duration(lengths)
}

/// Bias-corrected Gini index of the run lengths. A single run is maximally
/// unequal.
pub fn gini_index(lengths: &[usize]) -> f64 {
    match lengths.len() {
        0 => return f64::NAN,
        1 => return 1.0,
        _ => {}
    }

    let mut sorted = as_f64(lengths);
    sorted.sort_by(f64::total_cmp);

    let n = sorted.len() as f64;
    let total: f64 = sorted.iter().sum();
    if total == 0.0 {
        return f64::NAN;
    }

    let weighted: f64 = sorted
        .iter()
        .enumerate()
        .map(|(i, l)| (2.0 * (i as f64 + 1.0) - n - 1.0) * l)
        .sum();

    weighted / (n * total) * (n / (n - 1.0))
}

/// Mean over unique lengths of the chance that a run reaching that length
/// ends there.
pub fn average_hazard(lengths: &[usize]) -> f64 {
    if lengths.is_empty() {
        return f64::NAN;
    }

    let mut sorted = lengths.to_vec();
    sorted.sort_unstable();

    let n = sorted.len();
    let mut hazards = Vec::new();
    let mut i = 0;
    while i < n {
        let run_end = sorted[i..].partition_point(|&l| l == sorted[i]) + i;
        let ending_here = (run_end - i) as f64;
        let at_least = (n - i) as f64;
        hazards.push(ending_here / at_least);
        i = run_end;
    }

    mean(&hazards)
}

/// Maximum-likelihood exponent of a discrete power law fitted to the lengths.
pub fn power_law_exponent(lengths: &[usize]) -> f64 {
    let Some(&min) = lengths.iter().min() else {
        return f64::NAN;
    };

    let x_min = min as f64 - 0.5;
    let log_sum: f64 = lengths.iter().map(|&l| (l as f64 / x_min).ln()).sum();

    1.0 + lengths.len() as f64 / log_sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_lengths_are_nan() {
        let stats = FragmentationStats::from_lengths(&[]);
        assert!(stats.values().iter().all(|v| v.is_nan()));
    }

    #[test]
    fn duration_and_transition() {
        let lengths = [2, 4, 6];
        assert!(close(average_duration(&lengths), 4.0));
        assert!(close(transition_probability(&lengths), 0.25));
    }

    #[test]
    fn gini_equal_lengths_is_zero() {
        assert!(close(gini_index(&[3, 3, 3, 3]), 0.0));
    }

    #[test]
    fn gini_single_run_is_one() {
        assert_eq!(gini_index(&[7]), 1.0);
    }

    #[test]
    fn gini_two_runs() {
        // sorted [1, 3]: (-1*1 + 1*3) / (2*4) * 2 = 0.5
        assert!(close(gini_index(&[3, 1]), 0.5));
    }

    #[test]
    fn hazard_counts_unique_lengths() {
        // lengths 1: 2 of 4 end, 2: 1 of 2 end, 5: 1 of 1 ends
        let h = average_hazard(&[1, 5, 1, 2]);
        assert!(close(h, (0.5 + 0.5 + 1.0) / 3.0), "hazard was {}", h);
    }

    #[test]
    fn hazard_single_length() {
        assert!(close(average_hazard(&[4, 4, 4]), 1.0));
    }

    #[test]
    fn power_law_matches_closed_form() {
        let lengths = [1, 2, 4];
        let expected = 1.0 + 3.0 / ((1.0_f64 / 0.5).ln() + (2.0_f64 / 0.5).ln() + (4.0_f64 / 0.5).ln());
        assert!(close(power_law_exponent(&lengths), expected));
    }

    #[test]
    fn values_follow_names_order() {
        let stats = FragmentationStats::from_lengths(&[2, 2]);
        let values = stats.values();
        assert_eq!(values.len(), FragmentationStats::NAMES.len());
        assert!(close(values[0], 2.0));
        assert!(close(values[1], 0.5));
    }
}
