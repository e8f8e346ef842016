use thiserror::Error;

/// Misconfiguration detected while building calculators or the pipeline.
///
/// Per-day processing never produces these; short or empty data degrades to
/// zero or NaN results instead.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("unknown intensity level `{0}`")]
    InvalidLevel(String),
    #[error("unknown endpoint state `{0}`, expected `wake` or `sleep`")]
    InvalidState(String),
    #[error("unknown cutpoint set `{0}`")]
    UnknownCutpoints(String),
    #[error("malformed cutpoints: {0}")]
    MalformedCutpoints(String),
    #[error("bout metric must be in {{1, 2, 3, 4}}, got {0}")]
    InvalidBoutMetric(u8),
    #[error("bout fraction must be in (0, 1], got {0}")]
    InvalidBoutFraction(f64),
    #[error("{0} must be a positive number of minutes")]
    InvalidLength(&'static str),
    #[error("malformed histogram edges: {0}")]
    MalformedEdges(String),
    #[error("epoch length must divide a minute, got {0}s")]
    InvalidEpoch(u32),
    #[error("day window must start at an hour in 0..24 and last 1 to 24 hours, got ({base_hour}, {period_hours})")]
    InvalidDayWindow { base_hour: u32, period_hours: u32 },
    #[error("result column `{0}` is already registered")]
    DuplicateColumn(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_offending_value() {
        assert_eq!(
            ConfigError::InvalidLevel("medium".into()).to_string(),
            "unknown intensity level `medium`"
        );
        assert_eq!(
            ConfigError::InvalidBoutMetric(5).to_string(),
            "bout metric must be in {1, 2, 3, 4}, got 5"
        );
    }
}
