use chrono::{DateTime, NaiveDate};
use openwrist_types::{ConfigError, IndexWindow};
use serde::{Deserialize, Serialize};

const SECONDS_PER_HOUR: f64 = 3600.0;
const SECONDS_PER_DAY: f64 = 86_400.0;

/// Daily analysis window: starts at `base_hour` UTC and lasts `period_hours`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DayWindow {
    pub base_hour: u32,
    pub period_hours: u32,
}

impl Default for DayWindow {
    fn default() -> Self {
        // noon to noon keeps each night inside one day
        Self {
            base_hour: 12,
            period_hours: 24,
        }
    }
}

impl DayWindow {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.base_hour >= 24 || self.period_hours == 0 || self.period_hours > 24 {
            return Err(ConfigError::InvalidDayWindow {
                base_hour: self.base_hour,
                period_hours: self.period_hours,
            });
        }
        Ok(())
    }

    pub fn segment(&self, time: &[f64]) -> Result<Vec<IndexWindow>, ConfigError> {
        segment_days(time, self.base_hour, self.period_hours)
    }
}

/// Splits sorted unix timestamps into day windows. Days without any samples
/// are left out.
pub fn segment_days(
    time: &[f64],
    base_hour: u32,
    period_hours: u32,
) -> Result<Vec<IndexWindow>, ConfigError> {
    DayWindow {
        base_hour,
        period_hours,
    }
    .validate()?;

    let (Some(&first), Some(&last)) = (time.first(), time.last()) else {
        return Ok(Vec::new());
    };
    if !first.is_finite() || !last.is_finite() {
        return Ok(Vec::new());
    }

    let base = f64::from(base_hour) * SECONDS_PER_HOUR;
    let period = f64::from(period_hours) * SECONDS_PER_HOUR;

    let mut boundary = ((first - base) / SECONDS_PER_DAY).floor() * SECONDS_PER_DAY + base;
    let mut days = Vec::new();
    while boundary <= last {
        let start = time.partition_point(|&t| t < boundary);
        let stop = time.partition_point(|&t| t < boundary + period);
        if stop > start {
            days.push(IndexWindow::new(start, stop));
        }
        boundary += SECONDS_PER_DAY;
    }

    Ok(days)
}

/// Wear blocks clipped to the day, in order.
pub fn day_wear_intersection(wear: &[IndexWindow], day: &IndexWindow) -> Vec<IndexWindow> {
    wear.iter().filter_map(|w| w.intersect(day)).collect()
}

/// Calendar date a day belongs to. Days starting after midnight (base hour
/// other than 0) are attributed to the date the window opened on.
pub fn day_date(start_timestamp: f64, base_hour: u32) -> Option<NaiveDate> {
    let shifted = start_timestamp - f64::from(base_hour) * SECONDS_PER_HOUR;
    if !shifted.is_finite() {
        return None;
    }
    DateTime::from_timestamp(shifted.floor() as i64, 0).map(|dt| dt.date_naive())
}

/// UTC time with microseconds, e.g. `2025-01-01 23:10:00.000000`.
pub fn format_timestamp(timestamp: f64) -> Option<String> {
    if !timestamp.is_finite() {
        return None;
    }
    let secs = timestamp.floor();
    let nanos = (((timestamp - secs) * 1e9).round() as u32).min(999_999_999);
    DateTime::from_timestamp(secs as i64, nanos)
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S%.6f").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2025-01-01 00:00:00 UTC
    const NEW_YEAR: f64 = 1_735_689_600.0;

    fn minutes_from(start: f64, n: usize) -> Vec<f64> {
        (0..n).map(|i| start + 60.0 * i as f64).collect()
    }

    #[test]
    fn noon_to_noon_days() {
        // 48 hours of minute epochs from midnight
        let time = minutes_from(NEW_YEAR, 48 * 60);
        let days = segment_days(&time, 12, 24).unwrap();

        assert_eq!(
            days,
            vec![
                IndexWindow::new(0, 720),
                IndexWindow::new(720, 2160),
                IndexWindow::new(2160, 2880),
            ]
        );
    }

    #[test]
    fn midnight_days() {
        let time = minutes_from(NEW_YEAR, 48 * 60);
        let days = segment_days(&time, 0, 24).unwrap();
        assert_eq!(
            days,
            vec![IndexWindow::new(0, 1440), IndexWindow::new(1440, 2880)]
        );
    }

    #[test]
    fn short_period_leaves_gaps() {
        let time = minutes_from(NEW_YEAR, 24 * 60);
        let days = segment_days(&time, 8, 12).unwrap();
        assert_eq!(days, vec![IndexWindow::new(480, 1200)]);
    }

    #[test]
    fn empty_time_has_no_days() {
        assert!(segment_days(&[], 12, 24).unwrap().is_empty());
    }

    #[test]
    fn invalid_window_rejected() {
        assert_eq!(
            segment_days(&[0.0], 24, 24),
            Err(ConfigError::InvalidDayWindow {
                base_hour: 24,
                period_hours: 24
            })
        );
        assert!(segment_days(&[0.0], 0, 0).is_err());
        assert!(segment_days(&[0.0], 0, 25).is_err());
    }

    #[test]
    fn wear_clipped_to_day() {
        let wear = [
            IndexWindow::new(0, 100),
            IndexWindow::new(150, 400),
            IndexWindow::new(500, 600),
        ];
        let day = IndexWindow::new(50, 450);
        assert_eq!(
            day_wear_intersection(&wear, &day),
            vec![IndexWindow::new(50, 100), IndexWindow::new(150, 400)]
        );
    }

    #[test]
    fn date_shifts_by_base_hour() {
        // 2025-01-02 11:59 belongs to the day that opened on 2025-01-01 at noon
        let ts = NEW_YEAR + 86_400.0 + 11.0 * 3600.0 + 59.0 * 60.0;
        assert_eq!(
            day_date(ts, 12),
            NaiveDate::from_ymd_opt(2025, 1, 1)
        );
        assert_eq!(day_date(ts, 0), NaiveDate::from_ymd_opt(2025, 1, 2));
        assert_eq!(day_date(f64::NAN, 0), None);
    }

    #[test]
    fn timestamp_format_has_microseconds() {
        assert_eq!(
            format_timestamp(NEW_YEAR + 0.5).as_deref(),
            Some("2025-01-01 00:00:00.500000")
        );
    }
}
