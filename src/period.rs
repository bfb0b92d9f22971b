use crate::error::{DashboardError, Result};
use crate::utils::{day_count_inclusive, end_of_day, start_of_day};
use chrono::{Duration, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// An inclusive reporting window, day-normalized: start pinned to
/// 00:00:00.000 and end to 23:59:59.999.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportingPeriod {
    start: NaiveDateTime,
    end: NaiveDateTime,
}

impl ReportingPeriod {
    pub fn days(start_day: NaiveDate, end_day: NaiveDate) -> Result<Self> {
        if end_day < start_day {
            return Err(DashboardError::InvalidPeriod(format!(
                "end day {} precedes start day {}",
                end_day, start_day
            )));
        }

        Ok(Self {
            start: start_of_day(start_day),
            end: end_of_day(end_day),
        })
    }

    pub fn single_day(day: NaiveDate) -> Self {
        Self {
            start: start_of_day(day),
            end: end_of_day(day),
        }
    }

    pub fn start(&self) -> NaiveDateTime {
        self.start
    }

    pub fn end(&self) -> NaiveDateTime {
        self.end
    }

    pub fn start_day(&self) -> NaiveDate {
        self.start.date()
    }

    pub fn end_day(&self) -> NaiveDate {
        self.end.date()
    }

    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    pub fn day_count(&self) -> i64 {
        day_count_inclusive(self.start_day(), self.end_day())
    }

    /// The preceding window of identical duration, ending exactly one
    /// millisecond before this period starts. Equal length and a 1ms gap
    /// hold for any period length, which keeps the percentage-change
    /// computation uniform across day, week and custom ranges.
    pub fn comparison(&self) -> ReportingPeriod {
        let end = self.start - Duration::milliseconds(1);
        let start = end - self.duration();
        Self { start, end }
    }

    /// The date-range string pair stored alongside cached snapshots.
    pub fn range_key(&self) -> (String, String) {
        (
            self.start_day().format("%Y-%m-%d").to_string(),
            self.end_day().format("%Y-%m-%d").to_string(),
        )
    }
}

/// Percentage change against the comparison period. A zero comparison
/// total is defined as 100% when the current total is positive and 0%
/// otherwise, so the computation never divides by zero.
pub fn percentage_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        if current > 0.0 {
            100.0
        } else {
            0.0
        }
    } else {
        (current - previous) / previous * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_day_normalization() {
        let period = ReportingPeriod::days(day(2023, 6, 1), day(2023, 6, 7)).unwrap();
        assert_eq!(period.start().to_string(), "2023-06-01 00:00:00");
        assert_eq!(period.end().to_string(), "2023-06-07 23:59:59.999");
        assert_eq!(period.day_count(), 7);
    }

    #[test]
    fn test_inverted_range_rejected() {
        let result = ReportingPeriod::days(day(2023, 6, 7), day(2023, 6, 1));
        assert!(result.is_err());
    }

    #[test]
    fn test_comparison_window_week() {
        let period = ReportingPeriod::days(day(2023, 6, 8), day(2023, 6, 14)).unwrap();
        let comparison = period.comparison();

        assert_eq!(comparison.duration(), period.duration());
        assert_eq!(
            period.start() - comparison.end(),
            Duration::milliseconds(1)
        );
        assert_eq!(comparison.start_day(), day(2023, 6, 1));
        assert_eq!(comparison.end_day(), day(2023, 6, 7));
    }

    #[test]
    fn test_comparison_window_single_day() {
        let period = ReportingPeriod::single_day(day(2023, 3, 1));
        let comparison = period.comparison();

        assert_eq!(comparison.start_day(), day(2023, 2, 28));
        assert_eq!(comparison.end_day(), day(2023, 2, 28));
        assert_eq!(comparison.duration(), period.duration());
    }

    #[test]
    fn test_contains_is_inclusive() {
        let period = ReportingPeriod::single_day(day(2023, 6, 15));
        assert!(period.contains(period.start()));
        assert!(period.contains(period.end()));
        assert!(!period.contains(period.end() + Duration::milliseconds(1)));
    }

    #[test]
    fn test_percentage_change_policy() {
        assert_eq!(percentage_change(300.0, 0.0), 100.0);
        assert_eq!(percentage_change(0.0, 0.0), 0.0);
        assert_eq!(percentage_change(100.0, 200.0), -50.0);
        assert_eq!(percentage_change(300.0, 200.0), 50.0);
    }

    #[test]
    fn test_range_key() {
        let period = ReportingPeriod::days(day(2023, 6, 1), day(2023, 6, 7)).unwrap();
        assert_eq!(
            period.range_key(),
            ("2023-06-01".to_string(), "2023-06-07".to_string())
        );
    }
}
