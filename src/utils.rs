use chrono::{Days, NaiveDate, NaiveDateTime, NaiveTime};

pub fn start_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// End-of-day pinned to 23:59:59.999, matching the millisecond grain used
/// for period boundaries.
pub fn end_of_day(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap())
}

pub fn epoch_millis(at: NaiveDateTime) -> i64 {
    at.and_utc().timestamp_millis()
}

/// Every calendar day in [start, end], inclusive. Empty when end < start.
pub fn days_in_range(start: NaiveDate, end: NaiveDate) -> Vec<NaiveDate> {
    let mut dates = Vec::new();

    let mut current = start;
    while current <= end {
        dates.push(current);
        match current.checked_add_days(Days::new(1)) {
            Some(next) => current = next,
            None => break,
        }
    }

    dates
}

pub fn day_count_inclusive(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_bounds() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(start_of_day(day).to_string(), "2023-06-15 00:00:00");
        assert_eq!(end_of_day(day).to_string(), "2023-06-15 23:59:59.999");
    }

    #[test]
    fn test_days_in_range_spans_month_boundary() {
        let start = NaiveDate::from_ymd_opt(2023, 1, 30).unwrap();
        let end = NaiveDate::from_ymd_opt(2023, 2, 2).unwrap();
        let days = days_in_range(start, end);
        assert_eq!(days.len(), 4);
        assert_eq!(days[0], start);
        assert_eq!(days[3], end);
    }

    #[test]
    fn test_days_in_range_single_day_and_inverted() {
        let day = NaiveDate::from_ymd_opt(2023, 6, 15).unwrap();
        assert_eq!(days_in_range(day, day), vec![day]);

        let earlier = NaiveDate::from_ymd_opt(2023, 6, 14).unwrap();
        assert!(days_in_range(day, earlier).is_empty());
    }

    #[test]
    fn test_days_in_range_leap_february() {
        let start = NaiveDate::from_ymd_opt(2024, 2, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        assert_eq!(days_in_range(start, end).len(), 29);
        assert_eq!(day_count_inclusive(start, end), 29);
    }
}
