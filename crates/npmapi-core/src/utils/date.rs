//! Calendar-day helpers for the download statistics service.
//!
//! The downloads API keys every count by a `YYYY-MM-DD` day in UTC.

use chrono::{Days, NaiveDate, Utc};

/// Current day in UTC
pub fn today_utc() -> NaiveDate {
    Utc::now().date_naive()
}

/// Previous day in UTC
pub fn yesterday_utc() -> NaiveDate {
    day_before(today_utc())
}

/// The day before `day`, saturating at the earliest representable date
pub fn day_before(day: NaiveDate) -> NaiveDate {
    day.checked_sub_days(Days::new(1)).unwrap_or(day)
}

/// Format a day the way the downloads API expects it
pub fn format_day(day: NaiveDate) -> String {
    day.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_day_is_zero_padded() {
        let day = NaiveDate::from_ymd_opt(2017, 1, 2).unwrap();
        assert_eq!(format_day(day), "2017-01-02");
    }

    #[test]
    fn test_day_before_crosses_year_boundary() {
        let day = NaiveDate::from_ymd_opt(2020, 1, 1).unwrap();
        assert_eq!(format_day(day_before(day)), "2019-12-31");
    }

    #[test]
    fn test_yesterday_precedes_today() {
        assert!(yesterday_utc() <= today_utc());
    }
}
