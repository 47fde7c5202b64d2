// Calendar window math and reminder lead-time formatting.
// All server-side date arithmetic is UTC; the client localizes for display.

use chrono::{Datelike, NaiveDate, TimeZone, Timelike, Utc};

/// Time-of-day bucket used by the event filters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
}

impl TimeOfDay {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "morning" => Some(TimeOfDay::Morning),
            "afternoon" => Some(TimeOfDay::Afternoon),
            "evening" => Some(TimeOfDay::Evening),
            _ => None,
        }
    }
}

/// Bucket for a unix timestamp: morning 06-12, afternoon 12-18, evening wraps 18-06
pub fn time_of_day(timestamp: i64) -> TimeOfDay {
    let hour = Utc
        .timestamp_opt(timestamp, 0)
        .single()
        .map(|dt| dt.hour())
        .unwrap_or(0);

    if (6..12).contains(&hour) {
        TimeOfDay::Morning
    } else if (12..18).contains(&hour) {
        TimeOfDay::Afternoon
    } else {
        TimeOfDay::Evening
    }
}

fn midnight(date: NaiveDate) -> i64 {
    Utc.from_utc_datetime(&date.and_hms_opt(0, 0, 0).unwrap())
        .timestamp()
}

/// [start, end) covering the anchor's calendar day
pub fn day_window(anchor: NaiveDate) -> (i64, i64) {
    let start = midnight(anchor);
    (start, start + 86_400)
}

/// [start, end) covering the anchor's week, Sunday-anchored
pub fn week_window(anchor: NaiveDate) -> (i64, i64) {
    let days_from_sunday = anchor.weekday().num_days_from_sunday() as i64;
    let start = midnight(anchor) - days_from_sunday * 86_400;
    (start, start + 7 * 86_400)
}

/// [start, end) covering the anchor's calendar month
pub fn month_window(anchor: NaiveDate) -> (i64, i64) {
    let first = NaiveDate::from_ymd_opt(anchor.year(), anchor.month(), 1).unwrap();
    let next_first = if anchor.month() == 12 {
        NaiveDate::from_ymd_opt(anchor.year() + 1, 1, 1).unwrap()
    } else {
        NaiveDate::from_ymd_opt(anchor.year(), anchor.month() + 1, 1).unwrap()
    };
    (midnight(first), midnight(next_first))
}

/// Human wording for a reminder lead time: "15 minutes", "3 hours", "1 day"
pub fn format_lead_time(minutes: i64) -> String {
    if minutes < 60 {
        plural(minutes, "minute")
    } else if minutes < 60 * 24 {
        plural(minutes / 60, "hour")
    } else {
        plural(minutes / (60 * 24), "day")
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("{} {}", count, unit)
    } else {
        format!("{} {}s", count, unit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn ts(y: i32, m: u32, d: u32, h: u32, min: u32) -> i64 {
        Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap().timestamp()
    }

    #[test]
    fn test_day_window_contains_only_that_day() {
        let (start, end) = day_window(date(2025, 4, 15));
        assert_eq!(end - start, 86_400);
        assert!(ts(2025, 4, 15, 0, 0) >= start);
        assert!(ts(2025, 4, 15, 23, 59) < end);
        assert!(ts(2025, 4, 16, 0, 0) >= end);
    }

    #[test]
    fn test_week_window_is_sunday_anchored() {
        // 2025-04-15 is a Tuesday; its week starts Sunday 2025-04-13
        let (start, end) = week_window(date(2025, 4, 15));
        assert_eq!(start, ts(2025, 4, 13, 0, 0));
        assert_eq!(end - start, 7 * 86_400);

        // A Sunday anchors its own week
        let (sun_start, _) = week_window(date(2025, 4, 13));
        assert_eq!(sun_start, start);
    }

    #[test]
    fn test_month_window_boundaries() {
        let (start, end) = month_window(date(2025, 4, 15));
        assert_eq!(start, ts(2025, 4, 1, 0, 0));
        assert_eq!(end, ts(2025, 5, 1, 0, 0));
    }

    #[test]
    fn test_month_window_december_rolls_over() {
        let (start, end) = month_window(date(2025, 12, 31));
        assert_eq!(start, ts(2025, 12, 1, 0, 0));
        assert_eq!(end, ts(2026, 1, 1, 0, 0));
    }

    #[test]
    fn test_time_of_day_buckets() {
        assert_eq!(time_of_day(ts(2025, 4, 15, 8, 0)), TimeOfDay::Morning);
        assert_eq!(time_of_day(ts(2025, 4, 15, 12, 0)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(ts(2025, 4, 15, 17, 59)), TimeOfDay::Afternoon);
        assert_eq!(time_of_day(ts(2025, 4, 15, 18, 30)), TimeOfDay::Evening);
        // Evening wraps past midnight
        assert_eq!(time_of_day(ts(2025, 4, 15, 2, 0)), TimeOfDay::Evening);
        assert_eq!(time_of_day(ts(2025, 4, 15, 5, 59)), TimeOfDay::Evening);
        assert_eq!(time_of_day(ts(2025, 4, 15, 6, 0)), TimeOfDay::Morning);
    }

    #[test]
    fn test_format_lead_time() {
        assert_eq!(format_lead_time(1), "1 minute");
        assert_eq!(format_lead_time(15), "15 minutes");
        assert_eq!(format_lead_time(60), "1 hour");
        assert_eq!(format_lead_time(180), "3 hours");
        assert_eq!(format_lead_time(1440), "1 day");
        assert_eq!(format_lead_time(2880), "2 days");
    }
}
