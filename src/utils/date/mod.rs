// Date range utilities
// Calendar arithmetic shared by the projector, the grid controllers and the CLI

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// Format used for every date string crossing the crate boundary.
pub const ISO_DATE_FORMAT: &str = "%Y-%m-%d";

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateSpan {
    /// Create a span, returning `None` when `start` is after `end`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// Create a span from two dates in either order.
    pub fn between(a: NaiveDate, b: NaiveDate) -> Self {
        if a <= b {
            Self { start: a, end: b }
        } else {
            Self { start: b, end: a }
        }
    }

    /// A span covering a single day.
    pub fn single(date: NaiveDate) -> Self {
        Self {
            start: date,
            end: date,
        }
    }

    /// A span of `days` days beginning at `start`. Zero days yields a single-day span.
    pub fn starting_at(start: NaiveDate, days: u32) -> Option<Self> {
        let end = add_days(start, i64::from(days.max(1)) - 1)?;
        Some(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Intersection of two spans, `None` when they do not overlap.
    pub fn intersect(&self, other: &DateSpan) -> Option<DateSpan> {
        DateSpan::new(self.start.max(other.start), self.end.min(other.end))
    }

    /// Number of days in the span, both ends included.
    pub fn len_days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn days(&self) -> DayIter {
        days_inclusive(self.start, self.end)
    }
}

/// Iterator over consecutive calendar days, both ends included.
#[derive(Debug, Clone)]
pub struct DayIter {
    next: Option<NaiveDate>,
    end: NaiveDate,
}

impl Iterator for DayIter {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        if current > self.end {
            self.next = None;
            return None;
        }
        self.next = if current == self.end {
            None
        } else {
            current.succ_opt()
        };
        Some(current)
    }
}

/// Iterate every day from `start` through `end`. Empty when `start > end`.
pub fn days_inclusive(start: NaiveDate, end: NaiveDate) -> DayIter {
    DayIter {
        next: Some(start),
        end,
    }
}

/// Add (or subtract) whole days, `None` on calendar overflow.
pub fn add_days(date: NaiveDate, days: i64) -> Option<NaiveDate> {
    date.checked_add_signed(Duration::days(days))
}

/// Add (or subtract) whole months. Days past the end of the target month
/// clamp to its last day (Jan 31 + 1 month = Feb 28/29).
pub fn add_months(date: NaiveDate, months: i32) -> Option<NaiveDate> {
    let magnitude = Months::new(months.unsigned_abs());
    if months >= 0 {
        date.checked_add_months(magnitude)
    } else {
        date.checked_sub_months(magnitude)
    }
}

pub fn format_iso(date: NaiveDate) -> String {
    date.format(ISO_DATE_FORMAT).to_string()
}

/// Parse an ISO calendar date. A trailing time component
/// (`2025-03-01T00:00:00Z`, `2025-03-01 12:00`) is ignored.
pub fn parse_iso(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = match value.char_indices().nth(10) {
        Some((idx, 'T')) | Some((idx, ' ')) => &value[..idx],
        _ => value,
    };
    NaiveDate::parse_from_str(date_part, ISO_DATE_FORMAT).ok()
}

/// Partition a span into display rows. The first row starts exactly at
/// `span.start`; every following row starts on a Monday. Rows end on Sunday
/// or at `span.end`, whichever comes first.
pub fn week_rows(span: DateSpan) -> Vec<DateSpan> {
    let mut rows = Vec::new();
    let mut row_start = span.start;

    loop {
        let to_sunday = 6 - i64::from(row_start.weekday().num_days_from_monday());
        let row_end = add_days(row_start, to_sunday)
            .map(|sunday| sunday.min(span.end))
            .unwrap_or(span.end);
        rows.push(DateSpan {
            start: row_start,
            end: row_end,
        });

        if row_end >= span.end {
            break;
        }
        match row_end.succ_opt() {
            Some(next) => row_start = next,
            None => break,
        }
    }

    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_span_rejects_inverted_range() {
        assert!(DateSpan::new(d(2025, 3, 2), d(2025, 3, 1)).is_none());
        assert_eq!(
            DateSpan::between(d(2025, 3, 2), d(2025, 3, 1)),
            DateSpan::new(d(2025, 3, 1), d(2025, 3, 2)).unwrap()
        );
    }

    #[test]
    fn test_days_inclusive_counts_both_ends() {
        let days: Vec<_> = days_inclusive(d(2025, 2, 27), d(2025, 3, 2)).collect();
        assert_eq!(
            days,
            vec![d(2025, 2, 27), d(2025, 2, 28), d(2025, 3, 1), d(2025, 3, 2)]
        );
        assert_eq!(days_inclusive(d(2025, 3, 2), d(2025, 3, 1)).count(), 0);
    }

    #[test]
    fn test_intersect() {
        let window = DateSpan::new(d(2025, 3, 1), d(2025, 3, 20)).unwrap();
        let period = DateSpan::new(d(2025, 2, 20), d(2025, 3, 5)).unwrap();
        assert_eq!(
            window.intersect(&period),
            DateSpan::new(d(2025, 3, 1), d(2025, 3, 5))
        );

        let outside = DateSpan::new(d(2025, 4, 1), d(2025, 4, 5)).unwrap();
        assert!(window.intersect(&outside).is_none());
    }

    #[test]
    fn test_add_months_clamps_to_month_end() {
        assert_eq!(add_months(d(2025, 1, 31), 1), Some(d(2025, 2, 28)));
        assert_eq!(add_months(d(2024, 1, 31), 1), Some(d(2024, 2, 29)));
        assert_eq!(add_months(d(2025, 3, 15), -3), Some(d(2024, 12, 15)));
    }

    #[test]
    fn test_parse_iso_accepts_time_suffix() {
        assert_eq!(parse_iso("2025-03-01"), Some(d(2025, 3, 1)));
        assert_eq!(parse_iso(" 2025-03-01T10:00:00Z "), Some(d(2025, 3, 1)));
        assert_eq!(parse_iso("2025-03-01 10:00"), Some(d(2025, 3, 1)));
        assert_eq!(parse_iso("01/03/2025"), None);
        assert_eq!(parse_iso("2025-02-30"), None);
        assert_eq!(format_iso(d(2025, 3, 1)), "2025-03-01");
    }

    #[test]
    fn test_week_rows_first_row_starts_at_requested_date() {
        // 2025-03-05 is a Wednesday
        let span = DateSpan::new(d(2025, 3, 5), d(2025, 3, 20)).unwrap();
        let rows = week_rows(span);

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], DateSpan::new(d(2025, 3, 5), d(2025, 3, 9)).unwrap());
        assert_eq!(rows[1], DateSpan::new(d(2025, 3, 10), d(2025, 3, 16)).unwrap());
        assert_eq!(rows[2], DateSpan::new(d(2025, 3, 17), d(2025, 3, 20)).unwrap());
        assert!(rows[1..].iter().all(|row| row.start.weekday() == Weekday::Mon));
    }

    #[test]
    fn test_week_rows_single_day() {
        let rows = week_rows(DateSpan::single(d(2025, 3, 9)));
        assert_eq!(rows, vec![DateSpan::single(d(2025, 3, 9))]);
    }
}
