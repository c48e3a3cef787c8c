//! Time-related utilities with clock abstraction for testability.
//!
//! Report listings are filtered by calendar day or year. Calendar boundaries
//! are computed in a configurable fixed UTC offset (the campus timezone) and
//! then converted back to UTC instants, which is what the stores compare
//! `created_at` against.

use chrono::{DateTime, Datelike, FixedOffset, NaiveDate, TimeZone, Utc};

/// Clock trait for dependency injection and testing
pub trait Clock: Send + Sync {
    /// Current instant
    fn now(&self) -> DateTime<Utc>;
}

/// System clock implementation (uses actual system time)
#[derive(Debug, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Fixed clock implementation for testing (returns a fixed time)
#[derive(Debug, Clone, Copy)]
pub struct FixedClock {
    fixed_time: DateTime<Utc>,
}

impl FixedClock {
    /// Create a new fixed clock with the given instant
    pub fn new(fixed_time: DateTime<Utc>) -> Self {
        Self { fixed_time }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.fixed_time
    }
}

/// Half-open interval `[start, end)` of UTC instants.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl DateRange {
    /// Whether `instant` falls inside the range.
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant < self.end
    }
}

/// Build the calendar range for a year, a month of a year, or a single day.
///
/// - year only: `[Jan 1, Jan 1 of next year)`
/// - year + month: `[1st of month, 1st of next month)`
/// - year + month + day: `[that day, next day)`
///
/// A day without a month is treated as a whole-year query, the same way the
/// REST listing treats it. Returns `None` for dates that do not exist.
pub fn date_range(
    year: i32,
    month: Option<u32>,
    day: Option<u32>,
    offset: FixedOffset,
) -> Option<DateRange> {
    let (from, to) = match (month, day) {
        (Some(month), Some(day)) => {
            let from = NaiveDate::from_ymd_opt(year, month, day)?;
            (from, from.succ_opt()?)
        }
        (Some(month), None) => {
            let from = NaiveDate::from_ymd_opt(year, month, 1)?;
            let to = if month == 12 {
                NaiveDate::from_ymd_opt(year + 1, 1, 1)?
            } else {
                NaiveDate::from_ymd_opt(year, month + 1, 1)?
            };
            (from, to)
        }
        (None, _) => (
            NaiveDate::from_ymd_opt(year, 1, 1)?,
            NaiveDate::from_ymd_opt(year + 1, 1, 1)?,
        ),
    };

    Some(DateRange {
        start: local_midnight(from, offset)?,
        end: local_midnight(to, offset)?,
    })
}

/// Range covering the calendar day that contains `now` in `offset`.
pub fn day_range(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateRange> {
    let local = now.with_timezone(&offset);
    date_range(
        local.year(),
        Some(local.month()),
        Some(local.day()),
        offset,
    )
}

/// Range covering the calendar year that contains `now` in `offset`.
pub fn year_range(now: DateTime<Utc>, offset: FixedOffset) -> Option<DateRange> {
    let local = now.with_timezone(&offset);
    date_range(local.year(), None, None, offset)
}

/// Format an instant as RFC 3339 in the given offset
pub fn to_rfc3339_in(instant: DateTime<Utc>, offset: FixedOffset) -> String {
    instant.with_timezone(&offset).to_rfc3339()
}

/// Build a `FixedOffset` from whole hours east of UTC.
///
/// Returns `None` when the offset is not strictly within ±24 hours.
pub fn offset_from_hours(hours: i32) -> Option<FixedOffset> {
    hours.checked_mul(3600).and_then(FixedOffset::east_opt)
}

fn local_midnight(date: NaiveDate, offset: FixedOffset) -> Option<DateTime<Utc>> {
    let naive = date.and_hms_opt(0, 0, 0)?;
    offset
        .from_local_datetime(&naive)
        .single()
        .map(|local| local.with_timezone(&Utc))
}
