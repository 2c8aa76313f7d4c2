//! Calendar windows for date-scoped queries.
//!
//! Presets are resolved against a caller-supplied "today" so the window
//! always reflects the local calendar at query time, not the time zone a
//! record was written in.

use time::{Date, Duration, Month};

/// The date window a query is scoped to.
///
/// Preset windows are inclusive calendar periods containing the current
/// local day; [DateWindow::Custom] carries user-chosen bounds.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum DateWindow {
    /// No date constraint.
    #[default]
    All,
    /// The current local calendar day.
    Today,
    /// The current local calendar week, Sunday through Saturday.
    ThisWeek,
    /// The current local calendar month.
    ThisMonth,
    /// The current local calendar year.
    ThisYear,
    /// A user-chosen window, either an explicit day range or a month of a
    /// year.
    Custom(CustomWindow),
}

/// User-chosen bounds for [DateWindow::Custom].
///
/// An explicit `start`/`end` range and a `month`/`year` pair are alternative
/// ways to fill this in; when both are populated, the explicit range wins.
/// A range or pair with only one half populated matches nothing, and a
/// window with nothing populated applies no date constraint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CustomWindow {
    /// First day of an explicit range, inclusive.
    pub start: Option<Date>,
    /// Last day of an explicit range, inclusive.
    pub end: Option<Date>,
    /// The calendar month of a month-of-year window.
    pub month: Option<Month>,
    /// The calendar year of a month-of-year window.
    pub year: Option<i32>,
}

/// An inclusive range of calendar days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    /// The first day in the range.
    pub start: Date,
    /// The last day in the range.
    pub end: Date,
}

impl DateRange {
    /// Whether `date` falls within the range, bounds included.
    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// The day bounds a [DateWindow] resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum WindowBounds {
    /// Every day matches.
    Unbounded,
    /// Days within the range match.
    Between(DateRange),
    /// No day matches.
    Empty,
}

impl WindowBounds {
    pub(crate) fn contains(&self, date: Date) -> bool {
        match self {
            WindowBounds::Unbounded => true,
            WindowBounds::Between(range) => range.contains(date),
            WindowBounds::Empty => false,
        }
    }
}

/// Resolve a window to concrete day bounds, anchored on the local calendar
/// day `today`.
pub(crate) fn window_bounds(window: &DateWindow, today: Date) -> WindowBounds {
    match window {
        DateWindow::All => WindowBounds::Unbounded,
        DateWindow::Today => WindowBounds::Between(DateRange {
            start: today,
            end: today,
        }),
        DateWindow::ThisWeek => WindowBounds::Between(week_bounds(today)),
        DateWindow::ThisMonth => {
            WindowBounds::Between(month_bounds(today.year(), today.month()))
        }
        DateWindow::ThisYear => WindowBounds::Between(year_bounds(today.year())),
        DateWindow::Custom(custom) => custom_bounds(custom),
    }
}

fn custom_bounds(custom: &CustomWindow) -> WindowBounds {
    // An explicit range wins over a month/year pair when both are set.
    if custom.start.is_some() || custom.end.is_some() {
        return match (custom.start, custom.end) {
            (Some(start), Some(end)) => WindowBounds::Between(DateRange { start, end }),
            // A range with a single bound matches nothing.
            _ => WindowBounds::Empty,
        };
    }

    match (custom.month, custom.year) {
        (Some(month), Some(year)) => WindowBounds::Between(month_bounds(year, month)),
        (None, None) => WindowBounds::Unbounded,
        // Same treatment as a half-specified range.
        _ => WindowBounds::Empty,
    }
}

fn week_bounds(anchor_date: Date) -> DateRange {
    let days_from_sunday = anchor_date.weekday().number_days_from_sunday() as i64;
    let start = anchor_date - Duration::days(days_from_sunday);
    let end = start + Duration::days(6);

    DateRange { start, end }
}

fn month_bounds(year: i32, month: Month) -> DateRange {
    let start = Date::from_calendar_date(year, month, 1).expect("invalid month start date");
    let end = Date::from_calendar_date(year, month, last_day_of_month(year, month))
        .expect("invalid month end date");

    DateRange { start, end }
}

fn year_bounds(year: i32) -> DateRange {
    DateRange {
        start: Date::from_calendar_date(year, Month::January, 1).expect("invalid year start date"),
        end: Date::from_calendar_date(year, Month::December, 31).expect("invalid year end date"),
    }
}

fn last_day_of_month(year: i32, month: Month) -> u8 {
    match month {
        Month::January
        | Month::March
        | Month::May
        | Month::July
        | Month::August
        | Month::October
        | Month::December => 31,
        Month::April | Month::June | Month::September | Month::November => 30,
        Month::February => {
            if is_leap_year(year) {
                29
            } else {
                28
            }
        }
    }
}

fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}
