//! Month grid for the calendar view.

use chrono::{Datelike, Months, NaiveDate};
use std::collections::HashSet;

/// Column headers, Sunday first.
pub const WEEKDAY_HEADERS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// One cell of the month grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalendarCell {
    /// Leading padding before the first day of the month.
    Blank,
    Day {
        date: NaiveDate,
        has_entry: bool,
        is_today: bool,
    },
}

/// A displayed month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarMonth {
    first: NaiveDate,
}

impl CalendarMonth {
    /// `month` is 1-based. Returns `None` for an invalid month.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(|first| Self { first })
    }

    /// The month containing `date`.
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            first: date.with_day(1).unwrap_or(date),
        }
    }

    pub fn year(&self) -> i32 {
        self.first.year()
    }

    pub fn month(&self) -> u32 {
        self.first.month()
    }

    pub fn prev(&self) -> Self {
        Self {
            first: self.first.checked_sub_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    pub fn next(&self) -> Self {
        Self {
            first: self.first.checked_add_months(Months::new(1)).unwrap_or(self.first),
        }
    }

    /// E.g. `March 2024`.
    pub fn title(&self) -> String {
        let name = MONTH_NAMES[self.first.month0() as usize];
        format!("{name} {}", self.first.year())
    }

    pub fn days_in_month(&self) -> u32 {
        self.next()
            .first
            .signed_duration_since(self.first)
            .num_days()
            .max(28) as u32
    }

    /// Leading blanks followed by one cell per day.
    pub fn grid(&self, entry_dates: &HashSet<NaiveDate>, today: NaiveDate) -> Vec<CalendarCell> {
        let leading = self.first.weekday().num_days_from_sunday() as usize;
        let mut cells = vec![CalendarCell::Blank; leading];
        cells.extend(self.first.iter_days().take(self.days_in_month() as usize).map(|date| {
            CalendarCell::Day {
                date,
                has_entry: entry_dates.contains(&date),
                is_today: date == today,
            }
        }));
        cells
    }
}
