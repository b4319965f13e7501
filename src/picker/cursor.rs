use std::iter::successors;
use thiserror::Error;
use time::{Date, Month};

/// The month & year whose grid is currently displayed.
///
/// Internally this is the first day of the month, so a cursor can only ever
/// point at a month that the `time` crate can represent.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct NavigationCursor {
    first: Date,
}

impl NavigationCursor {
    pub(crate) fn new(year: i32, month: Month) -> Result<Self, OutOfTimeError> {
        Date::from_calendar_date(year, month, 1)
            .map(|first| NavigationCursor { first })
            .map_err(|_| OutOfTimeError)
    }

    /// Returns the cursor for the month containing `date`
    pub(crate) fn containing(date: Date) -> Self {
        NavigationCursor {
            first: first_of_month(date),
        }
    }

    pub(crate) fn year(&self) -> i32 {
        self.first.year()
    }

    pub(crate) fn month(&self) -> Month {
        self.first.month()
    }

    pub(crate) fn first_day(&self) -> Date {
        self.first
    }

    /// Number of placeholder cells preceding the 1st of the month in a
    /// Sunday-first grid
    pub(crate) fn leading_blanks(&self) -> u8 {
        self.first.weekday().number_days_from_sunday()
    }

    /// Iterates over every day of the month in order
    pub(crate) fn days(&self) -> impl Iterator<Item = Date> {
        let month = self.month();
        successors(Some(self.first), |&d| d.next_day()).take_while(move |d| d.month() == month)
    }

    pub(crate) fn days_in_month(&self) -> u8 {
        // The day before the first of the next month.  December 9999 has no
        // next month, so fall back to walking the days.
        self.next_month()
            .ok()
            .and_then(|next| next.first.previous_day())
            .or_else(|| self.days().last())
            .map_or(1, Date::day)
    }

    pub(crate) fn contains(&self, date: Date) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    pub(crate) fn next_month(&self) -> Result<Self, OutOfTimeError> {
        let (year, month) = match self.month() {
            Month::December => {
                let year = self.year().checked_add(1).ok_or(OutOfTimeError)?;
                (year, Month::January)
            }
            m => (self.year(), m.next()),
        };
        NavigationCursor::new(year, month)
    }

    pub(crate) fn previous_month(&self) -> Result<Self, OutOfTimeError> {
        let (year, month) = match self.month() {
            Month::January => {
                let year = self.year().checked_sub(1).ok_or(OutOfTimeError)?;
                (year, Month::December)
            }
            m => (self.year(), m.previous()),
        };
        NavigationCursor::new(year, month)
    }
}

impl std::fmt::Display for NavigationCursor {
    /// Formats as the month name followed by the year, e.g. "March 2024"
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.month(), self.year())
    }
}

#[derive(Copy, Clone, Debug, Eq, Error, PartialEq)]
#[error("reached the end of time")]
pub(crate) struct OutOfTimeError;

fn first_of_month(date: Date) -> Date {
    // Every month has a day 1, so this never falls back
    date.replace_day(1).unwrap_or(date)
}
