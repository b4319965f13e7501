use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use time::{
    format_description::BorrowedFormatItem, macros::format_description, Date, Month,
};

/// Format of the human-readable label shown for a selected date, e.g. "Tue,
/// Mar 5, 2024"
static LABEL_FMT: &[BorrowedFormatItem<'_>] =
    format_description!("[weekday repr:short], [month repr:short] [day padding:none], [year]");

/// Canonical `year-month-day` identifier for a calendar date, with a 1-based
/// month and no zero padding (e.g. `2024-3-5`).
///
/// Keys order by their string form, not chronologically, so `2024-3-12`
/// sorts before `2024-3-5`.
// Field order matters for the derived `Ord`: `key` must come first.  `date`
// only breaks ties between equal keys, which always name the same date.
#[derive(Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub(crate) struct DateKey {
    key: String,
    date: Date,
}

impl DateKey {
    pub(crate) fn date(&self) -> Date {
        self.date
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.key
    }

    /// Returns the date formatted for display in the list of selected dates
    pub(crate) fn label(&self) -> String {
        self.date
            .format(LABEL_FMT)
            .unwrap_or_else(|_| self.key.clone())
    }
}

impl From<Date> for DateKey {
    fn from(date: Date) -> DateKey {
        let key = format!("{}-{}-{}", date.year(), u8::from(date.month()), date.day());
        DateKey { key, date }
    }
}

impl fmt::Display for DateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

impl FromStr for DateKey {
    type Err = ParseKeyError;

    /// Parses a `year-month-day` string.  Zero-padded components are
    /// accepted; the resulting key is always in canonical unpadded form.
    fn from_str(s: &str) -> Result<DateKey, ParseKeyError> {
        let (negative, rest) = match s.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, s),
        };
        let mut parts = rest.split('-');
        let (Some(year), Some(month), Some(day), None) =
            (parts.next(), parts.next(), parts.next(), parts.next())
        else {
            return Err(ParseKeyError::Format(s.to_owned()));
        };
        let (Some(year), Some(month), Some(day)) = (
            parse_digits::<i32>(year),
            parse_digits::<u8>(month),
            parse_digits::<u8>(day),
        ) else {
            return Err(ParseKeyError::Format(s.to_owned()));
        };
        let year = if negative { -year } else { year };
        Month::try_from(month)
            .and_then(|month| Date::from_calendar_date(year, month, day))
            .map(DateKey::from)
            .map_err(|source| ParseKeyError::Range {
                key: s.to_owned(),
                source,
            })
    }
}

fn parse_digits<T: FromStr>(s: &str) -> Option<T> {
    if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
        s.parse::<T>().ok()
    } else {
        None
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ParseKeyError {
    #[error("date {0:?} is not of the form YEAR-MONTH-DAY")]
    Format(String),
    #[error("date {key:?} does not exist")]
    Range {
        key: String,
        source: time::error::ComponentRange,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn test_key_is_unpadded() {
        assert_eq!(DateKey::from(date!(2024 - 03 - 05)).as_str(), "2024-3-5");
        assert_eq!(DateKey::from(date!(2024 - 12 - 31)).as_str(), "2024-12-31");
        let bce = Date::from_calendar_date(-44, Month::March, 15).unwrap();
        assert_eq!(DateKey::from(bce).as_str(), "-44-3-15");
    }

    #[test]
    fn test_distinct_dates_distinct_keys() {
        // Without separators these would both be "2024111"
        let a = DateKey::from(date!(2024 - 01 - 11));
        let b = DateKey::from(date!(2024 - 11 - 01));
        assert_ne!(a, b);
        assert_ne!(a.as_str(), b.as_str());
    }

    #[test]
    fn test_string_order() {
        let early = DateKey::from(date!(2024 - 03 - 05));
        let late = DateKey::from(date!(2024 - 03 - 12));
        assert!(late < early);
        // '-' sorts before any digit
        let january = DateKey::from(date!(2024 - 01 - 31));
        let october = DateKey::from(date!(2024 - 10 - 01));
        assert!(january < october);
        let december = DateKey::from(date!(2024 - 12 - 01));
        let february = DateKey::from(date!(2024 - 02 - 01));
        assert!(december < february);
        assert!(january < DateKey::from(date!(2025 - 01 - 01)));
    }

    #[test]
    fn test_parse() {
        let key = "2024-3-5".parse::<DateKey>().unwrap();
        assert_eq!(key.date(), date!(2024 - 03 - 05));
        assert_eq!(key.as_str(), "2024-3-5");
        let key = "2024-03-05".parse::<DateKey>().unwrap();
        assert_eq!(key, DateKey::from(date!(2024 - 03 - 05)));
        assert_eq!(key.to_string(), "2024-3-5");
        let key = "-44-3-15".parse::<DateKey>().unwrap();
        assert_eq!(
            key.date(),
            Date::from_calendar_date(-44, Month::March, 15).unwrap()
        );
    }

    #[test]
    fn test_parse_malformed() {
        for s in ["", "2024", "2024-3", "2024-3-5-1", "2024-x-5", "2024--5", "+2024-3-5"] {
            assert_eq!(
                s.parse::<DateKey>(),
                Err(ParseKeyError::Format(s.to_owned())),
                "{s:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_parse_nonexistent() {
        for s in ["2023-2-29", "2024-13-1", "2024-4-31", "2024-0-1"] {
            assert!(
                matches!(s.parse::<DateKey>(), Err(ParseKeyError::Range { .. })),
                "{s:?} should be out of range"
            );
        }
    }

    #[test]
    fn test_label() {
        assert_eq!(
            DateKey::from(date!(2024 - 03 - 05)).label(),
            "Tue, Mar 5, 2024"
        );
        assert_eq!(
            DateKey::from(date!(2025 - 01 - 22)).label(),
            "Wed, Jan 22, 2025"
        );
    }
}
