mod cursor;
mod key;
mod widget;
pub(crate) use self::cursor::{NavigationCursor, OutOfTimeError};
pub(crate) use self::key::DateKey;
pub(crate) use self::widget::{MonthGrid, SelectedList, GRID_HEIGHT, GRID_WIDTH};
use std::collections::BTreeSet;
use time::{Date, Duration};

/// State of the date picker: the month on display, the set of selected
/// dates, and the day with keyboard focus.
///
/// Nothing here knows how it is drawn; see [`MonthGrid`] and
/// [`SelectedList`] for that.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct CalendarWidget {
    today: Date,
    cursor: NavigationCursor,
    // Invariant: `focus` is always a day of the month that `cursor` points at
    focus: Date,
    selection: BTreeSet<DateKey>,
}

impl CalendarWidget {
    pub(crate) fn new(today: Date) -> Self {
        CalendarWidget {
            today,
            cursor: NavigationCursor::containing(today),
            focus: today,
            selection: BTreeSet::new(),
        }
    }

    pub(crate) fn start_month(mut self, cursor: NavigationCursor) -> Self {
        self.set_cursor(cursor);
        self
    }

    pub(crate) fn cursor(&self) -> NavigationCursor {
        self.cursor
    }

    pub(crate) fn focused(&self) -> Date {
        self.focus
    }

    /// Iterates over the selected dates in display order, i.e., sorted by
    /// their string keys
    pub(crate) fn selected(&self) -> impl Iterator<Item = &DateKey> {
        self.selection.iter()
    }

    pub(crate) fn selection_len(&self) -> usize {
        self.selection.len()
    }

    /// Lays out the grid for the displayed month: one placeholder per weekday
    /// before the 1st, then one cell per day.
    pub(crate) fn cells(&self) -> Vec<DayCell> {
        let blanks = usize::from(self.cursor.leading_blanks());
        let mut cells = Vec::with_capacity(blanks + usize::from(self.cursor.days_in_month()));
        cells.resize(blanks, DayCell::Placeholder);
        cells.extend(self.cursor.days().map(|date| {
            let key = DateKey::from(date);
            DayCell::Day {
                today: date == self.today,
                selected: self.selection.contains(&key),
                focused: date == self.focus,
                key,
            }
        }));
        cells
    }

    /// Adds `key` to the selection if it isn't already there, or else removes
    /// it.  Returns whether the date is selected afterwards.
    pub(crate) fn toggle(&mut self, key: &DateKey) -> bool {
        debug_assert!(
            self.cursor.contains(key.date()),
            "only dates in the displayed month can be toggled"
        );
        let selected = if self.selection.remove(key) {
            false
        } else {
            self.selection.insert(key.clone());
            true
        };
        log::debug!("Toggled {key}; selected = {selected}");
        selected
    }

    /// Adds `key` to the selection regardless of the displayed month
    pub(crate) fn select(&mut self, key: DateKey) {
        log::debug!("Selecting {key}");
        self.selection.insert(key);
    }

    /// Removes `key` from the selection.  Returns `false` if it was not
    /// selected, in which case nothing changes.
    pub(crate) fn remove(&mut self, key: &DateKey) -> bool {
        let removed = self.selection.remove(key);
        if removed {
            log::debug!("Removed {key} from selection");
        }
        removed
    }

    pub(crate) fn clear(&mut self) {
        log::debug!("Clearing {} selected dates", self.selection.len());
        self.selection.clear();
    }

    pub(crate) fn previous_month(&mut self) -> Result<(), OutOfTimeError> {
        let cursor = self.cursor.previous_month()?;
        self.set_cursor(cursor);
        Ok(())
    }

    pub(crate) fn next_month(&mut self) -> Result<(), OutOfTimeError> {
        let cursor = self.cursor.next_month()?;
        self.set_cursor(cursor);
        Ok(())
    }

    /// Updates what counts as the current date, e.g., after midnight.  The
    /// displayed month and focus stay where they are.
    pub(crate) fn set_today(&mut self, today: Date) {
        if today != self.today {
            log::debug!("Date changed from {} to {today}", self.today);
            self.today = today;
        }
    }

    pub(crate) fn jump_to_today(&mut self) {
        self.cursor = NavigationCursor::containing(self.today);
        self.focus = self.today;
    }

    /// Moves keyboard focus by `days`.  Returns `false` and leaves the focus
    /// alone if that would leave the displayed month.
    pub(crate) fn move_focus(&mut self, days: i64) -> bool {
        match self
            .focus
            .checked_add(Duration::days(days))
            .filter(|&d| self.cursor.contains(d))
        {
            Some(d) => {
                self.focus = d;
                true
            }
            None => false,
        }
    }

    /// Moves keyboard focus to `date` if it is in the displayed month
    pub(crate) fn focus_date(&mut self, date: Date) -> bool {
        let ok = self.cursor.contains(date);
        if ok {
            self.focus = date;
        }
        ok
    }

    // Switches to another month, keeping the focused day number where
    // possible (Jan 31 -> Feb 29 -> Mar 29)
    fn set_cursor(&mut self, cursor: NavigationCursor) {
        let day = usize::from(self.focus.day());
        self.cursor = cursor;
        self.focus = cursor
            .days()
            .take(day)
            .last()
            .unwrap_or_else(|| cursor.first_day());
        log::debug!("Now showing {cursor}");
    }
}

/// A single cell of the rendered month grid
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum DayCell {
    /// Disabled filler before the 1st of the month
    Placeholder,
    Day {
        key: DateKey,
        today: bool,
        selected: bool,
        focused: bool,
    },
}
