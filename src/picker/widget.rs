use super::{CalendarWidget, DayCell};
use crate::hitmap::{HitMap, Target};
use crate::theme::{
    list::{CLEAR_STYLE, EMPTY_STYLE, REMOVE_STYLE, TAG_STYLE, TITLE_STYLE},
    MONTH_STYLE, NAV_STYLE, SELECTED_STYLE, TODAY_STYLE, WEEKDAY_STYLE,
};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::Text,
    widgets::{Paragraph, StatefulWidget, Widget},
};

static WEEKDAY_HEADER: &str = " Sun  Mon  Tue  Wed  Thu  Fri  Sat";

/// Width of the month grid in columns
pub(crate) const GRID_WIDTH: u16 = 34;

/// Number of lines taken up by the month grid: the month label, the weekday
/// header, and up to six weeks
pub(crate) const GRID_HEIGHT: u16 = HEADER_LINES + 6;

/// Number of lines above the first week
const HEADER_LINES: u16 = 2;

/// Number of columns per day of week, including the gap after it
const DAY_WIDTH: u16 = 5;

const DAYS_IN_WEEK: u16 = 7;

const PREV_BUTTON: &str = "<";
const NEXT_BUTTON: &str = ">";

static LIST_TITLE: &str = "Selected dates";
static CLEAR_BUTTON: &str = "[Clear]";
static REMOVE_BUTTON: &str = "✕";
static EMPTY_MESSAGE: &str = "Click dates on the calendar to select them";

/// Number of lines taken up by the list title and its rule
const LIST_HEADER_LINES: u16 = 2;

const ACS_HLINE: char = '─';

/// Draws the displayed month of a [`CalendarWidget`] and records each
/// clickable cell in the [`HitMap`]
#[derive(Clone, Copy, Debug)]
pub(crate) struct MonthGrid<'a> {
    calendar: &'a CalendarWidget,
}

impl<'a> MonthGrid<'a> {
    pub(crate) fn new(calendar: &'a CalendarWidget) -> Self {
        MonthGrid { calendar }
    }
}

impl StatefulWidget for MonthGrid<'_> {
    type State = HitMap;

    /*
     * <           March 2024           >
     *  Sun  Mon  Tue  Wed  Thu  Fri  Sat
     *                            1    2
     *   3    4    5    6    7    8    9
     *  10   11   12   13   14  [15]  16
     *  ...
     */

    fn render(self, area: Rect, buf: &mut Buffer, hits: &mut HitMap) {
        let mut canvas = BufferCanvas::new(area, buf);
        let prev = canvas.mvprint(0, 0, PREV_BUTTON, NAV_STYLE);
        hits.insert(prev, Target::PreviousMonth);
        let label = self.calendar.cursor().to_string();
        let label_x = GRID_WIDTH.saturating_sub(text_width(&label)) / 2;
        canvas.mvprint(0, label_x, label, MONTH_STYLE);
        let next = canvas.mvprint(0, GRID_WIDTH - 1, NEXT_BUTTON, NAV_STYLE);
        hits.insert(next, Target::NextMonth);
        canvas.mvprint(1, 0, WEEKDAY_HEADER, WEEKDAY_STYLE);
        for (i, cell) in std::iter::zip(0u16.., self.calendar.cells()) {
            let DayCell::Day {
                key,
                today,
                selected,
                focused,
            } = cell
            else {
                continue;
            };
            let day = key.date().day();
            let s = if today {
                format!("[{day:2}]")
            } else {
                format!(" {day:2} ")
            };
            let mut style = if selected {
                SELECTED_STYLE
            } else if today {
                TODAY_STYLE
            } else {
                Style::new()
            };
            if focused {
                style = style.add_modifier(Modifier::UNDERLINED);
            }
            let cell_area = canvas.mvprint(
                HEADER_LINES + i / DAYS_IN_WEEK,
                DAY_WIDTH * (i % DAYS_IN_WEEK),
                s,
                style,
            );
            hits.insert(cell_area, Target::Day(key));
        }
    }
}

/// Draws the selected dates of a [`CalendarWidget`] as a list of removable
/// tags, sorted by key, and records the clickable parts in the [`HitMap`]
#[derive(Clone, Copy, Debug)]
pub(crate) struct SelectedList<'a> {
    calendar: &'a CalendarWidget,
}

impl<'a> SelectedList<'a> {
    pub(crate) fn new(calendar: &'a CalendarWidget) -> Self {
        SelectedList { calendar }
    }
}

impl StatefulWidget for SelectedList<'_> {
    type State = HitMap;

    fn render(self, area: Rect, buf: &mut Buffer, hits: &mut HitMap) {
        let mut canvas = BufferCanvas::new(area, buf);
        canvas.mvprint(0, 0, LIST_TITLE, TITLE_STYLE);
        let clear_x = area.width.saturating_sub(text_width(CLEAR_BUTTON));
        let clear = canvas.mvprint(0, clear_x, CLEAR_BUTTON, CLEAR_STYLE);
        hits.insert(clear, Target::Clear);
        canvas.hline(1, 0, ACS_HLINE, area.width);
        let total = self.calendar.selection_len();
        if total == 0 {
            canvas.mvprint(LIST_HEADER_LINES, 0, EMPTY_MESSAGE, EMPTY_STYLE);
            return;
        }
        let rows = usize::from(area.height.saturating_sub(LIST_HEADER_LINES));
        // If the tags don't all fit, the last row says how many are missing.
        let shown = if total > rows {
            rows.saturating_sub(1)
        } else {
            total
        };
        for (y, key) in std::iter::zip(LIST_HEADER_LINES.., self.calendar.selected().take(shown)) {
            let label = key.label();
            // The label gets cut short if needed so that the ✕ stays on screen
            let remove_x = text_width(&label)
                .saturating_add(1)
                .min(area.width.saturating_sub(text_width(REMOVE_BUTTON)));
            canvas.mvprintn(y, 0, label, remove_x.saturating_sub(1), TAG_STYLE);
            let remove = canvas.mvprint(y, remove_x, REMOVE_BUTTON, REMOVE_STYLE);
            hits.insert(remove, Target::RemoveTag(key.clone()));
        }
        if shown < total {
            let y = u16::try_from(shown)
                .unwrap_or(u16::MAX)
                .saturating_add(LIST_HEADER_LINES);
            canvas.mvprint(y, 0, format!("… and {} more", total - shown), EMPTY_STYLE);
        }
    }
}

fn text_width(s: &str) -> u16 {
    u16::try_from(Text::raw(s).width()).unwrap_or(u16::MAX)
}

#[derive(Debug, Eq, PartialEq)]
struct BufferCanvas<'a> {
    area: Rect,
    buf: &'a mut Buffer,
}

impl<'a> BufferCanvas<'a> {
    fn new(area: Rect, buf: &'a mut Buffer) -> Self {
        Self { area, buf }
    }

    // Returns the area actually written to, which is empty if the text lies
    // entirely outside the canvas
    fn mvprint<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, style: Style) -> Rect {
        self.mvprintn(y, x, s, u16::MAX, style)
    }

    // Like `mvprint`, but writes at most `n` columns
    fn mvprintn<S: AsRef<str>>(&mut self, y: u16, x: u16, s: S, n: u16, style: Style) -> Rect {
        if y < self.area.height && x < self.area.width && n > 0 {
            let text = Text::styled(s.as_ref(), style);
            let width = u16::try_from(text.width()).unwrap_or(u16::MAX);
            // Using a Paragraph lets us truncate text that extends beyond the
            // canvas, though we need to be sure that the Rect passed to the
            // Paragraph is entirely within the frame lest a panic result.
            let rect = Rect {
                x: x + self.area.x,
                y: y + self.area.y,
                width: (self.area.width - x).min(width).min(n),
                height: 1,
            };
            Paragraph::new(text).render(rect, self.buf);
            rect
        } else {
            Rect::default()
        }
    }

    fn hline(&mut self, y: u16, x: u16, ch: char, length: u16) {
        self.mvprint(y, x, String::from(ch).repeat(length.into()), Style::new());
    }
}
