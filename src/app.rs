use crate::help::Help;
use crate::hitmap::{HitMap, Target};
use crate::picker::{CalendarWidget, MonthGrid, SelectedList, GRID_HEIGHT, GRID_WIDTH};
use crate::theme::{BASE_STYLE, HINT_STYLE};
use crossterm::event::{
    poll, read, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    backend::Backend,
    buffer::Buffer,
    layout::{Constraint, Flex, Layout, Rect},
    text::Line,
    widgets::{StatefulWidget, Widget},
    Terminal,
};
use std::io::{self, Write};
use std::time::Duration;
use time::{Date, OffsetDateTime, UtcOffset};

/// Width of the column holding the month grid and the list of selected dates
const PICKER_WIDTH: u16 = 44;

static HINT: &str = "Press ? for help";

#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) struct App {
    calendar: CalendarWidget,
    hits: HitMap,
    state: AppState,
    // Determined once at startup, as it can't be looked up safely once other
    // threads are running
    offset: UtcOffset,
}

impl App {
    pub(crate) fn new(calendar: CalendarWidget, offset: UtcOffset) -> App {
        App {
            calendar,
            hits: HitMap::new(),
            state: AppState::Picking,
            offset,
        }
    }

    /// Runs the event loop until the user quits, then returns the final
    /// state of the picker
    pub(crate) fn run<B: Backend>(
        mut self,
        mut terminal: Terminal<B>,
    ) -> io::Result<CalendarWidget>
    where
        io::Error: From<B::Error>,
    {
        while !self.quitting() {
            self.draw(&mut terminal)?;
            self.handle_input()?;
        }
        Ok(self.calendar)
    }

    fn draw<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()>
    where
        io::Error: From<B::Error>,
    {
        self.calendar.set_today(self.today());
        terminal.draw(|frame| frame.render_widget(&mut *self, frame.area()))?;
        Ok(())
    }

    fn handle_input(&mut self) -> io::Result<()> {
        let normal_modifiers = KeyModifiers::NONE | KeyModifiers::SHIFT;
        if let Some(timeout) = until_midnight(self.now()) {
            if !poll(timeout)? {
                // The date changed; redraw to move the "today" mark
                return Ok(());
            }
        }
        let event = read()?;
        if let Some(KeyEvent {
            code, modifiers, ..
        }) = event.as_key_press_event()
        {
            if modifiers == KeyModifiers::CONTROL && code == KeyCode::Char('c') {
                self.state = AppState::Quitting;
            } else if !normal_modifiers.contains(modifiers) || !self.handle_key(code) {
                self.beep()?;
            }
        } else if let Some(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            ..
        }) = event.as_mouse_event()
        {
            if !self.handle_click(column, row) {
                self.beep()?;
            }
        }
        // else: Redraw on resize, and we might as well redraw on other stuff
        // too
        Ok(())
    }

    // Returns `false` if the user pressed an invalid key
    fn handle_key(&mut self, key: KeyCode) -> bool {
        match self.state {
            AppState::Picking => match key {
                KeyCode::Char('h') | KeyCode::Left => self.calendar.move_focus(-1),
                KeyCode::Char('l') | KeyCode::Right => self.calendar.move_focus(1),
                KeyCode::Char('k') | KeyCode::Up => self.calendar.move_focus(-7),
                KeyCode::Char('j') | KeyCode::Down => self.calendar.move_focus(7),
                KeyCode::Char(' ') | KeyCode::Enter => {
                    let key = self.calendar.focused().into();
                    self.dispatch(Target::Day(key))
                }
                KeyCode::Char('d') | KeyCode::Delete => {
                    let key = self.calendar.focused().into();
                    self.dispatch(Target::RemoveTag(key))
                }
                KeyCode::Char('p' | '<') | KeyCode::PageUp => self.dispatch(Target::PreviousMonth),
                KeyCode::Char('n' | '>') | KeyCode::PageDown => self.dispatch(Target::NextMonth),
                KeyCode::Char('c') => self.dispatch(Target::Clear),
                KeyCode::Char('t') | KeyCode::Home => {
                    self.calendar.jump_to_today();
                    true
                }
                KeyCode::Char('q') | KeyCode::Esc => {
                    self.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('?') => {
                    self.state = AppState::Helping;
                    true
                }
                _ => false,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Quitting => false,
        }
    }

    // Returns `false` if the click could not be acted on
    fn handle_click(&mut self, column: u16, row: u16) -> bool {
        match self.state {
            AppState::Picking => match self.hits.target_at(column, row).cloned() {
                Some(target) => self.dispatch(target),
                // Clicking on blank space is harmless
                None => true,
            },
            AppState::Helping => {
                self.state = AppState::Picking;
                true
            }
            AppState::Quitting => false,
        }
    }

    fn dispatch(&mut self, target: Target) -> bool {
        match target {
            Target::Day(key) => {
                self.calendar.focus_date(key.date());
                self.calendar.toggle(&key);
                true
            }
            Target::RemoveTag(key) => {
                self.calendar.remove(&key);
                true
            }
            Target::PreviousMonth => self.calendar.previous_month().map_err(warn).is_ok(),
            Target::NextMonth => self.calendar.next_month().map_err(warn).is_ok(),
            Target::Clear => {
                self.calendar.clear();
                true
            }
        }
    }

    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(self.offset)
    }

    fn today(&self) -> Date {
        self.now().date()
    }


    fn beep(&self) -> io::Result<()> {
        io::stdout().write_all(b"\x07")
    }

    fn quitting(&self) -> bool {
        self.state == AppState::Quitting
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        buf.set_style(area, BASE_STYLE);
        // Anything not drawn this frame must not react to clicks.
        self.hits.clear();
        let [column] = Layout::horizontal([PICKER_WIDTH])
            .flex(Flex::Center)
            .areas(area);
        let [grid_area, _, list_area, hint_area] = Layout::vertical([
            Constraint::Length(GRID_HEIGHT),
            Constraint::Length(1),
            Constraint::Fill(1),
            Constraint::Length(1),
        ])
        .areas(column);
        let [grid_area] = Layout::horizontal([GRID_WIDTH])
            .flex(Flex::Center)
            .areas(grid_area);
        MonthGrid::new(&self.calendar).render(grid_area, buf, &mut self.hits);
        SelectedList::new(&self.calendar).render(list_area, buf, &mut self.hits);
        Line::styled(HINT, HINT_STYLE)
            .centered()
            .render(hint_area, buf);
        if self.state == AppState::Helping {
            self.hits.clear();
            Help(BASE_STYLE).render(area, buf);
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum AppState {
    Picking,
    Helping,
    Quitting,
}

/// Time left from `now` until the next midnight in the same offset, or `None`
/// on the last day that can be represented
fn until_midnight(now: OffsetDateTime) -> Option<Duration> {
    let midnight = now.date().next_day()?.midnight().assume_offset(now.offset());
    Duration::try_from(midnight - now).ok()
}

fn warn<E: std::fmt::Display>(e: E) -> E {
    log::warn!("Navigation refused: {e}");
    e
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::picker::DateKey;
    use time::{
        macros::{date, datetime},
        Month,
    };

    fn app() -> App {
        App::new(CalendarWidget::new(date!(2024 - 03 - 15)), UtcOffset::UTC)
    }

    fn render(app: &mut App) -> Buffer {
        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
    }

    fn lines(buffer: &Buffer) -> Vec<String> {
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .filter_map(|x| buffer.cell((x, y)))
                    .map(|c| c.symbol())
                    .collect::<String>()
            })
            .collect()
    }

    fn selected(app: &App) -> Vec<&str> {
        app.calendar.selected().map(DateKey::as_str).collect()
    }

    #[test]
    fn test_layout() {
        let mut app = app();
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 05)));
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 12)));
        let buffer = render(&mut app);
        let expected = [
            "                       <           March 2024           >                       ",
            "                        Sun  Mon  Tue  Wed  Thu  Fri  Sat                       ",
            "                                                  1    2                        ",
            "                         3    4    5    6    7    8    9                        ",
            "                        10   11   12   13   14  [15]  16                        ",
            "                        17   18   19   20   21   22   23                        ",
            "                        24   25   26   27   28   29   30                        ",
            "                        31                                                      ",
            "                                                                                ",
            "                  Selected dates                       [Clear]                  ",
            "                  ────────────────────────────────────────────                  ",
            "                  Tue, Mar 12, 2024 ✕                                           ",
            "                  Tue, Mar 5, 2024 ✕                                            ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                                                                ",
            "                                Press ? for help                                ",
        ];
        assert_eq!(lines(&buffer), expected);
        assert_eq!(buffer.cell((40, 0)).map(|c| c.bg), Some(BASE_STYLE.bg.unwrap()));
    }

    #[test]
    fn test_click_day_toggles() {
        let mut app = app();
        render(&mut app);
        // The 5th is in the second row, third column
        assert!(app.handle_click(34, 3));
        assert_eq!(selected(&app), ["2024-3-5"]);
        assert_eq!(app.calendar.focused(), date!(2024 - 03 - 05));
        render(&mut app);
        assert!(app.handle_click(35, 3));
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn test_click_remove_tag() {
        let mut app = app();
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 05)));
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 12)));
        render(&mut app);
        // ✕ after "Tue, Mar 5, 2024"
        assert!(app.handle_click(18 + 17, 12));
        assert_eq!(selected(&app), ["2024-3-12"]);
        render(&mut app);
        // Clicking the now-blank row does nothing
        assert!(app.handle_click(18 + 17, 12));
        assert_eq!(selected(&app), ["2024-3-12"]);
    }

    #[test]
    fn test_click_navigation() {
        let mut app = app();
        render(&mut app);
        assert!(app.handle_click(23, 0));
        assert_eq!(app.calendar.cursor().month(), Month::February);
        render(&mut app);
        assert!(app.handle_click(56, 0));
        render(&mut app);
        assert!(app.handle_click(56, 0));
        assert_eq!(app.calendar.cursor().month(), Month::April);
        assert_eq!(app.calendar.cursor().year(), 2024);
    }

    #[test]
    fn test_click_clear() {
        let mut app = app();
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 05)));
        app.calendar.toggle(&DateKey::from(date!(2024 - 03 - 12)));
        render(&mut app);
        assert!(app.handle_click(58, 9));
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn test_keyboard_selection() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char(' ')));
        assert_eq!(selected(&app), ["2024-3-15"]);
        assert!(app.handle_key(KeyCode::Left));
        assert!(app.handle_key(KeyCode::Enter));
        assert_eq!(selected(&app), ["2024-3-14", "2024-3-15"]);
        assert!(app.handle_key(KeyCode::Char('d')));
        assert_eq!(selected(&app), ["2024-3-15"]);
        // Removing an unselected date changes nothing
        assert!(app.handle_key(KeyCode::Delete));
        assert_eq!(selected(&app), ["2024-3-15"]);
        assert!(app.handle_key(KeyCode::Char('c')));
        assert!(selected(&app).is_empty());
    }

    #[test]
    fn test_keyboard_focus_bounds() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('j')));
        assert!(app.handle_key(KeyCode::Char('j')));
        assert_eq!(app.calendar.focused(), date!(2024 - 03 - 29));
        assert!(!app.handle_key(KeyCode::Down));
        assert_eq!(app.calendar.focused(), date!(2024 - 03 - 29));
    }

    #[test]
    fn test_keyboard_navigation() {
        let mut app = app();
        for _ in 0..12 {
            assert!(app.handle_key(KeyCode::Char('n')));
        }
        assert_eq!(app.calendar.cursor().month(), Month::March);
        assert_eq!(app.calendar.cursor().year(), 2025);
        assert!(app.handle_key(KeyCode::PageUp));
        assert_eq!(app.calendar.cursor().month(), Month::February);
        assert!(app.handle_key(KeyCode::Home));
        assert_eq!(app.calendar.cursor().year(), 2024);
        assert_eq!(app.calendar.focused(), date!(2024 - 03 - 15));
        assert!(!app.handle_key(KeyCode::Char('x')));
    }

    #[test]
    fn test_end_of_time() {
        let mut app = App::new(CalendarWidget::new(date!(9999 - 12 - 25)), UtcOffset::UTC);
        assert!(!app.handle_key(KeyCode::Char('n')));
        assert_eq!(app.calendar.cursor().year(), 9999);
    }

    #[test]
    fn test_help() {
        let mut app = app();
        assert!(app.handle_key(KeyCode::Char('?')));
        let buffer = render(&mut app);
        assert!(lines(&buffer).iter().any(|ln| ln.contains(" Commands ")));
        // Clicks while the help is shown only dismiss it
        assert!(app.handle_click(34, 3));
        assert!(selected(&app).is_empty());
        assert_eq!(app.state, AppState::Picking);
        assert!(app.handle_key(KeyCode::Char('?')));
        assert!(app.handle_key(KeyCode::Char('c')));
        assert_eq!(app.state, AppState::Picking);
    }

    #[test]
    fn test_until_midnight() {
        assert_eq!(
            until_midnight(datetime!(2024-03-15 23:59:30 UTC)),
            Some(Duration::from_secs(30))
        );
        assert_eq!(
            until_midnight(datetime!(2024-03-15 00:00 +5)),
            Some(Duration::from_secs(24 * 60 * 60))
        );
        assert_eq!(until_midnight(datetime!(9999-12-31 12:00 UTC)), None);
    }

    #[test]
    fn test_quit() {
        let mut app = app();
        assert!(!app.quitting());
        assert!(app.handle_key(KeyCode::Char('q')));
        assert!(app.quitting());
    }
}
