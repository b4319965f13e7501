use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Flex, HorizontalAlignment, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Clear, Padding, Paragraph, Widget},
};

static BINDINGS: &[(&str, &str)] = &[
    ("h, l, LEFT, RIGHT", "Move to previous/next day"),
    ("k, j, UP, DOWN", "Move to previous/next week"),
    ("SPACE, ENTER", "Select/unselect day"),
    ("d, DELETE", "Unselect day"),
    ("p, <, PAGE UP", "Show previous month"),
    ("n, >, PAGE DOWN", "Show next month"),
    ("t, HOME", "Jump to today"),
    ("c", "Clear selection"),
    ("?", "Show this help"),
    ("q, ESC", "Quit"),
];

static NOTES: &[&str] = &[
    "Click a day to select or unselect it.",
    "Click \u{2715} next to a date to unselect it.",
    "Click [Clear] to unselect everything.",
];

static DISMISS: &str = "Press the Any Key to dismiss.";

/// Columns between the keys and their description
const GUTTER: usize = 3;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub(crate) struct Help(pub(crate) Style);

impl Help {
    fn lines(self) -> Vec<Line<'static>> {
        let keys_width = BINDINGS
            .iter()
            .map(|(keys, _)| keys.len())
            .max()
            .unwrap_or(0)
            + GUTTER;
        let key_style = self.0.add_modifier(Modifier::BOLD);
        let mut lines = BINDINGS
            .iter()
            .map(|&(keys, desc)| {
                Line::from(vec![
                    Span::styled(format!("{keys:keys_width$}"), key_style),
                    Span::raw(desc),
                ])
            })
            .collect::<Vec<_>>();
        lines.push(Line::default());
        lines.extend(NOTES.iter().map(|&s| Line::raw(s)));
        lines.push(Line::default());
        lines.push(Line::raw(DISMISS).centered());
        lines
    }
}

impl Widget for Help {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let lines = self.lines();
        let text_width = lines.iter().map(Line::width).max().unwrap_or(0);
        // Border plus one column of padding on each side
        let width = u16::try_from(text_width)
            .unwrap_or(u16::MAX)
            .saturating_add(4);
        let height = u16::try_from(lines.len())
            .unwrap_or(u16::MAX)
            .saturating_add(2);
        let [help_area] = Layout::horizontal([Constraint::Length(width)])
            .flex(Flex::Center)
            .areas(area);
        let [help_area] = Layout::vertical([Constraint::Length(height)])
            .flex(Flex::Center)
            .areas(help_area);
        Clear.render(help_area, buf);
        Paragraph::new(lines)
            .block(
                Block::bordered()
                    .title(" Commands ")
                    .title_alignment(HorizontalAlignment::Center)
                    .padding(Padding::horizontal(1)),
            )
            .style(self.0)
            .render(help_area, buf);
    }
}
