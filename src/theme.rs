use ratatui::style::{Color, Modifier, Style};

pub(crate) const BASE_STYLE: Style = Style::new().fg(Color::White).bg(Color::Black);

pub(crate) const MONTH_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const WEEKDAY_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

pub(crate) const NAV_STYLE: Style = Style::new()
    .fg(Color::LightCyan)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const TODAY_STYLE: Style = Style::new()
    .fg(Color::LightYellow)
    .bg(Color::Black)
    .add_modifier(Modifier::BOLD);

pub(crate) const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::LightBlue);

pub(crate) const HINT_STYLE: Style = BASE_STYLE.fg(Color::DarkGray);

pub(crate) mod list {
    use super::*;

    pub(crate) const TITLE_STYLE: Style = BASE_STYLE.add_modifier(Modifier::BOLD);

    pub(crate) const TAG_STYLE: Style = BASE_STYLE.fg(Color::LightBlue);

    pub(crate) const REMOVE_STYLE: Style = BASE_STYLE.fg(Color::LightRed);

    pub(crate) const CLEAR_STYLE: Style = NAV_STYLE;

    pub(crate) const EMPTY_STYLE: Style = BASE_STYLE
        .fg(Color::DarkGray)
        .add_modifier(Modifier::ITALIC);
}
