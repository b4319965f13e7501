use crate::picker::DateKey;
use ratatui::layout::{Position, Rect};

/// Something on screen that reacts to a mouse click
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum Target {
    /// A day cell in the month grid; toggles the date
    Day(DateKey),
    /// The "✕" on a selected-date tag; removes the date
    RemoveTag(DateKey),
    PreviousMonth,
    NextMonth,
    Clear,
}

/// Regions of the most recently drawn frame and what each of them does when
/// clicked.  Rebuilt from scratch on every draw.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub(crate) struct HitMap(Vec<(Rect, Target)>);

impl HitMap {
    pub(crate) fn new() -> HitMap {
        HitMap::default()
    }

    pub(crate) fn clear(&mut self) {
        self.0.clear();
    }

    pub(crate) fn insert(&mut self, area: Rect, target: Target) {
        if !area.is_empty() {
            self.0.push((area, target));
        }
    }

    /// Returns the target at the given screen cell.  Regions registered later
    /// are drawn on top and so take priority.
    pub(crate) fn target_at(&self, x: u16, y: u16) -> Option<&Target> {
        let pos = Position::new(x, y);
        self.0
            .iter()
            .rev()
            .find(|(area, _)| area.contains(pos))
            .map(|(_, target)| target)
    }
}
