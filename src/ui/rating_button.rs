//! Rating button widget
//!
//! One of the five selectable ratings. Pure function of its inputs: it holds
//! no state and only reads the shared selection to decide whether it is the
//! active one.

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::{Block, BorderType, Widget},
};

use super::theme::Theme;
use crate::rating::Rating;

pub struct RatingButton<'a> {
    value: Rating,
    selected: Option<Rating>,
    focused: bool,
    hovered: bool,
    theme: &'a Theme,
}

impl<'a> RatingButton<'a> {
    pub fn new(value: Rating, selected: Option<Rating>, theme: &'a Theme) -> Self {
        Self {
            value,
            selected,
            focused: false,
            hovered: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }

    /// Active iff this button's value is exactly the selected rating
    pub fn is_active(&self) -> bool {
        self.selected == Some(self.value)
    }

    fn colors(&self) -> (ratatui::style::Color, ratatui::style::Color) {
        let theme = self.theme;
        if self.is_active() {
            (theme.on_accent, theme.accent)
        } else if self.hovered {
            (theme.on_accent, theme.hover)
        } else {
            (theme.dimmed, theme.surface)
        }
    }
}

impl Widget for RatingButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let (fg, bg) = self.colors();
        buf.set_style(area, Style::default().fg(fg).bg(bg));

        if self.focused && area.width >= 3 && area.height >= 3 {
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.focus).bg(bg))
                .render(area, buf);
        }

        let label = self.value.to_string();
        let x = area.x + area.width.saturating_sub(1) / 2;
        let y = area.y + area.height.saturating_sub(1) / 2;
        buf.set_string(
            x,
            y,
            label,
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        );
    }
}

/// Full-width submit button
pub struct SubmitButton<'a> {
    focused: bool,
    hovered: bool,
    theme: &'a Theme,
}

impl<'a> SubmitButton<'a> {
    pub const LABEL: &'static str = "S U B M I T";

    pub fn new(theme: &'a Theme) -> Self {
        Self {
            focused: false,
            hovered: false,
            theme,
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn hovered(mut self, hovered: bool) -> Self {
        self.hovered = hovered;
        self
    }
}

impl Widget for SubmitButton<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let bg = if self.hovered { self.theme.hover } else { self.theme.accent };
        let fg = self.theme.on_accent;
        buf.set_style(area, Style::default().fg(fg).bg(bg));

        if self.focused && area.height >= 3 {
            Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(self.theme.focus).bg(bg))
                .render(area, buf);
        }

        let width = Self::LABEL.len() as u16;
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(1) / 2;
        buf.set_stringn(
            x,
            y,
            Self::LABEL,
            area.width as usize,
            Style::default().fg(fg).bg(bg).add_modifier(Modifier::BOLD),
        );
    }
}
