//! Card geometry
//!
//! Provides:
//! - Card sizing and centering
//! - Row layout for the form card and the thank-you card
//! - Word wrapping by display width
//! - Hit regions for mouse input

use ratatui::layout::Rect;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::app::Control;
use crate::config::ContentConfig;
use crate::rating::Rating;

/// Columns of padding inside the card, each side
pub const PAD_X: u16 = 3;
/// Rows of padding inside the card, top and bottom
pub const PAD_Y: u16 = 1;

/// Rating button size
pub const BUTTON_WIDTH: u16 = 5;
pub const BUTTON_HEIGHT: u16 = 3;

/// Star badge size
pub const BADGE_WIDTH: u16 = 5;
pub const BADGE_HEIGHT: u16 = 3;

/// Text stand-in for the thank-you illustration
pub const ILLUSTRATION: [&str; 7] = [
    "╭─────────────────╮",
    "│  ▂▂▂▂▂▂▂▂▂▂▂    │",
    "│  ▂▂▂▂▂▂▂        │",
    "│        ╭───╮    │",
    "│        │ ✓ │    │",
    "│        ╰───╯    │",
    "╰─────────────────╯",
];

/// Row positions of the form card
#[derive(Debug, Clone, PartialEq)]
pub struct FormLayout {
    pub card: Rect,
    pub badge: Rect,
    pub title: Rect,
    pub description: Rect,
    pub description_lines: Vec<String>,
    pub buttons: [Rect; 5],
    pub submit: Rect,
}

/// Row positions of the thank-you card
#[derive(Debug, Clone, PartialEq)]
pub struct ThanksLayout {
    pub card: Rect,
    pub illustration: Rect,
    pub pill: Rect,
    pub title: Rect,
    pub message: Rect,
    pub message_lines: Vec<String>,
}

impl FormLayout {
    pub fn compute(area: Rect, max_width: u16, content: &ContentConfig) -> Self {
        let width = card_width(area, max_width);
        let inner_width = width.saturating_sub(PAD_X * 2);
        let description_lines = wrap_words(&content.description, inner_width as usize);
        let text_rows = description_lines.len() as u16;

        // badge, gap, title, gap, description, gap, buttons, gap, submit
        let height = PAD_Y * 2 + BADGE_HEIGHT + 1 + 1 + 1 + text_rows + 1 + BUTTON_HEIGHT + 1 + 3;
        let card = center(area, width, height);

        let x = card.x + PAD_X;
        let mut y = card.y + PAD_Y;
        let mut row = |h: u16, gap: u16| {
            let r = clip(Rect::new(x, y, inner_width, h), card);
            y = y.saturating_add(h + gap);
            r
        };

        let badge_row = row(BADGE_HEIGHT, 1);
        let title = row(1, 1);
        let description = row(text_rows, 1);
        let buttons_row = row(BUTTON_HEIGHT, 1);
        let submit = row(3, 0);

        Self {
            card,
            badge: Rect::new(badge_row.x, badge_row.y, BADGE_WIDTH.min(badge_row.width), badge_row.height),
            title,
            description,
            description_lines,
            buttons: spread_buttons(buttons_row).map(|b| clip(b, buttons_row)),
            submit,
        }
    }
}

impl ThanksLayout {
    pub fn compute(area: Rect, max_width: u16, content: &ContentConfig) -> Self {
        let width = card_width(area, max_width);
        let inner_width = width.saturating_sub(PAD_X * 2);
        let message_lines = wrap_words(&content.thanks_message, inner_width as usize);
        let text_rows = message_lines.len() as u16;
        let art_rows = ILLUSTRATION.len() as u16;

        // illustration, gap, pill, gap, title, gap, message
        let height = PAD_Y * 2 + art_rows + 1 + 1 + 1 + 1 + 1 + text_rows;
        let card = center(area, width, height);

        let x = card.x + PAD_X;
        let mut y = card.y + PAD_Y;
        let mut row = |h: u16| {
            let r = clip(Rect::new(x, y, inner_width, h), card);
            y = y.saturating_add(h + 1);
            r
        };

        Self {
            card,
            illustration: row(art_rows),
            pill: row(1),
            title: row(1),
            message: row(text_rows),
            message_lines,
        }
    }
}

/// Part of `rect` inside `card`. Rows pushed past a clamped card come back
/// empty, so nothing is ever drawn outside the card buffer.
fn clip(rect: Rect, card: Rect) -> Rect {
    let clipped = rect.intersection(card);
    if clipped.is_empty() {
        Rect::new(card.x, card.y, 0, 0)
    } else {
        clipped
    }
}

fn card_width(area: Rect, max_width: u16) -> u16 {
    max_width.min(area.width.saturating_sub(2)).max(PAD_X * 2 + 1)
}

/// Rect of `width` x `height` centered in `area`, clamped to fit
pub fn center(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

/// Five buttons, first flush left, last flush right, even gaps between
fn spread_buttons(row: Rect) -> [Rect; 5] {
    let count = Rating::ALL.len() as u16;
    let width = if row.width >= BUTTON_WIDTH * count {
        BUTTON_WIDTH
    } else {
        (row.width / count).max(1)
    };
    let slack = row.width.saturating_sub(width * count);

    std::array::from_fn(|i| {
        let i = i as u16;
        let offset = i * width + slack * i / (count - 1);
        Rect::new(row.x + offset, row.y, width, row.height)
    })
}

/// Greedy word wrap by display width. Words wider than `width` are split.
pub fn wrap_words(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();
        let needed = if line.is_empty() { word_width } else { line_width + 1 + word_width };

        if needed <= width {
            if !line.is_empty() {
                line.push(' ');
                line_width += 1;
            }
            line.push_str(word);
            line_width += word_width;
            continue;
        }

        if !line.is_empty() {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }

        if word_width <= width {
            line.push_str(word);
            line_width = word_width;
        } else {
            for c in word.chars() {
                let w = c.width().unwrap_or(0);
                if line_width + w > width {
                    lines.push(std::mem::take(&mut line));
                    line_width = 0;
                }
                line.push(c);
                line_width += w;
            }
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Clickable controls from the last drawn frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HitMap {
    regions: Vec<(Control, Rect)>,
}

impl HitMap {
    pub fn for_form(layout: &FormLayout) -> Self {
        let mut regions: Vec<(Control, Rect)> = Rating::ALL
            .iter()
            .zip(layout.buttons.iter())
            .map(|(&rating, &rect)| (Control::Rating(rating), rect))
            .collect();
        regions.push((Control::Submit, layout.submit));
        Self { regions }
    }

    /// Control under the given cell, if any
    pub fn hit(&self, column: u16, row: u16) -> Option<Control> {
        self.regions
            .iter()
            .find(|(_, rect)| {
                column >= rect.x
                    && column < rect.x + rect.width
                    && row >= rect.y
                    && row < rect.y + rect.height
            })
            .map(|(control, _)| *control)
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
