//! Card wrapper: paints the card surface and composites it onto the frame
//! with the current presence appearance applied.
//!
//! Cards are drawn at full size into an off-screen buffer first. Compositing
//! then scales that buffer about its centre (nearest cell) and fades every
//! colour toward the page background.

use ratatui::{buffer::Buffer, layout::Rect, style::Style};

use super::theme::{blend, Theme};
use crate::transition::Appearance;

pub struct CardWrapper<'a> {
    appearance: Appearance,
    theme: &'a Theme,
}

impl<'a> CardWrapper<'a> {
    pub fn new(appearance: Appearance, theme: &'a Theme) -> Self {
        Self { appearance, theme }
    }

    /// Off-screen buffer covering `card`, pre-filled with the card gradient
    pub fn canvas(&self, card: Rect) -> Buffer {
        let mut buf = Buffer::empty(card);
        for row in 0..card.height {
            let fill = self.theme.card_gradient(row, card.height);
            buf.set_style(
                Rect::new(card.x, card.y + row, card.width, 1),
                Style::default().fg(self.theme.foreground).bg(fill),
            );
        }
        buf
    }

    /// Where the card lands on screen at the current scale
    pub fn target(&self, card: Rect) -> Option<Rect> {
        scale_rect(card, self.appearance.scale)
    }

    /// Copy `canvas` onto `dest`, scaled and faded. Returns the covered rect.
    pub fn composite(&self, canvas: &Buffer, dest: &mut Buffer) -> Option<Rect> {
        let source = canvas.area;
        let target = self.target(source)?.intersection(dest.area);
        if target.is_empty() {
            return None;
        }

        let fade = 1.0 - self.appearance.opacity.clamp(0.0, 1.0);
        let page = self.theme.background;

        for dy in 0..target.height {
            let sy = source.y + sample(dy, target.height, source.height);
            for dx in 0..target.width {
                let sx = source.x + sample(dx, target.width, source.width);
                let Some(src) = canvas.cell((sx, sy)) else {
                    continue;
                };
                let mut cell = src.clone();
                if fade > 0.0 {
                    cell.fg = blend(cell.fg, page, fade);
                    cell.bg = blend(cell.bg, page, fade);
                }
                if let Some(dst) = dest.cell_mut((target.x + dx, target.y + dy)) {
                    *dst = cell;
                }
            }
        }

        Some(target)
    }
}

/// Nearest source index for destination index `i` when mapping `to` cells onto `from`
fn sample(i: u16, to: u16, from: u16) -> u16 {
    let i = u32::from(i);
    let idx = ((2 * i + 1) * u32::from(from)) / (2 * u32::from(to));
    (idx as u16).min(from.saturating_sub(1))
}

/// Shrink `base` about its centre. `None` once it collapses to nothing.
pub fn scale_rect(base: Rect, scale: f64) -> Option<Rect> {
    if scale <= 0.0 || base.is_empty() {
        return None;
    }
    let scale = scale.min(1.0);
    let width = (f64::from(base.width) * scale).round() as u16;
    let height = (f64::from(base.height) * scale).round() as u16;
    if width == 0 || height == 0 {
        return None;
    }
    Some(Rect {
        x: base.x + (base.width - width) / 2,
        y: base.y + (base.height - height) / 2,
        width,
        height,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::style::Color;

    fn canvas(theme: &Theme) -> Buffer {
        let wrapper = CardWrapper::new(Appearance::SHOWN, theme);
        let mut buf = wrapper.canvas(Rect::new(10, 5, 20, 10));
        buf.set_string(12, 6, "hello", Style::default().fg(Color::Rgb(255, 255, 255)));
        buf
    }

    #[test]
    fn test_scale_rect() {
        let base = Rect::new(10, 10, 20, 10);
        assert_eq!(scale_rect(base, 1.0), Some(base));
        assert_eq!(scale_rect(base, 0.5), Some(Rect::new(15, 12, 10, 5)));
        assert_eq!(scale_rect(base, 0.0), None);
        assert_eq!(scale_rect(base, 0.01), None);
    }

    #[test]
    fn test_full_appearance_copies_verbatim() {
        let theme = Theme::default();
        let src = canvas(&theme);
        let mut dest = Buffer::empty(Rect::new(0, 0, 40, 20));

        let covered = CardWrapper::new(Appearance::SHOWN, &theme).composite(&src, &mut dest);
        assert_eq!(covered, Some(src.area));
        assert_eq!(dest[(12u16, 6u16)], src[(12u16, 6u16)]);
        assert_eq!(dest[(29u16, 14u16)], src[(29u16, 14u16)]);
        // Outside the card stays untouched
        assert_eq!(dest[(0u16, 0u16)].symbol(), " ");
        assert_eq!(dest[(0u16, 0u16)].bg, Color::Reset);
    }

    #[test]
    fn test_hidden_appearance_draws_nothing() {
        let theme = Theme::default();
        let src = canvas(&theme);
        let mut dest = Buffer::empty(Rect::new(0, 0, 40, 20));
        let before = dest.clone();

        let covered = CardWrapper::new(Appearance::HIDDEN, &theme).composite(&src, &mut dest);
        assert_eq!(covered, None);
        assert_eq!(dest, before);
    }

    #[test]
    fn test_zero_opacity_fades_to_page() {
        let theme = Theme::default();
        let src = canvas(&theme);
        let mut dest = Buffer::empty(Rect::new(0, 0, 40, 20));
        let appearance = Appearance {
            opacity: 0.0,
            scale: 1.0,
        };

        CardWrapper::new(appearance, &theme).composite(&src, &mut dest);
        assert_eq!(dest[(12u16, 6u16)].fg, theme.background);
        assert_eq!(dest[(12u16, 6u16)].bg, theme.background);
    }

    #[test]
    fn test_half_scale_is_centered() {
        let theme = Theme::default();
        let src = canvas(&theme);
        let mut dest = Buffer::empty(Rect::new(0, 0, 40, 20));
        let appearance = Appearance {
            opacity: 1.0,
            scale: 0.5,
        };

        let covered = CardWrapper::new(appearance, &theme).composite(&src, &mut dest);
        assert_eq!(covered, Some(Rect::new(15, 7, 10, 5)));
        assert_eq!(dest[(14u16, 7u16)].bg, Color::Reset);
        assert_ne!(dest[(15u16, 7u16)].bg, Color::Reset);
    }

    #[test]
    fn test_sample_covers_source() {
        assert_eq!(sample(0, 10, 20), 1);
        assert_eq!(sample(9, 10, 20), 19);
        assert_eq!(sample(0, 20, 20), 0);
        assert_eq!(sample(19, 20, 20), 19);
    }

    #[test]
    fn test_canvas_gradient() {
        let theme = Theme::default();
        let buf = CardWrapper::new(Appearance::SHOWN, &theme).canvas(Rect::new(0, 0, 4, 5));
        assert_eq!(buf[(0u16, 0u16)].bg, theme.card_top);
        assert_eq!(buf[(3u16, 4u16)].bg, theme.card_bottom);
    }
}
